//! Argument classification against a [`FlagSchema`].
//!
//! [`classify`] walks an argument vector once, left to right. Tokens starting
//! with `-` must name a schema flag; flags with a parameter consume the next
//! token. Everything else is a positional argument. The result,
//! [`ClassifiedArgs`], records per-flag state in grammar order so later passes
//! can read "last occurrence wins" values and audit which flags were used.

use tracing::debug;

use crate::error::{CoreError, Result};
use crate::grammar::{FlagSchema, FlagSpec};

/// Translation-time state of one schema flag.
///
/// `values` is non-empty only for flags that take a parameter and were set at
/// least once; each occurrence appends one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFlag {
    set: bool,
    values: Vec<String>,
}

impl ParsedFlag {
    /// Whether the flag appeared at least once.
    pub fn is_set(&self) -> bool {
        self.set
    }

    /// All values in command-line order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The `i`-th value; negative indices count from the end.
    ///
    /// Returns `""` when out of range, so `value(-1)` reads the last
    /// occurrence of a repeated flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use curl2req_core::{FlagSchema, classify};
    ///
    /// let args = classify(FlagSchema::embedded(), &["-X", "PUT", "-X", "POST"]).unwrap();
    /// let request = args.flag("request").unwrap();
    /// assert_eq!(request.value(-1), "POST");
    /// assert_eq!(request.value(0), "PUT");
    /// assert_eq!(request.value(5), "");
    /// ```
    pub fn value(&self, i: isize) -> &str {
        nth(&self.values, i)
    }
}

/// A schema flag paired with its classification state.
#[derive(Debug, Clone, Copy)]
pub struct FlagRef<'a> {
    /// Grammar entry.
    pub spec: &'a FlagSpec,
    /// What classification recorded for it.
    pub state: &'a ParsedFlag,
}

/// The result of classifying one argument vector.
///
/// Holds one [`ParsedFlag`] per schema entry (set or not) and the positional
/// arguments in order. Created fresh per [`classify`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedArgs<'s> {
    schema: &'s FlagSchema,
    states: Vec<ParsedFlag>,
    args: Vec<String>,
}

/// Classifies `argv` against `schema`.
///
/// # Errors
///
/// - [`CoreError::UnknownFlag`] for a `-`-prefixed token the schema does not
///   know, naming the literal token.
/// - [`CoreError::InsufficientArgument`] when a parameter-taking flag is the
///   last token or is followed by a token starting with `-`.
///
/// # Examples
///
/// ```
/// use curl2req_core::{CoreError, FlagSchema, classify};
///
/// let schema = FlagSchema::embedded();
/// let args = classify(schema, &["curl", "-k", "-H", "Accept: */*", "example.com"]).unwrap();
/// assert!(args.is_set("insecure"));
/// assert_eq!(args.arg(-1), "example.com");
///
/// let err = classify(schema, &["-H", "-k"]).unwrap_err();
/// assert_eq!(err, CoreError::InsufficientArgument("-H".into()));
/// ```
pub fn classify<'s, S: AsRef<str>>(
    schema: &'s FlagSchema,
    argv: &[S],
) -> Result<ClassifiedArgs<'s>> {
    let mut states = vec![ParsedFlag::default(); schema.len()];
    let mut args = Vec::new();

    let mut tokens = argv.iter().map(|s| AsRef::<str>::as_ref(s));
    while let Some(token) = tokens.next() {
        if !token.starts_with('-') {
            args.push(token.to_string());
            continue;
        }

        let idx = schema
            .resolve(token)
            .ok_or_else(|| CoreError::UnknownFlag(token.to_string()))?;
        let state = &mut states[idx];
        state.set = true;

        if schema.flags()[idx].takes_value() {
            match tokens.next() {
                Some(value) if !value.starts_with('-') => {
                    debug!(flag = token, value, "Classified flag with value");
                    state.values.push(value.to_string());
                }
                _ => return Err(CoreError::InsufficientArgument(token.to_string())),
            }
        } else {
            debug!(flag = token, "Classified flag");
        }
    }

    Ok(ClassifiedArgs {
        schema,
        states,
        args,
    })
}

impl FlagSchema {
    /// Classifies `argv` against this schema. See [`classify`].
    pub fn classify<S: AsRef<str>>(&self, argv: &[S]) -> Result<ClassifiedArgs<'_>> {
        classify(self, argv)
    }
}

impl<'s> ClassifiedArgs<'s> {
    /// The schema this classification was made against.
    pub fn schema(&self) -> &'s FlagSchema {
        self.schema
    }

    /// State of the flag with the given long alias, if the schema has it.
    pub fn flag(&self, long: &str) -> Option<&ParsedFlag> {
        self.schema.long_index(long).map(|idx| &self.states[idx])
    }

    /// Whether the flag with the given long alias was set.
    pub fn is_set(&self, long: &str) -> bool {
        self.flag(long).is_some_and(ParsedFlag::is_set)
    }

    /// Last value of the flag with the given long alias, or `""`.
    pub fn last_value(&self, long: &str) -> &str {
        self.flag(long).map_or("", |flag| flag.value(-1))
    }

    /// Every value of the flag with the given long alias.
    pub fn values(&self, long: &str) -> &[String] {
        self.flag(long).map(ParsedFlag::values).unwrap_or_default()
    }

    /// Positional arguments in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The `i`-th positional argument; negative indices count from the end.
    /// Returns `""` when out of range.
    pub fn arg(&self, i: isize) -> &str {
        nth(&self.args, i)
    }

    /// Every schema flag in grammar order, set or not.
    pub fn iter(&self) -> impl Iterator<Item = FlagRef<'_>> {
        self.schema
            .flags()
            .iter()
            .zip(&self.states)
            .map(|(spec, state)| FlagRef { spec, state })
    }

    /// Flags that were set, in grammar order.
    pub fn iter_set(&self) -> impl Iterator<Item = FlagRef<'_>> {
        self.iter().filter(|flag| flag.state.is_set())
    }
}

fn nth(items: &[String], i: isize) -> &str {
    let idx = if i < 0 {
        items.len().checked_sub(i.unsigned_abs())
    } else {
        Some(i as usize)
    };
    idx.and_then(|idx| items.get(idx))
        .map_or("", String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FlagSchema {
        FlagSchema::parse(
            "Usage: curl [options...] <url>\n\
             -d, --data <data>   HTTP POST data\n\
             -k, --insecure      Allow insecure server connections\n\
             --url <url>     URL to work with\n",
        )
        .unwrap()
    }

    #[test]
    fn test_classify_positionals_and_flags() {
        let schema = schema();
        let args = classify(&schema, &["curl", "-k", "--data", "a=b", "example.com"]).unwrap();
        assert_eq!(args.args(), ["curl", "example.com"]);
        assert!(args.is_set("insecure"));
        assert_eq!(args.values("data"), ["a=b"]);
        assert!(!args.is_set("url"));
    }

    #[test]
    fn test_classify_repeated_flag_appends() {
        let schema = schema();
        let args = classify(&schema, &["-d", "a", "--data", "b", "-d", "c"]).unwrap();
        let data = args.flag("data").unwrap();
        assert_eq!(data.values(), ["a", "b", "c"]);
        assert_eq!(data.value(-1), "c");
        assert_eq!(data.value(-3), "a");
        assert_eq!(data.value(-4), "");
    }

    #[test]
    fn test_classify_unknown_short_flag() {
        let schema = schema();
        let err = classify(&schema, &["-Z", "example.com"]).unwrap_err();
        assert_eq!(err, CoreError::UnknownFlag("-Z".to_string()));
    }

    #[test]
    fn test_classify_unknown_long_flag() {
        let schema = schema();
        let err = classify(&schema, &["--insecure-please"]).unwrap_err();
        assert_eq!(err, CoreError::UnknownFlag("--insecure-please".to_string()));
    }

    #[test]
    fn test_classify_missing_value_at_end() {
        let schema = schema();
        let err = classify(&schema, &["example.com", "-d"]).unwrap_err();
        assert_eq!(err, CoreError::InsufficientArgument("-d".to_string()));
    }

    #[test]
    fn test_classify_value_must_not_look_like_flag() {
        let schema = schema();
        let err = classify(&schema, &["--url", "-k"]).unwrap_err();
        assert_eq!(err, CoreError::InsufficientArgument("--url".to_string()));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let schema = schema();
        let argv = ["curl", "-d", "x", "-k", "a", "b"];
        assert_eq!(classify(&schema, &argv).unwrap(), classify(&schema, &argv).unwrap());
    }

    #[test]
    fn test_classify_calls_are_independent() {
        let schema = schema();
        let first = classify(&schema, &["-k"]).unwrap();
        let second = classify(&schema, &["example.com"]).unwrap();
        assert!(first.is_set("insecure"));
        assert!(!second.is_set("insecure"));
    }

    #[test]
    fn test_arg_negative_index() {
        let schema = schema();
        let args = classify(&schema, &["a", "b", "c"]).unwrap();
        assert_eq!(args.arg(-1), "c");
        assert_eq!(args.arg(0), "a");
        assert_eq!(args.arg(3), "");
        assert_eq!(args.arg(-4), "");
    }

    #[test]
    fn test_iter_set_in_grammar_order() {
        let schema = schema();
        let args = classify(&schema, &["--url", "x", "-k", "-d", "y"]).unwrap();
        let names: Vec<String> = args.iter_set().map(|f| f.spec.canonical_name()).collect();
        assert_eq!(names, ["--data", "--insecure", "--url"]);
        assert_eq!(args.iter().count(), 3);
    }

    #[test]
    fn test_lookup_of_missing_long_flag() {
        let schema = schema();
        let args = classify(&schema, &["x"]).unwrap();
        assert!(args.flag("form").is_none());
        assert_eq!(args.last_value("form"), "");
        assert!(args.values("form").is_empty());
    }
}
