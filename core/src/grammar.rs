//! Flag schema loading from `curl -h` style help text.
//!
//! The grammar is a `Usage:` line followed by one flag per line:
//!
//! ```text
//! Usage: curl [options...] <url>
//!  -d, --data <data>   HTTP POST data
//!      --compressed    Request compressed response
//! ```
//!
//! Each line carries at most one short alias, at most one long alias, an
//! optional `<label>` marking that the flag consumes one value, and a free-form
//! description. The loaded [`FlagSchema`] indexes every flag by both aliases.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};

/// The `curl -h` grammar embedded at build time.
pub const HELP_TEXT: &str = include_str!("../assets/help.txt");

/// Marker the first grammar line must start with.
pub const USAGE_MARKER: &str = "Usage:";

/// `-x` or `--long`, terminated by a comma or a space.
static ALIAS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(--?)([^,\s]*)[,\s]").expect("static regex must compile"));

static EMBEDDED: LazyLock<FlagSchema> = LazyLock::new(|| match FlagSchema::parse(HELP_TEXT) {
    Ok(schema) => schema,
    // The asset ships with the crate; a parse failure is a build defect.
    Err(err) => panic!("embedded curl grammar is malformed: {err}"),
});

/// A single flag as described by one grammar line.
///
/// # Examples
///
/// ```
/// use curl2req_core::FlagSpec;
///
/// let spec = FlagSpec::new(Some("d"), Some("data"), Some("data"));
/// assert!(spec.takes_value());
/// assert_eq!(spec.canonical_name(), "--data");
/// assert!(spec.matches("-d"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSpec {
    /// Short alias without the leading dash (e.g. `"d"`).
    pub short: Option<String>,
    /// Long alias without the leading dashes (e.g. `"data"`).
    pub long: Option<String>,
    /// Parameter label (e.g. `"data"` for `<data>`); present iff the flag
    /// consumes the following token.
    pub parameter: Option<String>,
    /// Human-readable description from the help text.
    pub description: String,
}

impl FlagSpec {
    /// Creates a spec with an empty description.
    pub fn new(short: Option<&str>, long: Option<&str>, parameter: Option<&str>) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            parameter: parameter.map(String::from),
            description: String::new(),
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Whether the flag consumes the next token as its value.
    pub fn takes_value(&self) -> bool {
        self.parameter.is_some()
    }

    /// The short alias as written on a command line (`-d`).
    pub fn short_alias(&self) -> Option<String> {
        self.short.as_ref().map(|s| format!("-{s}"))
    }

    /// The long alias as written on a command line (`--data`).
    pub fn long_alias(&self) -> Option<String> {
        self.long.as_ref().map(|l| format!("--{l}"))
    }

    /// Returns the command-line spelling, long form preferred.
    pub fn canonical_name(&self) -> String {
        self.long_alias()
            .or_else(|| self.short_alias())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Checks if a command-line token spells this flag.
    pub fn matches(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            self.long.as_deref() == Some(long)
        } else if let Some(short) = token.strip_prefix('-') {
            self.short.as_deref() == Some(short)
        } else {
            false
        }
    }
}

/// Immutable flag table loaded from a grammar.
///
/// Flags are kept in grammar order; two indexes map short and long aliases to
/// the same entry. Load it once and share it across translations, or use
/// [`FlagSchema::embedded`] for the bundled curl grammar.
///
/// # Examples
///
/// ```
/// use curl2req_core::FlagSchema;
///
/// let schema = FlagSchema::parse("\
/// Usage: tool [options...] <url>
///  -o, --output <file> Write to file instead of stdout
///      --compressed    Request compressed response
/// ").unwrap();
///
/// assert_eq!(schema.len(), 2);
/// assert!(schema.short("o").unwrap().takes_value());
/// assert!(schema.long("compressed").unwrap().short.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSchema {
    flags: Vec<FlagSpec>,
    by_short: HashMap<String, usize>,
    by_long: HashMap<String, usize>,
}

impl FlagSchema {
    /// Returns the schema for the embedded curl grammar, loading it on first
    /// use.
    ///
    /// # Panics
    ///
    /// Panics if the embedded asset is malformed. That is a packaging defect,
    /// not a user input error.
    pub fn embedded() -> &'static FlagSchema {
        &EMBEDDED
    }

    /// Parses grammar text into a schema.
    ///
    /// Blank lines after the usage line are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::GrammarFormat`] when the usage marker is missing, a
    /// line does not start with an alias, an alias form repeats, a parameter
    /// label repeats or is unterminated, or an alias is defined twice.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate();

        match lines.next() {
            Some((_, first)) if first.starts_with(USAGE_MARKER) => {}
            _ => {
                return Err(CoreError::GrammarFormat {
                    line: 1,
                    reason: "missing usage line",
                });
            }
        }

        let mut schema = Self::default();
        for (idx, raw) in lines {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let spec = parse_flag_line(line).map_err(|reason| CoreError::GrammarFormat {
                line: idx + 1,
                reason,
            })?;
            schema.insert(spec).map_err(|reason| CoreError::GrammarFormat {
                line: idx + 1,
                reason,
            })?;
        }

        debug!(flags = schema.flags.len(), "Loaded flag grammar");
        Ok(schema)
    }

    fn insert(&mut self, spec: FlagSpec) -> std::result::Result<(), &'static str> {
        let idx = self.flags.len();
        if let Some(short) = &spec.short {
            if self.by_short.insert(short.clone(), idx).is_some() {
                return Err("short alias defined twice");
            }
        }
        if let Some(long) = &spec.long {
            if self.by_long.insert(long.clone(), idx).is_some() {
                return Err("long alias defined twice");
            }
        }
        self.flags.push(spec);
        Ok(())
    }

    /// Looks up a flag by short alias (without the dash).
    pub fn short(&self, name: &str) -> Option<&FlagSpec> {
        self.by_short.get(name).map(|&idx| &self.flags[idx])
    }

    /// Looks up a flag by long alias (without the dashes).
    pub fn long(&self, name: &str) -> Option<&FlagSpec> {
        self.by_long.get(name).map(|&idx| &self.flags[idx])
    }

    /// Resolves a command-line token (`-x` or `--xxx`) to its grammar index.
    pub(crate) fn resolve(&self, token: &str) -> Option<usize> {
        if let Some(long) = token.strip_prefix("--") {
            self.by_long.get(long).copied()
        } else {
            token
                .strip_prefix('-')
                .and_then(|short| self.by_short.get(short).copied())
        }
    }

    /// Index of the flag with the given long alias.
    pub(crate) fn long_index(&self, name: &str) -> Option<usize> {
        self.by_long.get(name).copied()
    }

    /// All flags in grammar order.
    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    /// Number of flags in the schema.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns `true` if the grammar declared no flags.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

fn parse_flag_line(line: &str) -> std::result::Result<FlagSpec, &'static str> {
    if !line.starts_with('-') {
        return Err("flag line must start with '-'");
    }

    let mut spec = FlagSpec::new(None, None, None);
    let mut rest = line;

    while rest.starts_with('-') {
        let caps = ALIAS_TOKEN
            .captures(rest)
            .ok_or("alias must be followed by ',' or ' '")?;
        let name = caps[2].to_string();
        if name.is_empty() {
            return Err("empty alias");
        }
        let slot = if &caps[1] == "--" {
            &mut spec.long
        } else {
            &mut spec.short
        };
        if slot.replace(name).is_some() {
            return Err("more than one alias of the same form");
        }
        rest = rest[caps[0].len()..].trim_start();
    }

    let mut labels = Vec::new();
    while let Some(after) = rest.strip_prefix('<') {
        let end = after.find('>').ok_or("unterminated parameter label")?;
        labels.push(&after[..end]);
        rest = after[end + 1..].trim_start();
    }

    match labels.as_slice() {
        [] => {}
        [""] => return Err("empty parameter label"),
        [label] => spec.parameter = Some((*label).to_string()),
        _ => return Err("more than one parameter label"),
    }

    spec.description = rest.trim().to_string();
    Ok(spec)
}
