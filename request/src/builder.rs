//! Interpretation of classified curl flags into a [`RequestDescription`].
//!
//! Flags are applied in a fixed order, not command-line order, because later
//! steps override or conflict with earlier ones:
//!
//! 1. positional URL
//! 2. method (`-I`, then `-X`)
//! 3. headers (`-H`), diverting `Host` and `Content-Type`
//! 4. cookie (`-b`), user agent (`-A`), basic auth (`-u`)
//! 5. client options (`-k`, `-L`)
//! 6. data families (`-d`, `--data-ascii`, `--data-raw`, `--data-urlencode`,
//!    `--data-binary`)
//! 7. `-G` query conversion
//! 8. multipart form (`-F`)
//! 9. `--url` override
//! 10. unsupported-flag audit
//! 11. finalization (defaults, URL parsing, header assembly)

use std::path::Path;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use curl2req_core::ClassifiedArgs;
use regex::Regex;
use tracing::{debug, info, warn};
use url::Url;

use crate::body::Body;
use crate::config::TranslateConfig;
use crate::description::{ClientOptions, RequestDescription};
use crate::error::{Result, TranslateError};
use crate::escape::{canonical_header_key, query_escape};
use crate::multipart::{FormField, MultipartWriter};

/// Flags the builder gives meaning to, by every alias. Output-only switches
/// are accepted and ignored.
pub const SUPPORTED_FLAGS: &[&str] = &[
    "-I",
    "--head",
    "-X",
    "--request",
    "-H",
    "--header",
    "-b",
    "--cookie",
    "-A",
    "--user-agent",
    "-u",
    "--user",
    "-k",
    "--insecure",
    "-L",
    "--location",
    "-d",
    "--data",
    "--data-ascii",
    "--data-raw",
    "--data-urlencode",
    "--data-binary",
    "-G",
    "--get",
    "-F",
    "--form",
    "--url",
    // output options with no request semantics
    "--compressed",
    "-i",
    "--include",
    "-S",
    "--show-error",
    "-s",
    "--silent",
];

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// `scheme://` at the very start of a URL.
static LEADING_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("static regex must compile")
});

/// The data flag variants, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataFamily {
    Data,
    Ascii,
    Raw,
    UrlEncode,
    Binary,
}

impl DataFamily {
    const ALL: [Self; 5] = [
        Self::Data,
        Self::Ascii,
        Self::Raw,
        Self::UrlEncode,
        Self::Binary,
    ];

    fn flag(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Ascii => "data-ascii",
            Self::Raw => "data-raw",
            Self::UrlEncode => "data-urlencode",
            Self::Binary => "data-binary",
        }
    }

    /// Whether `@path` values are read from disk.
    fn expands_files(self) -> bool {
        self != Self::Raw
    }
}

/// Builds a request description from classified arguments.
///
/// # Errors
///
/// Any conflicting, malformed, or unsupported flag combination yields a
/// [`TranslateError`]; no partial request is produced.
pub fn build_request(
    args: &ClassifiedArgs<'_>,
    config: &TranslateConfig,
) -> Result<RequestDescription> {
    let mut builder = RequestBuilder::new(args, config);
    builder.apply_positional_url();
    builder.apply_method();
    builder.apply_headers()?;
    builder.apply_identity()?;
    builder.apply_client_options();
    builder.apply_data()?;
    builder.apply_get()?;
    builder.apply_form()?;
    builder.apply_url_flag();
    builder.audit_supported()?;
    builder.finish()
}

struct RequestBuilder<'a, 's> {
    args: &'a ClassifiedArgs<'s>,
    config: &'a TranslateConfig,
    method: String,
    url: String,
    raw_query: String,
    body: Option<Body>,
    headers: Vec<(String, String)>,
    host: String,
    content_type: String,
    client: ClientOptions,
}

impl<'a, 's> RequestBuilder<'a, 's> {
    fn new(args: &'a ClassifiedArgs<'s>, config: &'a TranslateConfig) -> Self {
        Self {
            args,
            config,
            method: String::new(),
            url: String::new(),
            raw_query: String::new(),
            body: None,
            headers: Vec::new(),
            host: String::new(),
            content_type: String::new(),
            client: ClientOptions::default(),
        }
    }

    fn apply_positional_url(&mut self) {
        let last = self.args.arg(-1);
        if last != self.config.program_name {
            self.url = last.to_string();
        }
    }

    fn apply_method(&mut self) {
        if self.args.is_set("head") {
            self.method = "HEAD".to_string();
        }
        if self.args.is_set("request") {
            self.method = self.args.last_value("request").to_string();
        }
    }

    fn apply_headers(&mut self) -> Result<()> {
        for raw in self.args.values("header") {
            let (key, value) = raw
                .split_once(':')
                .ok_or_else(|| TranslateError::MalformedHeader(raw.clone()))?;
            let key = canonical_header_key(key.trim());
            let value = value.trim().to_string();

            match key.as_str() {
                "Host" => self.host = value,
                "Content-Type" => self.content_type = value,
                _ => self.headers.push((key, value)),
            }
        }
        Ok(())
    }

    fn apply_identity(&mut self) -> Result<()> {
        if self.args.is_set("cookie") {
            let value = self.args.last_value("cookie");
            let cookie = if value.contains('=') {
                value.to_string()
            } else {
                let bytes = read_file("cookie", value)?;
                String::from_utf8_lossy(&bytes)
                    .trim_end_matches(['\r', '\n'])
                    .to_string()
            };
            self.headers.push(("Cookie".to_string(), cookie));
        }
        if self.args.is_set("user-agent") {
            let agent = self.args.last_value("user-agent").to_string();
            self.headers.push(("User-Agent".to_string(), agent));
        }
        if self.args.is_set("user") {
            let credentials = STANDARD.encode(self.args.last_value("user"));
            self.headers
                .push(("Authorization".to_string(), format!("Basic {credentials}")));
        }
        Ok(())
    }

    fn apply_client_options(&mut self) {
        if self.args.is_set("insecure") {
            self.client.insecure_transport = true;
        }
        if !self.args.is_set("location") {
            self.client.follow_redirects = false;
        }
    }

    fn apply_data(&mut self) -> Result<()> {
        for family in DataFamily::ALL {
            if !self.args.is_set(family.flag()) {
                continue;
            }
            if self.body.is_some() {
                return Err(TranslateError::BodyAlreadyFilled);
            }
            if self.method.is_empty() {
                self.method = "POST".to_string();
            }
            if family != DataFamily::Binary && self.content_type.is_empty() {
                self.content_type = FORM_URLENCODED.to_string();
            }

            debug!(
                flag = family.flag(),
                occurrences = self.args.values(family.flag()).len(),
                "Building data body"
            );
            for value in self.args.values(family.flag()) {
                let part = data_part(family, value)?;
                self.body = Some(match self.body.take() {
                    None => part,
                    Some(body) if family == DataFamily::Binary => body.chain(part),
                    Some(body) => body.chain(Body::from_bytes("&")).chain(part),
                });
            }
        }
        Ok(())
    }

    fn apply_get(&mut self) -> Result<()> {
        if !self.args.is_set("get") {
            return Ok(());
        }
        if self.args.is_set("data-binary") {
            return Err(TranslateError::IncompatibleFlags {
                flag: "--get",
                other: "--data-binary",
            });
        }

        self.method = "GET".to_string();
        self.content_type.clear();

        if let Some(body) = self.body.take() {
            let bytes = body.read_to_vec().map_err(TranslateError::BodyRead)?;
            self.raw_query = String::from_utf8_lossy(&bytes).into_owned();
            debug!(query = %self.raw_query, "Moved data body into query string");
        }
        Ok(())
    }

    fn apply_form(&mut self) -> Result<()> {
        if !self.args.is_set("form") {
            return Ok(());
        }
        if self.body.is_some() {
            return Err(TranslateError::BodyAlreadyFilled);
        }
        if self.method.is_empty() {
            self.method = "POST".to_string();
        }

        let mut writer = match &self.config.multipart_boundary {
            Some(boundary) => MultipartWriter::with_boundary(boundary)?,
            None => MultipartWriter::new(),
        };
        if self.content_type.is_empty() {
            self.content_type = writer.content_type();
        }

        for value in self.args.values("form") {
            let field = FormField::parse(value)?;
            let content_type = field.content_type.as_deref();
            match field.file_path() {
                Some(path) => {
                    let content = read_file("form", path)?;
                    let filename = Path::new(path).file_name().map_or_else(
                        || path.to_string(),
                        |name| name.to_string_lossy().into_owned(),
                    );
                    writer.add_part(&field.name, Some(&filename), content_type, &content);
                }
                None => {
                    writer.add_part(&field.name, None, content_type, field.content.as_bytes());
                }
            }
        }

        debug!(boundary = writer.boundary(), "Built multipart body");
        self.body = Some(Body::from_bytes(writer.finish()));
        Ok(())
    }

    fn apply_url_flag(&mut self) {
        if self.args.is_set("url") {
            self.url = self.args.last_value("url").to_string();
        }
    }

    fn audit_supported(&self) -> Result<()> {
        for flag in self.args.iter_set() {
            let aliases = [flag.spec.short_alias(), flag.spec.long_alias()];
            for alias in aliases.into_iter().flatten() {
                if !SUPPORTED_FLAGS.contains(&alias.as_str()) {
                    warn!(flag = %alias, "Flag has no request translation");
                    return Err(TranslateError::UnsupportedFlag(alias));
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<RequestDescription> {
        let method = if self.method.is_empty() {
            "GET".to_string()
        } else {
            self.method
        };

        if self.url.is_empty() {
            return Err(TranslateError::MissingUrl);
        }
        let mut url = parse_url(&self.url, &self.config.default_scheme)?;

        if !self.raw_query.is_empty() {
            let query = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{}", self.raw_query),
                _ => self.raw_query,
            };
            url.set_query(Some(&query));
        }

        let mut headers = Vec::with_capacity(self.headers.len() + 1);
        if !self.content_type.is_empty() {
            headers.push(("Content-Type".to_string(), self.content_type));
        }
        headers.extend(self.headers);

        info!(
            method = %method,
            url = %url,
            headers = headers.len(),
            has_body = self.body.is_some(),
            "Translated curl arguments"
        );

        Ok(RequestDescription {
            method,
            url,
            host: (!self.host.is_empty()).then_some(self.host),
            headers,
            body: self.body,
            client: self.client,
        })
    }
}

fn data_part(family: DataFamily, value: &str) -> Result<Body> {
    if family == DataFamily::UrlEncode {
        return urlencode_part(value);
    }

    let source = match value.strip_prefix('@') {
        Some(path) if family.expands_files() => Body::from_bytes(read_file(family.flag(), path)?),
        _ => Body::from_bytes(value),
    };

    Ok(if family == DataFamily::Binary {
        source
    } else {
        source.ascii()
    })
}

fn urlencode_part(value: &str) -> Result<Body> {
    let flag = DataFamily::UrlEncode.flag();
    let encoded = if let Some(path) = value.strip_prefix('@') {
        query_escape(&read_file(flag, path)?)
    } else if let Some((key, path)) = value.split_once('@') {
        format!("{key}={}", query_escape(&read_file(flag, path)?))
    } else if let Some(content) = value.strip_prefix('=') {
        query_escape(content.as_bytes())
    } else if let Some((key, content)) = value.split_once('=') {
        format!("{key}={}", query_escape(content.as_bytes()))
    } else {
        query_escape(value.as_bytes())
    };
    Ok(Body::from_bytes(encoded))
}

fn read_file(flag: &'static str, path: &str) -> Result<Vec<u8>> {
    debug!(flag, path, "Reading referenced file");
    std::fs::read(path).map_err(|source| TranslateError::FileRead {
        flag,
        path: path.into(),
        source,
    })
}

fn parse_url(raw: &str, default_scheme: &str) -> Result<Url> {
    let absolute = if LEADING_SCHEME.is_match(raw) {
        raw.to_string()
    } else {
        format!("{default_scheme}://{raw}")
    };
    Url::parse(&absolute).map_err(|source| TranslateError::UrlParse {
        url: absolute.clone(),
        source,
    })
}
