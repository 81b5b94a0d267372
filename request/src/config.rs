//! Translation settings.
//!
//! Settings are plain serde data so they can live in a YAML file next to the
//! tool that embeds the translator:
//!
//! ```yaml
//! program_name: curl
//! default_scheme: http
//! multipart_boundary: null
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranslateError};

/// Knobs for [`translate_with`](crate::translate_with).
///
/// # Examples
///
/// ```
/// use curl2req_request::TranslateConfig;
///
/// let config = TranslateConfig::default().with_boundary("fixed-boundary");
/// assert_eq!(config.program_name, "curl");
/// assert_eq!(config.default_scheme, "http");
/// assert_eq!(config.multipart_boundary.as_deref(), Some("fixed-boundary"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Invocation token never taken as the positional URL.
    pub program_name: String,
    /// Scheme used when the URL names none.
    pub default_scheme: String,
    /// Fixed multipart boundary; a random one is generated per request when
    /// unset.
    pub multipart_boundary: Option<String>,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            program_name: "curl".to_string(),
            default_scheme: "http".to_string(),
            multipart_boundary: None,
        }
    }
}

impl TranslateConfig {
    /// Loads settings from a YAML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::Config`] if the file cannot be read or is not
    /// valid YAML for this shape.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|err| TranslateError::Config(format!("{}: {err}", path.display())))?;
        serde_yaml::from_reader(BufReader::new(file))
            .map_err(|err| TranslateError::Config(format!("{}: {err}", path.display())))
    }

    /// Sets a fixed multipart boundary.
    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.multipart_boundary = Some(boundary.into());
        self
    }
}
