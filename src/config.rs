//! Runtime settings from a `.env` file and the process environment.

use crate::convert;
use crate::error::{Error, Result};
use crate::inspect::DEFAULT_VISUALS_DIR;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default model for both generation and review.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default HTTP timeout for model requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings file read when none is given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Runtime settings.
#[derive(Clone)]
pub struct Settings {
    /// Gemini API key (`GOOGLE_API_KEY`)
    pub api_key: String,
    /// Model used without a rendering (`GEMINI_TEXT_MODEL`)
    pub text_model: String,
    /// Model used with a PDF attached (`GEMINI_VISION_MODEL`)
    pub vision_model: String,
    /// Sampling temperature, 0 to 2 (`GEMINI_TEMPERATURE`)
    pub temperature: Option<f32>,
    /// API base URL override (`GEMINI_BASE_URL`)
    pub base_url: Option<String>,
    /// Model request timeout (`GEMINI_TIMEOUT_SECONDS`)
    pub request_timeout: Duration,
    /// Per-engine conversion timeout (`DECKWRIGHT_CONVERT_TIMEOUT_SECONDS`)
    pub convert_timeout: Duration,
    /// Directory for rendered PDFs
    pub visuals_dir: PathBuf,
}

impl Settings {
    /// Load `env_file` (or `./.env` when present), then read the environment.
    ///
    /// Variables already set in the process take precedence over the file.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    Error::Config(format!("failed to load {}: {}", path.display(), e))
                })?;
            }
            None => {
                if Path::new(DEFAULT_ENV_FILE).exists() {
                    dotenvy::from_path(DEFAULT_ENV_FILE).map_err(|e| {
                        Error::Config(format!("failed to load {}: {}", DEFAULT_ENV_FILE, e))
                    })?;
                }
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("GOOGLE_API_KEY").ok_or_else(|| {
            Error::Config("GOOGLE_API_KEY is not set (add it to .env or the environment)".to_string())
        })?;

        let seconds = |key: &str, default: Duration| -> Result<Duration> {
            match get(key) {
                None => Ok(default),
                Some(raw) => match raw.parse::<u64>() {
                    Ok(0) | Err(_) => Err(Error::Config(format!(
                        "{} must be a positive number of seconds, got '{}'",
                        key, raw
                    ))),
                    Ok(n) => Ok(Duration::from_secs(n)),
                },
            }
        };

        let temperature = match get("GEMINI_TEMPERATURE") {
            None => None,
            Some(raw) => match raw.parse::<f32>() {
                Ok(t) if (0.0..=2.0).contains(&t) => Some(t),
                _ => {
                    return Err(Error::Config(format!(
                        "GEMINI_TEMPERATURE must be a number between 0 and 2, got '{}'",
                        raw
                    )))
                }
            },
        };

        Ok(Self {
            api_key,
            text_model: get("GEMINI_TEXT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            vision_model: get("GEMINI_VISION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            base_url: get("GEMINI_BASE_URL"),
            request_timeout: seconds("GEMINI_TIMEOUT_SECONDS", DEFAULT_REQUEST_TIMEOUT)?,
            convert_timeout: seconds("DECKWRIGHT_CONVERT_TIMEOUT_SECONDS", convert::DEFAULT_TIMEOUT)?,
            visuals_dir: PathBuf::from(DEFAULT_VISUALS_DIR),
        })
    }

    /// Override the visuals directory.
    pub fn with_visuals_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.visuals_dir = dir.into();
        self
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("text_model", &self.text_model)
            .field("vision_model", &self.vision_model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("convert_timeout", &self.convert_timeout)
            .field("visuals_dir", &self.visuals_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[("GOOGLE_API_KEY", "k")])).unwrap();
        assert_eq!(settings.text_model, DEFAULT_MODEL);
        assert_eq!(settings.vision_model, DEFAULT_MODEL);
        assert_eq!(settings.request_timeout, Duration::from_secs(120));
        assert_eq!(settings.convert_timeout, Duration::from_secs(120));
        assert_eq!(settings.visuals_dir, PathBuf::from("./temp_visuals"));
        assert!(settings.base_url.is_none());
        assert!(settings.temperature.is_none());
    }

    #[test]
    fn test_temperature() {
        let settings = Settings::from_lookup(lookup(&[
            ("GOOGLE_API_KEY", "k"),
            ("GEMINI_TEMPERATURE", "0.4"),
        ]))
        .unwrap();
        assert_eq!(settings.temperature, Some(0.4));

        for bad in ["hot", "3.5", "-1"] {
            let err = Settings::from_lookup(lookup(&[
                ("GOOGLE_API_KEY", "k"),
                ("GEMINI_TEMPERATURE", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{}", bad);
        }
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = Settings::from_lookup(lookup(&[("GOOGLE_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_overrides_and_bad_timeout() {
        let settings = Settings::from_lookup(lookup(&[
            ("GOOGLE_API_KEY", "k"),
            ("GEMINI_VISION_MODEL", "gemini-2.5-pro"),
            ("DECKWRIGHT_CONVERT_TIMEOUT_SECONDS", "30"),
        ]))
        .unwrap();
        assert_eq!(settings.vision_model, "gemini-2.5-pro");
        assert_eq!(settings.convert_timeout, Duration::from_secs(30));

        let err = Settings::from_lookup(lookup(&[
            ("GOOGLE_API_KEY", "k"),
            ("GEMINI_TIMEOUT_SECONDS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("GEMINI_TIMEOUT_SECONDS"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let settings = Settings::from_lookup(lookup(&[("GOOGLE_API_KEY", "secret")])).unwrap();
        assert!(!format!("{:?}", settings).contains("secret"));
    }
}
