use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_NER_TIMEOUT_SECS: u64 = 30;

/// Which named-entity engine the pipeline is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerBackend {
    /// Rule-based recognizer compiled into the binary. No external service.
    Heuristic,
    /// External NER service reached over HTTP (`NER_SERVICE_URL`).
    Http,
}

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values or a missing `NER_SERVICE_URL` when
/// the HTTP backend is selected.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Where uploads are staged while they are being extracted.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub ner_backend: NerBackend,
    pub ner_service_url: Option<String>,
    pub ner_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Separated from `from_env` so it
    /// can be exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ner_backend = match lookup("NER_BACKEND").as_deref() {
            None | Some("heuristic") => NerBackend::Heuristic,
            Some("http") => NerBackend::Http,
            Some(other) => bail!("NER_BACKEND must be 'heuristic' or 'http', got '{other}'"),
        };

        let ner_service_url = match ner_backend {
            NerBackend::Http => Some(lookup("NER_SERVICE_URL").with_context(|| {
                "Required environment variable 'NER_SERVICE_URL' is not set (NER_BACKEND=http)"
            })?),
            NerBackend::Heuristic => lookup("NER_SERVICE_URL"),
        };

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_upload_bytes: match lookup("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            ner_backend,
            ner_service_url,
            ner_timeout_secs: match lookup("NER_TIMEOUT_SECS") {
                Some(v) => v
                    .parse()
                    .context("NER_TIMEOUT_SECS must be a whole number of seconds")?,
                None => DEFAULT_NER_TIMEOUT_SECS,
            },
        })
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
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.ner_backend, NerBackend::Heuristic);
        assert_eq!(config.ner_service_url, None);
        assert_eq!(config.ner_timeout_secs, DEFAULT_NER_TIMEOUT_SECS);
    }

    #[test]
    fn test_http_backend_requires_url() {
        let err = Config::from_lookup(lookup(&[("NER_BACKEND", "http")])).unwrap_err();
        assert!(err.to_string().contains("NER_SERVICE_URL"));

        let config = Config::from_lookup(lookup(&[
            ("NER_BACKEND", "http"),
            ("NER_SERVICE_URL", "http://localhost:9000/ner"),
            ("NER_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.ner_backend, NerBackend::Http);
        assert_eq!(
            config.ner_service_url.as_deref(),
            Some("http://localhost:9000/ner")
        );
        assert_eq!(config.ner_timeout_secs, 5);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("NER_BACKEND", "spacy")])).is_err());
        assert!(Config::from_lookup(lookup(&[("MAX_UPLOAD_BYTES", "-1")])).is_err());
    }
}
