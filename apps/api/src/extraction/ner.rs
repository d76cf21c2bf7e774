//! Named-entity recognition boundary.
//!
//! The pipeline never looks inside an NER engine. It asks an
//! [`EntityRecognizer`] for `(text, label)` pairs in model order and keeps the
//! first `PERSON`. Engines are chosen at startup from `NER_BACKEND`.
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const PERSON_LABEL: &str = "PERSON";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entity {
    pub text: String,
    #[serde(alias = "label_")]
    pub label: String,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum NerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("NER service error (status {status}): {message}")]
    Service { status: u16, message: String },
}

/// Any engine producing labelled spans in document order.
///
/// Implementations are called from blocking threads and shared across
/// requests, so they must be `Send + Sync`.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError>;

    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}

/// Trimmed text of the first `PERSON` entity, if any.
pub fn first_person(entities: &[Entity]) -> Option<String> {
    entities
        .iter()
        .find(|e| e.label == PERSON_LABEL)
        .map(|e| e.text.trim().to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct NerRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct NerResponse {
    entities: Vec<Entity>,
}

/// Calls an external NER service (e.g. a spaCy sidecar).
///
/// Request: `POST {endpoint}` with `{"text": "..."}`.
/// Response: `{"entities": [{"text": "...", "label": "PERSON"}, ...]}`.
///
/// Uses the blocking reqwest client, so it must be built and used off the
/// async executor (`spawn_blocking`).
pub struct HttpEntityRecognizer {
    client: Client,
    endpoint: String,
}

impl HttpEntityRecognizer {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, NerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

impl EntityRecognizer for HttpEntityRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&NerRequest { text })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(NerError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body: NerResponse = response.json()?;
        debug!(
            "NER service returned {} entities for {} chars",
            body.entities.len(),
            text.len()
        );
        Ok(body.entities)
    }

    fn backend(&self) -> &'static str {
        "http"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Heuristic backend
// ────────────────────────────────────────────────────────────────────────────

/// Capitalized words that show up in resumes but are not part of names.
const NON_NAME_WORDS: &[&str] = &[
    "address",
    "bachelor",
    "college",
    "communication",
    "company",
    "computer",
    "contact",
    "corp",
    "curriculum",
    "data",
    "developer",
    "education",
    "email",
    "engineer",
    "engineering",
    "experience",
    "inc",
    "institute",
    "linkedin",
    "ltd",
    "management",
    "manager",
    "master",
    "mobile",
    "objective",
    "phone",
    "profile",
    "project",
    "resume",
    "school",
    "science",
    "senior",
    "skills",
    "software",
    "state",
    "summary",
    "university",
    "vitae",
];

const MIN_NAME_TOKENS: usize = 2;
const MAX_NAME_TOKENS: usize = 4;

/// Offline fallback engine. Labels runs of two to four capitalized words on a
/// single line as `PERSON` ("Jane Doe", "Mary K. Smith"). All-caps names and
/// single-word names are missed.
pub struct HeuristicEntityRecognizer {
    name_token: Regex,
}

impl HeuristicEntityRecognizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            name_token: Regex::new(r"^(?:\p{Lu}(?:\p{Ll}+|\p{Ll}*(?:['-]\p{Lu}?\p{Ll}+)+)|\p{Lu}\.)$")?,
        })
    }

    fn is_name_token(&self, token: &str) -> bool {
        self.name_token.is_match(token)
            && !NON_NAME_WORDS
                .iter()
                .any(|w| w.eq_ignore_ascii_case(token))
    }

    fn push_run(run: &mut Vec<&str>, entities: &mut Vec<Entity>) {
        if (MIN_NAME_TOKENS..=MAX_NAME_TOKENS).contains(&run.len()) {
            entities.push(Entity::new(run.join(" "), PERSON_LABEL));
        }
        run.clear();
    }
}

impl EntityRecognizer for HeuristicEntityRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError> {
        let mut entities = Vec::new();

        for line in text.lines() {
            let mut run: Vec<&str> = Vec::new();
            for raw in line.split_whitespace() {
                let token = raw.trim_end_matches([',', ';', ':']);
                if self.is_name_token(token) {
                    run.push(token);
                    // Trailing punctuation closes the span.
                    if token.len() != raw.len() {
                        Self::push_run(&mut run, &mut entities);
                    }
                } else {
                    Self::push_run(&mut run, &mut entities);
                }
            }
            Self::push_run(&mut run, &mut entities);
        }

        Ok(entities)
    }

    fn backend(&self) -> &'static str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};

    #[test]
    fn test_first_person_skips_other_labels() {
        let entities = vec![
            Entity::new("Acme Corp", "ORG"),
            Entity::new("  Jane Doe ", PERSON_LABEL),
            Entity::new("John Roe", PERSON_LABEL),
        ];
        assert_eq!(first_person(&entities).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_first_person_none() {
        assert_eq!(first_person(&[Entity::new("Berlin", "GPE")]), None);
        assert_eq!(first_person(&[]), None);
    }

    #[test]
    fn test_entity_accepts_spacy_label_field() {
        let entity: Entity = serde_json::from_str(r#"{"text":"Ada","label_":"PERSON"}"#).unwrap();
        assert_eq!(entity, Entity::new("Ada", PERSON_LABEL));
    }

    #[test]
    fn test_heuristic_finds_name_on_first_line() {
        let ner = HeuristicEntityRecognizer::new().unwrap();
        let entities = ner
            .recognize("John Smith\nEmail: john.smith@example.com\nSKILLS")
            .unwrap();
        assert_eq!(first_person(&entities).as_deref(), Some("John Smith"));
    }

    #[test]
    fn test_heuristic_skips_resume_vocabulary() {
        let ner = HeuristicEntityRecognizer::new().unwrap();
        let entities = ner
            .recognize("Curriculum Vitae\nSoftware Engineer\nMary K. O'Neil, Boston")
            .unwrap();
        assert_eq!(entities, vec![Entity::new("Mary K. O'Neil", PERSON_LABEL)]);
    }

    #[test]
    fn test_heuristic_ignores_long_title_case_runs() {
        let ner = HeuristicEntityRecognizer::new().unwrap();
        let entities = ner
            .recognize("Winner Of The Annual Regional Hackathon")
            .unwrap();
        assert!(entities.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_http_recognizer_reads_entities() {
        let app = Router::new().route(
            "/ner",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["text"], "Jane Doe works at Acme");
                Json(serde_json::json!({
                    "entities": [
                        {"text": "Acme", "label": "ORG"},
                        {"text": "Jane Doe", "label": "PERSON"}
                    ]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let entities = tokio::task::spawn_blocking(move || {
            let ner =
                HttpEntityRecognizer::new(format!("http://{addr}/ner"), Duration::from_secs(5))
                    .unwrap();
            ner.recognize("Jane Doe works at Acme")
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(first_person(&entities).as_deref(), Some("Jane Doe"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_http_recognizer_surfaces_service_errors() {
        let app = Router::new().route(
            "/ner",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model not loaded") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let err = tokio::task::spawn_blocking(move || {
            let ner =
                HttpEntityRecognizer::new(format!("http://{addr}/ner"), Duration::from_secs(5))
                    .unwrap();
            ner.recognize("anything")
        })
        .await
        .unwrap()
        .unwrap_err();

        match err {
            NerError::Service { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "model not loaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
