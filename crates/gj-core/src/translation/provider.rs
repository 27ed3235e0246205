use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::JobPosting;

use super::TranslatedFields;

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translation provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation provider returned {got} segments, expected {expected}")]
    IncompleteResponse { expected: usize, got: usize },
    #[error("translation provider timed out")]
    Timeout,
    #[error("no translation provider configured")]
    Disabled,
    #[error("failed to persist translation: {0}")]
    Store(#[from] crate::db::PostingStoreError),
}

/// External translation capability. Implementations translate the whole
/// default-locale field set of one posting in a single call.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate_posting(
        &self,
        posting: &JobPosting,
    ) -> Result<TranslatedFields, TranslationError>;
}

const SEGMENT_COUNT: usize = 10;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    source: &'a str,
    target: &'a str,
    texts: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<String>,
}

/// REST-backed provider. Sends the ten posting fields in authoring order and
/// expects the same number of segments back.
#[derive(Clone)]
pub struct HttpTranslationProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranslationProvider {
    pub fn new(endpoint: String, api_key: Option<String>, request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

fn segments(posting: &JobPosting) -> Vec<&str> {
    vec![
        posting.title.as_deref().unwrap_or(""),
        posting.description.as_deref().unwrap_or(""),
        posting.qualification.as_deref().unwrap_or(""),
        posting.experience.as_deref().unwrap_or(""),
        posting.languages.as_deref().unwrap_or(""),
        posting.salary.as_deref().unwrap_or(""),
        posting.city.as_deref().unwrap_or(""),
        posting.hours.as_deref().unwrap_or(""),
        posting.days.as_deref().unwrap_or(""),
        posting.company_name.as_deref().unwrap_or(""),
    ]
}

fn fields_from_segments(mut translations: Vec<String>) -> TranslatedFields {
    let mut next = || -> String {
        if translations.is_empty() {
            String::new()
        } else {
            translations.remove(0)
        }
    };

    TranslatedFields {
        title: next(),
        description: next(),
        qualification: next(),
        experience: next(),
        languages: next(),
        salary: next(),
        city: next(),
        hours: next(),
        days: next(),
        company_name: next(),
    }
}

#[async_trait]
impl TranslationProvider for HttpTranslationProvider {
    async fn translate_posting(
        &self,
        posting: &JobPosting,
    ) -> Result<TranslatedFields, TranslationError> {
        let request = TranslateRequest {
            source: "en",
            target: "ar",
            texts: segments(posting),
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?.error_for_status()?;
        let body: TranslateResponse = response.json().await?;

        if body.translations.len() != SEGMENT_COUNT {
            return Err(TranslationError::IncompleteResponse {
                expected: SEGMENT_COUNT,
                got: body.translations.len(),
            });
        }

        Ok(fields_from_segments(body.translations))
    }
}

/// Placeholder used when no endpoint is configured. Every call fails with
/// `Disabled`, which the resolve path absorbs into the default-locale
/// fallback, so the service stays usable without a provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTranslationProvider;

#[async_trait]
impl TranslationProvider for DisabledTranslationProvider {
    async fn translate_posting(
        &self,
        _posting: &JobPosting,
    ) -> Result<TranslatedFields, TranslationError> {
        Err(TranslationError::Disabled)
    }
}

const PROVIDER_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Build the provider from `GJ_TRANSLATOR_ENDPOINT` / `GJ_TRANSLATOR_API_KEY`.
pub fn provider_from_env() -> Arc<dyn TranslationProvider> {
    match std::env::var("GJ_TRANSLATOR_ENDPOINT") {
        Ok(endpoint) if !endpoint.trim().is_empty() => Arc::new(HttpTranslationProvider::new(
            endpoint,
            std::env::var("GJ_TRANSLATOR_API_KEY").ok(),
            PROVIDER_REQUEST_TIMEOUT,
        )),
        _ => {
            warn!("GJ_TRANSLATOR_ENDPOINT not set; serving default-locale fallbacks only");
            Arc::new(DisabledTranslationProvider)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_follow_authoring_order() {
        let posting = JobPosting {
            title: Some("Nurse".into()),
            salary: Some("9000 AED".into()),
            ..JobPosting::default()
        };

        let parts = segments(&posting);
        assert_eq!(parts.len(), SEGMENT_COUNT);
        assert_eq!(parts[0], "Nurse");
        assert_eq!(parts[5], "9000 AED");
        assert_eq!(parts[1], "");
    }

    #[test]
    fn fields_map_back_in_the_same_order() {
        let translations: Vec<String> = (0..SEGMENT_COUNT).map(|i| format!("t{i}")).collect();
        let fields = fields_from_segments(translations);
        assert_eq!(fields.title, "t0");
        assert_eq!(fields.salary, "t5");
        assert_eq!(fields.company_name, "t9");
    }

    #[tokio::test]
    async fn disabled_provider_always_errors() {
        let provider = DisabledTranslationProvider;
        let err = provider
            .translate_posting(&JobPosting::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::Disabled));
    }
}
