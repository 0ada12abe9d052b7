//! The diagnosis service: one provider, one prompt per request, and a
//! memoized detail lookup.

use serde::Serialize;
use thiserror::Error;

use crate::config::Settings;
use crate::diagnosis::{
    build_details_prompt, build_diagnosis_prompt, coerce, DetailQuery, DetailsRequest,
    DiagnosisResult, ParseError, PetProfile, VeterinaryDetail,
};
use crate::llm::{CacheStats, LlmClient, LlmError, ResponseCache, DEFAULT_CAPACITY};

pub const DISCLAIMER: &str = "This is not veterinary advice. Please consult a licensed veterinarian for accurate diagnosis and treatment.";

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No credential, so the provider was never queried.
    #[error("no provider configured")]
    NotConfigured { skipped_models: Vec<String> },

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("failed to parse provider reply: {0}")]
    Parse(#[from] ParseError),

    /// The reply parsed but held no usable conditions.
    #[error("provider reply contained no usable conditions")]
    NoConditions,

    #[error("{0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisReport {
    pub diagnosis: String,
    #[serde(flatten)]
    pub result: DiagnosisResult,
    pub disclaimer: &'static str,
    pub queried_models: Vec<String>,
    pub skipped_models: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailsReport {
    #[serde(flatten)]
    pub query: DetailQuery,
    pub veterinary_details: VeterinaryDetail,
    pub queried_models: Vec<String>,
    pub skipped_models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthReport {
    Healthy { available_models: Vec<String> },
    Unconfigured { missing_keys: Vec<String> },
}

pub struct DiagnosisService {
    client: Option<LlmClient>,
    provider_name: String,
    credential_name: String,
    details: ResponseCache<DetailQuery, VeterinaryDetail>,
}

impl DiagnosisService {
    /// `client` is `None` when no credential is available; every query then
    /// reports the provider as skipped.
    pub fn new(client: Option<LlmClient>) -> Self {
        Self {
            client,
            provider_name: "OpenRouter".to_string(),
            credential_name: "OPENROUTER_API_KEY".to_string(),
            details: ResponseCache::new(DEFAULT_CAPACITY),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let client = LlmClient::from_settings(&settings.provider, settings.retry.to_retry_config());
        if client.is_none() {
            tracing::warn!(
                "{} is not set; {} will be skipped",
                settings.provider.api_key_env,
                settings.provider.name
            );
        }

        Self::new(client)
            .with_names(&settings.provider.name, &settings.provider.api_key_env)
            .with_cache_capacity(settings.cache.capacity)
    }

    pub fn with_names(mut self, provider_name: &str, credential_name: &str) -> Self {
        self.provider_name = provider_name.to_string();
        self.credential_name = credential_name.to_string();
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.details = ResponseCache::new(capacity);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&LlmClient, ServiceError> {
        self.client.as_ref().ok_or_else(|| ServiceError::NotConfigured {
            skipped_models: vec![format!("{} (no API key)", self.provider_name)],
        })
    }

    pub async fn diagnose(&self, profile: &PetProfile) -> Result<DiagnosisReport, ServiceError> {
        let client = self.client()?;
        let prompt = build_diagnosis_prompt(profile);

        let content = client.send(&prompt).await?;
        tracing::info!("Raw {} response: {}", self.provider_name, content);

        let reply = coerce(&content)?;
        let result = DiagnosisResult::from_reply(&reply);
        if result.conditions.is_empty() {
            tracing::error!("No usable conditions in reply: {}", content);
            return Err(ServiceError::NoConditions);
        }

        Ok(DiagnosisReport {
            diagnosis: result.summary(),
            result,
            disclaimer: DISCLAIMER,
            queried_models: vec![self.provider_name.clone()],
            skipped_models: Vec::new(),
        })
    }

    /// Look up veterinary details, reusing a resident answer for an
    /// identical `(diagnosis, species, breed)` triple.
    pub async fn veterinary_details(
        &self,
        request: DetailsRequest,
    ) -> Result<DetailsReport, ServiceError> {
        let query = request
            .into_query()
            .ok_or_else(|| ServiceError::Validation("Diagnosis is required".to_string()))?;
        let client = self.client()?;
        let prompt = build_details_prompt(&query);
        let provider_name = self.provider_name.as_str();

        let details = self
            .details
            .get_or_try_insert_with(query.clone(), || async move {
                let content = client.send(&prompt).await?;
                tracing::info!(
                    "Raw {} veterinary details response: {}",
                    provider_name,
                    content
                );
                Ok::<_, ServiceError>(coerce(&content)?)
            })
            .await?;

        Ok(DetailsReport {
            query,
            veterinary_details: details,
            queried_models: vec![self.provider_name.clone()],
            skipped_models: Vec::new(),
        })
    }

    pub fn health(&self) -> HealthReport {
        if self.is_configured() {
            HealthReport::Healthy {
                available_models: vec![self.credential_name.clone()],
            }
        } else {
            HealthReport::Unconfigured {
                missing_keys: vec![self.credential_name.clone()],
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.details.stats()
    }
}
