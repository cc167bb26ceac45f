use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sm_core::{Error, GenerationConfig, ModelLoader, Result, SummaryModel};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://router.huggingface.co/hf-inference/models";

#[derive(Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a str,
    parameters: SummarizationParameters,
    options: RequestOptions,
}

#[derive(Serialize)]
struct SummarizationParameters {
    truncation: &'static str,
    generate_parameters: GenerateParameters,
}

#[derive(Serialize)]
struct GenerateParameters {
    num_beams: usize,
    max_length: usize,
    min_length: usize,
    length_penalty: f64,
    early_stopping: bool,
    do_sample: bool,
    no_repeat_ngram_size: usize,
    top_k: usize,
    top_p: f64,
}

impl From<&GenerationConfig> for GenerateParameters {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            num_beams: config.num_beams,
            max_length: config.max_length,
            min_length: config.min_length,
            length_penalty: config.length_penalty,
            early_stopping: config.early_stopping,
            do_sample: config.do_sample,
            no_repeat_ngram_size: config.no_repeat_ngram_size,
            top_k: config.top_k,
            top_p: config.top_p,
        }
    }
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SummarizationResponse {
    Summaries(Vec<SummaryText>),
    Failure { error: String },
}

#[derive(Deserialize)]
struct SummaryText {
    summary_text: String,
}

/// A pretrained model served by a Hugging Face style inference endpoint.
pub struct HuggingFaceModel {
    client: Arc<Client>,
    api_key: Option<String>,
    model_id: String,
    url: String,
}

impl fmt::Debug for HuggingFaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_id", &self.model_id)
            .field("url", &self.url)
            .finish()
    }
}

#[async_trait]
impl SummaryModel for HuggingFaceModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn summarize(&self, text: &str, config: &GenerationConfig) -> Result<String> {
        let request = SummarizationRequest {
            inputs: text,
            parameters: SummarizationParameters {
                truncation: "longest_first",
                generate_parameters: config.into(),
            },
            options: RequestOptions { wait_for_model: true },
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Model(format!("request to {} failed: {}", self.model_id, e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                Error::Model(format!("failed to read response from {}: {}", self.model_id, e))
            })?;

        let parsed = serde_json::from_str::<SummarizationResponse>(&body);
        match parsed {
            Ok(SummarizationResponse::Summaries(summaries)) if status.is_success() => summaries
                .into_iter()
                .next()
                .map(|s| s.summary_text)
                .ok_or_else(|| Error::Model(format!("{} returned no summary", self.model_id))),
            Ok(SummarizationResponse::Failure { error }) => Err(Error::Model(format!(
                "{} returned {}: {}",
                self.model_id, status, error
            ))),
            _ => Err(Error::Model(format!(
                "{} returned {}: {}",
                self.model_id,
                status,
                body.chars().take(200).collect::<String>()
            ))),
        }
    }
}

pub struct HuggingFaceLoader {
    client: Arc<Client>,
    api_key: Option<String>,
    endpoint: Url,
}

impl fmt::Debug for HuggingFaceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceLoader")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl HuggingFaceLoader {
    pub fn new(endpoint: Option<String>, api_key: Option<String>) -> Result<Self> {
        let raw = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&raw)
            .map_err(|e| Error::Model(format!("Invalid inference endpoint '{}': {}", raw, e)))?;
        Ok(Self {
            client: Arc::new(Client::new()),
            api_key,
            endpoint,
        })
    }

    fn model_url(&self, model_id: &str) -> String {
        format!("{}/{}", self.endpoint.as_str().trim_end_matches('/'), model_id)
    }
}

#[async_trait]
impl ModelLoader for HuggingFaceLoader {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn load(&self, model_id: &str) -> Result<Arc<dyn SummaryModel>> {
        if model_id.trim().is_empty() {
            return Err(Error::Model("model id must not be empty".to_string()));
        }
        let url = self.model_url(model_id);
        tracing::debug!("Binding {} to {}", model_id, url);
        Ok(Arc::new(HuggingFaceModel {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            model_id: model_id.to_string(),
            url,
        }))
    }
}
