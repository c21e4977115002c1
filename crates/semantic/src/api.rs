use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{Embedder, SemanticConfig, SemanticEmbedding, SemanticError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiProviderKind {
    HuggingFace,
    OpenAI,
    Custom,
}

/// Embedder backed by a remote HTTP endpoint.
///
/// Requests are sent once; a failed call surfaces as
/// [`SemanticError::Request`] and nothing is retried here.
#[derive(Debug, Clone)]
pub struct ApiEmbedder {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
    provider: ApiProviderKind,
    model_name: String,
    normalize: bool,
    batch_size: usize,
}

impl ApiEmbedder {
    pub fn new(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        let url = cfg
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| SemanticError::InvalidConfig("api_url is required for api mode".into()))?;

        let timeout = Duration::from_secs(cfg.api_timeout_secs.unwrap_or(30));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| SemanticError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
            auth_header: cfg.api_auth_header.clone(),
            provider: api_provider_kind(cfg.api_provider.as_deref()),
            model_name: cfg.model_name.clone(),
            normalize: cfg.normalize,
            batch_size: cfg.batch_size.max(1),
        })
    }

    async fn send(&self, payload: Value) -> Result<Value, SemanticError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request
            .json(&payload)
            .send()
            .await
            .map_err(|e| SemanticError::Request(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SemanticError::Request(format!(
                "HTTP error {status}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SemanticError::InvalidResponse(format!("invalid JSON: {e}")))
    }
}

#[async_trait]
impl Embedder for ApiEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, text: &str) -> Result<SemanticEmbedding, SemanticError> {
        let payload = build_api_payload(self.provider, &[text.to_string()], &self.model_name, false);
        let response = self.send(payload).await?;
        let vector = parse_embeddings_from_value(response)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                SemanticError::InvalidResponse("response did not contain embeddings".into())
            })?;
        if vector.is_empty() {
            return Err(SemanticError::InvalidResponse("embedding is empty".into()));
        }
        Ok(SemanticEmbedding::from_vector(vector, &self.model_name, self.normalize))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<SemanticEmbedding>, SemanticError> {
        let mut results = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            let start = Instant::now();
            let payload = build_api_payload(self.provider, chunk, &self.model_name, true);
            let vectors = match self.send(payload).await {
                Ok(response) => parse_embeddings_from_value(response)?,
                Err(err) => {
                    warn!(error = %err, batch = chunk.len(), "embed_batch_failure");
                    return Err(err);
                }
            };
            if vectors.len() != chunk.len() {
                return Err(SemanticError::InvalidResponse(format!(
                    "API returned {} embeddings for {} inputs",
                    vectors.len(),
                    chunk.len()
                )));
            }
            debug!(
                batch = chunk.len(),
                elapsed_micros = start.elapsed().as_micros(),
                "embed_batch_chunk"
            );
            results.extend(
                vectors
                    .into_iter()
                    .map(|v| SemanticEmbedding::from_vector(v, &self.model_name, self.normalize)),
            );
        }
        Ok(results)
    }
}

fn api_provider_kind(provider: Option<&str>) -> ApiProviderKind {
    match provider.unwrap_or("custom").to_ascii_lowercase().as_str() {
        "hf" | "huggingface" => ApiProviderKind::HuggingFace,
        "openai" | "gpt" => ApiProviderKind::OpenAI,
        _ => ApiProviderKind::Custom,
    }
}

fn build_api_payload(
    provider: ApiProviderKind,
    texts: &[String],
    model_name: &str,
    batch: bool,
) -> Value {
    let first = texts.first().map(String::as_str).unwrap_or("");
    match (provider, batch) {
        (ApiProviderKind::HuggingFace, true) => json!({ "inputs": texts }),
        (ApiProviderKind::HuggingFace, false) => json!({ "inputs": first }),
        (ApiProviderKind::OpenAI, true) => json!({ "input": texts, "model": model_name }),
        (ApiProviderKind::OpenAI, false) => json!({ "input": first, "model": model_name }),
        (ApiProviderKind::Custom, true) => json!({ "texts": texts }),
        (ApiProviderKind::Custom, false) => json!({ "text": first }),
    }
}

fn parse_embeddings_from_value(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_embedding_collection(embeddings);
            }
            if let Some(embedding) = map.remove("embedding") {
                return parse_embedding_vector(embedding).map(|v| vec![v]);
            }
            if let Some(Value::Array(items)) = map.remove("data") {
                return items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(mut obj) => obj
                            .remove("embedding")
                            .ok_or_else(|| {
                                SemanticError::InvalidResponse(
                                    "missing `embedding` field in data item".into(),
                                )
                            })
                            .and_then(parse_embedding_vector),
                        _ => Err(SemanticError::InvalidResponse(
                            "unexpected entry inside `data` array".into(),
                        )),
                    })
                    .collect();
            }
            Err(SemanticError::InvalidResponse(
                "unsupported API response shape".into(),
            ))
        }
        other => parse_embedding_collection(other),
    }
}

fn parse_embedding_collection(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Ok(Vec::new())
            } else if items.iter().all(|item| matches!(item, Value::Array(_))) {
                items.into_iter().map(parse_embedding_vector).collect()
            } else {
                parse_embedding_vector(Value::Array(items)).map(|vec| vec![vec])
            }
        }
        other => parse_embedding_vector(other).map(|vec| vec![vec]),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f32>, SemanticError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num.as_f64().map(|f| f as f32).ok_or_else(|| {
                    SemanticError::InvalidResponse("non-finite embedding value".into())
                }),
                other => Err(SemanticError::InvalidResponse(format!(
                    "embedding entries must be numbers, got {other:?}"
                ))),
            })
            .collect(),
        other => Err(SemanticError::InvalidResponse(format!(
            "embedding vector must be an array, got {other:?}"
        ))),
    }
}
