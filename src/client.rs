use crate::{
    config::{OllamaConfig, SamplingParams},
    error::{PipelineError, Result},
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::time::{Duration, Instant};

/// A single text-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The rendered user prompt.
    pub prompt: String,

    /// Optional system message, sent ahead of the prompt.
    pub system: Option<String>,

    /// Temperature and token budget for this call.
    pub sampling: SamplingParams,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            sampling: SamplingParams::default(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        let system = system.into();
        self.system = if system.is_empty() { None } else { Some(system) };
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    /// The text actually sent: system message, a blank line, then the prompt.
    pub fn full_prompt(&self) -> String {
        match &self.system {
            Some(system) => format!("{}\n\n{}", system, self.prompt),
            None => self.prompt.clone(),
        }
    }
}

/// Generated text plus the wall-clock time the call took.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub elapsed: Duration,
}

impl Completion {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// A text-completion service.
///
/// Exactly one request per call: no retry, no streaming.
pub trait CompletionClient: Send + Sync {
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<Completion>> + Send;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// [`CompletionClient`] backed by Ollama's `/api/generate`.
///
/// # Example
/// ```no_run
/// use essay_mentor::{CompletionClient, CompletionRequest, OllamaClient, OllamaConfig};
///
/// # async fn example() -> essay_mentor::Result<()> {
/// let client = OllamaClient::new(OllamaConfig::default());
/// let completion = client
///     .complete(&CompletionRequest::new("Write one sentence about why essays matter."))
///     .await?;
/// println!("{} ({:.1}s)", completion.text, completion.elapsed_secs());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Use a custom `reqwest::Client` (proxies, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    /// Names of the models the service has pulled (`GET /api/tags`).
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let timeout = self.config.probe_timeout;
        let resp = self
            .http
            .get(self.url("/api/tags"))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.classify(e, timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Completion(format!(
                "model listing returned HTTP {}: {}",
                status, text
            )));
        }

        let tags: TagsResponse = resp.json().await.map_err(|e| self.classify(e, timeout))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the configured model appears in [`list_models`](Self::list_models).
    pub async fn has_model(&self) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|name| name == &self.config.model))
    }

    fn classify(&self, err: reqwest::Error, timeout: Duration) -> PipelineError {
        PipelineError::from_request(err, &self.config.endpoint, timeout.as_secs())
    }
}

impl CompletionClient for OllamaClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let body = json!({
            "model": self.config.model,
            "prompt": request.full_prompt(),
            "stream": false,
            "options": {
                "temperature": request.sampling.temperature,
                "top_p": self.config.top_p,
                "num_predict": request.sampling.max_tokens,
            },
        });

        let url = self.url("/api/generate");
        let timeout = self.config.timeout;
        tracing::debug!(
            url = %url,
            model = %self.config.model,
            temperature = request.sampling.temperature,
            max_tokens = request.sampling.max_tokens,
            "sending completion request"
        );

        let start = Instant::now();
        let resp = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e, timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Completion(format!(
                "HTTP {} from {}: {}",
                status, url, text
            )));
        }

        let bytes = resp.bytes().await.map_err(|e| self.classify(e, timeout))?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes)
            .map_err(|e| PipelineError::Completion(format!("malformed response: {}", e)))?;
        let elapsed = start.elapsed();

        tracing::debug!(elapsed_secs = elapsed.as_secs_f64(), "completion received");

        Ok(Completion {
            text: parsed.response,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_prompt_with_system() {
        let request = CompletionRequest::new("Analyze this.").with_system("You are an expert.");
        assert_eq!(request.full_prompt(), "You are an expert.\n\nAnalyze this.");
    }

    #[test]
    fn test_full_prompt_without_system() {
        let request = CompletionRequest::new("Analyze this.");
        assert_eq!(request.full_prompt(), "Analyze this.");
    }

    #[test]
    fn test_empty_system_is_none() {
        let request = CompletionRequest::new("p").with_system("");
        assert!(request.system.is_none());
        assert_eq!(request.full_prompt(), "p");
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = OllamaClient::new(OllamaConfig {
            endpoint: "http://localhost:11434/".to_string(),
            ..Default::default()
        });
        assert_eq!(client.url("/api/tags"), "http://localhost:11434/api/tags");
    }

    #[test]
    fn test_completion_elapsed_secs() {
        let completion = Completion {
            text: "x".to_string(),
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(completion.elapsed_secs(), 1.5);
    }
}
