use crate::error::{PipelineError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1:8b";
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

const ENV_ENDPOINT: &str = "ESSAY_MENTOR_ENDPOINT";
const ENV_MODEL: &str = "ESSAY_MENTOR_MODEL";
const ENV_OUTPUT_DIR: &str = "ESSAY_MENTOR_OUTPUT_DIR";

/// Connection settings for the Ollama completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    /// Ollama API endpoint (e.g., "http://localhost:11434")
    pub endpoint: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Nucleus-sampling threshold, fixed for every request
    pub top_p: f64,
    /// Request bound for pipeline stages (default: 180s)
    pub timeout: Duration,
    /// Request bound for ad hoc CLI calls (default: 120s)
    pub adhoc_timeout: Duration,
    /// Request bound for the `/api/tags` status probe (default: 5s)
    pub probe_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            top_p: DEFAULT_TOP_P,
            timeout: Duration::from_secs(180),
            adhoc_timeout: Duration::from_secs(120),
            probe_timeout: Duration::from_secs(5),
        }
    }
}

impl OllamaConfig {
    /// Create a new config with the given model name.
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the Ollama endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the pipeline request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the ad hoc request timeout.
    pub fn adhoc_timeout(mut self, timeout: Duration) -> Self {
        self.adhoc_timeout = timeout;
        self
    }

    /// Copy of this config whose request bound is the ad hoc timeout.
    pub fn for_adhoc(&self) -> Self {
        Self {
            timeout: self.adhoc_timeout,
            ..self.clone()
        }
    }
}

/// Per-call sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f64,

    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

impl SamplingParams {
    pub const fn new(temperature: f64, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }

    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }
}

/// Application settings: Ollama connection plus where reports are written.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub ollama: OllamaConfig,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

// On-disk shape; every field is optional so partial files are valid.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    output_dir: Option<PathBuf>,
    ollama: OllamaSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OllamaSection {
    endpoint: Option<String>,
    model: Option<String>,
    top_p: Option<f64>,
    timeout_secs: Option<u64>,
    adhoc_timeout_secs: Option<u64>,
    probe_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location (`~/.essay-mentor/config.toml`) is used if present, and
    /// built-in defaults otherwise. Environment overrides apply last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
            .map_err(|e| PipelineError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML text, filling unspecified fields with defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;

        let mut config = Self::default();
        if let Some(dir) = file.output_dir {
            config.output_dir = dir;
        }

        let section = file.ollama;
        if let Some(endpoint) = section.endpoint {
            config.ollama = config.ollama.endpoint(endpoint);
        }
        if let Some(model) = section.model {
            config.ollama.model = model;
        }
        if let Some(top_p) = section.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(PipelineError::InvalidConfig(format!(
                    "top_p must be within [0, 1], got {}",
                    top_p
                )));
            }
            config.ollama.top_p = top_p;
        }
        if let Some(secs) = section.timeout_secs {
            config.ollama.timeout = non_zero_secs("timeout_secs", secs)?;
        }
        if let Some(secs) = section.adhoc_timeout_secs {
            config.ollama.adhoc_timeout = non_zero_secs("adhoc_timeout_secs", secs)?;
        }
        if let Some(secs) = section.probe_timeout_secs {
            config.ollama.probe_timeout = non_zero_secs("probe_timeout_secs", secs)?;
        }

        Ok(config)
    }

    /// Apply `ESSAY_MENTOR_*` overrides read through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = set(ENV_ENDPOINT) {
            self.ollama = self.ollama.endpoint(endpoint);
        }
        if let Some(model) = set(ENV_MODEL) {
            self.ollama.model = model;
        }
        if let Some(dir) = set(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        self
    }
}

/// `~/.essay-mentor/config.toml`, if a home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".essay-mentor").join("config.toml"))
}

fn non_zero_secs(field: &str, secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(PipelineError::InvalidConfig(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.model, "llama3.1:8b");
        assert_eq!(config.top_p, 0.9);
        assert_eq!(config.timeout, Duration::from_secs(180));
        assert_eq!(config.adhoc_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let config = OllamaConfig::default().endpoint("http://gpu-box:11434/");
        assert_eq!(config.endpoint, "http://gpu-box:11434");
    }

    #[test]
    fn test_for_adhoc_swaps_timeout() {
        let config = OllamaConfig::default().adhoc_timeout(Duration::from_secs(30));
        let adhoc = config.for_adhoc();
        assert_eq!(adhoc.timeout, Duration::from_secs(30));
        assert_eq!(adhoc.model, config.model);
    }

    #[test]
    fn test_sampling_builder() {
        let params = SamplingParams::default()
            .with_temperature(0.3)
            .with_max_tokens(4096);
        assert_eq!(params.temperature, 0.3);
        assert_eq!(params.max_tokens, 4096);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let text = r#"
output_dir = "reports"

[ollama]
model = "mistral:7b"
timeout_secs = 60
"#;
        let config = AppConfig::from_toml_str(text).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.ollama.model, "mistral:7b");
        assert_eq!(config.ollama.timeout, Duration::from_secs(60));
        assert_eq!(config.ollama.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = AppConfig::from_toml_str("[ollama]\nmodle = \"typo\"\n");
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = AppConfig::from_toml_str("[ollama]\ntimeout_secs = 0\n");
        match result {
            Err(PipelineError::InvalidConfig(msg)) => assert!(msg.contains("timeout_secs")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_top_p_out_of_range_rejected() {
        let result = AppConfig::from_toml_str("[ollama]\ntop_p = 1.5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default().with_env_overrides(|key| match key {
            "ESSAY_MENTOR_MODEL" => Some("qwen2.5:7b".to_string()),
            "ESSAY_MENTOR_OUTPUT_DIR" => Some("/tmp/essays".to_string()),
            "ESSAY_MENTOR_ENDPOINT" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.ollama.model, "qwen2.5:7b");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/essays"));
        // Blank values are ignored
        assert_eq!(config.ollama.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }
}
