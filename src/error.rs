use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The completion endpoint refused the connection.
    #[error("Cannot connect to Ollama at {endpoint}. Is it running? (ollama serve)")]
    ServiceUnavailable { endpoint: String },

    /// The completion endpoint did not answer within the configured bound.
    #[error("Ollama request timed out ({seconds}s). Is the model loaded?")]
    Timeout { seconds: u64 },

    /// Any other completion failure: bad status, malformed payload.
    #[error("Ollama error: {0}")]
    Completion(String),

    /// A template placeholder had no value in the supplied arguments.
    #[error("Template '{template}' has no value for placeholder '{placeholder}'")]
    Template {
        template: String,
        placeholder: String,
    },

    /// `analyze` found no suite results to read.
    #[error("No test results found in {}. Run the suite first.", dir.display())]
    NoSuiteResults { dir: std::path::PathBuf },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Classify a transport failure from the HTTP client.
    pub(crate) fn from_request(err: reqwest::Error, endpoint: &str, seconds: u64) -> Self {
        if err.is_timeout() {
            PipelineError::Timeout { seconds }
        } else if err.is_connect() {
            PipelineError::ServiceUnavailable {
                endpoint: endpoint.to_string(),
            }
        } else {
            PipelineError::Completion(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_bound() {
        let err = PipelineError::Timeout { seconds: 180 };
        assert_eq!(
            err.to_string(),
            "Ollama request timed out (180s). Is the model loaded?"
        );
    }

    #[test]
    fn test_service_unavailable_names_endpoint() {
        let err = PipelineError::ServiceUnavailable {
            endpoint: "http://localhost:11434".to_string(),
        };
        assert!(err.to_string().contains("http://localhost:11434"));
        assert!(err.to_string().contains("ollama serve"));
    }

    #[test]
    fn test_template_message() {
        let err = PipelineError::Template {
            template: "outline".to_string(),
            placeholder: "selected_idea".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Template 'outline' has no value for placeholder 'selected_idea'"
        );
    }
}
