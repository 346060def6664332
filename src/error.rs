use thiserror::Error;

/// Failures of the translation stage.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("translation service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("unexpected translation response: {0}")]
    Malformed(String),

    #[error("translator crashed: {0}")]
    Crashed(String),
}

/// Terminal failure of one submission's pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Translation unavailable: {0}")]
    Translation(#[from] TranslateError),

    #[error("Analysis failed: {0}")]
    Analysis(String),

    #[error("Pipeline shut down before the analysis finished")]
    Shutdown,
}

impl PipelineError {
    /// Dialog title shown to the user for this failure.
    pub fn title(&self) -> &'static str {
        match self {
            PipelineError::Translation(_) => "Translation unavailable",
            PipelineError::Analysis(_) => "Analysis failed",
            PipelineError::Shutdown => "Cancelled",
        }
    }

    /// Dialog body: the underlying cause, without repeating the title.
    pub fn detail(&self) -> String {
        match self {
            PipelineError::Translation(source) => source.to_string(),
            PipelineError::Analysis(message) => message.clone(),
            PipelineError::Shutdown => self.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_titles() {
        let err = PipelineError::Translation(TranslateError::Malformed("empty".to_string()));
        assert_eq!(err.title(), "Translation unavailable");
        assert_eq!(
            err.to_string(),
            "Translation unavailable: unexpected translation response: empty"
        );

        let err = PipelineError::Analysis("scorer panicked".to_string());
        assert_eq!(err.title(), "Analysis failed");
    }

    #[test]
    fn test_pipeline_error_detail_omits_title() {
        let err = PipelineError::Translation(TranslateError::Status(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
        ));
        assert_eq!(err.detail(), "translation service returned HTTP 503 Service Unavailable");
        assert!(!err.detail().contains(err.title()));

        let err = PipelineError::Analysis("scorer panicked".to_string());
        assert_eq!(err.detail(), "scorer panicked");
    }
}
