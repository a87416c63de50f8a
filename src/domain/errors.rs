use thiserror::Error;

/// Failures of a single call to the sentiment scoring backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Transport(String),

    #[error("Backend returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ScoringError {
    /// Fatal errors cannot succeed on retry and must stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

/// Errors surfaced by a pipeline cycle.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Unrecoverable; the process must terminate.
    #[error("Fatal scoring failure: {0}")]
    Fatal(#[source] ScoringError),

    #[error("News collection failed")]
    Ingestion(#[source] anyhow::Error),

    #[error("Pipeline cycle failed")]
    Cycle(#[source] anyhow::Error),
}

impl PipelineError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl From<ScoringError> for PipelineError {
    fn from(err: ScoringError) -> Self {
        if err.is_fatal() {
            Self::Fatal(err)
        } else {
            Self::Cycle(anyhow::Error::new(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_error_classification() {
        assert!(ScoringError::Authentication("bad key".into()).is_fatal());
        assert!(!ScoringError::RateLimited.is_fatal());
        assert!(ScoringError::RateLimited.is_rate_limit());
        assert!(!ScoringError::Timeout.is_rate_limit());
    }

    #[test]
    fn test_error_formatting() {
        let err = ScoringError::Api {
            status: 503,
            message: "overloaded".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("overloaded"));
    }

    #[test]
    fn test_pipeline_error_from_scoring_error() {
        let fatal: PipelineError = ScoringError::Authentication("revoked".into()).into();
        assert!(fatal.is_fatal());
        let other: PipelineError = ScoringError::Timeout.into();
        assert!(!other.is_fatal());
        assert!(matches!(other, PipelineError::Cycle(_)));
    }

    #[test]
    fn test_pipeline_error_chain_keeps_cause() {
        let err = PipelineError::Ingestion(anyhow::anyhow!("dns lookup failed"));
        assert_eq!(
            format!("{:#}", anyhow::Error::new(err)),
            "News collection failed: dns lookup failed"
        );

        let err: PipelineError = ScoringError::Timeout.into();
        assert_eq!(
            format!("{:#}", anyhow::Error::new(err)),
            "Pipeline cycle failed: Request timed out"
        );
    }
}
