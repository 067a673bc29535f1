use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// The body could not be read as the expected listing shape.
    MalformedResponse,
    /// The listing endpoint answered with a non-zero `base_resp.ret`.
    Api(i64),
    Network,
}

impl FailureKind {
    /// Malformed input and hard limits will not change on a second attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            FailureKind::InvalidUrl | FailureKind::MalformedResponse | FailureKind::TooLarge { .. }
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Api(code) => write!(f, "api error {code}"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(FailureKind::Timeout.is_retryable());
        assert!(FailureKind::Network.is_retryable());
        assert!(FailureKind::HttpStatus(503).is_retryable());
        assert!(FailureKind::Api(200013).is_retryable());
        assert!(!FailureKind::MalformedResponse.is_retryable());
        assert!(!FailureKind::InvalidUrl.is_retryable());
        assert!(!FailureKind::TooLarge {
            max_bytes: 1,
            actual: None
        }
        .is_retryable());
    }

    #[test]
    fn error_display_includes_kind_and_message() {
        let err = FetchError::new(FailureKind::HttpStatus(404), "Not Found");
        assert_eq!(err.to_string(), "http status 404: Not Found");
    }
}
