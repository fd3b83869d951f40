use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("location request timed out after {0}ms")]
    Timeout(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid request address: {0}")]
    InvalidAddress(String),
}

impl RequestError {
    /// Maps the coordinator's failure callback arguments onto a typed error.
    pub fn from_failure(body: Option<String>, status: Option<u16>) -> Self {
        match status {
            Some(status) => Self::Status {
                status,
                body: body.unwrap_or_default(),
            },
            None => Self::Transport(body.unwrap_or_else(|| "network unreachable".to_string())),
        }
    }
}

/// Any failure that ends a poll session. Both kinds are handled the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Request(#[from] RequestError),
}

#[cfg(test)]
mod tests {
    use super::{LocationError, PollError, RequestError};

    #[test]
    fn failure_without_status_is_a_transport_error() {
        let err = RequestError::from_failure(None, None);
        assert_eq!(
            err,
            RequestError::Transport("network unreachable".to_string())
        );
    }

    #[test]
    fn failure_with_status_keeps_body() {
        let err = RequestError::from_failure(Some("boom".to_string()), Some(500));
        assert_eq!(
            err,
            RequestError::Status {
                status: 500,
                body: "boom".to_string()
            }
        );
        assert_eq!(err.to_string(), "request failed with status 500");
    }

    #[test]
    fn poll_error_message_is_the_inner_message() {
        let err = PollError::from(LocationError::Timeout(20_000));
        assert_eq!(err.to_string(), "location request timed out after 20000ms");
    }
}
