//! API endpoints module.

pub mod agents;
pub mod health;
pub mod memory;
pub mod messages;

use axum::http::StatusCode;

use crate::error::Error;

/// Map a service error onto an HTTP status, logging it on the way out.
pub(crate) fn reject(err: Error) -> StatusCode {
    let status = match &err {
        Error::AgentNotFound(_) | Error::MemoryNotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidRecipient(_) => StatusCode::BAD_REQUEST,
        Error::Publish(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::debug!(error = %err, %status, "request rejected");
    }

    status
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            reject(Error::AgentNotFound("a1".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            reject(Error::InvalidRecipient("empty".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            reject(Error::Publish("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            reject(Error::HistoryRead("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
