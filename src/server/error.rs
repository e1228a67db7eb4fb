//! HTTP mapping of resolver errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::resolver::ResolverError;

/// Body of every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl ResolverError {
    /// 400 for declared preconditions, 500 for everything else
    pub fn status_code(&self) -> StatusCode {
        if self.is_precondition() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ResolverError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ResolverError::Precondition("install first".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ResolverError::unreachable("down").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ResolverError::command_failed("Failed", "exit status: 1").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
