use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("store error: {0}")]
    Store(#[from] ourjson_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// A failed request, rendered as `{status, message, description}`.
///
/// Every variant is terminal for its request only; nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing body, non-JSON content type, or a body of the wrong shape (400).
    #[error("{message}: {description}")]
    BadRequest {
        message: &'static str,
        description: String,
    },

    /// Unknown or empty bin id, or an export that matched nothing (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Known route, unsupported method (405).
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Body exceeds the configured limit (413).
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Any storage failure (500). Store errors are not told apart.
    #[error("internal server error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn empty_body() -> Self {
        Self::BadRequest {
            message: "Empty Request Body",
            description: "You sent a POST request without a body".into(),
        }
    }

    pub fn not_json() -> Self {
        Self::BadRequest {
            message: "Bad Request Body",
            description: "The request content type is not JSON".into(),
        }
    }

    pub fn bad_body(description: impl Into<String>) -> Self {
        Self::BadRequest {
            message: "Bad Request Body",
            description: description.into(),
        }
    }

    pub fn missing_bin_id() -> Self {
        Self::NotFound("There was no bin ID sent".into())
    }

    pub fn unknown_bin(bin_id: &str) -> Self {
        Self::NotFound(format!(
            "We could not find a bin with the ID ({bin_id}) in our system"
        ))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::BadRequest { message, .. } => *message,
            Self::NotFound(_) => "Not Found",
            Self::MethodNotAllowed(_) => "Method Not Allowed",
            Self::PayloadTooLarge(_) => "Payload Too Large",
            Self::Internal(_) => "Internal Server Error",
        }
    }

    fn description(&self) -> &str {
        match self {
            Self::BadRequest { description, .. } => description.as_str(),
            Self::NotFound(d)
            | Self::MethodNotAllowed(d)
            | Self::PayloadTooLarge(d)
            | Self::Internal(d) => d.as_str(),
        }
    }
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub status: u16,
    pub message: &'a str,
    pub description: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            status: status.as_u16(),
            message: self.message(),
            description: self.description(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_shape() {
        let (status, body) = body_of(ApiError::unknown_bin("abc")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({
                "status": 404,
                "message": "Not Found",
                "description": "We could not find a bin with the ID (abc) in our system",
            })
        );
    }

    #[tokio::test]
    async fn bad_request_keeps_its_message() {
        let (status, body) = body_of(ApiError::empty_body()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Empty Request Body");

        let (_, body) = body_of(ApiError::not_json()).await;
        assert_eq!(body["message"], "Bad Request Body");
        assert_eq!(body["description"], "The request content type is not JSON");
    }

    #[tokio::test]
    async fn internal_error_is_500() {
        let (status, body) = body_of(ApiError::Internal("Your data was not saved".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::missing_bin_id().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::PayloadTooLarge("x".into()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(ApiError::bad_body("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MethodNotAllowed("x".into()).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
