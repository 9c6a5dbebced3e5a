//! Request body extraction and the per-request body context.

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use serde_json::Value;
use tracing::warn;

use crate::error::ApiError;

/// A JSON request body.
///
/// Rejections, in the order they are checked: body over the limit (413),
/// empty body (400), content type other than JSON (400), unparseable JSON
/// (400).
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge(rejection.body_text())
            } else {
                ApiError::bad_body(rejection.body_text())
            }
        })?;
        if bytes.is_empty() {
            warn!("rejected request without a body");
            return Err(ApiError::empty_body());
        }
        if !is_json {
            warn!("rejected request with non-JSON content type");
            return Err(ApiError::not_json());
        }
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::bad_body(format!("The request body is not valid JSON: {e}")))?;
        Ok(Self(value))
    }
}

/// `application/json` or any `application/*+json`, parameters ignored.
pub fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Both forms of a submitted document.
///
/// `escaped` is what gets written to the store; `original` is what the
/// client sent and what an update echoes back.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestBody {
    original: Value,
    escaped: Value,
}

impl RequestBody {
    pub fn new(original: Value) -> Self {
        let escaped = ourjson_codec::escape(&original);
        Self { original, escaped }
    }

    pub fn original(&self) -> &Value {
        &self.original
    }

    pub fn escaped(&self) -> &Value {
        &self.escaped
    }

    /// Only objects and arrays are accepted as bins.
    pub fn is_document(&self) -> bool {
        self.original.is_object() || self.original.is_array()
    }

    pub fn into_parts(self) -> (Value, Value) {
        (self.original, self.escaped)
    }
}

/// Read the id list of an export request.
pub fn export_ids(value: Value) -> Result<Vec<String>, ApiError> {
    serde_json::from_value(value)
        .map_err(|_| ApiError::bad_body("Expected a JSON array of bin IDs"))
}
