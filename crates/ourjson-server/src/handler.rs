use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};
use tracing::debug;

use crate::body::{export_ids, JsonBody, RequestBody};
use crate::error::{ApiError, ApiResult};
use crate::service::{BinService, ExportResponse};

/// Response header carrying the id of a freshly created bin.
pub const BIN_ID_HEADER: &str = "bin-id";

pub type AppState = Arc<BinService>;

/// The `:bin_id` path segment.
///
/// A segment that does not decode (for example `%FF`) names no bin, so it
/// is rejected as an unknown bin rather than as a malformed URL.
#[derive(Debug)]
pub struct BinIdParam(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BinIdParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(bin_id)) => Ok(Self(bin_id)),
            Err(rejection) => {
                let raw = parts.uri.path().rsplit('/').next().unwrap_or_default();
                debug!(raw, %rejection, "undecodable bin id");
                Err(ApiError::unknown_bin(raw))
            }
        }
    }
}

/// Service banner.
pub async fn banner_handler() -> Json<Value> {
    Json(json!({
        "status": 200,
        "message": format!("Welcome to OurJSON API v{}", env!("CARGO_PKG_VERSION")),
        "version": 1,
        "description": "This API emulates http://myjson.com/api",
    }))
}

/// Liveness check.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "200",
        "message": "Server is up",
    }))
}

pub async fn create_bin(
    State(service): State<AppState>,
    JsonBody(body): JsonBody,
) -> ApiResult<impl IntoResponse> {
    let created = service.create(RequestBody::new(body)).await?;
    Ok((
        StatusCode::CREATED,
        [(BIN_ID_HEADER, created.bin_id.to_string())],
        Json(json!({ "uri": created.uri })),
    ))
}

pub async fn read_bin(
    State(service): State<AppState>,
    BinIdParam(bin_id): BinIdParam,
) -> ApiResult<Json<Value>> {
    Ok(Json(service.read(&bin_id).await?))
}

pub async fn update_bin(
    State(service): State<AppState>,
    BinIdParam(bin_id): BinIdParam,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Value>> {
    Ok(Json(service.update(&bin_id, RequestBody::new(body)).await?))
}

pub async fn export_bins(
    State(service): State<AppState>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<ExportResponse>> {
    let ids = export_ids(body)?;
    Ok(Json(service.export(ids).await?))
}

/// `/bins/` with nothing after the slash.
pub async fn missing_bin_id() -> ApiError {
    ApiError::missing_bin_id()
}

/// A known route hit with a method it does not serve.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{method} is not supported on {}", uri.path()))
}

pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("The requested resource does not exist".into())
}
