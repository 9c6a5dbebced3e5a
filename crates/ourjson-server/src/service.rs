//! Bin operations: create, read, update, export.
//!
//! `BinService` owns no state beyond its injected collaborators, so one
//! instance is shared by every request. Documents are escaped on the way
//! into the store and unescaped on the way out; callers never see the
//! stored form.

use std::collections::HashSet;
use std::sync::Arc;

use ourjson_codec::unescape;
use ourjson_store::{BinStore, StoreError};
use ourjson_types::{Bin, BinId, IdGenerator, RandomIdGenerator, TypeError};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::body::RequestBody;
use crate::error::{ApiError, ApiResult};

const NOT_SAVED: &str = "Your data was not saved";
const NOT_RETRIEVED: &str = "The server failed to retrieve that ID";
const EXPORT_FAILED: &str = "The server failed to retrieve that information";

/// Result of a successful create.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedBin {
    pub bin_id: BinId,
    pub uri: String,
}

/// Body of a successful export. `err` lists requested ids that matched
/// nothing and is omitted when every id matched.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportResponse {
    pub data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<Vec<String>>,
}

pub struct BinService {
    store: Arc<dyn BinStore>,
    ids: Arc<dyn IdGenerator>,
    base_uri: String,
}

impl BinService {
    /// `base_uri` is the scheme and host prefix of returned bin URIs,
    /// e.g. `https://localhost:8080`.
    pub fn new(store: Arc<dyn BinStore>, base_uri: impl Into<String>) -> Self {
        Self {
            store,
            ids: Arc::new(RandomIdGenerator),
            base_uri: base_uri.into(),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn bin_uri(&self, bin_id: &BinId) -> String {
        format!("{}/bins/{bin_id}", self.base_uri.trim_end_matches('/'))
    }

    pub async fn create(&self, body: RequestBody) -> ApiResult<CreatedBin> {
        if !body.is_document() {
            return Err(ApiError::bad_body("A bin must be a JSON object or array"));
        }
        let bin_id = self.ids.generate();
        let (_, escaped) = body.into_parts();
        self.store
            .create(&Bin::new(bin_id.clone(), escaped))
            .await
            .map_err(|e| storage_failure("create", &bin_id, e, NOT_SAVED))?;

        info!(bin_id = %bin_id, "created bin");
        Ok(CreatedBin {
            uri: self.bin_uri(&bin_id),
            bin_id,
        })
    }

    pub async fn read(&self, raw_id: &str) -> ApiResult<Value> {
        let bin_id = resolve_id(raw_id)?;
        let bin = self
            .store
            .find_by_id(&bin_id)
            .await
            .map_err(|e| storage_failure("read", &bin_id, e, NOT_RETRIEVED))?
            .ok_or_else(|| ApiError::unknown_bin(raw_id))?;

        debug!(bin_id = %bin_id, "read bin");
        Ok(unescape(&bin.json))
    }

    /// Replace the document of an existing bin and echo the submitted body.
    pub async fn update(&self, raw_id: &str, body: RequestBody) -> ApiResult<Value> {
        let bin_id = resolve_id(raw_id)?;
        if !body.is_document() {
            return Err(ApiError::bad_body("A bin must be a JSON object or array"));
        }
        let (original, escaped) = body.into_parts();
        let matched = self
            .store
            .update_by_id(&bin_id, escaped)
            .await
            .map_err(|e| storage_failure("update", &bin_id, e, NOT_SAVED))?;
        if matched == 0 {
            return Err(ApiError::unknown_bin(raw_id));
        }

        info!(bin_id = %bin_id, "updated bin");
        Ok(original)
    }

    /// Bulk read. Fails only when nothing matched; otherwise unmatched ids
    /// are reported next to the data.
    pub async fn export(&self, requested: Vec<String>) -> ApiResult<ExportResponse> {
        let mut seen = HashSet::new();
        let unique: Vec<&String> = requested.iter().filter(|id| seen.insert(*id)).collect();
        // Ids that cannot parse can never match; they skip the store.
        let lookup: Vec<BinId> = unique
            .iter()
            .filter_map(|raw| BinId::parse(raw).ok())
            .collect();

        let bins = if lookup.is_empty() {
            Vec::new()
        } else {
            self.store.find_by_ids(&lookup).await.map_err(|e| {
                error!(error = %e, requested = lookup.len(), "export failed");
                ApiError::Internal(EXPORT_FAILED.into())
            })?
        };
        if bins.is_empty() {
            return Err(ApiError::NotFound(format!(
                "None of the Ids {} were found.",
                Value::from(requested.as_slice())
            )));
        }

        let matched: HashSet<&str> = bins.iter().map(|b| b.bin_id.as_str()).collect();
        let unmatched: Vec<String> = unique
            .into_iter()
            .filter(|raw| !matched.contains(raw.as_str()))
            .cloned()
            .collect();
        let data: Vec<Value> = bins.iter().map(|b| unescape(&b.json)).collect();

        debug!(
            matched = data.len(),
            unmatched = unmatched.len(),
            "exported bins"
        );
        Ok(ExportResponse {
            data,
            err: (!unmatched.is_empty()).then_some(unmatched),
        })
    }
}

impl std::fmt::Debug for BinService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinService")
            .field("base_uri", &self.base_uri)
            .finish_non_exhaustive()
    }
}

/// Empty ids and ids outside the id alphabet both read as "not found".
fn resolve_id(raw: &str) -> ApiResult<BinId> {
    BinId::parse(raw).map_err(|e| match e {
        TypeError::EmptyId => ApiError::missing_bin_id(),
        TypeError::InvalidChar { .. } => ApiError::unknown_bin(raw),
    })
}

fn storage_failure(op: &str, bin_id: &BinId, e: StoreError, description: &str) -> ApiError {
    error!(op, bin_id = %bin_id, error = %e, "storage operation failed");
    ApiError::Internal(description.into())
}
