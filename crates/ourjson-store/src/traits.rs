use async_trait::async_trait;
use ourjson_types::{Bin, BinId};
use serde_json::Value;

use crate::error::StoreResult;

/// Persistence contract for bins.
///
/// All implementations must satisfy these invariants:
/// - At most one bin exists per `binId`.
/// - `update_by_id` replaces the `json` field only; the id is immutable.
/// - Storage failures are returned, never swallowed. Callers do not retry.
#[async_trait]
pub trait BinStore: Send + Sync {
    /// Insert a new bin.
    ///
    /// Ids are generated fresh per call, so a collision is reported as an
    /// ordinary storage failure.
    async fn create(&self, bin: &Bin) -> StoreResult<()>;

    /// Exact-match lookup. Returns `Ok(None)` if no such bin exists.
    async fn find_by_id(&self, bin_id: &BinId) -> StoreResult<Option<Bin>>;

    /// Replace the document of an existing bin.
    ///
    /// Returns the number of matched bins: `0` if `bin_id` is unknown,
    /// otherwise `1`.
    async fn update_by_id(&self, bin_id: &BinId, json: Value) -> StoreResult<u64>;

    /// Fetch every bin whose id appears in `ids`.
    ///
    /// Unknown ids are skipped. Each stored bin is returned at most once and
    /// the order of the result is unspecified.
    async fn find_by_ids(&self, ids: &[BinId]) -> StoreResult<Vec<Bin>>;
}
