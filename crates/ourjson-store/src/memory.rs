//! In-memory bin store for testing and ephemeral servers.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use ourjson_types::{Bin, BinId};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::traits::BinStore;

/// An in-memory implementation of [`BinStore`].
///
/// All documents live in a `HashMap` behind a `RwLock`. Data is lost when
/// the store is dropped.
pub struct InMemoryBinStore {
    bins: RwLock<HashMap<BinId, Value>>,
}

impl InMemoryBinStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            bins: RwLock::new(HashMap::new()),
        }
    }

    /// Number of bins currently stored.
    ///
    /// # Panics
    ///
    /// Panics if a writer panicked while holding the lock.
    pub fn len(&self) -> usize {
        self.bins.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryBinStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend(format!("lock poisoned: {e}"))
}

#[async_trait]
impl BinStore for InMemoryBinStore {
    async fn create(&self, bin: &Bin) -> StoreResult<()> {
        let mut bins = self.bins.write().map_err(poisoned)?;
        if bins.contains_key(&bin.bin_id) {
            return Err(StoreError::AlreadyExists(bin.bin_id.clone()));
        }
        bins.insert(bin.bin_id.clone(), bin.json.clone());
        Ok(())
    }

    async fn find_by_id(&self, bin_id: &BinId) -> StoreResult<Option<Bin>> {
        let bins = self.bins.read().map_err(poisoned)?;
        Ok(bins
            .get(bin_id)
            .map(|json| Bin::new(bin_id.clone(), json.clone())))
    }

    async fn update_by_id(&self, bin_id: &BinId, json: Value) -> StoreResult<u64> {
        let mut bins = self.bins.write().map_err(poisoned)?;
        match bins.get_mut(bin_id) {
            Some(slot) => {
                *slot = json;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_by_ids(&self, ids: &[BinId]) -> StoreResult<Vec<Bin>> {
        let bins = self.bins.read().map_err(poisoned)?;
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| bins.get(id).map(|json| Bin::new(id.clone(), json.clone())))
            .collect())
    }
}

impl std::fmt::Debug for InMemoryBinStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBinStore")
            .field("bin_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(s: &str) -> BinId {
        BinId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn create_then_find() {
        let store = InMemoryBinStore::new();
        let bin = Bin::new(id("a"), json!({"k": 1}));
        store.create(&bin).await.unwrap();

        assert_eq!(store.find_by_id(&id("a")).await.unwrap(), Some(bin));
        assert_eq!(store.find_by_id(&id("b")).await.unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_existing_id() {
        let store = InMemoryBinStore::new();
        store.create(&Bin::new(id("a"), json!([]))).await.unwrap();
        let err = store.create(&Bin::new(id("a"), json!({}))).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
        // original document untouched
        assert_eq!(store.find_by_id(&id("a")).await.unwrap().unwrap().json, json!([]));
    }

    #[tokio::test]
    async fn update_reports_matched_count() {
        let store = InMemoryBinStore::new();
        store.create(&Bin::new(id("a"), json!({"v": 1}))).await.unwrap();

        assert_eq!(store.update_by_id(&id("a"), json!({"v": 2})).await.unwrap(), 1);
        assert_eq!(store.update_by_id(&id("zz"), json!({"v": 2})).await.unwrap(), 0);

        let bin = store.find_by_id(&id("a")).await.unwrap().unwrap();
        assert_eq!(bin.bin_id, id("a"));
        assert_eq!(bin.json, json!({"v": 2}));
        assert!(store.find_by_id(&id("zz")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_ids_returns_existing_subset() {
        let store = InMemoryBinStore::new();
        store.create(&Bin::new(id("a"), json!(1))).await.unwrap();
        store.create(&Bin::new(id("b"), json!(2))).await.unwrap();

        let mut found = store
            .find_by_ids(&[id("a"), id("c"), id("b")])
            .await
            .unwrap();
        found.sort_by(|x, y| x.bin_id.cmp(&y.bin_id));
        let ids: Vec<&str> = found.iter().map(|b| b.bin_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn find_by_ids_returns_each_bin_once() {
        let store = InMemoryBinStore::new();
        store.create(&Bin::new(id("a"), json!(1))).await.unwrap();
        let found = store.find_by_ids(&[id("a"), id("a")]).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn poisoned_lock_is_a_backend_error() {
        let store = std::sync::Arc::new(InMemoryBinStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.bins.write().unwrap();
            panic!("writer died");
        })
        .join();

        let err = store.find_by_id(&id("a")).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        let len = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| store.len()));
        assert!(len.is_err());
    }

    #[tokio::test]
    async fn find_by_ids_empty_request() {
        let store = InMemoryBinStore::new();
        assert!(store.find_by_ids(&[]).await.unwrap().is_empty());
        assert!(store.is_empty());
    }
}
