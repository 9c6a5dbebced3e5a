//! File-backed bin store.
//!
//! Layout: one file per bin, `<root>/<binId>.json`, holding the persisted
//! record `{"binId": ..., "json": ...}`. Every write goes to a temporary
//! sibling first. A create hard-links it into place, which refuses an
//! existing file; an update renames it over the old one. A reader sees
//! either the old document or the new one.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use ourjson_types::{Bin, BinId};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::BinStore;

/// A [`BinStore`] that keeps every bin as a JSON file under one directory.
///
/// `BinId` only admits `[0-9a-zA-Z_-]`, so an id can always be used as a
/// file name as-is.
#[derive(Debug)]
pub struct FileBinStore {
    root: PathBuf,
    tmp_seq: AtomicU64,
}

impl FileBinStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "opened file bin store");
        Ok(Self {
            root,
            tmp_seq: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bin_path(&self, bin_id: &BinId) -> PathBuf {
        self.root.join(format!("{bin_id}.json"))
    }

    /// Write `bin` to a fresh temporary sibling and return its path.
    ///
    /// A failed write leaves no temporary file behind.
    async fn stage(&self, bin: &Bin) -> StoreResult<PathBuf> {
        let data = serde_json::to_vec(bin)?;
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = self.root.join(format!(".{}.{seq}.tmp", bin.bin_id));
        if let Err(e) = fs::write(&tmp, &data).await {
            discard(&tmp).await;
            return Err(e.into());
        }
        Ok(tmp)
    }

    async fn exists(&self, bin_id: &BinId) -> StoreResult<bool> {
        Ok(fs::try_exists(self.bin_path(bin_id)).await?)
    }
}

async fn discard(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %tmp.display(), error = %e, "failed to remove temporary file");
        }
    }
}

#[async_trait]
impl BinStore for FileBinStore {
    async fn create(&self, bin: &Bin) -> StoreResult<()> {
        // Linking fails if the target exists, so two racing creates of one
        // id cannot both land.
        let tmp = self.stage(bin).await?;
        let linked = fs::hard_link(&tmp, self.bin_path(&bin.bin_id)).await;
        discard(&tmp).await;
        match linked {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(StoreError::AlreadyExists(bin.bin_id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, bin_id: &BinId) -> StoreResult<Option<Bin>> {
        let data = match fs::read(self.bin_path(bin_id)).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&data)?))
    }

    async fn update_by_id(&self, bin_id: &BinId, json: Value) -> StoreResult<u64> {
        if !self.exists(bin_id).await? {
            return Ok(0);
        }
        let tmp = self.stage(&Bin::new(bin_id.clone(), json)).await?;
        if let Err(e) = fs::rename(&tmp, self.bin_path(bin_id)).await {
            discard(&tmp).await;
            return Err(e.into());
        }
        Ok(1)
    }

    async fn find_by_ids(&self, ids: &[BinId]) -> StoreResult<Vec<Bin>> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for id in ids {
            if !seen.insert(id) {
                continue;
            }
            if let Some(bin) = self.find_by_id(id).await? {
                found.push(bin);
            }
        }
        Ok(found)
    }
}
