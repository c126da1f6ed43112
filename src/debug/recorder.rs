// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Debug recorder: numbered snapshot files on disk

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::snapshot::Snapshot;
use crate::error::{Error, Result};
use crate::io;

/// Persists snapshots as `<dir>/<name>_<id>.json`.
///
/// Ids start at 1 and are allocated atomically, so concurrent calls sharing
/// one recorder never collide.
#[derive(Debug)]
pub struct DebugRecorder {
    dir: PathBuf,
    name: String,
    counter: AtomicU64,
}

impl DebugRecorder {
    /// Create a recorder writing into `dir`, creating it if needed
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        let name = name.into();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(Error::Config(format!("Invalid recorder name: {:?}", name)));
        }
        io::dir_create(&dir)?;
        Ok(Self {
            dir,
            name,
            counter: AtomicU64::new(0),
        })
    }

    /// Recorder name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Most recently allocated id, 0 before the first exchange
    pub fn current_id(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Allocate the next id
    pub fn begin_exchange(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// File path for snapshot `id`
    pub fn path_for(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{}_{:06}.json", self.name, id))
    }

    /// Write `snapshot`, replacing any earlier write for the same id
    pub fn record(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        let path = self.path_for(snapshot.id);
        io::save_json(&path, snapshot)?;
        tracing::debug!(
            id = snapshot.id,
            complete = snapshot.is_complete(),
            path = %path.display(),
            "Snapshot written"
        );
        Ok(path)
    }

    /// Read snapshot `id` back
    pub fn load(&self, id: u64) -> Result<Snapshot> {
        let map = io::load_map(&self.path_for(id))?;
        Ok(serde_json::from_value(serde_json::Value::Object(map))?)
    }

    /// Delete every snapshot file of this recorder. Returns how many were removed.
    pub fn purge(&self) -> Result<usize> {
        if !self.dir.is_dir() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let owned = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| self.owns(n));
            if owned && path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Whether `file_name` has the exact `<name>_<digits>.json` shape of this recorder
    fn owns(&self, file_name: &str) -> bool {
        file_name
            .strip_prefix(self.name.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|rest| rest.strip_suffix(".json"))
            .map_or(false, |id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
    }
}
