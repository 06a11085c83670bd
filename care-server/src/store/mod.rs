//! Snapshot storage: loading and out-of-band refresh.
//!
//! The engine serves queries from an immutable snapshot of the road
//! network and the availability catalog. Snapshots are produced by a
//! batch import pipeline and re-read on an interval; a failed refresh
//! keeps the previous snapshot in place.

mod error;
mod format;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::availability::AvailabilityIndex;
use crate::domain::{Facility, FacilityId};
use crate::network::RoadNetwork;

pub use error::StoreError;
pub use format::RawSnapshot;

use format::build_snapshot;

/// One immutable, validated snapshot of all serving data.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub network: RoadNetwork,
    pub availability: AvailabilityIndex,
    /// Facilities ordered by ascending id.
    pub facilities: Vec<Facility>,
}

impl Snapshot {
    /// Look up a facility by id.
    pub fn facility(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities
            .binary_search_by_key(&id, |f| f.id)
            .ok()
            .map(|idx| &self.facilities[idx])
    }
}

/// Thread-safe handle to the current snapshot.
///
/// Queries clone an `Arc` to the snapshot they start with; a refresh
/// swapping in a new snapshot never disturbs queries in flight.
#[derive(Clone)]
pub struct SnapshotStore {
    inner: Arc<RwLock<Arc<Snapshot>>>,
    path: PathBuf,
}

impl SnapshotStore {
    /// Load the initial snapshot from a JSON file.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = read_snapshot(&path).await?;

        Ok(Self {
            inner: Arc::new(RwLock::new(Arc::new(snapshot))),
            path,
        })
    }

    /// The snapshot to serve the current query from.
    pub async fn current(&self) -> Arc<Snapshot> {
        self.inner.read().await.clone()
    }

    /// Re-read the snapshot file and swap it in.
    ///
    /// On success, returns the facility count of the new snapshot. On
    /// failure the existing snapshot is preserved and the error is
    /// returned.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        let snapshot = read_snapshot(&self.path).await?;
        let count = snapshot.facilities.len();

        let mut guard = self.inner.write().await;
        *guard = Arc::new(snapshot);

        Ok(count)
    }
}

async fn read_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let raw: RawSnapshot = serde_json::from_str(&contents)?;
    let snapshot = build_snapshot(raw)?;

    debug!(
        nodes = snapshot.network.node_count(),
        facilities = snapshot.facilities.len(),
        "snapshot loaded"
    );

    Ok(snapshot)
}
