//! Application state for the web layer.

use std::sync::Arc;

use crate::engine::EngineConfig;
use crate::store::SnapshotStore;

/// Shared application state.
///
/// The store hands out immutable snapshots; the config is fixed at
/// startup. Handlers hold nothing else, so requests are freely
/// concurrent.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the current data snapshot
    pub store: SnapshotStore,

    /// Engine tuning parameters
    pub config: Arc<EngineConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: SnapshotStore, config: EngineConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
