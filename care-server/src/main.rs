use std::net::SocketAddr;
use std::time::Duration;

use care_server::engine::EngineConfig;
use care_server::store::SnapshotStore;
use care_server::web::{AppState, create_router};

/// How often to re-read the snapshot file (15 minutes).
const SNAPSHOT_REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "care_server=info".into()),
        )
        .init();

    let snapshot_path =
        std::env::var("CARE_SNAPSHOT").unwrap_or_else(|_| "data/snapshot.json".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(4000);

    // Load the initial snapshot (fail fast if unavailable)
    println!("Loading snapshot from {snapshot_path}...");
    let store = SnapshotStore::load(&snapshot_path)
        .await
        .expect("Failed to load snapshot");
    let snapshot = store.current().await;
    println!(
        "Loaded {} road nodes, {} hospitals",
        snapshot.network.node_count(),
        snapshot.facilities.len()
    );
    drop(snapshot);

    // Spawn background task to pick up snapshot updates
    let refresh_store = store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SNAPSHOT_REFRESH_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match refresh_store.refresh().await {
                Ok(count) => println!("Refreshed snapshot: {count} hospitals"),
                Err(e) => eprintln!("Failed to refresh snapshot: {e}"),
            }
        }
    });

    let state = AppState::new(store, EngineConfig::default());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("Availability search server listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health                    - Health check");
    println!("  GET  /api/initial-hospitals     - Nearby hospitals, unfiltered");
    println!("  GET  /api/search                - Filtered hospital search");
    println!("  GET  /api/hospitals/:id/doctors - Doctor listing for one hospital");
    println!("  GET  /api/autocomplete          - Search suggestions");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}
