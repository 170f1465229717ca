use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tram_server::graph::{GraphConfig, GraphFile, InMemoryGraphStore};
use tram_server::health::{CachedHealthCheck, GraphHealthCheck, HealthConfig, HealthRegistry};
use tram_server::neighbours::NeighbourConfig;
use tram_server::planner::{RouteSearchEngine, SearchConfig};
use tram_server::settings::Settings;
use tram_server::spatial::StationLocations;
use tram_server::timetable::Timetable;
use tram_server::web::{AppState, StationNames, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;

    let timetable = Timetable::load(&settings.timetable)?;
    info!(
        feed = %timetable.feed.version,
        stations = timetable.stations.len(),
        trips = timetable.trips.len(),
        "loaded timetable"
    );

    let locations = StationLocations::from_timetable(&timetable);
    let neighbours = NeighbourConfig {
        margin_metres: settings.walk_margin_metres,
        ..NeighbourConfig::default()
    };
    let loaded = GraphFile::new(&settings.graph_file).load_or_build(
        &timetable,
        &GraphConfig::default(),
        &neighbours,
        &locations,
    )?;
    info!(
        nodes = loaded.graph.node_count(),
        relationships = loaded.graph.relationship_count(),
        rebuilt = loaded.rebuilt,
        "graph ready"
    );

    let store = Arc::new(InMemoryGraphStore::new(loaded.graph));
    let search_config = SearchConfig {
        max_changes: settings.max_changes,
        direct_walk_margin_metres: settings.walk_margin_metres,
        ..SearchConfig::default()
    };
    let engine = RouteSearchEngine::new(store.clone(), Arc::new(locations), search_config);

    let health = HealthRegistry::new().with(CachedHealthCheck::new(
        GraphHealthCheck::new(store),
        &HealthConfig::default(),
    ));

    let state = AppState::new(engine, health, StationNames::from_timetable(&timetable));
    let app = create_router(state);

    info!(addr = %settings.listen, "tram journey planner listening");
    info!("  GET  /health          - Health check");
    info!("  POST /journey/plan    - Plan a journey");

    let listener = tokio::net::TcpListener::bind(settings.listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
