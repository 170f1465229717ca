//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, error, warn};

use crate::planner::{JourneyRequest, SearchError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/journey/plan", post(plan_journey))
        .with_state(state)
}

/// Health check endpoint.
///
/// 200 "ok" when every check passes, otherwise 503 naming the failures.
async fn health(State(state): State<AppState>) -> Response {
    match state.health.overall() {
        Ok(()) => (StatusCode::OK, "ok").into_response(),
        Err(failing) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("unhealthy: {}", failing.join(", ")),
        )
            .into_response(),
    }
}

/// Plan a journey.
///
/// The search is CPU-bound, so it runs on the blocking pool.
async fn plan_journey(
    State(state): State<AppState>,
    Json(req): Json<PlanJourneyRequest>,
) -> Result<Json<PlanJourneyResponse>, AppError> {
    let request = JourneyRequest::from(req);
    debug!(?request, "planning journey");

    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || engine.search(&request))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("search task failed: {e}"),
        })??;

    Ok(Json(PlanJourneyResponse::from_result(&result, &state.names)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(msg) => AppError::BadRequest { message: msg },
            SearchError::Unavailable => AppError::Unavailable {
                message: e.to_string(),
            },
            SearchError::Graph(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::graph::{GraphBuilder, GraphConfig, GraphError, InMemoryGraphStore};
    use crate::health::{GraphHealthCheck, HealthRegistry};
    use crate::planner::{Location, RouteSearchEngine, SearchConfig};
    use crate::spatial::StationLocations;
    use crate::testing::{self, t};
    use crate::web::StationNames;

    fn state() -> (AppState, Arc<InMemoryGraphStore>) {
        let timetable = testing::two_route_timetable();
        let (graph, _) = GraphBuilder::new(GraphConfig::default()).build(&timetable);
        let store = Arc::new(InMemoryGraphStore::new(graph));
        let locations = Arc::new(StationLocations::from_timetable(&timetable));
        let engine = RouteSearchEngine::new(store.clone(), locations, SearchConfig::default());
        let health = HealthRegistry::new().with(GraphHealthCheck::new(store.clone()));
        (
            AppState::new(engine, health, StationNames::from_timetable(&timetable)),
            store,
        )
    }

    fn plan(origin: &str, destination: &str, date: chrono::NaiveDate) -> PlanJourneyRequest {
        PlanJourneyRequest {
            origin: Location::station(origin),
            destination: Location::station(destination),
            date,
            times: vec![t("09:55")],
            max_changes: None,
            max_journey_mins: None,
            max_results: None,
        }
    }

    #[test]
    fn search_errors_map_to_status() {
        let status = |e: SearchError| AppError::from(e).into_response().status();
        assert_eq!(
            status(SearchError::InvalidRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(SearchError::Unavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status(SearchError::Graph(GraphError::Unavailable)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn health_reflects_store() {
        let (state, store) = state();
        let response = health(State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);

        store.mark_unavailable();
        let response = health(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn plan_finds_journey() {
        let (state, _) = state();
        let Json(response) = plan_journey(State(state), Json(plan("A", "D", testing::monday())))
            .await
            .unwrap();
        assert_eq!(response.journeys.len(), 1);
        assert_eq!(response.journeys[0].arrival_time, "10:20");
        assert_eq!(response.journeys[0].changes, 1);
    }

    #[tokio::test]
    async fn no_journeys_is_success() {
        let (state, _) = state();
        let Json(response) = plan_journey(State(state), Json(plan("A", "D", testing::sunday())))
            .await
            .unwrap();
        assert!(response.journeys.is_empty());
    }

    #[tokio::test]
    async fn unknown_station_is_bad_request() {
        let (state, _) = state();
        let err = plan_journey(State(state), Json(plan("A", "Z", testing::monday())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn store_down_is_unavailable() {
        let (state, store) = state();
        store.mark_unavailable();
        let err = plan_journey(State(state), Json(plan("A", "D", testing::monday())))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
