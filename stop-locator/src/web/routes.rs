//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{InvalidQuery, SearchQuery};
use crate::geocoder::{GeocodeError, Geocoder};
use crate::locate::LocateError;
use crate::search::{SearchError, Strategy};
use crate::store::DocumentStore;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<G, S>(state: AppState<G, S>) -> Router
where
    G: Geocoder + 'static,
    S: DocumentStore + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/stops/nearby", get(nearby_stops::<G, S>))
        .route("/stops/nearby/:coordinates", get(nearby_coordinates::<G, S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Find stops near free text or a `lat,lng` pair.
async fn nearby_stops<G, S>(
    State(state): State<AppState<G, S>>,
    req: Result<Query<NearbyQuery>, QueryRejection>,
) -> Result<Json<NearbyStopsResponse>, AppError>
where
    G: Geocoder + 'static,
    S: DocumentStore + 'static,
{
    let Query(req) = req?;
    let query = SearchQuery::infer(&req.q)?;
    locate(&state, &query, req.strategy).await
}

/// Find stops near a position given in the path.
async fn nearby_coordinates<G, S>(
    State(state): State<AppState<G, S>>,
    Path(coordinates): Path<String>,
    req: Result<Query<StrategyParam>, QueryRejection>,
) -> Result<Json<NearbyStopsResponse>, AppError>
where
    G: Geocoder + 'static,
    S: DocumentStore + 'static,
{
    let Query(req) = req?;
    let query = SearchQuery::coordinates(&coordinates)?;
    locate(&state, &query, req.strategy).await
}

async fn locate<G, S>(
    state: &AppState<G, S>,
    query: &SearchQuery,
    strategy: Strategy,
) -> Result<Json<NearbyStopsResponse>, AppError>
where
    G: Geocoder + 'static,
    S: DocumentStore + 'static,
{
    let stops = state.locator.locate(query, strategy).await?;
    Ok(Json(NearbyStopsResponse { stops }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Upstream { message: String },
    Timeout { message: String },
}

impl From<InvalidQuery> for AppError {
    fn from(e: InvalidQuery) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<LocateError> for AppError {
    fn from(e: LocateError) -> Self {
        let message = e.to_string();
        match e {
            LocateError::Geocode(GeocodeError::Timeout)
            | LocateError::Search(SearchError::Timeout) => AppError::Timeout { message },
            _ => AppError::Upstream { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(%message, "bad request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Upstream { message } => {
                error!(%message, "upstream failure");
                (StatusCode::BAD_GATEWAY, message)
            }
            AppError::Timeout { message } => {
                error!(%message, "upstream timeout");
                (StatusCode::GATEWAY_TIMEOUT, message)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
