//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{Local, NaiveDate, NaiveTime};

use crate::domain::{Coordinate, DayOfWeek, FacilityId};
use crate::engine::{SearchEngine, SearchError, SearchFilters};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/initial-hospitals", get(initial_hospitals))
        .route("/api/search", get(search))
        .route("/api/hospitals/:id/doctors", get(hospital_doctors))
        .route("/api/autocomplete", get(autocomplete))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Validate that both origin coordinates are present and in range.
fn require_origin(lat: Option<f64>, lon: Option<f64>) -> Result<Coordinate, AppError> {
    let (lat, lon) = match (lat, lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(AppError::BadRequest {
                message: "latitude and longitude are required".to_string(),
            });
        }
    };

    let origin = Coordinate::new(lat, lon);
    if !origin.is_valid() {
        return Err(AppError::BadRequest {
            message: format!("invalid coordinates ({lat}, {lon})"),
        });
    }
    Ok(origin)
}

/// Parse an optional `YYYY-MM-DD` date parameter.
fn parse_date(date: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    date.map(|d| {
        NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
            message: format!("invalid date: {d}"),
        })
    })
    .transpose()
}

/// Parse an optional `HH:MM` time parameter.
fn parse_time(time: Option<&str>) -> Result<Option<NaiveTime>, AppError> {
    time.map(|t| {
        NaiveTime::parse_from_str(t, "%H:%M").map_err(|_| AppError::BadRequest {
            message: format!("invalid time: {t}"),
        })
    })
    .transpose()
}

/// Nearby hospitals with no filters, ranked by road distance.
async fn initial_hospitals(
    State(state): State<AppState>,
    Query(req): Query<InitialHospitalsQuery>,
) -> Result<Json<Vec<HospitalResult>>, AppError> {
    let origin = require_origin(req.lat, req.lon)?;

    let snapshot = state.store.current().await;
    let engine = SearchEngine::new(
        &snapshot.network,
        &snapshot.availability,
        &snapshot.facilities,
        &state.config,
    );

    let filters = SearchFilters {
        radius_km: req.radius_km,
        ..SearchFilters::none()
    };
    let results = engine.search(origin, &filters, Local::now().naive_local())?;

    Ok(Json(results.iter().map(HospitalResult::from_result).collect()))
}

/// Filtered hospital search: text, availability, and radius filters.
async fn search(
    State(state): State<AppState>,
    Query(req): Query<SearchQuery>,
) -> Result<Json<Vec<HospitalResult>>, AppError> {
    let origin = require_origin(req.lat, req.lon)?;
    let date = parse_date(req.date.as_deref())?;
    let time = parse_time(req.time.as_deref())?;

    if time.is_some() && date.is_none() {
        return Err(AppError::BadRequest {
            message: "time requires a date".to_string(),
        });
    }
    if let Some(minutes) = req.within_minutes {
        if minutes < 0 {
            return Err(AppError::BadRequest {
                message: "withinMinutes must be non-negative".to_string(),
            });
        }
    }

    let snapshot = state.store.current().await;
    let engine = SearchEngine::new(
        &snapshot.network,
        &snapshot.availability,
        &snapshot.facilities,
        &state.config,
    );

    let filters = SearchFilters {
        query: req.q.filter(|q| !q.trim().is_empty()),
        category: req.specialty.filter(|s| !s.trim().is_empty()),
        date,
        time,
        within_minutes: req.within_minutes,
        radius_km: req.radius_km,
    };
    let results = engine.search(origin, &filters, Local::now().naive_local())?;

    Ok(Json(results.iter().map(HospitalResult::from_result).collect()))
}

/// Doctor listing for one hospital: grouped weekly schedule, or a flat
/// single-day view when a date is given.
async fn hospital_doctors(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(req): Query<DoctorsQuery>,
) -> Result<Json<DoctorListingResponse>, AppError> {
    let date = parse_date(req.date.as_deref())?;

    let snapshot = state.store.current().await;
    let facility = FacilityId(id);
    if snapshot.facility(facility).is_none() {
        return Err(AppError::NotFound {
            message: format!("no hospital with id {id}"),
        });
    }

    let schedule = snapshot.availability.slots_for(
        facility,
        date.map(DayOfWeek::from_date),
        req.q.as_deref().filter(|q| !q.trim().is_empty()),
    );

    Ok(Json(DoctorListingResponse::from_schedule(schedule)))
}

/// Autocomplete suggestions. Best-effort: malformed input degrades to
/// an empty list rather than an error.
async fn autocomplete(
    State(state): State<AppState>,
    Query(req): Query<AutocompleteQuery>,
) -> Json<Vec<SuggestionDto>> {
    let Some(q) = req.q else {
        return Json(Vec::new());
    };
    // Only facility ordering depends on the origin; with none supplied
    // the suggestions still come back, just with arbitrary distances.
    let origin = match (req.lat, req.lon) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
        _ => Coordinate::new(0.0, 0.0),
    };

    let snapshot = state.store.current().await;
    let engine = SearchEngine::new(
        &snapshot.network,
        &snapshot.availability,
        &snapshot.facilities,
        &state.config,
    );

    let suggestions = engine
        .suggest(&q, origin)
        .into_iter()
        .map(SuggestionDto::from_suggestion)
        .collect();

    Json(suggestions)
}

/// Application error type for HTTP responses.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidInput(msg) => AppError::BadRequest { message: msg },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        tracing::warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
