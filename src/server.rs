use crate::config::ServiceConfig;
use crate::data::{
    GenerateRequest, GenerateResponse, RoomCode, SeatView, StudentUpload, TimetableUpload,
};
use crate::error::SeatingError;
use crate::roster::{infer_cohort, parse_rolls};
use crate::store::SeatingStore;
use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<SeatingStore>>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(SeatingStore::new())),
            config: Arc::new(config),
        }
    }
}

#[derive(Serialize)]
struct Created {
    created: usize,
}

#[derive(Serialize)]
struct RowsStored {
    rows: usize,
}

type ApiError = (StatusCode, String);

fn bad_request(err: SeatingError) -> ApiError {
    warn!("Rejected seating request: {}", err);
    (StatusCode::BAD_REQUEST, err.to_string())
}

async fn upload_students_handler(
    State(state): State<AppState>,
    Json(upload): Json<StudentUpload>,
) -> Json<Created> {
    let cohort = upload
        .cohort
        .unwrap_or_else(|| infer_cohort(&upload.file_name));
    let rolls = parse_rolls(&upload.table);
    let created = state.store.write().await.add_students(cohort, rolls);
    Json(Created { created })
}

async fn upload_timetable_handler(
    State(state): State<AppState>,
    Json(upload): Json<TimetableUpload>,
) -> Json<RowsStored> {
    let rows = state.store.write().await.upsert_timetable(upload.rows);
    Json(RowsStored { rows })
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let config = &state.config;
    let capacity = request.capacity.unwrap_or(config.default_capacity);
    let room_limit = config.room_limit_or_default(request.rooms);
    let start = request
        .start
        .unwrap_or_else(|| config.default_start_room_code.clone());

    let outcome = state
        .store
        .write()
        .await
        .generate(request.date, capacity, room_limit, &start)
        .map_err(bad_request)?;
    Ok(Json(outcome.into()))
}

async fn rooms_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Json<Vec<RoomCode>> {
    Json(state.store.read().await.rooms_for_date(date))
}

async fn seating_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Json<Vec<SeatView>> {
    Json(state.store.read().await.seating_for_date(date))
}

async fn grouped_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Json<BTreeMap<RoomCode, Vec<Vec<String>>>> {
    Json(state.store.read().await.seating_grid_for_date(date))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/v1/students", post(upload_students_handler))
        .route("/v1/timetable", post(upload_timetable_handler))
        .route("/v1/seating/generate", post(generate_handler))
        .route("/v1/seating/:date", get(seating_handler))
        .route("/v1/seating/:date/rooms", get(rooms_handler))
        .route("/v1/seating/:date/grouped", get(grouped_handler))
        .with_state(state)
}

pub async fn run_server(config: ServiceConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    let app = router(AppState::new(config));
    axum::serve(listener, app).await?;
    Ok(())
}
