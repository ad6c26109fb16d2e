// src/handlers/trips.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        authz::{RequireOp, TripRead, TripWrite},
        i18n::Locale,
    },
    models::trip::{
        CreateTripPayload, DeletedTripSummary, Trip, TripWithParties, UpdateTripPayload,
        UpdateTripStatusPayload,
    },
};

// GET /api/trips
#[utoipa::path(
    get,
    path = "/api/trips",
    tag = "Trips",
    responses(
        (status = 200, description = "Viagens visíveis para quem pergunta", body = Vec<Trip>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_trips(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<TripRead>,
) -> Result<impl IntoResponse, ApiError> {
    let trips = app_state
        .trip_service
        .list_for(&app_state.db_pool, &user.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(trips)))
}

// GET /api/trips/with-details
#[utoipa::path(
    get,
    path = "/api/trips/with-details",
    tag = "Trips",
    responses(
        (status = 200, description = "Viagens com agente e cliente resolvidos", body = Vec<TripWithParties>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_trips_with_details(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<TripRead>,
) -> Result<impl IntoResponse, ApiError> {
    let trips = app_state
        .trip_service
        .list_with_parties(&app_state.db_pool, &user.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(trips)))
}

// POST /api/trips
#[utoipa::path(
    post,
    path = "/api/trips",
    tag = "Trips",
    request_body = CreateTripPayload,
    responses(
        (status = 201, description = "Viagem criada", body = Trip),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_trip(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<TripWrite>,
    Json(payload): Json<CreateTripPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let trip = app_state
        .trip_service
        .create(&app_state.db_pool, &user.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(trip)))
}

// GET /api/trips/{trip_id}
#[utoipa::path(
    get,
    path = "/api/trips/{trip_id}",
    tag = "Trips",
    responses(
        (status = 200, description = "A viagem pedida", body = Trip),
        (status = 403, description = "Sem acesso a esta viagem"),
        (status = 404, description = "Viagem não encontrada")
    ),
    params(("trip_id" = Uuid, Path, description = "ID da viagem")),
    security(("api_jwt" = []))
)]
pub async fn get_trip(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<TripRead>,
    Path(trip_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let trip = app_state
        .trip_service
        .get_checked(&app_state.db_pool, &user.0, trip_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(trip)))
}

// GET /api/trips/{trip_id}/full
#[utoipa::path(
    get,
    path = "/api/trips/{trip_id}/full",
    tag = "Trips",
    responses(
        (status = 200, description = "Viagem com agente e cliente", body = TripWithParties),
        (status = 404, description = "Viagem não encontrada")
    ),
    params(("trip_id" = Uuid, Path, description = "ID da viagem")),
    security(("api_jwt" = []))
)]
pub async fn get_trip_full(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<TripRead>,
    Path(trip_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let trip = app_state
        .trip_service
        .get_with_parties(&app_state.db_pool, &user.0, trip_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(trip)))
}

// PUT /api/trips/{trip_id}
#[utoipa::path(
    put,
    path = "/api/trips/{trip_id}",
    tag = "Trips",
    request_body = UpdateTripPayload,
    responses(
        (status = 200, description = "Viagem atualizada", body = Trip),
        (status = 403, description = "Agente não é o dono da viagem"),
        (status = 404, description = "Viagem não encontrada")
    ),
    params(("trip_id" = Uuid, Path, description = "ID da viagem")),
    security(("api_jwt" = []))
)]
pub async fn update_trip(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<TripWrite>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<UpdateTripPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let trip = app_state
        .trip_service
        .update(&app_state.db_pool, &user.0, trip_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(trip)))
}

// DELETE /api/trips/{trip_id}
#[utoipa::path(
    delete,
    path = "/api/trips/{trip_id}",
    tag = "Trips",
    responses(
        (status = 200, description = "Viagem e dependências removidas", body = DeletedTripSummary),
        (status = 404, description = "Viagem não encontrada")
    ),
    params(("trip_id" = Uuid, Path, description = "ID da viagem")),
    security(("api_jwt" = []))
)]
pub async fn delete_trip(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<TripWrite>,
    Path(trip_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .trip_service
        .delete(&app_state.db_pool, &user.0, trip_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// PUT /api/trips/{trip_id}/status
#[utoipa::path(
    put,
    path = "/api/trips/{trip_id}/status",
    tag = "Trips",
    request_body = UpdateTripStatusPayload,
    responses(
        (status = 200, description = "Status atualizado (confirmar sincroniza a ficha)", body = Trip),
        (status = 400, description = "Transição inválida"),
        (status = 404, description = "Viagem não encontrada")
    ),
    params(("trip_id" = Uuid, Path, description = "ID da viagem")),
    security(("api_jwt" = []))
)]
pub async fn update_trip_status(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<TripWrite>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<UpdateTripStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let trip = app_state
        .trip_service
        .change_status(&app_state.db_pool, &user.0, trip_id, payload.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(trip)))
}
