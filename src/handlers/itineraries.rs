// src/handlers/itineraries.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        authz::{ItineraryWrite, RequireOp, TripRead},
        i18n::Locale,
    },
    models::itinerary::{CreateItineraryPayload, Itinerary},
};

// GET /api/trips/{trip_id}/itineraries
#[utoipa::path(
    get,
    path = "/api/trips/{trip_id}/itineraries",
    tag = "Itineraries",
    responses(
        (status = 200, description = "Roteiro da viagem, em ordem de dia", body = Vec<Itinerary>)
    ),
    params(("trip_id" = Uuid, Path, description = "ID da viagem")),
    security(("api_jwt" = []))
)]
pub async fn list_itineraries(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<TripRead>,
    Path(trip_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let itineraries = app_state
        .trip_service
        .list_itineraries(&app_state.db_pool, &user.0, trip_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(itineraries)))
}

// POST /api/itineraries
#[utoipa::path(
    post,
    path = "/api/itineraries",
    tag = "Itineraries",
    request_body = CreateItineraryPayload,
    responses(
        (status = 201, description = "Dia de roteiro criado", body = Itinerary),
        (status = 404, description = "Viagem não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_itinerary(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<ItineraryWrite>,
    Json(payload): Json<CreateItineraryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let itinerary = app_state
        .trip_service
        .create_itinerary(&app_state.db_pool, &user.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(itinerary)))
}

// PUT /api/itineraries/{itinerary_id}
#[utoipa::path(
    put,
    path = "/api/itineraries/{itinerary_id}",
    tag = "Itineraries",
    request_body = CreateItineraryPayload,
    responses(
        (status = 200, description = "Dia de roteiro atualizado", body = Itinerary),
        (status = 404, description = "Roteiro não encontrado")
    ),
    params(("itinerary_id" = Uuid, Path, description = "ID do dia de roteiro")),
    security(("api_jwt" = []))
)]
pub async fn update_itinerary(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireOp<ItineraryWrite>,
    Path(itinerary_id): Path<Uuid>,
    Json(payload): Json<CreateItineraryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let itinerary = app_state
        .trip_service
        .update_itinerary(&app_state.db_pool, itinerary_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(itinerary)))
}

// DELETE /api/itineraries/{itinerary_id}
#[utoipa::path(
    delete,
    path = "/api/itineraries/{itinerary_id}",
    tag = "Itineraries",
    responses(
        (status = 200, description = "Dia de roteiro removido"),
        (status = 404, description = "Roteiro não encontrado")
    ),
    params(("itinerary_id" = Uuid, Path, description = "ID do dia de roteiro")),
    security(("api_jwt" = []))
)]
pub async fn delete_itinerary(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireOp<ItineraryWrite>,
    Path(itinerary_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .trip_service
        .delete_itinerary(&app_state.db_pool, itinerary_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Itinerary deleted successfully" })),
    ))
}
