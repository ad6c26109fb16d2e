// src/handlers/quotes.rs

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
        authz::{QuoteCreate, QuoteRead, QuoteUpdate, RequireOp},
        i18n::Locale,
    },
    models::quote::{CreateQuotePayload, QuoteRequest, UpdateQuotePayload},
};

// POST /api/quote-requests
#[utoipa::path(
    post,
    path = "/api/quote-requests",
    tag = "Quotes",
    request_body = CreateQuotePayload,
    responses(
        (status = 201, description = "Pedido de orçamento registrado", body = QuoteRequest),
        (status = 403, description = "Só clientes pedem orçamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quote_request(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<QuoteCreate>,
    Json(payload): Json<CreateQuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quote = app_state
        .quote_service
        .create(&app_state.db_pool, &user.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(quote)))
}

// GET /api/quote-requests
#[utoipa::path(
    get,
    path = "/api/quote-requests",
    tag = "Quotes",
    responses(
        (status = 200, description = "Pedidos visíveis: os próprios (cliente) ou todos (escritório)", body = Vec<QuoteRequest>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_quote_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<QuoteRead>,
) -> Result<impl IntoResponse, ApiError> {
    let quotes = app_state
        .quote_service
        .list_for(&app_state.db_pool, &user.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(quotes)))
}

// PUT /api/quote-requests/{request_id}
#[utoipa::path(
    put,
    path = "/api/quote-requests/{request_id}",
    tag = "Quotes",
    request_body = UpdateQuotePayload,
    responses(
        (status = 200, description = "Pedido atualizado", body = QuoteRequest),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(("request_id" = Uuid, Path, description = "ID do pedido")),
    security(("api_jwt" = []))
)]
pub async fn update_quote_request(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<QuoteUpdate>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<UpdateQuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quote = app_state
        .quote_service
        .update(&app_state.db_pool, &user.0, request_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(quote)))
}
