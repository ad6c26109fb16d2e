// src/handlers/finance.rs

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
        authz::{FinanceRead, FinanceWrite, RequireOp},
        i18n::Locale,
    },
    models::finance::{
        CreatePaymentPayload, CreateTripAdminPayload, Payment, TripFinancialRecord,
        UpdateTripAdminPayload,
    },
};

// =============================================================================
//  FICHA FINANCEIRA DA VIAGEM
// =============================================================================

// POST /api/trips/{trip_id}/admin
#[utoipa::path(
    post,
    path = "/api/trips/{trip_id}/admin",
    tag = "Finance",
    request_body = CreateTripAdminPayload,
    responses(
        (status = 201, description = "Ficha financeira criada com os campos derivados", body = TripFinancialRecord),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Viagem não encontrada"),
        (status = 409, description = "A viagem já tem ficha financeira")
    ),
    params(("trip_id" = Uuid, Path, description = "ID da viagem")),
    security(("api_jwt" = []))
)]
pub async fn create_trip_admin(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<FinanceWrite>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<CreateTripAdminPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let record = app_state
        .finance_service
        .create_record(&app_state.db_pool, &user.0, trip_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(record)))
}

// GET /api/trips/{trip_id}/admin
#[utoipa::path(
    get,
    path = "/api/trips/{trip_id}/admin",
    tag = "Finance",
    responses(
        (status = 200, description = "A ficha da viagem (null quando a viagem ainda não tem uma)", body = TripFinancialRecord)
    ),
    params(("trip_id" = Uuid, Path, description = "ID da viagem")),
    security(("api_jwt" = []))
)]
pub async fn get_trip_admin(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireOp<FinanceRead>,
    Path(trip_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = app_state
        .finance_service
        .get_record_for_trip(&app_state.db_pool, trip_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(record)))
}

// PUT /api/trip-admin/{admin_id}
#[utoipa::path(
    put,
    path = "/api/trip-admin/{admin_id}",
    tag = "Finance",
    request_body = UpdateTripAdminPayload,
    responses(
        (status = 200, description = "Ficha atualizada, derivados recalculados", body = TripFinancialRecord),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Ficha não encontrada")
    ),
    params(("admin_id" = Uuid, Path, description = "ID da ficha financeira")),
    security(("api_jwt" = []))
)]
pub async fn update_trip_admin(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireOp<FinanceWrite>,
    Path(admin_id): Path<Uuid>,
    Json(payload): Json<UpdateTripAdminPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let record = app_state
        .finance_service
        .update_record(&app_state.db_pool, admin_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(record)))
}

// =============================================================================
//  PAGAMENTOS
// =============================================================================

// POST /api/trip-admin/{admin_id}/payments
#[utoipa::path(
    post,
    path = "/api/trip-admin/{admin_id}/payments",
    tag = "Finance",
    request_body = CreatePaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado, saldo recalculado", body = Payment),
        (status = 400, description = "Valor não positivo"),
        (status = 404, description = "Ficha não encontrada")
    ),
    params(("admin_id" = Uuid, Path, description = "ID da ficha financeira")),
    security(("api_jwt" = []))
)]
pub async fn create_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireOp<FinanceWrite>,
    Path(admin_id): Path<Uuid>,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let payment = app_state
        .finance_service
        .add_payment(&app_state.db_pool, admin_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(payment)))
}

// GET /api/trip-admin/{admin_id}/payments
#[utoipa::path(
    get,
    path = "/api/trip-admin/{admin_id}/payments",
    tag = "Finance",
    responses(
        (status = 200, description = "Pagamentos da ficha, do mais antigo ao mais novo", body = Vec<Payment>),
        (status = 404, description = "Ficha não encontrada")
    ),
    params(("admin_id" = Uuid, Path, description = "ID da ficha financeira")),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireOp<FinanceRead>,
    Path(admin_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = app_state
        .finance_service
        .list_payments(&app_state.db_pool, admin_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(payments)))
}

// DELETE /api/payments/{payment_id}
#[utoipa::path(
    delete,
    path = "/api/payments/{payment_id}",
    tag = "Finance",
    responses(
        (status = 200, description = "Pagamento removido, saldo recalculado"),
        (status = 404, description = "Pagamento não encontrado")
    ),
    params(("payment_id" = Uuid, Path, description = "ID do pagamento")),
    security(("api_jwt" = []))
)]
pub async fn delete_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireOp<FinanceWrite>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_service
        .delete_payment(&app_state.db_pool, payment_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Payment deleted successfully" })),
    ))
}
