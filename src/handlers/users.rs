// src/handlers/users.rs

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
        authz::{ClientRead, RequireOp, UserDelete, UserManage},
        i18n::Locale,
    },
    models::auth::{UpdateUserPayload, User, UserRole},
    models::report::ClientFinancialSummary,
    models::trip::ClientDetails,
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Todos os usuários (admin) ou só clientes (agente)", body = Vec<User>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<UserManage>,
) -> Result<impl IntoResponse, ApiError> {
    // Agente enxerga só a carteira de clientes
    let users = match user.0.role {
        UserRole::Admin => app_state.user_repo.list_all().await,
        _ => app_state.user_repo.list_by_role(UserRole::Client).await,
    }
    .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(users)))
}

// GET /api/users/{user_id}
pub async fn get_user(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<UserManage>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let found = app_state
        .user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?
        .ok_or_else(|| {
            AppError::ResourceNotFound(format!("User {user_id}"))
                .to_api_error(&locale, &app_state.i18n_store)
        })?;

    if user.0.role == UserRole::Agent && found.role != UserRole::Client {
        return Err(AppError::Forbidden("agents can only access clients".to_string())
            .to_api_error(&locale, &app_state.i18n_store));
    }

    Ok((StatusCode::OK, Json(found)))
}

// PUT /api/users/{user_id}
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<UserManage>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let target = app_state
        .user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?
        .ok_or_else(|| {
            AppError::ResourceNotFound(format!("User {user_id}"))
                .to_api_error(&locale, &app_state.i18n_store)
        })?;

    if user.0.role == UserRole::Agent && target.role != UserRole::Client {
        return Err(AppError::Forbidden("agents can only update clients".to_string())
            .to_api_error(&locale, &app_state.i18n_store));
    }

    let updated = app_state
        .user_repo
        .update_user(
            user_id,
            payload.first_name.as_deref(),
            payload.last_name.as_deref(),
            payload.email.as_deref(),
            payload.blocked,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

// Regra comum de block/unblock: admin mexe em qualquer não-admin,
// agente só em clientes.
async fn set_blocked(
    app_state: &AppState,
    locale: &Locale,
    actor: &User,
    user_id: Uuid,
    blocked: bool,
) -> Result<(), ApiError> {
    let target = app_state
        .user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?
        .ok_or_else(|| {
            AppError::ResourceNotFound(format!("User {user_id}"))
                .to_api_error(locale, &app_state.i18n_store)
        })?;

    let allowed = match actor.role {
        UserRole::Admin => target.role != UserRole::Admin,
        UserRole::Agent => target.role == UserRole::Client,
        UserRole::Client => false,
    };
    if !allowed {
        return Err(
            AppError::Forbidden("you cannot block/unblock this user".to_string())
                .to_api_error(locale, &app_state.i18n_store),
        );
    }

    app_state
        .user_repo
        .set_blocked(user_id, blocked)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    Ok(())
}

// POST /api/users/{user_id}/block
pub async fn block_user(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<UserManage>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    set_blocked(&app_state, &locale, &user.0, user_id, true).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "User blocked successfully" })),
    ))
}

// POST /api/users/{user_id}/unblock
pub async fn unblock_user(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<UserManage>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    set_blocked(&app_state, &locale, &user.0, user_id, false).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "User unblocked successfully" })),
    ))
}

// DELETE /api/users/{user_id}
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<UserDelete>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let target = app_state
        .user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?
        .ok_or_else(|| {
            AppError::ResourceNotFound(format!("User {user_id}"))
                .to_api_error(&locale, &app_state.i18n_store)
        })?;

    // Nem outro admin, nem a si mesmo
    if target.role == UserRole::Admin {
        return Err(AppError::Forbidden("admin users cannot be deleted".to_string())
            .to_api_error(&locale, &app_state.i18n_store));
    }
    if target.id == user.0.id {
        return Err(AppError::Forbidden("you cannot delete yourself".to_string())
            .to_api_error(&locale, &app_state.i18n_store));
    }

    // Usuário amarrado a viagens precisa ter as viagens tratadas antes
    let linked = app_state
        .user_repo
        .count_linked_trips(user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    if linked > 0 {
        return Err(AppError::Conflict(format!(
            "user {user_id} still has {linked} linked trips"
        ))
        .to_api_error(&locale, &app_state.i18n_store));
    }

    app_state
        .user_repo
        .delete_user(user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "User deleted successfully" })),
    ))
}

// =============================================================================
//  CLIENTES
// =============================================================================

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    responses(
        (status = 200, description = "Todos os clientes cadastrados", body = Vec<User>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireOp<ClientRead>,
) -> Result<impl IntoResponse, ApiError> {
    let clients = app_state
        .user_repo
        .list_by_role(UserRole::Client)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(clients)))
}

// GET /api/clients/{client_id}/details
#[utoipa::path(
    get,
    path = "/api/clients/{client_id}/details",
    tag = "Clients",
    responses(
        (status = 200, description = "Dossiê do cliente: cadastro + viagens com fichas", body = ClientDetails),
        (status = 404, description = "Cliente não encontrado")
    ),
    params(("client_id" = Uuid, Path, description = "ID do cliente")),
    security(("api_jwt" = []))
)]
pub async fn client_details(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireOp<ClientRead>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let details = app_state
        .trip_service
        .client_details(&app_state.db_pool, client_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(details)))
}

// GET /api/clients/{client_id}/financial-summary
#[utoipa::path(
    get,
    path = "/api/clients/{client_id}/financial-summary",
    tag = "Clients",
    responses(
        (status = 200, description = "Agregados financeiros do cliente (confirmado x pendente)", body = ClientFinancialSummary)
    ),
    params(("client_id" = Uuid, Path, description = "ID do cliente")),
    security(("api_jwt" = []))
)]
pub async fn client_financial_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireOp<ClientRead>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .report_service
        .client_financial_summary(&app_state.db_pool, client_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}
