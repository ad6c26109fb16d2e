// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        authz::{NotificationRead, ReportExport, ReportRead, RequireOp},
        i18n::Locale,
    },
    models::report::{ExportQuery, FinancialReport, PaymentDeadlines, ReportQuery},
    services::document_service::DocumentService,
};

// GET /api/reports/financial
#[utoipa::path(
    get,
    path = "/api/reports/financial",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Relatório do período: totais, quebra mensal e pratiche detalhadas", body = FinancialReport),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn financial_report(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<ReportRead>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .report_service
        .financial_report(
            &app_state.db_pool,
            &user.0,
            query.year,
            query.month,
            query.agent_id,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /api/reports/financial/export?format=csv|pdf
#[utoipa::path(
    get,
    path = "/api/reports/financial/export",
    tag = "Reports",
    params(ExportQuery),
    responses(
        (status = 200, description = "Arquivo do relatório (CSV ou PDF) para download"),
        (status = 400, description = "Formato desconhecido"),
        (status = 403, description = "Exportação é exclusiva do admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_financial_report(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<ReportExport>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let report = app_state
        .report_service
        .financial_report(
            &app_state.db_pool,
            &user.0,
            query.year,
            query.month,
            query.agent_id,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let format = query.format.as_deref().unwrap_or("csv");
    let (bytes, content_type, extension) = match format {
        "csv" => (
            app_state
                .document_service
                .report_csv(&report)
                .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?,
            "text/csv",
            "csv",
        ),
        "pdf" => (
            app_state
                .document_service
                .report_pdf(&report)
                .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?,
            "application/pdf",
            "pdf",
        ),
        other => {
            return Err(AppError::InvalidParameter(format!(
                "unknown export format '{other}' (expected csv or pdf)"
            ))
            .to_api_error(&locale, &app_state.i18n_store));
        }
    };

    let filename = DocumentService::report_filename(query.year, query.month, extension);

    // Headers para o navegador baixar o arquivo
    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];

    Ok((headers, bytes).into_response())
}

// GET /api/notifications/payment-deadlines
#[utoipa::path(
    get,
    path = "/api/notifications/payment-deadlines",
    tag = "Notifications",
    responses(
        (status = 200, description = "Pagamentos que vencem nos próximos 30 dias, mais urgentes primeiro", body = PaymentDeadlines)
    ),
    security(("api_jwt" = []))
)]
pub async fn payment_deadlines(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireOp<NotificationRead>,
) -> Result<impl IntoResponse, ApiError> {
    let deadlines = app_state
        .report_service
        .payment_deadlines(&app_state.db_pool, &user.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(deadlines)))
}
