// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
// Os handlers nunca devolvem AppError direto: convertem para ApiError
// com `to_api_error`, que aplica a tradução da mensagem.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Conta bloqueada")]
    AccountBlocked,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Conflito: {0}")]
    Conflict(String),

    #[error("Acesso negado: {0}")]
    Forbidden(String),

    // Transições fora do grafo draft -> active -> confirmed -> completed
    // (cancelamento permitido a partir de qualquer estado).
    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Parâmetro inválido: {0}")]
    InvalidParameter(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Converte o erro de domínio na resposta HTTP, já com a mensagem
    /// traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        match self {
            // Retornamos todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: store.translate(locale, "validation_failed"),
                    details: Some(Value::Object(details)),
                }
            }

            AppError::EmailAlreadyExists => {
                ApiError::simple(StatusCode::CONFLICT, store.translate(locale, "email_exists"))
            }
            AppError::InvalidCredentials => ApiError::simple(
                StatusCode::UNAUTHORIZED,
                store.translate(locale, "invalid_credentials"),
            ),
            AppError::AccountBlocked => ApiError::simple(
                StatusCode::FORBIDDEN,
                store.translate(locale, "account_blocked"),
            ),
            AppError::InvalidToken => ApiError::simple(
                StatusCode::UNAUTHORIZED,
                store.translate(locale, "invalid_token"),
            ),
            AppError::ResourceNotFound(what) => ApiError::simple(
                StatusCode::NOT_FOUND,
                format!("{}: {}", store.translate(locale, "not_found"), what),
            ),
            AppError::Conflict(what) => ApiError::simple(
                StatusCode::CONFLICT,
                format!("{}: {}", store.translate(locale, "conflict"), what),
            ),
            AppError::Forbidden(what) => ApiError::simple(
                StatusCode::FORBIDDEN,
                format!("{}: {}", store.translate(locale, "forbidden"), what),
            ),
            AppError::InvalidStatusTransition { from, to } => ApiError::simple(
                StatusCode::BAD_REQUEST,
                format!(
                    "{}: {} -> {}",
                    store.translate(locale, "invalid_transition"),
                    from,
                    to
                ),
            ),
            AppError::InvalidParameter(what) => ApiError::simple(
                StatusCode::BAD_REQUEST,
                format!("{}: {}", store.translate(locale, "invalid_parameter"), what),
            ),

            // Todos os outros (DatabaseError, InternalServerError, ...) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu;
            // o cliente recebe só a mensagem genérica.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError::simple(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    store.translate(locale, "internal_error"),
                )
            }
        }
    }
}

// A resposta de erro que atravessa o fio: status + mensagem + detalhes
// opcionais (hoje só usados pela validação de payload).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn simple(status: StatusCode, error: String) -> Self {
        Self {
            status,
            error,
            details: None,
        }
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::simple(StatusCode::UNAUTHORIZED, message.to_string())
    }

    pub fn forbidden(message: &str) -> Self {
        Self::simple(StatusCode::FORBIDDEN, message.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}
