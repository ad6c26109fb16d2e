// src/middleware/authz.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::ApiError, middleware::auth::AuthenticatedUser, models::auth::UserRole};

// =============================================================================
//  TABELA DE POLÍTICA (papel x operação)
// =============================================================================
// Toda a decisão de "quem pode chamar o quê" mora aqui, num único lugar.
// O escopo fino (agente só mexe nas próprias viagens, cliente só lê as
// suas) continua nos services, porque depende dos dados da linha.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    TripRead,
    TripWrite,
    ItineraryWrite,
    FinanceRead,
    FinanceWrite,
    ReportRead,
    ReportExport,
    QuoteCreate,
    QuoteRead,
    QuoteUpdate,
    UserManage,
    UserDelete,
    ClientRead,
    DashboardRead,
    NotificationRead,
}

pub fn role_allows(role: UserRole, operation: Operation) -> bool {
    use Operation::*;
    use UserRole::*;

    match operation {
        // Leituras abertas a todos os papéis (o service restringe as linhas)
        TripRead | QuoteRead | QuoteUpdate | DashboardRead => true,

        // Escrita operacional: escritório (admin + agente)
        TripWrite | ItineraryWrite | FinanceRead | FinanceWrite | ReportRead | UserManage
        | ClientRead | NotificationRead => matches!(role, Admin | Agent),

        // Exportação do relatório e remoção de usuários são exclusivas do admin
        ReportExport | UserDelete => matches!(role, Admin),

        // Só o cliente abre pedido de orçamento
        QuoteCreate => matches!(role, Client),
    }
}

// =============================================================================
//  O GUARDIÃO
// =============================================================================

/// O trait que amarra um tipo-marcador à operação da tabela.
pub trait OperationDef: Send + Sync + 'static {
    fn operation() -> Operation;
}

/// Extrator-guardião: basta declará-lo na assinatura do handler.
pub struct RequireOp<T: OperationDef>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireOp<T>
where
    T: OperationDef,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai o usuário já autenticado pelo auth_guard
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| ApiError::unauthorized("Missing or invalid authentication token."))?;

        // B. Consulta a tabela central
        let operation = T::operation();
        if !role_allows(user.0.role, operation) {
            return Err(ApiError::forbidden(&format!(
                "Role '{:?}' is not allowed to perform {:?}.",
                user.0.role, operation
            )));
        }

        Ok(RequireOp(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS OPERAÇÕES (TIPOS-MARCADORES)
// ---

macro_rules! operation_marker {
    ($name:ident) => {
        pub struct $name;
        impl OperationDef for $name {
            fn operation() -> Operation {
                Operation::$name
            }
        }
    };
}

operation_marker!(TripRead);
operation_marker!(TripWrite);
operation_marker!(ItineraryWrite);
operation_marker!(FinanceRead);
operation_marker!(FinanceWrite);
operation_marker!(ReportRead);
operation_marker!(ReportExport);
operation_marker!(QuoteCreate);
operation_marker!(QuoteRead);
operation_marker!(QuoteUpdate);
operation_marker!(UserManage);
operation_marker!(UserDelete);
operation_marker!(ClientRead);
operation_marker!(DashboardRead);
operation_marker!(NotificationRead);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_is_admin_only() {
        assert!(role_allows(UserRole::Admin, Operation::ReportExport));
        assert!(!role_allows(UserRole::Agent, Operation::ReportExport));
        assert!(!role_allows(UserRole::Client, Operation::ReportExport));
    }

    #[test]
    fn test_reports_are_back_office_only() {
        assert!(role_allows(UserRole::Admin, Operation::ReportRead));
        assert!(role_allows(UserRole::Agent, Operation::ReportRead));
        assert!(!role_allows(UserRole::Client, Operation::ReportRead));
    }

    #[test]
    fn test_finance_write_denied_to_clients() {
        assert!(!role_allows(UserRole::Client, Operation::FinanceWrite));
        assert!(role_allows(UserRole::Agent, Operation::FinanceWrite));
    }

    #[test]
    fn test_quote_creation_is_client_only() {
        assert!(role_allows(UserRole::Client, Operation::QuoteCreate));
        assert!(!role_allows(UserRole::Admin, Operation::QuoteCreate));
        assert!(!role_allows(UserRole::Agent, Operation::QuoteCreate));
    }

    #[test]
    fn test_everyone_reads_trips() {
        for role in [UserRole::Admin, UserRole::Agent, UserRole::Client] {
            assert!(role_allows(role, Operation::TripRead));
        }
    }
}
