// src/models/trip.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::{PartyInfo, User};
use crate::models::finance::TripFinancialRecord;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "trip_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    Cruise,
    Resort,
    Tour,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "trip_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Draft,
    Active,
    Confirmed,
    Completed,
    Cancelled,
}

impl TripStatus {
    /// Grafo de transições do ciclo de vida de uma viagem:
    /// draft -> active -> {confirmed, cancelled}; confirmed -> {completed,
    /// cancelled}; cancelar vale de qualquer estado; cancelled é terminal.
    /// Repetir o status atual é um no-op aceito.
    pub fn can_transition(self, to: TripStatus) -> bool {
        use TripStatus::*;

        if self == to {
            return true;
        }
        if to == Cancelled {
            return self != Cancelled;
        }

        matches!(
            (self, to),
            (Draft, Active) | (Active, Confirmed) | (Confirmed, Completed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TripStatus::Draft => "draft",
            TripStatus::Active => "active",
            TripStatus::Confirmed => "confirmed",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,

    #[schema(example = "Crociera nel Mediterraneo")]
    pub title: String,

    #[schema(example = "Barcellona")]
    pub destination: String,

    pub description: String,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    pub client_id: Uuid,
    pub agent_id: Uuid,

    pub status: TripStatus,
    pub trip_type: TripType,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Viagem enriquecida com os dados de agente e cliente
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripWithParties {
    pub trip: Trip,
    pub agent: Option<PartyInfo>,
    pub client: Option<PartyInfo>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripPayload {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,

    #[validate(length(min = 1, message = "required"))]
    pub destination: String,

    #[serde(default)]
    pub description: String,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    pub client_id: Uuid,
    pub trip_type: TripType,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripPayload {
    #[validate(length(min = 1, message = "required"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    pub destination: Option<String>,

    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub client_id: Option<Uuid>,
    pub trip_type: Option<TripType>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripStatusPayload {
    pub status: TripStatus,
}

// Viagem acompanhada da ficha financeira (quando existe)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripWithFinancial {
    pub trip: Trip,
    pub financial: Option<TripFinancialRecord>,
}

// Dossiê do cliente: cadastro + viagens com as respectivas fichas
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetails {
    pub client: User,
    pub trips: Vec<TripWithFinancial>,
}

// Resumo devolvido pelo delete em cascata
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTripSummary {
    pub message: String,
    pub deleted_counts: DeletedCounts,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCounts {
    pub trip: u64,
    pub financial_records: u64,
    pub payments: u64,
    pub itineraries: u64,
}

#[cfg(test)]
mod tests {
    use super::TripStatus::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(Draft.can_transition(Active));
        assert!(Active.can_transition(Confirmed));
        assert!(Confirmed.can_transition(Completed));
    }

    #[test]
    fn test_cancel_from_any_state() {
        for from in [Draft, Active, Confirmed, Completed] {
            assert!(from.can_transition(Cancelled), "{from:?} deveria poder cancelar");
        }
    }

    #[test]
    fn test_cancelled_is_terminal() {
        for to in [Draft, Active, Confirmed, Completed, Cancelled] {
            if to == Cancelled {
                // no-op aceito
                assert!(Cancelled.can_transition(to));
            } else {
                assert!(!Cancelled.can_transition(to));
            }
        }
    }

    #[test]
    fn test_no_op_is_accepted() {
        for status in [Draft, Active, Confirmed, Completed, Cancelled] {
            assert!(status.can_transition(status));
        }
    }

    #[test]
    fn test_skipping_states_is_rejected() {
        assert!(!Draft.can_transition(Confirmed));
        assert!(!Draft.can_transition(Completed));
        assert!(!Active.can_transition(Completed));
        assert!(!Completed.can_transition(Draft));
        assert!(!Confirmed.can_transition(Active));
    }
}
