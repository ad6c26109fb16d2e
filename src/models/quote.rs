// src/models/quote.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::trip::TripType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quote_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Quoted,
    Closed,
}

// Pedido de orçamento aberto por um cliente
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub id: Uuid,
    pub client_id: Uuid,

    #[schema(example = "Maldive")]
    pub destination: String,
    #[schema(example = "10-24 agosto")]
    pub travel_dates: String,
    pub number_of_travelers: i32,
    pub trip_type: TripType,
    pub budget_range: String,
    pub special_requirements: String,
    pub contact_preference: String,

    pub status: QuoteStatus,
    pub notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_travelers() -> i32 {
    1
}

fn default_trip_type() -> TripType {
    TripType::Custom
}

fn default_contact() -> String {
    "email".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotePayload {
    #[validate(length(min = 1, message = "required"))]
    pub destination: String,

    #[serde(default)]
    pub travel_dates: String,

    #[serde(default = "default_travelers")]
    #[validate(range(min = 1, message = "Pelo menos um viajante."))]
    pub number_of_travelers: i32,

    #[serde(default = "default_trip_type")]
    pub trip_type: TripType,

    #[serde(default)]
    pub budget_range: String,

    #[serde(default)]
    pub special_requirements: String,

    #[serde(default = "default_contact")]
    pub contact_preference: String,

    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuotePayload {
    pub status: Option<QuoteStatus>,
    pub notes: Option<String>,
}
