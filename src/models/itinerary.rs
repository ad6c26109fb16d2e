// src/models/itinerary.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "itinerary_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItineraryType {
    PortDay,
    SeaDay,
    ResortDay,
    TourDay,
    FreeDay,
}

// Um dia do roteiro da viagem
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub id: Uuid,
    pub trip_id: Uuid,

    #[schema(example = 1)]
    pub day_number: i32,
    pub date: DateTime<Utc>,

    #[schema(example = "Scalo a Palma di Maiorca")]
    pub title: String,
    pub description: String,

    pub itinerary_type: ItineraryType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItineraryPayload {
    pub trip_id: Uuid,

    #[validate(range(min = 1, message = "O dia deve ser no mínimo 1."))]
    pub day_number: i32,

    pub date: DateTime<Utc>,

    #[validate(length(min = 1, message = "required"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub itinerary_type: ItineraryType,
}
