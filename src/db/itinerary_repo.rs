// src/db/itinerary_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::itinerary::{CreateItineraryPayload, Itinerary},
};

#[derive(Clone)]
pub struct ItineraryRepository {
    pool: PgPool,
}

impl ItineraryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &CreateItineraryPayload,
    ) -> Result<Itinerary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let itinerary = sqlx::query_as::<_, Itinerary>(
            r#"
            INSERT INTO itineraries (trip_id, day_number, date, title, description, itinerary_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(payload.trip_id)
        .bind(payload.day_number)
        .bind(payload.date)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.itinerary_type)
        .fetch_one(executor)
        .await?;

        Ok(itinerary)
    }

    pub async fn list_by_trip<'e, E>(
        &self,
        executor: E,
        trip_id: Uuid,
    ) -> Result<Vec<Itinerary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let itineraries = sqlx::query_as::<_, Itinerary>(
            "SELECT * FROM itineraries WHERE trip_id = $1 ORDER BY day_number ASC",
        )
        .bind(trip_id)
        .fetch_all(executor)
        .await?;

        Ok(itineraries)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &CreateItineraryPayload,
    ) -> Result<Option<Itinerary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let itinerary = sqlx::query_as::<_, Itinerary>(
            r#"
            UPDATE itineraries
            SET day_number = $2, date = $3, title = $4, description = $5, itinerary_type = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.day_number)
        .bind(payload.date)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.itinerary_type)
        .fetch_optional(executor)
        .await?;

        Ok(itinerary)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM itineraries WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_by_trip<'e, E>(&self, executor: E, trip_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM itineraries WHERE trip_id = $1")
            .bind(trip_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
