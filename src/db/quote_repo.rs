// src/db/quote_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::quote::{CreateQuotePayload, QuoteRequest, QuoteStatus},
};

#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        payload: &CreateQuotePayload,
    ) -> Result<QuoteRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, QuoteRequest>(
            r#"
            INSERT INTO quote_requests (client_id, destination, travel_dates,
                                        number_of_travelers, trip_type, budget_range,
                                        special_requirements, contact_preference, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(&payload.destination)
        .bind(&payload.travel_dates)
        .bind(payload.number_of_travelers)
        .bind(payload.trip_type)
        .bind(&payload.budget_range)
        .bind(&payload.special_requirements)
        .bind(&payload.contact_preference)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await?;

        Ok(quote)
    }

    pub async fn list_scoped<'e, E>(
        &self,
        executor: E,
        client_id: Option<Uuid>,
    ) -> Result<Vec<QuoteRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotes = sqlx::query_as::<_, QuoteRequest>(
            r#"
            SELECT * FROM quote_requests
            WHERE ($1::uuid IS NULL OR client_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(executor)
        .await?;

        Ok(quotes)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<QuoteRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, QuoteRequest>("SELECT * FROM quote_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(quote)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: Option<QuoteStatus>,
        notes: Option<&str>,
    ) -> Result<QuoteRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, QuoteRequest>(
            r#"
            UPDATE quote_requests
            SET status     = COALESCE($2, status),
                notes      = COALESCE($3, notes),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(quote)
    }
}
