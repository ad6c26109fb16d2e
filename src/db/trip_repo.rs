// src/db/trip_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::trip::{CreateTripPayload, Trip, TripStatus, UpdateTripPayload},
};

#[derive(Clone)]
pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        agent_id: Uuid,
        payload: &CreateTripPayload,
    ) -> Result<Trip, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (title, destination, description, start_date, end_date,
                               client_id, agent_id, trip_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.destination)
        .bind(&payload.description)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.client_id)
        .bind(agent_id)
        .bind(payload.trip_type)
        .fetch_one(executor)
        .await?;

        Ok(trip)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Trip>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(trip)
    }

    // Listagem com escopo por papel: admin vê tudo, agente e cliente só as
    // próprias viagens.
    pub async fn list_scoped<'e, E>(
        &self,
        executor: E,
        agent_id: Option<Uuid>,
        client_id: Option<Uuid>,
    ) -> Result<Vec<Trip>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let trips = sqlx::query_as::<_, Trip>(
            r#"
            SELECT * FROM trips
            WHERE ($1::uuid IS NULL OR agent_id = $1)
              AND ($2::uuid IS NULL OR client_id = $2)
            ORDER BY start_date DESC
            "#,
        )
        .bind(agent_id)
        .bind(client_id)
        .fetch_all(executor)
        .await?;

        Ok(trips)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateTripPayload,
    ) -> Result<Trip, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET title       = COALESCE($2, title),
                destination = COALESCE($3, destination),
                description = COALESCE($4, description),
                start_date  = COALESCE($5, start_date),
                end_date    = COALESCE($6, end_date),
                client_id   = COALESCE($7, client_id),
                trip_type   = COALESCE($8, trip_type),
                updated_at  = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.title.as_deref())
        .bind(payload.destination.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.client_id)
        .bind(payload.trip_type)
        .fetch_one(executor)
        .await?;

        Ok(trip)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: TripStatus,
    ) -> Result<Trip, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let trip = sqlx::query_as::<_, Trip>(
            "UPDATE trips SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(trip)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
