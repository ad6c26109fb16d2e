// src/db/dashboard_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::trip::TripStatus};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count_trips<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM trips")
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    pub async fn count_users<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    pub async fn count_trips_by_status<'e, E>(
        &self,
        executor: E,
        status: TripStatus,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM trips WHERE status = $1")
            .bind(status)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    pub async fn count_trips_by_agent<'e, E>(
        &self,
        executor: E,
        agent_id: Uuid,
        status: Option<TripStatus>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM trips
            WHERE agent_id = $1 AND ($2::trip_status IS NULL OR status = $2)
            "#,
        )
        .bind(agent_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn count_trips_by_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM trips WHERE client_id = $1")
            .bind(client_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    pub async fn count_upcoming_trips_by_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM trips WHERE client_id = $1 AND start_date >= $2",
        )
        .bind(client_id)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn count_pending_quotes_by_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM quote_requests WHERE client_id = $1 AND status = 'pending'",
        )
        .bind(client_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }
}
