// src/services/dashboard_service.rs

use chrono::Utc;
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::{
        auth::{User, UserRole},
        dashboard::DashboardStats,
        trip::TripStatus,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn stats_for<'e, E>(&self, executor: E, user: &User) -> Result<DashboardStats, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Transação só para ler um snapshot consistente dos contadores
        let mut tx = executor.begin().await?;

        let stats = match user.role {
            UserRole::Admin => DashboardStats::Admin {
                total_trips: self.repo.count_trips(&mut *tx).await?,
                total_users: self.repo.count_users(&mut *tx).await?,
                confirmed_trips: self
                    .repo
                    .count_trips_by_status(&mut *tx, TripStatus::Confirmed)
                    .await?,
            },
            UserRole::Agent => DashboardStats::Agent {
                my_trips: self.repo.count_trips_by_agent(&mut *tx, user.id, None).await?,
                confirmed_trips: self
                    .repo
                    .count_trips_by_agent(&mut *tx, user.id, Some(TripStatus::Confirmed))
                    .await?,
                completed_trips: self
                    .repo
                    .count_trips_by_agent(&mut *tx, user.id, Some(TripStatus::Completed))
                    .await?,
            },
            UserRole::Client => DashboardStats::Client {
                my_trips: self.repo.count_trips_by_client(&mut *tx, user.id).await?,
                upcoming_trips: self
                    .repo
                    .count_upcoming_trips_by_client(&mut *tx, user.id, Utc::now())
                    .await?,
                pending_quotes: self
                    .repo
                    .count_pending_quotes_by_client(&mut *tx, user.id)
                    .await?,
            },
        };

        tx.commit().await?;
        Ok(stats)
    }
}
