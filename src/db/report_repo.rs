// src/db/report_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::report::{ClientFinanceRow, DetailedTripRow, PaymentDeadlineRow},
};

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Linhas do relatório financeiro: fichas confirmadas (confirmed/paid)
    // com data de confirmação dentro do período, opcionalmente restritas ao
    // agente dono da viagem. A agregação em si acontece no service.
    pub async fn confirmed_rows<'e, E>(
        &self,
        executor: E,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        agent_id: Option<Uuid>,
    ) -> Result<Vec<DetailedTripRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, DetailedTripRow>(
            r#"
            SELECT
                f.id,
                f.trip_id,
                t.title AS trip_title,
                t.destination AS trip_destination,
                cu.first_name || ' ' || cu.last_name AS client_name,
                cu.email AS client_email,
                au.first_name || ' ' || au.last_name AS agent_name,
                au.email AS agent_email,
                f.practice_number,
                f.booking_number,
                f.gross_amount,
                f.net_amount,
                f.discount,
                f.confirmation_deposit,
                f.supplier_commission_rate,
                f.gross_commission,
                f.supplier_commission,
                f.agent_commission,
                f.balance_due,
                f.practice_confirm_date,
                f.client_departure_date,
                f.status
            FROM trip_financial_records f
            JOIN trips t ON t.id = f.trip_id
            JOIN users cu ON cu.id = t.client_id
            JOIN users au ON au.id = t.agent_id
            WHERE f.status IN ('confirmed', 'paid')
              AND f.practice_confirm_date >= $1
              AND f.practice_confirm_date < $2
              AND ($3::uuid IS NULL OR t.agent_id = $3)
            ORDER BY f.practice_confirm_date ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(agent_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    // Pagamentos que vencem na janela pedida, com viagem e cliente já
    // resolvidos para montar a notificação.
    pub async fn upcoming_payments<'e, E>(
        &self,
        executor: E,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        agent_id: Option<Uuid>,
    ) -> Result<Vec<PaymentDeadlineRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, PaymentDeadlineRow>(
            r#"
            SELECT
                p.id,
                p.amount,
                p.payment_date,
                p.payment_type,
                t.id AS trip_id,
                t.title AS trip_title,
                cu.first_name || ' ' || cu.last_name AS client_name
            FROM payments p
            JOIN trip_financial_records f ON f.id = p.trip_admin_id
            JOIN trips t ON t.id = f.trip_id
            JOIN users cu ON cu.id = t.client_id
            WHERE p.payment_date >= $1
              AND p.payment_date <= $2
              AND ($3::uuid IS NULL OR t.agent_id = $3)
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(agent_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    pub async fn client_finance_rows<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<Vec<ClientFinanceRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ClientFinanceRow>(
            r#"
            SELECT f.status, f.gross_amount, f.net_amount, f.discount,
                   f.supplier_commission, f.agent_commission
            FROM trip_financial_records f
            JOIN trips t ON t.id = f.trip_id
            WHERE t.client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
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
}
