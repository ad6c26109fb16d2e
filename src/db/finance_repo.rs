// src/db/finance_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::finance::{
        AdminStatus, CreatePaymentPayload, CreateTripAdminPayload, DerivedFinancials, Payment,
        TripFinancialRecord,
    },
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  FICHAS FINANCEIRAS (uma por viagem)
    // =========================================================================

    pub async fn create_record<'e, E>(
        &self,
        executor: E,
        trip_id: Uuid,
        payload: &CreateTripAdminPayload,
        derived: &DerivedFinancials,
    ) -> Result<TripFinancialRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, TripFinancialRecord>(
            r#"
            INSERT INTO trip_financial_records (
                trip_id, practice_number, booking_number,
                gross_amount, net_amount, discount, confirmation_deposit,
                supplier_commission_rate,
                gross_commission, supplier_commission, agent_commission, balance_due,
                practice_confirm_date, client_departure_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(trip_id)
        .bind(&payload.practice_number)
        .bind(&payload.booking_number)
        .bind(payload.gross_amount)
        .bind(payload.net_amount)
        .bind(payload.discount)
        .bind(payload.confirmation_deposit)
        .bind(payload.supplier_commission_rate)
        .bind(derived.gross_commission)
        .bind(derived.supplier_commission)
        .bind(derived.agent_commission)
        .bind(derived.balance_due)
        .bind(payload.practice_confirm_date)
        .bind(payload.client_departure_date)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    pub async fn find_by_trip<'e, E>(
        &self,
        executor: E,
        trip_id: Uuid,
    ) -> Result<Option<TripFinancialRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, TripFinancialRecord>(
            "SELECT * FROM trip_financial_records WHERE trip_id = $1",
        )
        .bind(trip_id)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<TripFinancialRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, TripFinancialRecord>(
            "SELECT * FROM trip_financial_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    pub async fn list_by_trip_ids<'e, E>(
        &self,
        executor: E,
        trip_ids: &[Uuid],
    ) -> Result<Vec<TripFinancialRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, TripFinancialRecord>(
            "SELECT * FROM trip_financial_records WHERE trip_id = ANY($1)",
        )
        .bind(trip_ids)
        .fetch_all(executor)
        .await?;

        Ok(records)
    }

    // Grava a ficha inteira já mesclada (termos comerciais + derivados).
    pub async fn update_record<'e, E>(
        &self,
        executor: E,
        record: &TripFinancialRecord,
    ) -> Result<TripFinancialRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, TripFinancialRecord>(
            r#"
            UPDATE trip_financial_records
            SET practice_number          = $2,
                booking_number           = $3,
                gross_amount             = $4,
                net_amount               = $5,
                discount                 = $6,
                confirmation_deposit     = $7,
                supplier_commission_rate = $8,
                gross_commission         = $9,
                supplier_commission      = $10,
                agent_commission         = $11,
                balance_due              = $12,
                practice_confirm_date    = $13,
                client_departure_date    = $14,
                status                   = $15,
                updated_at               = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(&record.practice_number)
        .bind(&record.booking_number)
        .bind(record.gross_amount)
        .bind(record.net_amount)
        .bind(record.discount)
        .bind(record.confirmation_deposit)
        .bind(record.supplier_commission_rate)
        .bind(record.gross_commission)
        .bind(record.supplier_commission)
        .bind(record.agent_commission)
        .bind(record.balance_due)
        .bind(record.practice_confirm_date)
        .bind(record.client_departure_date)
        .bind(record.status)
        .fetch_one(executor)
        .await?;

        Ok(updated)
    }

    pub async fn update_balance<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        balance_due: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE trip_financial_records SET balance_due = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(balance_due)
        .execute(executor)
        .await?;

        Ok(())
    }

    // Sincroniza o status da ficha quando a viagem é confirmada
    pub async fn set_status_by_trip<'e, E>(
        &self,
        executor: E,
        trip_id: Uuid,
        status: AdminStatus,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE trip_financial_records SET status = $2, updated_at = now() WHERE trip_id = $1",
        )
        .bind(trip_id)
        .bind(status)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_by_trip<'e, E>(&self, executor: E, trip_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM trip_financial_records WHERE trip_id = $1")
            .bind(trip_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    pub async fn insert_payment<'e, E>(
        &self,
        executor: E,
        trip_admin_id: Uuid,
        payload: &CreatePaymentPayload,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (trip_admin_id, amount, payment_date, payment_type, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(trip_admin_id)
        .bind(payload.amount)
        .bind(payload.payment_date)
        .bind(payload.payment_type)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn list_payments<'e, E>(
        &self,
        executor: E,
        trip_admin_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE trip_admin_id = $1 ORDER BY payment_date ASC",
        )
        .bind(trip_admin_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }

    pub async fn find_payment<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(payment)
    }

    pub async fn delete_payment<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_payments_by_trip<'e, E>(
        &self,
        executor: E,
        trip_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            DELETE FROM payments
            WHERE trip_admin_id IN (
                SELECT id FROM trip_financial_records WHERE trip_id = $1
            )
            "#,
        )
        .bind(trip_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Soma dos pagamentos ativos da ficha. Lida dentro da mesma transação
    /// do insert/delete para o recálculo do saldo nunca ler soma velha.
    pub async fn payments_total<'e, E>(
        &self,
        executor: E,
        trip_admin_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE trip_admin_id = $1",
        )
        .bind(trip_admin_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }
}
