// src/services/finance_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FinanceRepository, TripRepository},
    models::{
        auth::{User, UserRole},
        finance::{CreatePaymentPayload, CreateTripAdminPayload, DerivedFinancials, Payment,
                  TripFinancialRecord, UpdateTripAdminPayload},
    },
};

/// Deriva comissões e saldo a partir dos termos comerciais.
///
/// - gross_commission = lordo - sconto - netto (pode ficar negativa:
///   viagem no prejuízo é registrada, não rejeitada)
/// - supplier_commission = lordo x taxa (taxa em percentual, ex. 4.00)
/// - agent_commission é o resíduo, então agent + supplier == gross sempre
/// - balance_due = (lordo - sconto) - acconto - soma dos pagamentos
pub fn derive_financials(
    gross_amount: Decimal,
    net_amount: Decimal,
    discount: Decimal,
    supplier_rate: Decimal,
    confirmation_deposit: Decimal,
    payments_total: Decimal,
) -> DerivedFinancials {
    let gross_commission = gross_amount - discount - net_amount;
    let supplier_commission = (gross_amount * supplier_rate / Decimal::ONE_HUNDRED).round_dp(2);
    let agent_commission = gross_commission - supplier_commission;
    let balance_due = (gross_amount - discount) - confirmation_deposit - payments_total;

    DerivedFinancials {
        gross_commission,
        supplier_commission,
        agent_commission,
        balance_due,
    }
}

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
    trip_repo: TripRepository,
}

impl FinanceService {
    pub fn new(repo: FinanceRepository, trip_repo: TripRepository) -> Self {
        Self { repo, trip_repo }
    }

    // =========================================================================
    //  FICHAS FINANCEIRAS
    // =========================================================================

    /// Cria a ficha financeira de uma viagem. Uma viagem tem no máximo uma
    /// ficha: a segunda tentativa falha com Conflict.
    pub async fn create_record<'e, E>(
        &self,
        executor: E,
        user: &User,
        trip_id: Uuid,
        payload: &CreateTripAdminPayload,
    ) -> Result<TripFinancialRecord, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let trip = self
            .trip_repo
            .find_by_id(&mut *tx, trip_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Trip {trip_id}")))?;

        // Agente só administra as próprias viagens
        if user.role == UserRole::Agent && trip.agent_id != user.id {
            return Err(AppError::Forbidden(
                "you do not manage this trip".to_string(),
            ));
        }

        if self.repo.find_by_trip(&mut *tx, trip_id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "trip {trip_id} already has a financial record"
            )));
        }

        // Ficha nova = zero pagamentos registrados
        let derived = derive_financials(
            payload.gross_amount,
            payload.net_amount,
            payload.discount,
            payload.supplier_commission_rate,
            payload.confirmation_deposit,
            Decimal::ZERO,
        );

        let record = self
            .repo
            .create_record(&mut *tx, trip_id, payload, &derived)
            .await?;

        tx.commit().await?;

        tracing::info!("💶 Ficha financeira criada para a viagem {}", trip_id);
        Ok(record)
    }

    pub async fn get_record_for_trip<'e, E>(
        &self,
        executor: E,
        trip_id: Uuid,
    ) -> Result<Option<TripFinancialRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.find_by_trip(executor, trip_id).await
    }

    /// Atualiza os termos comerciais e recalcula TODOS os derivados com a
    /// soma de pagamentos vigente. Os pagamentos em si não são tocados.
    pub async fn update_record<'e, E>(
        &self,
        executor: E,
        record_id: Uuid,
        payload: &UpdateTripAdminPayload,
    ) -> Result<TripFinancialRecord, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut record = self
            .repo
            .find_by_id(&mut *tx, record_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Financial record {record_id}")))?;

        // Mescla só o que veio no payload
        if let Some(v) = &payload.practice_number {
            record.practice_number = v.clone();
        }
        if let Some(v) = &payload.booking_number {
            record.booking_number = v.clone();
        }
        if let Some(v) = payload.gross_amount {
            record.gross_amount = v;
        }
        if let Some(v) = payload.net_amount {
            record.net_amount = v;
        }
        if let Some(v) = payload.discount {
            record.discount = v;
        }
        if let Some(v) = payload.confirmation_deposit {
            record.confirmation_deposit = v;
        }
        if let Some(v) = payload.supplier_commission_rate {
            record.supplier_commission_rate = v;
        }
        if let Some(v) = payload.practice_confirm_date {
            record.practice_confirm_date = v;
        }
        if let Some(v) = payload.client_departure_date {
            record.client_departure_date = v;
        }
        if let Some(v) = payload.status {
            record.status = v;
        }

        let payments_total = self.repo.payments_total(&mut *tx, record_id).await?;
        let derived = derive_financials(
            record.gross_amount,
            record.net_amount,
            record.discount,
            record.supplier_commission_rate,
            record.confirmation_deposit,
            payments_total,
        );
        record.gross_commission = derived.gross_commission;
        record.supplier_commission = derived.supplier_commission;
        record.agent_commission = derived.agent_commission;
        record.balance_due = derived.balance_due;

        let updated = self.repo.update_record(&mut *tx, &record).await?;
        tx.commit().await?;

        Ok(updated)
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    /// Registra um pagamento e recalcula o saldo devedor na MESMA transação,
    /// para que a soma lida inclua sempre a linha recém-inserida.
    pub async fn add_payment<'e, E>(
        &self,
        executor: E,
        trip_admin_id: Uuid,
        payload: &CreatePaymentPayload,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let record = self
            .repo
            .find_by_id(&mut *tx, trip_admin_id)
            .await?
            .ok_or_else(|| {
                AppError::ResourceNotFound(format!("Financial record {trip_admin_id}"))
            })?;

        let payment = self
            .repo
            .insert_payment(&mut *tx, trip_admin_id, payload)
            .await?;

        let payments_total = self.repo.payments_total(&mut *tx, trip_admin_id).await?;
        let balance_due = (record.gross_amount - record.discount)
            - record.confirmation_deposit
            - payments_total;
        self.repo
            .update_balance(&mut *tx, trip_admin_id, balance_due)
            .await?;

        tx.commit().await?;

        Ok(payment)
    }

    pub async fn list_payments<'e, E>(
        &self,
        executor: E,
        trip_admin_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        self.repo
            .find_by_id(&mut *conn, trip_admin_id)
            .await?
            .ok_or_else(|| {
                AppError::ResourceNotFound(format!("Financial record {trip_admin_id}"))
            })?;

        self.repo.list_payments(&mut *conn, trip_admin_id).await
    }

    /// Remove um pagamento e recalcula o saldo do pai. Repetir a remoção dá
    /// 404: a soma nunca é subtraída duas vezes.
    pub async fn delete_payment<'e, E>(&self, executor: E, payment_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let payment = self
            .repo
            .find_payment(&mut *tx, payment_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Payment {payment_id}")))?;

        self.repo.delete_payment(&mut *tx, payment_id).await?;

        if let Some(record) = self.repo.find_by_id(&mut *tx, payment.trip_admin_id).await? {
            let payments_total = self
                .repo
                .payments_total(&mut *tx, payment.trip_admin_id)
                .await?;
            let balance_due = (record.gross_amount - record.discount)
                - record.confirmation_deposit
                - payments_total;
            self.repo
                .update_balance(&mut *tx, payment.trip_admin_id, balance_due)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // Cenário de referência: lordo 1500, netto 1200, taxa 4%
    #[test]
    fn test_reference_scenario() {
        let d = derive_financials(dec!(1500), dec!(1200), dec!(0), dec!(4), dec!(0), dec!(0));

        assert_eq!(d.gross_commission, dec!(300));
        assert_eq!(d.supplier_commission, dec!(60));
        assert_eq!(d.agent_commission, dec!(240));
        assert_eq!(d.balance_due, dec!(1500));
    }

    #[test]
    fn test_commission_split_invariant() {
        // agent + supplier == gross_commission, sempre (resíduo por construção)
        let cases = [
            (dec!(1500), dec!(1200), dec!(0), dec!(4)),
            (dec!(2350.75), dec!(1999.99), dec!(50), dec!(4)),
            (dec!(980), dec!(1100), dec!(0), dec!(7.5)),
            (dec!(0), dec!(0), dec!(0), dec!(4)),
        ];

        for (gross, net, discount, rate) in cases {
            let d = derive_financials(gross, net, discount, rate, dec!(0), dec!(0));
            assert_eq!(
                d.agent_commission + d.supplier_commission,
                d.gross_commission,
                "quebrou com lordo={gross} netto={net}"
            );
            assert_eq!(d.gross_commission, gross - discount - net);
        }
    }

    #[test]
    fn test_loss_making_trip_has_negative_commission() {
        let d = derive_financials(dec!(1000), dec!(1100), dec!(0), dec!(4), dec!(0), dec!(0));

        assert_eq!(d.gross_commission, dec!(-100));
        // O resíduo absorve a comissão do fornecedor
        assert_eq!(d.agent_commission, dec!(-140));
    }

    #[test]
    fn test_payment_sequence_balances() {
        // add 500 -> 1000; add 1000 -> 0; delete 500 -> 500
        let terms = (dec!(1500), dec!(1200), dec!(0), dec!(4), dec!(0));

        let after_first =
            derive_financials(terms.0, terms.1, terms.2, terms.3, terms.4, dec!(500));
        assert_eq!(after_first.balance_due, dec!(1000));

        let after_second =
            derive_financials(terms.0, terms.1, terms.2, terms.3, terms.4, dec!(1500));
        assert_eq!(after_second.balance_due, dec!(0));

        let after_delete =
            derive_financials(terms.0, terms.1, terms.2, terms.3, terms.4, dec!(1000));
        assert_eq!(after_delete.balance_due, dec!(500));
    }

    #[test]
    fn test_balance_is_order_independent() {
        // A soma é a soma: a ordem dos pagamentos não muda o saldo
        let sum_a = dec!(300) + dec!(700) + dec!(123.45);
        let sum_b = dec!(123.45) + dec!(300) + dec!(700);

        let a = derive_financials(dec!(2000), dec!(1500), dec!(100), dec!(4), dec!(200), sum_a);
        let b = derive_financials(dec!(2000), dec!(1500), dec!(100), dec!(4), dec!(200), sum_b);

        assert_eq!(a.balance_due, b.balance_due);
        assert_eq!(a.balance_due, dec!(2000) - dec!(100) - dec!(200) - sum_a);
    }

    #[test]
    fn test_overpayment_goes_negative() {
        let d = derive_financials(dec!(1000), dec!(800), dec!(0), dec!(4), dec!(0), dec!(1200));
        assert_eq!(d.balance_due, dec!(-200));
    }

    #[test]
    fn test_discount_reduces_balance_and_commission() {
        let d = derive_financials(dec!(1500), dec!(1200), dec!(100), dec!(4), dec!(0), dec!(0));

        assert_eq!(d.gross_commission, dec!(200));
        assert_eq!(d.balance_due, dec!(1400));
        // A comissão do fornecedor incide sobre o lordo cheio
        assert_eq!(d.supplier_commission, dec!(60));
    }

    #[test]
    fn test_custom_supplier_rate() {
        let d = derive_financials(dec!(1500), dec!(1200), dec!(0), dec!(10), dec!(0), dec!(0));

        assert_eq!(d.supplier_commission, dec!(150));
        assert_eq!(d.agent_commission, dec!(150));
    }

    #[test]
    fn test_supplier_commission_rounds_to_cents() {
        // 1234.56 * 4% = 49.3824 -> 49.38; o resíduo mantém a partição exata
        let d = derive_financials(dec!(1234.56), dec!(1000), dec!(0), dec!(4), dec!(0), dec!(0));

        assert_eq!(d.supplier_commission, dec!(49.38));
        assert_eq!(d.agent_commission + d.supplier_commission, d.gross_commission);
    }

    #[test]
    fn test_deposit_reduces_balance_only() {
        let d = derive_financials(dec!(1500), dec!(1200), dec!(0), dec!(4), dec!(300), dec!(0));

        assert_eq!(d.balance_due, dec!(1200));
        assert_eq!(d.gross_commission, dec!(300));
    }
}
