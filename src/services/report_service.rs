// src/services/report_service.rs

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReportRepository,
    models::{
        auth::{User, UserRole},
        finance::AdminStatus,
        report::{
            ClientFinanceRow, ClientFinancialStats, ClientFinancialSummary, ConfirmedBookings,
            DeadlinePriority, DetailedTripRow, FinancialReport, MonthlySummary, PaymentDeadlineRow,
            PaymentDeadlineNotification, PaymentDeadlines, PendingBookings, ReportPeriod,
            ReportTotals,
        },
    },
};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

// Janela de antecedência das notificações de vencimento
const DEADLINE_WINDOW_DAYS: i64 = 30;

#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
}

impl ReportService {
    pub fn new(repo: ReportRepository) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  RELATÓRIO FINANCEIRO
    // =========================================================================

    /// Monta o relatório do período. Agente tem o filtro forçado para si
    /// mesmo (a autorização já resolveu o papel; aqui só honramos o escopo).
    pub async fn financial_report<'e, E>(
        &self,
        executor: E,
        user: &User,
        year: i32,
        month: Option<u32>,
        requested_agent: Option<Uuid>,
    ) -> Result<FinancialReport, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let agent_id = effective_agent_filter(user, requested_agent);
        let (from, to) = period_bounds(year, month)?;

        let rows = self.repo.confirmed_rows(executor, from, to, agent_id).await?;

        Ok(assemble_report(user.role, year, month, agent_id, rows))
    }

    // =========================================================================
    //  VENCIMENTOS DE PAGAMENTO (próximos 30 dias)
    // =========================================================================

    pub async fn payment_deadlines<'e, E>(
        &self,
        executor: E,
        user: &User,
    ) -> Result<PaymentDeadlines, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let agent_id = effective_agent_filter(user, None);

        let today = Utc::now();
        let until = today + Duration::days(DEADLINE_WINDOW_DAYS);

        let rows = self
            .repo
            .upcoming_payments(executor, today, until, agent_id)
            .await?;

        Ok(build_deadline_notifications(rows, today))
    }

    // =========================================================================
    //  RESUMO FINANCEIRO DO CLIENTE
    // =========================================================================

    pub async fn client_financial_summary<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<ClientFinancialSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let rows = self.repo.client_finance_rows(&mut *conn, client_id).await?;
        let total_trips = self.repo.count_trips_by_client(&mut *conn, client_id).await?;

        Ok(summarize_client(client_id, &rows, total_trips as usize))
    }
}

// O agente nunca escolhe o filtro: enxerga só a própria carteira
fn effective_agent_filter(user: &User, requested: Option<Uuid>) -> Option<Uuid> {
    match user.role {
        UserRole::Agent => Some(user.id),
        _ => requested,
    }
}

/// Limites [início, fim) do período consultado, em UTC.
fn period_bounds(year: i32, month: Option<u32>) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    if let Some(m) = month {
        if !(1..=12).contains(&m) {
            return Err(AppError::InvalidParameter(format!(
                "month must be between 1 and 12, got {m}"
            )));
        }
    }

    let start = month_start(year, month.unwrap_or(1))?;
    let end = match month {
        None | Some(12) => month_start(year + 1, 1)?,
        Some(m) => month_start(year, m + 1)?,
    };

    Ok((start, end))
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>, AppError> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::InvalidParameter(format!("invalid period {year}-{month}")))
}

fn summarize(rows: &[DetailedTripRow]) -> ReportTotals {
    ReportTotals {
        total_trips: rows.len(),
        gross_revenue: rows.iter().map(|r| r.gross_amount).sum(),
        net_revenue: rows.iter().map(|r| r.net_amount).sum(),
        total_discounts: rows.iter().map(|r| r.discount).sum(),
        supplier_commissions: rows.iter().map(|r| r.supplier_commission).sum(),
        agent_commissions: rows.iter().map(|r| r.agent_commission).sum(),
    }
}

// Sempre 12 entradas, meses sem movimento zerados: o front conta com um
// vetor de tamanho fixo para desenhar o gráfico.
fn monthly_breakdown(rows: &[DetailedTripRow]) -> Vec<MonthlySummary> {
    (1..=12u32)
        .map(|month| {
            let month_rows: Vec<&DetailedTripRow> = rows
                .iter()
                .filter(|r| r.practice_confirm_date.month() == month)
                .collect();

            MonthlySummary {
                month,
                month_name: MONTH_NAMES[(month - 1) as usize].to_string(),
                total_trips: month_rows.len(),
                gross_revenue: month_rows.iter().map(|r| r.gross_amount).sum(),
                total_discounts: month_rows.iter().map(|r| r.discount).sum(),
                supplier_commissions: month_rows.iter().map(|r| r.supplier_commission).sum(),
                agent_commissions: month_rows.iter().map(|r| r.agent_commission).sum(),
            }
        })
        .collect()
}

fn assemble_report(
    role: UserRole,
    year: i32,
    month: Option<u32>,
    agent_id: Option<Uuid>,
    rows: Vec<DetailedTripRow>,
) -> FinancialReport {
    let totals = summarize(&rows);
    let breakdown = match month {
        None => monthly_breakdown(&rows),
        Some(_) => Vec::new(),
    };

    FinancialReport {
        period: ReportPeriod {
            year,
            month,
            agent_id,
        },
        totals,
        monthly_breakdown: breakdown,
        detailed_trips: rows,
        // Exportar é privilégio do admin; o front só precisa ler a flag
        can_export_excel: role == UserRole::Admin,
    }
}

fn classify_priority(days_until_due: i64) -> DeadlinePriority {
    if days_until_due <= 7 {
        DeadlinePriority::High
    } else if days_until_due <= 14 {
        DeadlinePriority::Medium
    } else {
        DeadlinePriority::Low
    }
}

fn build_deadline_notifications(
    rows: Vec<PaymentDeadlineRow>,
    today: DateTime<Utc>,
) -> PaymentDeadlines {
    let mut notifications: Vec<PaymentDeadlineNotification> = rows
        .into_iter()
        .map(|row| {
            let days_until_due = (row.payment_date.date_naive() - today.date_naive()).num_days();
            let priority = classify_priority(days_until_due);

            PaymentDeadlineNotification {
                id: row.id,
                kind: "payment_deadline".to_string(),
                title: format!("Pagamento {} in scadenza", row.payment_type.as_str()),
                message: format!("Cliente {} - {}", row.client_name, row.trip_title),
                amount: row.amount,
                payment_date: row.payment_date,
                days_until_due,
                priority,
                client_name: row.client_name,
                trip_title: row.trip_title,
                trip_id: row.trip_id,
                payment_type: row.payment_type,
            }
        })
        .collect();

    // Mais urgente primeiro
    notifications.sort_by_key(|n| (n.priority, n.days_until_due));

    let count_of = |p: DeadlinePriority| notifications.iter().filter(|n| n.priority == p).count();
    let high_priority_count = count_of(DeadlinePriority::High);
    let medium_priority_count = count_of(DeadlinePriority::Medium);
    let low_priority_count = count_of(DeadlinePriority::Low);

    PaymentDeadlines {
        total_count: notifications.len(),
        high_priority_count,
        medium_priority_count,
        low_priority_count,
        notifications,
    }
}

fn summarize_client(
    client_id: Uuid,
    rows: &[ClientFinanceRow],
    total_trips: usize,
) -> ClientFinancialSummary {
    let confirmed: Vec<&ClientFinanceRow> = rows
        .iter()
        .filter(|r| r.status.counts_as_confirmed())
        .collect();
    let pending: Vec<&ClientFinanceRow> = rows
        .iter()
        .filter(|r| r.status == AdminStatus::Draft)
        .collect();

    let total_gross_amount: Decimal = confirmed.iter().map(|r| r.gross_amount).sum();
    let count = confirmed.len();

    let average_trip_value = if count > 0 {
        (total_gross_amount / Decimal::from(count as u64)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    ClientFinancialSummary {
        client_id,
        confirmed_bookings: ConfirmedBookings {
            count,
            total_gross_amount,
            total_net_amount: confirmed.iter().map(|r| r.net_amount).sum(),
            total_discounts: confirmed.iter().map(|r| r.discount).sum(),
            total_supplier_commission: confirmed.iter().map(|r| r.supplier_commission).sum(),
            total_agent_commission: confirmed.iter().map(|r| r.agent_commission).sum(),
        },
        pending_bookings: PendingBookings {
            count: pending.len(),
            pending_gross_amount: pending.iter().map(|r| r.gross_amount).sum(),
        },
        stats: ClientFinancialStats {
            total_trips,
            trips_without_financial_data: total_trips.saturating_sub(rows.len()),
            average_trip_value,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_row(month: u32, gross: Decimal, discount: Decimal) -> DetailedTripRow {
        let gross_commission = gross - discount - dec!(0);
        let supplier_commission = (gross * dec!(0.04)).round_dp(2);
        DetailedTripRow {
            id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            trip_title: "Crociera".to_string(),
            trip_destination: "Barcellona".to_string(),
            client_name: "Maria Rossi".to_string(),
            client_email: "maria@example.com".to_string(),
            agent_name: "Luca Bianchi".to_string(),
            agent_email: "luca@example.com".to_string(),
            practice_number: "PRA-1".to_string(),
            booking_number: "BK-1".to_string(),
            gross_amount: gross,
            net_amount: dec!(0),
            discount,
            confirmation_deposit: dec!(0),
            supplier_commission_rate: dec!(4),
            gross_commission,
            supplier_commission,
            agent_commission: gross_commission - supplier_commission,
            balance_due: gross - discount,
            practice_confirm_date: Utc.with_ymd_and_hms(2025, month, 15, 12, 0, 0).unwrap(),
            client_departure_date: Utc.with_ymd_and_hms(2025, month, 20, 8, 0, 0).unwrap(),
            status: AdminStatus::Confirmed,
        }
    }

    fn make_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            password_hash: String::new(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
            blocked: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_breakdown_always_has_twelve_months() {
        let rows = vec![make_row(3, dec!(1000), dec!(0))];
        let breakdown = monthly_breakdown(&rows);

        assert_eq!(breakdown.len(), 12);
        assert_eq!(breakdown[2].total_trips, 1);
        // Meses sem movimento aparecem zerados, nunca omitidos
        assert_eq!(breakdown[0].total_trips, 0);
        assert_eq!(breakdown[0].gross_revenue, dec!(0));
    }

    #[test]
    fn test_breakdown_counts_sum_to_totals() {
        let rows = vec![
            make_row(1, dec!(1000), dec!(0)),
            make_row(1, dec!(500), dec!(50)),
            make_row(6, dec!(2000), dec!(0)),
            make_row(12, dec!(750), dec!(0)),
        ];

        let totals = summarize(&rows);
        let breakdown = monthly_breakdown(&rows);

        let count_sum: usize = breakdown.iter().map(|m| m.total_trips).sum();
        assert_eq!(count_sum, totals.total_trips);

        let gross_sum: Decimal = breakdown.iter().map(|m| m.gross_revenue).sum();
        assert_eq!(gross_sum, totals.gross_revenue);
    }

    #[test]
    fn test_totals_sum_every_field() {
        let rows = vec![
            make_row(2, dec!(1500), dec!(100)),
            make_row(7, dec!(2500), dec!(0)),
        ];
        let totals = summarize(&rows);

        assert_eq!(totals.total_trips, 2);
        assert_eq!(totals.gross_revenue, dec!(4000));
        assert_eq!(totals.total_discounts, dec!(100));
        assert_eq!(
            totals.agent_commissions + totals.supplier_commissions,
            rows.iter().map(|r| r.gross_commission).sum::<Decimal>()
        );
    }

    #[test]
    fn test_month_filter_suppresses_breakdown() {
        let rows = vec![make_row(5, dec!(1000), dec!(0))];
        let report = assemble_report(UserRole::Admin, 2025, Some(5), None, rows);

        assert!(report.monthly_breakdown.is_empty());
        assert_eq!(report.detailed_trips.len(), 1);
    }

    #[test]
    fn test_export_flag_is_admin_only() {
        let report = assemble_report(UserRole::Admin, 2025, None, None, vec![]);
        assert!(report.can_export_excel);

        let report = assemble_report(UserRole::Agent, 2025, None, None, vec![]);
        assert!(!report.can_export_excel);

        let report = assemble_report(UserRole::Client, 2025, None, None, vec![]);
        assert!(!report.can_export_excel);
    }

    #[test]
    fn test_agent_filter_is_forced_to_self() {
        let agent = make_user(UserRole::Agent);
        let someone_else = Uuid::new_v4();

        assert_eq!(
            effective_agent_filter(&agent, Some(someone_else)),
            Some(agent.id)
        );

        let admin = make_user(UserRole::Admin);
        assert_eq!(
            effective_agent_filter(&admin, Some(someone_else)),
            Some(someone_else)
        );
        assert_eq!(effective_agent_filter(&admin, None), None);
    }

    #[test]
    fn test_period_bounds_full_year() {
        let (from, to) = period_bounds(2025, None).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_period_bounds_december_rolls_over() {
        let (from, to) = period_bounds(2025, Some(12)).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_period_bounds_rejects_bad_month() {
        assert!(period_bounds(2025, Some(0)).is_err());
        assert!(period_bounds(2025, Some(13)).is_err());
    }

    #[test]
    fn test_deadline_priorities() {
        assert_eq!(classify_priority(0), DeadlinePriority::High);
        assert_eq!(classify_priority(7), DeadlinePriority::High);
        assert_eq!(classify_priority(8), DeadlinePriority::Medium);
        assert_eq!(classify_priority(14), DeadlinePriority::Medium);
        assert_eq!(classify_priority(15), DeadlinePriority::Low);
        assert_eq!(classify_priority(30), DeadlinePriority::Low);
    }

    #[test]
    fn test_deadlines_sorted_most_urgent_first() {
        use crate::models::finance::PaymentType;

        let today = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let make = |days: i64| PaymentDeadlineRow {
            id: Uuid::new_v4(),
            amount: dec!(100),
            payment_date: today + Duration::days(days),
            payment_type: PaymentType::Installment,
            trip_id: Uuid::new_v4(),
            trip_title: "Tour".to_string(),
            client_name: "Maria Rossi".to_string(),
        };

        let result = build_deadline_notifications(vec![make(20), make(3), make(10)], today);

        assert_eq!(result.total_count, 3);
        assert_eq!(result.high_priority_count, 1);
        assert_eq!(result.medium_priority_count, 1);
        assert_eq!(result.low_priority_count, 1);

        let days: Vec<i64> = result.notifications.iter().map(|n| n.days_until_due).collect();
        assert_eq!(days, vec![3, 10, 20]);
    }

    #[test]
    fn test_client_summary_partitions_by_status() {
        let row = |status, gross| ClientFinanceRow {
            status,
            gross_amount: gross,
            net_amount: dec!(0),
            discount: dec!(0),
            supplier_commission: dec!(0),
            agent_commission: dec!(0),
        };

        let rows = vec![
            row(AdminStatus::Confirmed, dec!(1000)),
            row(AdminStatus::Paid, dec!(2000)),
            row(AdminStatus::Draft, dec!(500)),
        ];

        let summary = summarize_client(Uuid::new_v4(), &rows, 5);

        assert_eq!(summary.confirmed_bookings.count, 2);
        assert_eq!(summary.confirmed_bookings.total_gross_amount, dec!(3000));
        assert_eq!(summary.pending_bookings.count, 1);
        assert_eq!(summary.pending_bookings.pending_gross_amount, dec!(500));
        assert_eq!(summary.stats.trips_without_financial_data, 2);
        assert_eq!(summary.stats.average_trip_value, dec!(1500));
    }

    #[test]
    fn test_client_summary_handles_no_confirmed_trips() {
        let summary = summarize_client(Uuid::new_v4(), &[], 0);
        assert_eq!(summary.stats.average_trip_value, dec!(0));
        assert_eq!(summary.confirmed_bookings.count, 0);
    }
}
