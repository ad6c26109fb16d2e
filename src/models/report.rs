// src/models/report.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::finance::{AdminStatus, PaymentType};

// --- Parâmetros de consulta ---

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Ano fiscal consultado (obrigatório)
    pub year: i32,
    /// Mês específico (1-12); sem ele, o relatório traz o ano inteiro
    pub month: Option<u32>,
    /// Filtro por agente (ignorado para agentes: sempre forçado ao próprio)
    pub agent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    pub year: i32,
    pub month: Option<u32>,
    pub agent_id: Option<Uuid>,
    /// "csv" (padrão) ou "pdf"
    pub format: Option<String>,
}

// --- Linhas vindas do banco ---

// Linha detalhada do relatório: ficha financeira + dados da viagem e das
// partes, numa única projeção (join no repositório).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailedTripRow {
    pub id: Uuid,
    pub trip_id: Uuid,

    pub trip_title: String,
    pub trip_destination: String,
    pub client_name: String,
    pub client_email: String,
    pub agent_name: String,
    pub agent_email: String,

    pub practice_number: String,
    pub booking_number: String,

    pub gross_amount: Decimal,
    pub net_amount: Decimal,
    pub discount: Decimal,
    pub confirmation_deposit: Decimal,
    pub supplier_commission_rate: Decimal,
    pub gross_commission: Decimal,
    pub supplier_commission: Decimal,
    pub agent_commission: Decimal,
    pub balance_due: Decimal,

    pub practice_confirm_date: DateTime<Utc>,
    pub client_departure_date: DateTime<Utc>,

    pub status: AdminStatus,
}

// --- Agregados ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub total_trips: usize,
    pub gross_revenue: Decimal,
    pub net_revenue: Decimal,
    pub total_discounts: Decimal,
    pub supplier_commissions: Decimal,
    pub agent_commissions: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: u32,
    pub month_name: String,
    pub total_trips: usize,
    pub gross_revenue: Decimal,
    pub total_discounts: Decimal,
    pub supplier_commissions: Decimal,
    pub agent_commissions: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    pub year: i32,
    pub month: Option<u32>,
    pub agent_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub period: ReportPeriod,
    pub totals: ReportTotals,
    // 12 entradas fixas (meses zerados incluídos) quando não há filtro de
    // mês; vazio quando há. Comprimento estável para os gráficos do front.
    pub monthly_breakdown: Vec<MonthlySummary>,
    pub detailed_trips: Vec<DetailedTripRow>,
    pub can_export_excel: bool,
}

// --- Notificações de vencimento ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeadlinePriority {
    High,
    Medium,
    Low,
}

// Linha crua do join pagamento -> ficha -> viagem -> cliente
#[derive(Debug, Clone, FromRow)]
pub struct PaymentDeadlineRow {
    pub id: Uuid,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_type: PaymentType,
    pub trip_id: Uuid,
    pub trip_title: String,
    pub client_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDeadlineNotification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub days_until_due: i64,
    pub priority: DeadlinePriority,
    pub client_name: String,
    pub trip_title: String,
    pub trip_id: Uuid,
    pub payment_type: PaymentType,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDeadlines {
    pub notifications: Vec<PaymentDeadlineNotification>,
    pub total_count: usize,
    pub high_priority_count: usize,
    pub medium_priority_count: usize,
    pub low_priority_count: usize,
}

// --- Resumo financeiro por cliente ---

#[derive(Debug, Clone, FromRow)]
pub struct ClientFinanceRow {
    pub status: AdminStatus,
    pub gross_amount: Decimal,
    pub net_amount: Decimal,
    pub discount: Decimal,
    pub supplier_commission: Decimal,
    pub agent_commission: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedBookings {
    pub count: usize,
    pub total_gross_amount: Decimal,
    pub total_net_amount: Decimal,
    pub total_discounts: Decimal,
    pub total_supplier_commission: Decimal,
    pub total_agent_commission: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingBookings {
    pub count: usize,
    pub pending_gross_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientFinancialStats {
    pub total_trips: usize,
    pub trips_without_financial_data: usize,
    pub average_trip_value: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientFinancialSummary {
    pub client_id: Uuid,
    pub confirmed_bookings: ConfirmedBookings,
    pub pending_bookings: PendingBookings,
    pub stats: ClientFinancialStats,
}
