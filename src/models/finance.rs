// src/models/finance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "admin_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdminStatus {
    Draft,
    Confirmed,
    Paid,
    Cancelled,
}

impl AdminStatus {
    /// Uma ficha conta como receita confirmada nos relatórios a partir da
    /// confirmação (confirmed ou paid).
    pub fn counts_as_confirmed(self) -> bool {
        matches!(self, AdminStatus::Confirmed | AdminStatus::Paid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Deposit,
    Installment,
    Balance,
}

impl Default for PaymentType {
    fn default() -> Self {
        PaymentType::Installment
    }
}

impl PaymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentType::Deposit => "deposit",
            PaymentType::Installment => "installment",
            PaymentType::Balance => "balance",
        }
    }
}

// --- Structs ---

// A ficha administrativa/financeira de uma viagem (no máximo uma por viagem).
// Comissões e saldo são derivados: calculados a cada escrita, nunca aceitos
// do cliente.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripFinancialRecord {
    pub id: Uuid,
    pub trip_id: Uuid,

    // Referências externas (scheda pratica / prenotazione)
    #[schema(example = "PRA-2025-0042")]
    pub practice_number: String,
    #[schema(example = "BK-88123")]
    pub booking_number: String,

    // Valores comerciais
    #[schema(example = "1500.00")]
    pub gross_amount: Decimal, // Importo lordo
    #[schema(example = "1200.00")]
    pub net_amount: Decimal, // Importo netto
    pub discount: Decimal,
    pub confirmation_deposit: Decimal,

    // Percentual da comissão do fornecedor (padrão 4%)
    #[schema(example = "4.00")]
    pub supplier_commission_rate: Decimal,

    // Derivados
    pub gross_commission: Decimal,
    pub supplier_commission: Decimal,
    pub agent_commission: Decimal,
    pub balance_due: Decimal,

    pub practice_confirm_date: DateTime<Utc>,
    pub client_departure_date: DateTime<Utc>,

    pub status: AdminStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub trip_admin_id: Uuid,

    #[schema(example = "500.00")]
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_type: PaymentType,
    pub notes: String,

    pub created_at: DateTime<Utc>,
}

// Os quatro campos derivados de uma ficha. Nunca vêm do cliente: são
// recalculados a cada escrita a partir dos termos comerciais.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFinancials {
    pub gross_commission: Decimal,
    pub supplier_commission: Decimal,
    pub agent_commission: Decimal,
    pub balance_due: Decimal,
}

// --- Payloads ---

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("non_negative")
            .with_message("O valor não pode ser negativo.".into()));
    }
    Ok(())
}

fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("positive")
            .with_message("O valor deve ser maior que zero.".into()));
    }
    Ok(())
}

fn default_supplier_rate() -> Decimal {
    Decimal::new(4, 0)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripAdminPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "PRA-2025-0042")]
    pub practice_number: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "BK-88123")]
    pub booking_number: String,

    // Sem teto: net > gross (viagem no prejuízo) é registrado, não rejeitado.
    #[validate(custom(function = validate_non_negative))]
    pub gross_amount: Decimal,

    #[validate(custom(function = validate_non_negative))]
    pub net_amount: Decimal,

    #[serde(default)]
    #[validate(custom(function = validate_non_negative))]
    pub discount: Decimal,

    #[serde(default)]
    #[validate(custom(function = validate_non_negative))]
    pub confirmation_deposit: Decimal,

    #[serde(default = "default_supplier_rate")]
    #[validate(custom(function = validate_non_negative))]
    #[schema(example = "4.00")]
    pub supplier_commission_rate: Decimal,

    pub practice_confirm_date: DateTime<Utc>,
    pub client_departure_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripAdminPayload {
    #[validate(length(min = 1, message = "required"))]
    pub practice_number: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    pub booking_number: Option<String>,

    #[validate(custom(function = validate_non_negative))]
    pub gross_amount: Option<Decimal>,

    #[validate(custom(function = validate_non_negative))]
    pub net_amount: Option<Decimal>,

    #[validate(custom(function = validate_non_negative))]
    pub discount: Option<Decimal>,

    #[validate(custom(function = validate_non_negative))]
    pub confirmation_deposit: Option<Decimal>,

    #[validate(custom(function = validate_non_negative))]
    pub supplier_commission_rate: Option<Decimal>,

    pub practice_confirm_date: Option<DateTime<Utc>>,
    pub client_departure_date: Option<DateTime<Utc>>,

    pub status: Option<AdminStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    // Zero e negativo são rejeitados; pagamento a maior é permitido e
    // aparece como balance_due negativo.
    #[validate(custom(function = validate_positive))]
    #[schema(example = "500.00")]
    pub amount: Decimal,

    pub payment_date: DateTime<Utc>,

    #[serde(default)]
    pub payment_type: PaymentType,

    #[serde(default)]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_payload() -> CreateTripAdminPayload {
        CreateTripAdminPayload {
            practice_number: "PRA-1".to_string(),
            booking_number: "BK-1".to_string(),
            gross_amount: dec!(1500),
            net_amount: dec!(1200),
            discount: dec!(0),
            confirmation_deposit: dec!(0),
            supplier_commission_rate: dec!(4),
            practice_confirm_date: Utc::now(),
            client_departure_date: Utc::now(),
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(base_payload().validate().is_ok());
    }

    #[test]
    fn test_empty_practice_number_is_rejected() {
        let mut payload = base_payload();
        payload.practice_number = String::new();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("practice_number"));
    }

    #[test]
    fn test_negative_gross_is_rejected() {
        let mut payload = base_payload();
        payload.gross_amount = dec!(-1);
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("gross_amount"));
    }

    #[test]
    fn test_net_above_gross_is_accepted() {
        // Política aberta: viagem no prejuízo é um estado real do negócio
        let mut payload = base_payload();
        payload.net_amount = dec!(2000);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_zero_payment_is_rejected() {
        let payload = CreatePaymentPayload {
            amount: dec!(0),
            payment_date: Utc::now(),
            payment_type: PaymentType::default(),
            notes: String::new(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount"));
    }

    #[test]
    fn test_negative_payment_is_rejected() {
        let payload = CreatePaymentPayload {
            amount: dec!(-50),
            payment_date: Utc::now(),
            payment_type: PaymentType::default(),
            notes: String::new(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_confirmed_and_paid_count_as_confirmed() {
        assert!(AdminStatus::Confirmed.counts_as_confirmed());
        assert!(AdminStatus::Paid.counts_as_confirmed());
        assert!(!AdminStatus::Draft.counts_as_confirmed());
        assert!(!AdminStatus::Cancelled.counts_as_confirmed());
    }
}
