//! Payment entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Payment, PaymentMethod, PaymentStatus};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::parse_column;

/// Database row mapping for the payments table.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub status: String,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentEntity {
    /// Convert to domain model.
    pub fn into_domain(self) -> Payment {
        let status = parse_column(&self.status, "status", self.id, PaymentStatus::Failed);
        let payment_method = parse_column(
            &self.payment_method,
            "payment_method",
            self.id,
            PaymentMethod::CreditCard,
        );

        Payment {
            id: self.id,
            booking_id: self.booking_id,
            amount: self.amount,
            status,
            payment_method,
            transaction_id: self.transaction_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<PaymentEntity> for Payment {
    fn from(entity: PaymentEntity) -> Self {
        entity.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(status: &str, method: &str) -> PaymentEntity {
        PaymentEntity {
            id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            amount: Decimal::new(11500, 2),
            status: status.to_string(),
            payment_method: method.to_string(),
            transaction_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_into_domain() {
        let payment = entity("REFUNDED", "BANK_TRANSFER").into_domain();
        assert_eq!(payment.status, PaymentStatus::Refunded);
        assert_eq!(payment.payment_method, PaymentMethod::BankTransfer);
    }

    #[test]
    fn test_unknown_values_fall_back() {
        let payment = entity("DISPUTED", "CHEQUE").into_domain();
        assert_eq!(payment.status, PaymentStatus::Failed);
        assert_eq!(payment.payment_method, PaymentMethod::CreditCard);
    }
}
