//! Loan payment entity - One repayment against a loan, split into principal and interest.
use super::status::{PaymentMethod, PaymentStatus};
use crate::core::money;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Loan payment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loan_payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Loan being repaid
    pub loan_id: i64,
    /// Total paid in minor units
    pub amount_minor: i64,
    /// Portion applied to principal, in minor units
    pub principal_minor: i64,
    /// Portion applied to interest, in minor units
    pub interest_minor: i64,
    /// How the money was sent
    pub method: PaymentMethod,
    /// Generated reference
    pub transaction_ref: String,
    /// Settlement state; only completed payments count toward repayment scoring
    pub status: PaymentStatus,
    /// When the payment was made
    pub date: DateTimeUtc,
}

impl Model {
    /// Payment amount as a decimal
    #[must_use]
    pub fn amount(&self) -> Decimal {
        money::from_minor(self.amount_minor)
    }
}

/// Defines relationships between `LoanPayment` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one loan
    #[sea_orm(
        belongs_to = "super::loan::Entity",
        from = "Column::LoanId",
        to = "super::loan::Column::Id"
    )]
    Loan,
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
