//! Loan entity - A loan application and, once disbursed, its servicing state.
//!
//! Money columns are minor units; `interest_rate_bps` is the annual rate in basis points
//! (1000 = 10.00%). `remaining_balance_minor` never goes below zero.

use super::status::LoanStatus;
use crate::core::money;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Loan database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    /// Unique identifier for the loan
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Borrowing member
    pub member_id: i64,
    /// Principal in minor units
    pub amount_minor: i64,
    /// Annual interest rate in basis points
    pub interest_rate_bps: i32,
    /// Term in months
    pub term: i32,
    /// What the money is for
    pub purpose: String,
    /// Lifecycle state
    pub status: LoanStatus,
    /// Fixed monthly instalment in minor units
    pub monthly_payment_minor: i64,
    /// Instalment times term, in minor units
    pub total_payable_minor: i64,
    /// Sum of completed repayments, in minor units
    pub amount_paid_minor: i64,
    /// Outstanding principal, in minor units
    pub remaining_balance_minor: i64,
    /// When the member applied
    pub application_date: DateTimeUtc,
    /// When an admin approved or rejected the application
    pub approval_date: Option<DateTimeUtc>,
    /// When the money was paid out
    pub disbursement_date: Option<DateTimeUtc>,
    /// Due date of the next instalment
    pub next_payment_date: Option<DateTimeUtc>,
}

impl Model {
    /// Principal as a decimal
    #[must_use]
    pub fn amount(&self) -> Decimal {
        money::from_minor(self.amount_minor)
    }

    /// Annual interest rate as a percentage, e.g. `10.00`
    #[must_use]
    pub fn interest_rate(&self) -> Decimal {
        Decimal::new(i64::from(self.interest_rate_bps), 2)
    }

    /// Monthly instalment as a decimal
    #[must_use]
    pub fn monthly_payment(&self) -> Decimal {
        money::from_minor(self.monthly_payment_minor)
    }

    /// Total payable as a decimal
    #[must_use]
    pub fn total_payable(&self) -> Decimal {
        money::from_minor(self.total_payable_minor)
    }

    /// Amount repaid so far as a decimal
    #[must_use]
    pub fn amount_paid(&self) -> Decimal {
        money::from_minor(self.amount_paid_minor)
    }

    /// Outstanding balance as a decimal
    #[must_use]
    pub fn remaining_balance(&self) -> Decimal {
        money::from_minor(self.remaining_balance_minor)
    }

    /// A loan is active debt only while disbursed with something left to repay.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Disbursed && self.remaining_balance_minor > 0
    }
}

/// Defines relationships between Loan and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each loan belongs to one member
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
    /// One loan has many payments
    #[sea_orm(has_many = "super::loan_payment::Entity")]
    Payments,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl Related<super::loan_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
