//! Contribution entity - A member's deposit into their savings.
//!
//! Amounts are stored in minor units (cents). Only `completed` contributions count toward
//! savings, scoring and eligibility.
use super::status::{PaymentMethod, PaymentStatus};
use crate::core::money;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contribution database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contributions")]
pub struct Model {
    /// Unique identifier for the contribution
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Member who made the contribution
    pub member_id: i64,
    /// Amount in minor units
    pub amount_minor: i64,
    /// How the money was sent
    pub method: PaymentMethod,
    /// Generated reference, e.g. `TXN1718000000000-3`
    pub transaction_ref: String,
    /// Settlement state
    pub status: PaymentStatus,
    /// Optional free-form note
    pub description: Option<String>,
    /// When the contribution was made
    pub date: DateTimeUtc,
    /// When the contribution was confirmed, if it has been
    pub completed_at: Option<DateTimeUtc>,
}

impl Model {
    /// Contribution amount as a decimal
    #[must_use]
    pub fn amount(&self) -> Decimal {
        money::from_minor(self.amount_minor)
    }

    /// Whether this contribution counts toward savings
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}

/// Defines relationships between Contribution and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each contribution belongs to one member
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
