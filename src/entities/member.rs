//! Member entity - A registered SACCO member.
//!
//! Each member is linked to one Discord user. `credit_score` is the only field the
//! scoring engine mutates and is always kept within 300..=850.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Unique identifier for the member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the member
    #[sea_orm(unique)]
    pub user_id: String,
    /// Full legal name
    pub full_name: String,
    /// Last stored credit score (300-850)
    pub credit_score: i32,
    /// When the member joined the SACCO
    pub join_date: DateTimeUtc,
    /// When the record was last modified
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Human-facing membership number derived from the primary key, e.g. `SACCO-000042`.
    #[must_use]
    pub fn membership_number(&self) -> String {
        format!("SACCO-{:06}", self.id)
    }
}

/// Defines relationships between Member and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One member has many contributions
    #[sea_orm(has_many = "super::contribution::Entity")]
    Contributions,
    /// One member has many loans
    #[sea_orm(has_many = "super::loan::Entity")]
    Loans,
    /// One member has many score history entries
    #[sea_orm(has_many = "super::credit_score_history::Entity")]
    CreditScoreHistory,
    /// One member has many insurance policies over time
    #[sea_orm(has_many = "super::insurance_coverage::Entity")]
    InsuranceCoverage,
}

impl Related<super::contribution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl Related<super::credit_score_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditScoreHistory.def()
    }
}

impl Related<super::insurance_coverage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InsuranceCoverage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
