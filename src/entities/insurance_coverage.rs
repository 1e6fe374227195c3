//! Insurance coverage entity - A member's health cover subscription.
use super::status::{CoverageStatus, InsuranceTier};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Insurance coverage database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insurance_coverage")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Insured member
    pub member_id: i64,
    /// Chosen tier
    pub tier: InsuranceTier,
    /// Cover amount in minor units
    pub coverage_minor: i64,
    /// Monthly premium in minor units
    pub premium_minor: i64,
    /// Number of covered dependents
    pub dependents: i32,
    /// Policy state
    pub status: CoverageStatus,
    /// When cover started
    pub start_date: DateTimeUtc,
    /// When cover must be renewed
    pub renewal_date: DateTimeUtc,
}

/// Defines relationships between `InsuranceCoverage` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each policy belongs to one member
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
