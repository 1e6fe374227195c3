//! Credit score history entity - Append-only audit trail of score changes.
//! Rows are only ever inserted by the scoring engine, never updated or deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Credit score history database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_score_history")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Member whose score changed
    pub member_id: i64,
    /// Score after the change
    pub score: i32,
    /// New score minus old score
    pub change: i32,
    /// What triggered the recomputation
    pub reason: String,
    /// When the change was recorded
    pub date: DateTimeUtc,
}

/// Defines relationships between `CreditScoreHistory` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one member
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
