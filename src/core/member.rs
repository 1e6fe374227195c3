//! Member registration and lookup.
//!
//! A member is tied to exactly one Discord user and starts at the base credit score.

use crate::{
    core::credit_score::BASE_SCORE,
    entities::{Member, member},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Registers a Discord user as a SACCO member.
///
/// Fails with [`Error::MemberAlreadyRegistered`] if the user already has a membership.
pub async fn register_member(
    db: &DatabaseConnection,
    user_id: &str,
    full_name: &str,
) -> Result<member::Model> {
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(Error::Config {
            message: "Member name cannot be empty".to_string(),
        });
    }

    if get_member_by_user(db, user_id).await?.is_some() {
        return Err(Error::MemberAlreadyRegistered {
            user_id: user_id.to_string(),
        });
    }

    let now = Utc::now();
    let member = member::ActiveModel {
        user_id: Set(user_id.to_string()),
        full_name: Set(full_name.to_string()),
        credit_score: Set(BASE_SCORE),
        join_date: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let member = member.insert(db).await?;
    info!(
        member_id = member.id,
        membership = %member.membership_number(),
        "Registered new member"
    );
    Ok(member)
}

/// Finds the member linked to a Discord user.
pub async fn get_member_by_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<member::Model>> {
    Member::find()
        .filter(member::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a member by primary key.
pub async fn get_member_by_id(
    db: &DatabaseConnection,
    member_id: i64,
) -> Result<Option<member::Model>> {
    Member::find_by_id(member_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_member_by_user`], but a missing member is an error.
pub async fn require_member_by_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<member::Model> {
    get_member_by_user(db, user_id)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            id: user_id.to_string(),
        })
}

/// All members, ordered by join date.
pub async fn get_all_members(db: &DatabaseConnection) -> Result<Vec<member::Model>> {
    Member::find()
        .order_by_asc(member::Column::JoinDate)
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
