//! Contribution business logic.
//!
//! Members record deposits as `pending`; an administrator then confirms or fails them
//! once the payment has been checked. Confirming a contribution recomputes the member's
//! credit score.

use crate::{
    config::LendingConfig,
    core::{credit_score, money},
    entities::{Contribution, PaymentMethod, PaymentStatus, contribution},
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument, warn};

/// Records a pending contribution for a member.
///
/// The amount must be at least `limits.min_contribution`. A transaction reference of the
/// form `TXN<millis>-<member id>` is generated for reconciliation.
#[instrument(skip(db, limits))]
pub async fn record_contribution(
    db: &DatabaseConnection,
    member_id: i64,
    amount: Decimal,
    method: PaymentMethod,
    description: Option<String>,
    limits: &LendingConfig,
) -> Result<contribution::Model> {
    if amount < limits.min_contribution {
        return Err(Error::InvalidAmount { amount });
    }

    if crate::core::member::get_member_by_id(db, member_id)
        .await?
        .is_none()
    {
        return Err(Error::MemberNotFound {
            id: member_id.to_string(),
        });
    }

    let now = Utc::now();
    let contribution = contribution::ActiveModel {
        member_id: Set(member_id),
        amount_minor: Set(money::to_minor(amount)?),
        method: Set(method),
        transaction_ref: Set(format!("TXN{}-{member_id}", now.timestamp_millis())),
        status: Set(PaymentStatus::Pending),
        description: Set(description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())),
        date: Set(now),
        completed_at: Set(None),
        ..Default::default()
    };

    let contribution = contribution.insert(db).await?;
    info!(
        contribution_id = contribution.id,
        reference = %contribution.transaction_ref,
        "Recorded pending contribution"
    );
    Ok(contribution)
}

/// Retrieves a contribution by id.
pub async fn get_contribution_by_id(
    db: &DatabaseConnection,
    contribution_id: i64,
) -> Result<Option<contribution::Model>> {
    Contribution::find_by_id(contribution_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All of a member's contributions, newest first.
pub async fn get_contributions_for_member(
    db: &DatabaseConnection,
    member_id: i64,
) -> Result<Vec<contribution::Model>> {
    Contribution::find()
        .filter(contribution::Column::MemberId.eq(member_id))
        .order_by_desc(contribution::Column::Date)
        .order_by_desc(contribution::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Contributions awaiting confirmation, oldest first.
pub async fn get_pending_contributions(
    db: &DatabaseConnection,
) -> Result<Vec<contribution::Model>> {
    Contribution::find()
        .filter(contribution::Column::Status.eq(PaymentStatus::Pending))
        .order_by_asc(contribution::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks a pending contribution completed and recomputes the member's score.
pub async fn confirm_contribution(
    db: &DatabaseConnection,
    contribution_id: i64,
) -> Result<(contribution::Model, credit_score::ScoreUpdate)> {
    let contribution = settle(db, contribution_id, PaymentStatus::Completed).await?;
    let update =
        credit_score::update_score(db, contribution.member_id, "New contribution received")
            .await?;
    Ok((contribution, update))
}

/// Marks a pending contribution failed. The score is untouched.
pub async fn fail_contribution(
    db: &DatabaseConnection,
    contribution_id: i64,
) -> Result<contribution::Model> {
    settle(db, contribution_id, PaymentStatus::Failed).await
}

async fn settle(
    db: &DatabaseConnection,
    contribution_id: i64,
    status: PaymentStatus,
) -> Result<contribution::Model> {
    let existing = get_contribution_by_id(db, contribution_id)
        .await?
        .ok_or(Error::ContributionNotFound {
            id: contribution_id,
        })?;

    if existing.status != PaymentStatus::Pending {
        warn!(
            contribution_id,
            status = %existing.status,
            "Refusing to settle contribution twice"
        );
        return Err(Error::ContributionAlreadySettled {
            id: contribution_id,
            status: existing.status.to_string(),
        });
    }

    let mut active_model: contribution::ActiveModel = existing.into();
    active_model.status = Set(status);
    if status == PaymentStatus::Completed {
        active_model.completed_at = Set(Some(Utc::now()));
    }

    let updated = active_model.update(db).await?;
    info!(contribution_id, status = %status, "Contribution settled");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_record_contribution_is_pending() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Peter Mwangi").await?;

        let contribution = record_contribution(
            &db,
            member.id,
            dec!(2500),
            PaymentMethod::Mpesa,
            Some("  June savings ".to_string()),
            &LendingConfig::default(),
        )
        .await?;

        assert_eq!(contribution.status, PaymentStatus::Pending);
        assert_eq!(contribution.amount(), dec!(2500));
        assert_eq!(contribution.description.as_deref(), Some("June savings"));
        assert!(contribution.transaction_ref.starts_with("TXN"));
        assert!(contribution.completed_at.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_record_contribution_below_minimum() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Peter Mwangi").await?;

        let result = record_contribution(
            &db,
            member.id,
            dec!(99.99),
            PaymentMethod::Cash,
            None,
            &LendingConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_record_contribution_unknown_member() -> Result<()> {
        let db = setup_test_db().await?;
        let result = record_contribution(
            &db,
            77,
            dec!(1000),
            PaymentMethod::Bank,
            None,
            &LendingConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(Error::MemberNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_confirm_contribution_updates_score() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Peter Mwangi").await?;
        let pending = record_contribution(
            &db,
            member.id,
            dec!(5000),
            PaymentMethod::Mpesa,
            None,
            &LendingConfig::default(),
        )
        .await?;

        let (confirmed, update) = confirm_contribution(&db, pending.id).await?;
        assert_eq!(confirmed.status, PaymentStatus::Completed);
        assert!(confirmed.completed_at.is_some());
        // A contribution this month and no debt
        assert!(update.score > 300);

        let history = credit_score::score_history(&db, member.id, 5).await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reason, "New contribution received");
        Ok(())
    }

    #[tokio::test]
    async fn test_settled_contribution_cannot_change() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Peter Mwangi").await?;
        let pending = record_contribution(
            &db,
            member.id,
            dec!(5000),
            PaymentMethod::Mpesa,
            None,
            &LendingConfig::default(),
        )
        .await?;

        let failed = fail_contribution(&db, pending.id).await?;
        assert_eq!(failed.status, PaymentStatus::Failed);

        let result = confirm_contribution(&db, pending.id).await;
        assert!(matches!(
            result,
            Err(Error::ContributionAlreadySettled { .. })
        ));
        assert!(get_pending_contributions(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_contributions_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Peter Mwangi").await?;
        let limits = LendingConfig::default();
        let first =
            record_contribution(&db, member.id, dec!(100), PaymentMethod::Cash, None, &limits)
                .await?;
        let second =
            record_contribution(&db, member.id, dec!(200), PaymentMethod::Cash, None, &limits)
                .await?;

        let listed = get_contributions_for_member(&db, member.id).await?;
        assert_eq!(listed.len(), 2);
        // Same-millisecond inserts fall back to id ordering
        assert!(listed[0].date >= listed[1].date);
        assert!(listed.iter().any(|c| c.id == first.id));
        assert!(listed.iter().any(|c| c.id == second.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_contribution() -> Result<()> {
        let db = setup_test_db().await?;
        let result = confirm_contribution(&db, 12).await;
        assert!(matches!(result, Err(Error::ContributionNotFound { id: 12 })));
        Ok(())
    }
}
