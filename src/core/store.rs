//! Storage port consumed by the credit scoring engine and the loan calculator.
//!
//! The engines never touch the database directly. They read a member snapshot and issue
//! at most one write through [`SaccoStore`], which is implemented here for a `SeaORM`
//! connection and by an in-memory fake in the test utilities.

use crate::{
    core::money,
    entities::{
        Contribution, Loan, LoanPayment, LoanStatus, Member, contribution,
        credit_score_history, loan, loan_payment, member,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields needed to create a loan application. The store assigns the id and sets the
/// status to `pending`, `amount_paid` to zero and `remaining_balance` to the principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    /// Borrowing member
    pub member_id: i64,
    /// Principal
    pub amount: Decimal,
    /// Annual interest rate in percent
    pub interest_rate: Decimal,
    /// Term in months
    pub term_months: u32,
    /// What the money is for
    pub purpose: String,
    /// Fixed monthly instalment
    pub monthly_payment: Decimal,
    /// Instalment times term
    pub total_payable: Decimal,
    /// When the member applied
    pub application_date: DateTime<Utc>,
}

/// Read/write operations the engines need from persistence.
#[async_trait]
pub trait SaccoStore: Send + Sync {
    /// Fetches a member, or `None` when no such member exists.
    async fn find_member(&self, member_id: i64) -> Result<Option<member::Model>>;

    /// Fetches every contribution of a member, in any status.
    async fn contributions_for(&self, member_id: i64) -> Result<Vec<contribution::Model>>;

    /// Fetches every loan of a member, in any status.
    async fn loans_for(&self, member_id: i64) -> Result<Vec<loan::Model>>;

    /// Fetches every payment recorded against a loan, in any status.
    async fn payments_for(&self, loan_id: i64) -> Result<Vec<loan_payment::Model>>;

    /// Overwrites the member's stored credit score.
    async fn set_credit_score(&self, member_id: i64, score: i32) -> Result<member::Model>;

    /// Appends one entry to the credit score audit trail.
    async fn append_score_history(
        &self,
        member_id: i64,
        score: i32,
        change: i32,
        reason: &str,
    ) -> Result<credit_score_history::Model>;

    /// Creates a pending loan.
    async fn insert_loan(&self, new_loan: NewLoan) -> Result<loan::Model>;
}

/// Everything the engines read about one member, fetched in a single pass.
#[derive(Debug, Clone)]
pub struct MemberSnapshot {
    /// The member record
    pub member: member::Model,
    /// All contributions, any status
    pub contributions: Vec<contribution::Model>,
    /// All loans, any status
    pub loans: Vec<loan::Model>,
    /// All payments across all of the member's loans
    pub payments: Vec<loan_payment::Model>,
}

impl MemberSnapshot {
    /// Loads a member's full history, or `None` when the member does not exist.
    pub async fn load<S>(store: &S, member_id: i64) -> Result<Option<Self>>
    where
        S: SaccoStore + ?Sized,
    {
        let Some(member) = store.find_member(member_id).await? else {
            return Ok(None);
        };

        let contributions = store.contributions_for(member_id).await?;
        let loans = store.loans_for(member_id).await?;

        let mut payments = Vec::new();
        for loan in &loans {
            payments.extend(store.payments_for(loan.id).await?);
        }

        Ok(Some(Self {
            member,
            contributions,
            loans,
            payments,
        }))
    }
}

#[async_trait]
impl SaccoStore for DatabaseConnection {
    async fn find_member(&self, member_id: i64) -> Result<Option<member::Model>> {
        Member::find_by_id(member_id)
            .one(self)
            .await
            .map_err(Into::into)
    }

    async fn contributions_for(&self, member_id: i64) -> Result<Vec<contribution::Model>> {
        Contribution::find()
            .filter(contribution::Column::MemberId.eq(member_id))
            .order_by_desc(contribution::Column::Date)
            .all(self)
            .await
            .map_err(Into::into)
    }

    async fn loans_for(&self, member_id: i64) -> Result<Vec<loan::Model>> {
        Loan::find()
            .filter(loan::Column::MemberId.eq(member_id))
            .order_by_desc(loan::Column::ApplicationDate)
            .all(self)
            .await
            .map_err(Into::into)
    }

    async fn payments_for(&self, loan_id: i64) -> Result<Vec<loan_payment::Model>> {
        LoanPayment::find()
            .filter(loan_payment::Column::LoanId.eq(loan_id))
            .order_by_asc(loan_payment::Column::Date)
            .all(self)
            .await
            .map_err(Into::into)
    }

    async fn set_credit_score(&self, member_id: i64, score: i32) -> Result<member::Model> {
        let existing = Member::find_by_id(member_id)
            .one(self)
            .await?
            .ok_or_else(|| Error::MemberNotFound {
                id: member_id.to_string(),
            })?;

        let mut active_model: member::ActiveModel = existing.into();
        active_model.credit_score = Set(score);
        active_model.updated_at = Set(Utc::now());
        active_model.update(self).await.map_err(Into::into)
    }

    async fn append_score_history(
        &self,
        member_id: i64,
        score: i32,
        change: i32,
        reason: &str,
    ) -> Result<credit_score_history::Model> {
        let entry = credit_score_history::ActiveModel {
            member_id: Set(member_id),
            score: Set(score),
            change: Set(change),
            reason: Set(reason.to_string()),
            date: Set(Utc::now()),
            ..Default::default()
        };
        entry.insert(self).await.map_err(Into::into)
    }

    async fn insert_loan(&self, new_loan: NewLoan) -> Result<loan::Model> {
        let amount_minor = money::to_minor(new_loan.amount)?;
        let interest_rate_bps = i32::try_from(money::to_minor(new_loan.interest_rate)?)?;

        let loan = loan::ActiveModel {
            member_id: Set(new_loan.member_id),
            amount_minor: Set(amount_minor),
            interest_rate_bps: Set(interest_rate_bps),
            term: Set(i32::try_from(new_loan.term_months)?),
            purpose: Set(new_loan.purpose),
            status: Set(LoanStatus::Pending),
            monthly_payment_minor: Set(money::to_minor(new_loan.monthly_payment)?),
            total_payable_minor: Set(money::to_minor(new_loan.total_payable)?),
            amount_paid_minor: Set(0),
            remaining_balance_minor: Set(amount_minor),
            application_date: Set(new_loan.application_date),
            approval_date: Set(None),
            disbursement_date: Set(None),
            next_payment_date: Set(None),
            ..Default::default()
        };
        loan.insert(self).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_snapshot_missing_member() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(MemberSnapshot::load(&db, 99).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_collects_payments_of_every_loan() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Amina Njeri").await?;
        let first = create_disbursed_loan(&db, member.id, dec!(10000), dec!(10000)).await?;
        let second = create_disbursed_loan(&db, member.id, dec!(5000), dec!(5000)).await?;
        create_test_payment(&db, first.id, dec!(1000), Utc::now()).await?;
        create_test_payment(&db, second.id, dec!(500), Utc::now()).await?;

        let snapshot = MemberSnapshot::load(&db, member.id).await?.unwrap();
        assert_eq!(snapshot.loans.len(), 2);
        assert_eq!(snapshot.payments.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_loan_converts_to_minor_units() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Brian Otieno").await?;

        let loan = db
            .insert_loan(NewLoan {
                member_id: member.id,
                amount: dec!(100000),
                interest_rate: dec!(10.0),
                term_months: 12,
                purpose: "School fees".to_string(),
                monthly_payment: dec!(8791.59),
                total_payable: dec!(105499.08),
                application_date: Utc::now(),
            })
            .await?;

        assert_eq!(loan.status, LoanStatus::Pending);
        assert_eq!(loan.amount_minor, 10_000_000);
        assert_eq!(loan.interest_rate_bps, 1000);
        assert_eq!(loan.monthly_payment(), dec!(8791.59));
        assert_eq!(loan.remaining_balance(), dec!(100000));
        assert_eq!(loan.amount_paid_minor, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_credit_score_missing_member() -> Result<()> {
        let db = setup_test_db().await?;
        let result = db.set_credit_score(42, 500).await;
        assert!(matches!(result, Err(Error::MemberNotFound { .. })));
        Ok(())
    }
}
