//! Shared test utilities for `SaccoBuddy`.
//!
//! This module provides common helper functions for setting up test databases,
//! building entity models with sensible defaults, and an in-memory [`SaccoStore`]
//! for exercising the engines without `SQLite`.

use crate::{
    core::{
        loan_calculator, member, money,
        store::{NewLoan, SaccoStore},
    },
    entities::{
        CoverageStatus, InsuranceTier, LoanStatus, PaymentMethod, PaymentStatus, contribution,
        credit_score_history, insurance_coverage, loan, loan_payment, member as member_entity,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Registers a member whose Discord id is derived from the name.
///
/// # Defaults
/// * `user_id`: lowercase name with dashes
/// * `credit_score`: 300
pub async fn create_test_member(
    db: &DatabaseConnection,
    name: &str,
) -> Result<member_entity::Model> {
    let user_id = name.to_lowercase().replace(' ', "-");
    member::register_member(db, &user_id, name).await
}

/// Registers a member and overwrites their stored score.
pub async fn create_member_with_score(
    db: &DatabaseConnection,
    name: &str,
    score: i32,
) -> Result<member_entity::Model> {
    let member = create_test_member(db, name).await?;
    db.set_credit_score(member.id, score).await
}

/// A member who passes every eligibility rule: stored score 500 and one completed
/// contribution of `monthly_amount` in each of the last six months.
pub async fn create_eligible_member(
    db: &DatabaseConnection,
    monthly_amount: Decimal,
) -> Result<member_entity::Model> {
    let member = create_member_with_score(db, "Eligible Member", 500).await?;
    for contribution in monthly_history(member.id, 6, monthly_amount) {
        insert_contribution(db, member.id, monthly_amount, contribution.date, PaymentStatus::Completed)
            .await?;
    }
    Ok(member)
}

/// Inserts a contribution with an explicit date and status.
pub async fn insert_contribution(
    db: &DatabaseConnection,
    member_id: i64,
    amount: Decimal,
    date: DateTime<Utc>,
    status: PaymentStatus,
) -> Result<contribution::Model> {
    contribution::ActiveModel {
        member_id: Set(member_id),
        amount_minor: Set(money::to_minor(amount)?),
        method: Set(PaymentMethod::Mpesa),
        transaction_ref: Set(format!("TXN-TEST-{member_id}")),
        status: Set(status),
        description: Set(None),
        date: Set(date),
        completed_at: Set((status == PaymentStatus::Completed).then_some(date)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a completed contribution dated now.
pub async fn create_completed_contribution(
    db: &DatabaseConnection,
    member_id: i64,
    amount: Decimal,
) -> Result<contribution::Model> {
    insert_contribution(db, member_id, amount, Utc::now(), PaymentStatus::Completed).await
}

/// Inserts a pending 12-month application priced at the base score.
pub async fn create_pending_loan(
    db: &DatabaseConnection,
    member_id: i64,
    amount: Decimal,
) -> Result<loan::Model> {
    let details = loan_calculator::calculate_loan_details(amount, 12, 300);
    db.insert_loan(NewLoan {
        member_id,
        amount,
        interest_rate: details.interest_rate,
        term_months: 12,
        purpose: "Test loan".to_string(),
        monthly_payment: details.monthly_payment,
        total_payable: details.total_payable,
        application_date: Utc::now(),
    })
    .await
}

/// Inserts a disbursed 12-month loan at 12% with `remaining` still owed.
///
/// # Defaults
/// * disbursed now, next payment due in one month
/// * `amount_paid`: `amount - remaining`
pub async fn create_disbursed_loan(
    db: &DatabaseConnection,
    member_id: i64,
    amount: Decimal,
    remaining: Decimal,
) -> Result<loan::Model> {
    let details = loan_calculator::calculate_loan_details(amount, 12, 660);
    let now = Utc::now();

    loan::ActiveModel {
        member_id: Set(member_id),
        amount_minor: Set(money::to_minor(amount)?),
        interest_rate_bps: Set(1200),
        term: Set(12),
        purpose: Set("Test loan".to_string()),
        status: Set(LoanStatus::Disbursed),
        monthly_payment_minor: Set(money::to_minor(details.monthly_payment)?),
        total_payable_minor: Set(money::to_minor(details.total_payable)?),
        amount_paid_minor: Set(money::to_minor(amount - remaining)?),
        remaining_balance_minor: Set(money::to_minor(remaining)?),
        application_date: Set(now - Duration::days(7)),
        approval_date: Set(Some(now - Duration::days(3))),
        disbursement_date: Set(Some(now)),
        next_payment_date: Set(now.checked_add_months(Months::new(1))),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a completed payment that is all principal.
pub async fn create_test_payment(
    db: &DatabaseConnection,
    loan_id: i64,
    amount: Decimal,
    date: DateTime<Utc>,
) -> Result<loan_payment::Model> {
    loan_payment::ActiveModel {
        loan_id: Set(loan_id),
        amount_minor: Set(money::to_minor(amount)?),
        principal_minor: Set(money::to_minor(amount)?),
        interest_minor: Set(0),
        method: Set(PaymentMethod::Bank),
        transaction_ref: Set(format!("LPN-TEST-{loan_id}")),
        status: Set(PaymentStatus::Completed),
        date: Set(date),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Builds a member model at the base score.
#[must_use]
pub fn member_model(id: i64, join_date: DateTime<Utc>) -> member_entity::Model {
    member_entity::Model {
        id,
        user_id: format!("user-{id}"),
        full_name: format!("Member {id}"),
        credit_score: 300,
        join_date,
        updated_at: join_date,
    }
}

/// Builds a contribution model.
#[must_use]
pub fn contribution_model(
    id: i64,
    member_id: i64,
    amount: Decimal,
    date: DateTime<Utc>,
    status: PaymentStatus,
) -> contribution::Model {
    contribution::Model {
        id,
        member_id,
        amount_minor: money::to_minor(amount).unwrap_or_default(),
        method: PaymentMethod::Mpesa,
        transaction_ref: format!("TXN-{id}"),
        status,
        description: None,
        date,
        completed_at: (status == PaymentStatus::Completed).then_some(date),
    }
}

/// One completed contribution of `amount` in each of the last `months` months,
/// ending with the current month.
#[must_use]
pub fn monthly_history(member_id: i64, months: u32, amount: Decimal) -> Vec<contribution::Model> {
    let now = Utc::now();
    (0..months)
        .filter_map(|back| now.checked_sub_months(Months::new(back)))
        .zip(1..)
        .map(|(date, id)| contribution_model(id, member_id, amount, date, PaymentStatus::Completed))
        .collect()
}

/// Builds a 12-month loan at 10% whose balance is the full principal.
///
/// # Defaults
/// * no approval, disbursement or next payment dates
/// * monthly payment: `amount / 12`
#[must_use]
pub fn loan_model(
    id: i64,
    member_id: i64,
    amount: Decimal,
    status: LoanStatus,
    application_date: DateTime<Utc>,
) -> loan::Model {
    let amount_minor = money::to_minor(amount).unwrap_or_default();
    loan::Model {
        id,
        member_id,
        amount_minor,
        interest_rate_bps: 1000,
        term: 12,
        purpose: "Test loan".to_string(),
        status,
        monthly_payment_minor: amount_minor / 12,
        total_payable_minor: amount_minor / 12 * 12,
        amount_paid_minor: 0,
        remaining_balance_minor: amount_minor,
        application_date,
        approval_date: None,
        disbursement_date: None,
        next_payment_date: None,
    }
}

/// Builds a loan payment model that is all principal.
#[must_use]
pub fn payment_model(
    id: i64,
    loan_id: i64,
    amount: Decimal,
    date: DateTime<Utc>,
    status: PaymentStatus,
) -> loan_payment::Model {
    let amount_minor = money::to_minor(amount).unwrap_or_default();
    loan_payment::Model {
        id,
        loan_id,
        amount_minor,
        principal_minor: amount_minor,
        interest_minor: 0,
        method: PaymentMethod::Mpesa,
        transaction_ref: format!("LPN-{id}"),
        status,
        date,
    }
}

/// Builds an active cover model starting at `start`.
#[must_use]
pub fn coverage_model(
    member_id: i64,
    tier: InsuranceTier,
    start: DateTime<Utc>,
) -> insurance_coverage::Model {
    insurance_coverage::Model {
        id: 1,
        member_id,
        tier,
        coverage_minor: 20_000_000,
        premium_minor: 150_000,
        dependents: 0,
        status: CoverageStatus::Active,
        start_date: start,
        renewal_date: start + Duration::days(365),
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    members: Vec<member_entity::Model>,
    contributions: Vec<contribution::Model>,
    loans: Vec<loan::Model>,
    payments: Vec<loan_payment::Model>,
    history: Vec<credit_score_history::Model>,
}

/// In-memory [`SaccoStore`] for engine tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a member.
    pub fn add_member(&self, member: member_entity::Model) {
        self.state().members.push(member);
    }

    /// Adds a contribution.
    pub fn add_contribution(&self, contribution: contribution::Model) {
        self.state().contributions.push(contribution);
    }

    /// Adds a loan.
    pub fn add_loan(&self, loan: loan::Model) {
        self.state().loans.push(loan);
    }

    /// Adds a loan payment.
    pub fn add_payment(&self, payment: loan_payment::Model) {
        self.state().payments.push(payment);
    }

    /// Current copy of a member.
    #[must_use]
    pub fn member(&self, member_id: i64) -> Option<member_entity::Model> {
        self.state()
            .members
            .iter()
            .find(|m| m.id == member_id)
            .cloned()
    }

    /// Every loan stored so far.
    #[must_use]
    pub fn loans(&self) -> Vec<loan::Model> {
        self.state().loans.clone()
    }

    /// Every history entry appended so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<credit_score_history::Model> {
        self.state().history.clone()
    }
}

#[async_trait]
impl SaccoStore for MemoryStore {
    async fn find_member(&self, member_id: i64) -> Result<Option<member_entity::Model>> {
        Ok(self.member(member_id))
    }

    async fn contributions_for(&self, member_id: i64) -> Result<Vec<contribution::Model>> {
        Ok(self
            .state()
            .contributions
            .iter()
            .filter(|c| c.member_id == member_id)
            .cloned()
            .collect())
    }

    async fn loans_for(&self, member_id: i64) -> Result<Vec<loan::Model>> {
        Ok(self
            .state()
            .loans
            .iter()
            .filter(|l| l.member_id == member_id)
            .cloned()
            .collect())
    }

    async fn payments_for(&self, loan_id: i64) -> Result<Vec<loan_payment::Model>> {
        Ok(self
            .state()
            .payments
            .iter()
            .filter(|p| p.loan_id == loan_id)
            .cloned()
            .collect())
    }

    async fn set_credit_score(&self, member_id: i64, score: i32) -> Result<member_entity::Model> {
        let mut state = self.state();
        let member = state
            .members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(|| Error::MemberNotFound {
                id: member_id.to_string(),
            })?;
        member.credit_score = score;
        member.updated_at = Utc::now();
        Ok(member.clone())
    }

    async fn append_score_history(
        &self,
        member_id: i64,
        score: i32,
        change: i32,
        reason: &str,
    ) -> Result<credit_score_history::Model> {
        let mut state = self.state();
        let entry = credit_score_history::Model {
            id: i64::try_from(state.history.len())? + 1,
            member_id,
            score,
            change,
            reason: reason.to_string(),
            date: Utc::now(),
        };
        state.history.push(entry.clone());
        Ok(entry)
    }

    async fn insert_loan(&self, new_loan: NewLoan) -> Result<loan::Model> {
        let mut state = self.state();
        let amount_minor = money::to_minor(new_loan.amount)?;
        let loan = loan::Model {
            id: i64::try_from(state.loans.len())? + 1,
            member_id: new_loan.member_id,
            amount_minor,
            interest_rate_bps: i32::try_from(money::to_minor(new_loan.interest_rate)?)?,
            term: i32::try_from(new_loan.term_months)?,
            purpose: new_loan.purpose,
            status: LoanStatus::Pending,
            monthly_payment_minor: money::to_minor(new_loan.monthly_payment)?,
            total_payable_minor: money::to_minor(new_loan.total_payable)?,
            amount_paid_minor: 0,
            remaining_balance_minor: amount_minor,
            application_date: new_loan.application_date,
            approval_date: None,
            disbursement_date: None,
            next_payment_date: None,
        };
        state.loans.push(loan.clone());
        Ok(loan)
    }
}
