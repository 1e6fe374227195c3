//! Loan lifecycle: application, review, disbursement and repayment.
//!
//! ```text
//! pending ──approve──▶ approved ──disburse──▶ disbursed ──repaid──▶ completed
//!    └──────reject──▶ rejected
//! ```
//!
//! Applications go through the eligibility rules before anything is stored. Rejections
//! and repayments recompute the member's credit score.

use crate::{
    config::LendingConfig,
    core::{
        credit_score,
        loan_calculator::{self, LoanDetails},
        money,
        store::{NewLoan, SaccoStore},
    },
    entities::{Loan, LoanStatus, PaymentMethod, PaymentStatus, loan, loan_payment},
    errors::{Error, Result},
};
use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Outcome of [`apply_for_loan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanApplication {
    /// The application passed eligibility and is now pending review
    Submitted {
        /// The stored loan
        loan: Box<loan::Model>,
        /// Pricing at the member's current score
        details: LoanDetails,
    },
    /// Eligibility failed; nothing was stored
    Rejected {
        /// Why the member cannot borrow this amount
        reasons: Vec<String>,
    },
}

/// Result of [`record_repayment`].
#[derive(Debug, Clone)]
pub struct Repayment {
    /// The recorded payment
    pub payment: loan_payment::Model,
    /// The loan after the payment was applied
    pub loan: loan::Model,
    /// Score change caused by the payment
    pub score: credit_score::ScoreUpdate,
}

/// Checks a requested principal against the configured minimum. Amounts that cannot be
/// stored in minor units are refused as well.
pub fn validate_loan_amount(amount: Decimal, limits: &LendingConfig) -> Result<()> {
    if amount < limits.min_loan_amount {
        return Err(Error::InvalidAmount { amount });
    }
    money::to_minor(amount)?;
    Ok(())
}

/// Checks a requested term against the configured bounds and returns it as months.
pub fn validate_term(term_months: i64, limits: &LendingConfig) -> Result<u32> {
    u32::try_from(term_months)
        .ok()
        .filter(|t| (limits.min_term_months..=limits.max_term_months).contains(t))
        .ok_or(Error::InvalidTerm {
            months: term_months,
            min: limits.min_term_months,
            max: limits.max_term_months,
        })
}

/// Checks request limits before any rule evaluation.
pub fn validate_application(
    amount: Decimal,
    term_months: i64,
    purpose: &str,
    limits: &LendingConfig,
) -> Result<u32> {
    validate_loan_amount(amount, limits)?;
    let term = validate_term(term_months, limits)?;

    if purpose.trim().chars().count() < limits.min_purpose_len {
        return Err(Error::Config {
            message: format!(
                "Please provide a purpose for the loan (at least {} characters)",
                limits.min_purpose_len
            ),
        });
    }

    Ok(term)
}

/// Applies for a loan on behalf of a member.
///
/// Invalid input is an error. A member who fails eligibility, or asks for more than
/// their maximum, gets [`LoanApplication::Rejected`] and nothing is written.
#[instrument(skip(store, purpose, limits))]
pub async fn apply_for_loan<S>(
    store: &S,
    member_id: i64,
    amount: Decimal,
    term_months: i64,
    purpose: &str,
    limits: &LendingConfig,
) -> Result<LoanApplication>
where
    S: SaccoStore + ?Sized,
{
    let term = validate_application(amount, term_months, purpose, limits)?;

    let eligibility = loan_calculator::calculate_eligibility(store, member_id).await?;
    if !eligibility.eligible {
        info!(member_id, "Loan application failed eligibility");
        return Ok(LoanApplication::Rejected {
            reasons: eligibility.reasons,
        });
    }

    if amount > eligibility.max_amount {
        return Ok(LoanApplication::Rejected {
            reasons: vec![format!(
                "Requested amount exceeds maximum eligible amount of {} {}",
                limits.currency,
                money::format_amount(eligibility.max_amount)
            )],
        });
    }

    let details =
        loan_calculator::calculate_loan_details(amount, term, eligibility.current_credit_score);

    let loan = store
        .insert_loan(NewLoan {
            member_id,
            amount,
            interest_rate: details.interest_rate,
            term_months: term,
            purpose: purpose.trim().to_string(),
            monthly_payment: details.monthly_payment,
            total_payable: details.total_payable,
            application_date: Utc::now(),
        })
        .await?;

    info!(loan_id = loan.id, member_id, %amount, "Loan application submitted");
    Ok(LoanApplication::Submitted {
        loan: Box::new(loan),
        details,
    })
}

/// Retrieves a loan by id.
pub async fn get_loan_by_id(db: &DatabaseConnection, loan_id: i64) -> Result<Option<loan::Model>> {
    Loan::find_by_id(loan_id).one(db).await.map_err(Into::into)
}

/// All of a member's loans, most recent application first.
pub async fn get_loans_for_member(
    db: &DatabaseConnection,
    member_id: i64,
) -> Result<Vec<loan::Model>> {
    Loan::find()
        .filter(loan::Column::MemberId.eq(member_id))
        .order_by_desc(loan::Column::ApplicationDate)
        .order_by_desc(loan::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applications awaiting review, oldest first.
pub async fn get_pending_loans(db: &DatabaseConnection) -> Result<Vec<loan::Model>> {
    Loan::find()
        .filter(loan::Column::Status.eq(LoanStatus::Pending))
        .order_by_asc(loan::Column::ApplicationDate)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn require_loan<C>(db: &C, loan_id: i64) -> Result<loan::Model>
where
    C: ConnectionTrait,
{
    Loan::find_by_id(loan_id)
        .one(db)
        .await?
        .ok_or(Error::LoanNotFound { id: loan_id })
}

async fn transition<F>(
    db: &DatabaseConnection,
    loan_id: i64,
    from: LoanStatus,
    to: LoanStatus,
    stamp: F,
) -> Result<loan::Model>
where
    F: FnOnce(&mut loan::ActiveModel, DateTime<Utc>),
{
    let existing = require_loan(db, loan_id).await?;
    if existing.status != from {
        return Err(Error::InvalidLoanTransition {
            id: loan_id,
            from: existing.status,
            to,
        });
    }

    let mut active_model: loan::ActiveModel = existing.into();
    active_model.status = Set(to);
    stamp(&mut active_model, Utc::now());

    let updated = active_model.update(db).await?;
    info!(loan_id, %from, %to, "Loan status changed");
    Ok(updated)
}

/// Approves a pending application.
pub async fn approve_loan(db: &DatabaseConnection, loan_id: i64) -> Result<loan::Model> {
    transition(db, loan_id, LoanStatus::Pending, LoanStatus::Approved, |loan, now| {
        loan.approval_date = Set(Some(now));
    })
    .await
}

/// Rejects a pending application and recomputes the member's score.
pub async fn reject_loan(
    db: &DatabaseConnection,
    loan_id: i64,
) -> Result<(loan::Model, credit_score::ScoreUpdate)> {
    let loan = transition(db, loan_id, LoanStatus::Pending, LoanStatus::Rejected, |loan, now| {
        loan.approval_date = Set(Some(now));
    })
    .await?;

    let update =
        credit_score::update_score(db, loan.member_id, "Loan application rejected").await?;
    Ok((loan, update))
}

/// Pays out an approved loan. The first instalment falls due one month later.
pub async fn disburse_loan(db: &DatabaseConnection, loan_id: i64) -> Result<loan::Model> {
    transition(db, loan_id, LoanStatus::Approved, LoanStatus::Disbursed, |loan, now| {
        loan.disbursement_date = Set(Some(now));
        loan.next_payment_date = Set(Some(next_month(now)));
    })
    .await
}

fn next_month(date: DateTime<Utc>) -> DateTime<Utc> {
    date.checked_add_months(Months::new(1)).unwrap_or(date)
}

/// Splits a repayment into interest on the outstanding balance and principal.
///
/// Returns `(principal, interest)`. Interest is one month at the loan's rate, capped at
/// the payment; principal is the rest, capped at the balance.
#[must_use]
pub fn split_repayment(loan: &loan::Model, amount: Decimal) -> (Decimal, Decimal) {
    let balance = loan.remaining_balance();
    let monthly_rate = loan.interest_rate() / Decimal::ONE_HUNDRED / Decimal::from(12);
    let interest = money::round_cents(balance * monthly_rate).min(amount);
    let principal = (amount - interest).min(balance);
    (principal, interest)
}

/// Records a completed repayment against a disbursed loan.
///
/// The payment row and the loan update are written in one transaction; the score is
/// recomputed afterwards. The loan completes once its balance reaches zero.
#[instrument(skip(db))]
pub async fn record_repayment(
    db: &DatabaseConnection,
    loan_id: i64,
    amount: Decimal,
    method: PaymentMethod,
) -> Result<Repayment> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }

    let txn = db.begin().await?;

    let existing = require_loan(&txn, loan_id).await?;
    if existing.status != LoanStatus::Disbursed {
        return Err(Error::LoanNotRepayable {
            id: loan_id,
            status: existing.status,
        });
    }

    let now = Utc::now();
    let (principal, interest) = split_repayment(&existing, amount);
    let remaining = (existing.remaining_balance() - principal).max(Decimal::ZERO);

    let payment = loan_payment::ActiveModel {
        loan_id: Set(loan_id),
        amount_minor: Set(money::to_minor(amount)?),
        principal_minor: Set(money::to_minor(principal)?),
        interest_minor: Set(money::to_minor(interest)?),
        method: Set(method),
        transaction_ref: Set(format!("LPN{}-{loan_id}", now.timestamp_millis())),
        status: Set(PaymentStatus::Completed),
        date: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let member_id = existing.member_id;
    let next_due = existing.next_payment_date.map_or(next_month(now), next_month);
    let amount_paid_minor = existing.amount_paid_minor + payment.amount_minor;

    let mut active_model: loan::ActiveModel = existing.into();
    active_model.amount_paid_minor = Set(amount_paid_minor);
    active_model.remaining_balance_minor = Set(money::to_minor(remaining)?);
    if remaining.is_zero() {
        active_model.status = Set(LoanStatus::Completed);
        active_model.next_payment_date = Set(None);
    } else {
        active_model.next_payment_date = Set(Some(next_due));
    }
    let loan = active_model.update(&txn).await?;

    txn.commit().await?;

    info!(
        loan_id,
        %principal,
        %interest,
        %remaining,
        status = %loan.status,
        "Loan repayment recorded"
    );

    let score = credit_score::update_score(db, member_id, "Loan repayment received").await?;
    Ok(Repayment {
        payment,
        loan,
        score,
    })
}
