//! Credit scoring engine.
//!
//! A member's score is `300` plus four factors derived from their contribution and loan
//! history, clamped to `300..=850`:
//!
//! 1. **Contribution consistency** - +3 per month in the unbroken streak ending this month
//!    (looking back at most 12 months), +2 for a month with a contribution on or before the
//!    15th, +20 for a streak of 6+, and another +30 for a streak of 12.
//! 2. **Repayment history** - up to +100 for the on-time rate, +10 per payment made five or
//!    more days early, +50 per completed loan, -50 per rejected loan.
//! 3. **Tenure** - +2 per month of membership, at most +60.
//! 4. **Debt to savings** - +30 down to -20 in steps of the outstanding-debt/savings ratio.
//!
//! [`compute_score`] is pure. [`update_score`] recomputes, persists, and appends to the
//! audit trail only when the score actually moved, so it is safe to call on every view.

use crate::{
    core::store::{MemberSnapshot, SaccoStore},
    entities::{
        CreditScoreHistory, LoanStatus, PaymentStatus, contribution, credit_score_history, loan, loan_payment,
        member,
    },
    errors::Result,
};
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{QueryOrder, QuerySelect, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Score every member starts with, and the floor of the range
pub const BASE_SCORE: i32 = 300;
/// Ceiling of the score range
pub const MAX_SCORE: i32 = 850;

const CONSISTENCY_WINDOW_MONTHS: usize = 12;
const POINTS_PER_MONTH: i32 = 3;
const EARLY_MONTH_BONUS: i32 = 2;
const EARLY_DAY_CUTOFF: u32 = 15;
const SIX_MONTH_STREAK_BONUS: i32 = 20;
const TWELVE_MONTH_STREAK_BONUS: i32 = 30;

const EARLY_PAYMENT_DAYS: i64 = -5;
const EARLY_PAYMENT_BONUS: i32 = 10;
const COMPLETED_LOAN_BONUS: i32 = 50;
const REJECTED_LOAN_PENALTY: i32 = 50;
const MILLIS_PER_DAY: i64 = 86_400_000;

const TENURE_POINTS_PER_MONTH: i32 = 2;
const MAX_TENURE_POINTS: i32 = 60;

/// Per-factor contributions to a score, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Contribution consistency points
    pub contribution: i32,
    /// Repayment history points (may be negative)
    pub repayment: i32,
    /// Membership tenure points
    pub tenure: i32,
    /// Debt-to-savings points (may be negative)
    pub debt_ratio: i32,
}

impl ScoreBreakdown {
    /// Final score: base plus all factors, clamped to `300..=850`.
    #[must_use]
    pub fn score(&self) -> i32 {
        let raw = i64::from(BASE_SCORE)
            + i64::from(self.contribution)
            + i64::from(self.repayment)
            + i64::from(self.tenure)
            + i64::from(self.debt_ratio);
        i32::try_from(raw.clamp(i64::from(BASE_SCORE), i64::from(MAX_SCORE)))
            .unwrap_or(MAX_SCORE)
    }
}

/// Display bucket for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCategory {
    /// 750 and above
    Excellent,
    /// 700-749
    VeryGood,
    /// 650-699
    Good,
    /// 600-649
    Fair,
    /// Below 600
    Poor,
}

impl ScoreCategory {
    /// Maps a score to its category.
    #[must_use]
    pub const fn from_score(score: i32) -> Self {
        if score >= 750 {
            Self::Excellent
        } else if score >= 700 {
            Self::VeryGood
        } else if score >= 650 {
            Self::Good
        } else if score >= 600 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Category name shown to members
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    /// Display color name
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent => "green",
            Self::VeryGood => "blue",
            Self::Good => "yellow",
            Self::Fair => "orange",
            Self::Poor => "red",
        }
    }

    /// One-line description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Excellent => "Outstanding credit management",
            Self::VeryGood => "Above average credit history",
            Self::Good => "Good credit standing",
            Self::Fair => "Average credit profile",
            Self::Poor => "Needs improvement",
        }
    }

    /// Discord embed color matching [`Self::color`]
    #[must_use]
    pub const fn embed_color(self) -> u32 {
        match self {
            Self::Excellent => 0x002E_CC71,
            Self::VeryGood => 0x0034_98DB,
            Self::Good => 0x00F1_C40F,
            Self::Fair => 0x00E6_7E22,
            Self::Poor => 0x00E7_4C3C,
        }
    }
}

/// Outcome of [`update_score`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreUpdate {
    /// Score stored before the update
    pub previous: i32,
    /// Score stored after the update
    pub score: i32,
    /// Audit entry appended, if the score changed
    pub history: Option<credit_score_history::Model>,
}

impl ScoreUpdate {
    /// `score - previous`
    #[must_use]
    pub const fn change(&self) -> i32 {
        self.score - self.previous
    }
}

/// Computes each factor of a member's score as of `now`.
#[must_use]
pub fn score_breakdown(
    member: &member::Model,
    contributions: &[contribution::Model],
    loans: &[loan::Model],
    payments: &[loan_payment::Model],
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    ScoreBreakdown {
        contribution: contribution_score(contributions, now),
        repayment: repayment_score(loans, payments),
        tenure: tenure_score(member.join_date, now),
        debt_ratio: debt_ratio_score(contributions, loans),
    }
}

/// Computes a member's credit score as of `now`. Pure function of its inputs.
#[must_use]
pub fn compute_score(
    member: &member::Model,
    contributions: &[contribution::Model],
    loans: &[loan::Model],
    payments: &[loan_payment::Model],
    now: DateTime<Utc>,
) -> i32 {
    score_breakdown(member, contributions, loans, payments, now).score()
}

/// Consistency of monthly saving over the streak ending in the current month.
fn contribution_score(contributions: &[contribution::Model], now: DateTime<Utc>) -> i32 {
    // (year, month) -> whether any contribution that month landed on or before the 15th
    let mut months: HashMap<(i32, u32), bool> = HashMap::new();
    for c in contributions.iter().filter(|c| c.is_completed()) {
        let early = months.entry((c.date.year(), c.date.month())).or_insert(false);
        *early |= c.date.day() <= EARLY_DAY_CUTOFF;
    }

    let mut score = 0;
    let mut streak = 0;
    let (mut year, mut month) = (now.year(), now.month());

    for _ in 0..CONSISTENCY_WINDOW_MONTHS {
        let Some(&early) = months.get(&(year, month)) else {
            break;
        };

        streak += 1;
        score += POINTS_PER_MONTH;
        if early {
            score += EARLY_MONTH_BONUS;
        }

        (year, month) = previous_month(year, month);
    }

    if streak >= 6 {
        score += SIX_MONTH_STREAK_BONUS;
    }
    if streak >= 12 {
        score += TWELVE_MONTH_STREAK_BONUS;
    }

    score
}

const fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Timeliness of completed payments, loan outcomes, and rejections.
fn repayment_score(loans: &[loan::Model], payments: &[loan_payment::Model]) -> i32 {
    if loans.is_empty() {
        return 0;
    }

    let mut score = 0;
    let mut total_payments: i64 = 0;
    let mut on_time_payments: i64 = 0;
    let mut early_payments: i32 = 0;

    for loan in loans {
        let due = loan
            .next_payment_date
            .or(loan.disbursement_date)
            .unwrap_or(loan.application_date);

        for payment in payments
            .iter()
            .filter(|p| p.loan_id == loan.id && p.status == PaymentStatus::Completed)
        {
            total_payments += 1;

            // Whole days, rounded toward negative infinity
            let days = (payment.date - due)
                .num_milliseconds()
                .div_euclid(MILLIS_PER_DAY);

            if days <= 0 {
                on_time_payments += 1;
                if days <= EARLY_PAYMENT_DAYS {
                    early_payments += 1;
                }
            }
        }

        if loan.status == LoanStatus::Completed {
            score += COMPLETED_LOAN_BONUS;
        }
    }

    if total_payments > 0 {
        // round(on_time / total * 100) with halves rounding up, in integers
        let on_time_points =
            (200 * on_time_payments + total_payments) / (2 * total_payments);
        score += i32::try_from(on_time_points).unwrap_or(100);
        score += early_payments * EARLY_PAYMENT_BONUS;
    }

    let rejected = loans
        .iter()
        .filter(|l| l.status == LoanStatus::Rejected)
        .count();
    score -= i32::try_from(rejected).unwrap_or(i32::MAX / REJECTED_LOAN_PENALTY)
        * REJECTED_LOAN_PENALTY;

    score
}

/// Calendar months between joining and `now`, two points each, capped.
fn tenure_score(join_date: DateTime<Utc>, now: DateTime<Utc>) -> i32 {
    let months = months_between(join_date, now);
    (months * TENURE_POINTS_PER_MONTH).min(MAX_TENURE_POINTS)
}

/// `(now.year - from.year) * 12 + (now.month - from.month)`, ignoring the day of month.
#[must_use]
pub fn months_between(from: DateTime<Utc>, now: DateTime<Utc>) -> i32 {
    let month_delta = i32::try_from(now.month()).unwrap_or_default()
        - i32::try_from(from.month()).unwrap_or_default();
    (now.year() - from.year()) * 12 + month_delta
}

/// Outstanding disbursed debt relative to completed savings.
fn debt_ratio_score(contributions: &[contribution::Model], loans: &[loan::Model]) -> i32 {
    let total_savings: Decimal = contributions
        .iter()
        .filter(|c| c.is_completed())
        .map(contribution::Model::amount)
        .sum();

    let total_debt: Decimal = loans
        .iter()
        .filter(|l| l.status == LoanStatus::Disbursed)
        .map(loan::Model::remaining_balance)
        .sum();

    if total_savings.is_zero() {
        return 0;
    }

    let ratio = total_debt / total_savings;
    if ratio <= dec!(0.3) {
        30
    } else if ratio <= dec!(0.5) {
        20
    } else if ratio <= dec!(0.7) {
        10
    } else if ratio <= dec!(1.0) {
        0
    } else {
        -20
    }
}

/// Computes a member's score from storage as of `now`.
/// A missing member scores the base 300; that is not an error.
pub async fn calculate_score<S>(store: &S, member_id: i64, now: DateTime<Utc>) -> Result<i32>
where
    S: SaccoStore + ?Sized,
{
    let Some(snapshot) = MemberSnapshot::load(store, member_id).await? else {
        debug!(member_id, "Scoring unknown member, returning base score");
        return Ok(BASE_SCORE);
    };

    Ok(compute_score(
        &snapshot.member,
        &snapshot.contributions,
        &snapshot.loans,
        &snapshot.payments,
        now,
    ))
}

/// Recomputes a member's score, stores it, and records a history entry if it changed.
pub async fn update_score<S>(store: &S, member_id: i64, reason: &str) -> Result<ScoreUpdate>
where
    S: SaccoStore + ?Sized,
{
    update_score_at(store, member_id, reason, Utc::now()).await
}

/// [`update_score`] evaluated as of `now`.
#[instrument(skip(store))]
pub async fn update_score_at<S>(
    store: &S,
    member_id: i64,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<ScoreUpdate>
where
    S: SaccoStore + ?Sized,
{
    let Some(snapshot) = MemberSnapshot::load(store, member_id).await? else {
        debug!(member_id, "Score update for unknown member skipped");
        return Ok(ScoreUpdate {
            previous: BASE_SCORE,
            score: BASE_SCORE,
            history: None,
        });
    };

    let previous = snapshot.member.credit_score;
    let score = compute_score(
        &snapshot.member,
        &snapshot.contributions,
        &snapshot.loans,
        &snapshot.payments,
        now,
    );

    store.set_credit_score(member_id, score).await?;

    let change = score - previous;
    let history = if change == 0 {
        None
    } else {
        info!(member_id, previous, score, change, "Credit score changed");
        Some(
            store
                .append_score_history(member_id, score, change, reason)
                .await?,
        )
    };

    Ok(ScoreUpdate {
        previous,
        score,
        history,
    })
}

/// Most recent score changes for a member, newest first.
pub async fn score_history(
    db: &DatabaseConnection,
    member_id: i64,
    limit: u64,
) -> Result<Vec<credit_score_history::Model>> {
    CreditScoreHistory::find()
        .filter(credit_score_history::Column::MemberId.eq(member_id))
        .order_by_desc(credit_score_history::Column::Date)
        .order_by_desc(credit_score_history::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}
