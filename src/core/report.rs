//! Report generation business logic.
//!
//! This module provides the member dashboard snapshot, the administrator overview and the
//! text formatting helpers used to render them. All functions are framework-agnostic and
//! return structured data that can be formatted by the bot layer.

use crate::{
    core::{
        credit_score::{self, BASE_SCORE, MAX_SCORE, ScoreCategory},
        money,
        store::MemberSnapshot,
    },
    entities::{
        Contribution, Loan, LoanStatus, Member, PaymentStatus, contribution, credit_score_history,
        loan, member,
    },
    errors::{Error, Result},
};
use chrono::Datelike;
use rust_decimal::Decimal;
use sea_orm::{PaginatorTrait, prelude::*};
use std::collections::HashSet;

/// Score changes shown on the dashboard
const RECENT_CHANGES: u64 = 5;
/// History reason recorded when a dashboard view changes the score
const DASHBOARD_REASON: &str = "Dashboard view";

/// A member's dashboard.
#[derive(Debug, Clone)]
pub struct MemberReport {
    /// The member
    pub member: member::Model,
    /// Stored credit score
    pub credit_score: i32,
    /// Bucket of the stored score
    pub category: ScoreCategory,
    /// Sum of completed contributions
    pub total_savings: Decimal,
    /// Distinct calendar months with a completed contribution
    pub contribution_months: usize,
    /// Disbursed loans with a balance
    pub active_loans: Vec<loan::Model>,
    /// Sum of active loan balances
    pub outstanding_balance: Decimal,
    /// Smallest monthly instalment among active loans
    pub next_payment: Option<Decimal>,
    /// Latest score changes, newest first
    pub recent_changes: Vec<credit_score_history::Model>,
}

/// Administrator summary across the whole SACCO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaccoOverview {
    /// Registered members
    pub member_count: u64,
    /// Sum of all completed contributions
    pub total_savings: Decimal,
    /// Sum of balances of disbursed loans
    pub active_loan_book: Decimal,
    /// Loans awaiting review
    pub pending_applications: usize,
    /// Rejected loans as a percentage of all loans
    pub default_rate: Decimal,
}

/// Builds a member's dashboard. The score is recomputed and stored first, so tenure and
/// streak changes show up on every view.
pub async fn generate_member_report(
    db: &DatabaseConnection,
    member_id: i64,
) -> Result<MemberReport> {
    credit_score::update_score(db, member_id, DASHBOARD_REASON).await?;

    let snapshot =
        MemberSnapshot::load(db, member_id)
            .await?
            .ok_or_else(|| Error::MemberNotFound {
                id: member_id.to_string(),
            })?;

    let completed: Vec<&contribution::Model> = snapshot
        .contributions
        .iter()
        .filter(|c| c.is_completed())
        .collect();
    let total_savings: Decimal = completed.iter().map(|c| c.amount()).sum();
    let contribution_months = completed
        .iter()
        .map(|c| (c.date.year(), c.date.month()))
        .collect::<HashSet<_>>()
        .len();

    let active_loans: Vec<loan::Model> = snapshot
        .loans
        .into_iter()
        .filter(loan::Model::is_active)
        .collect();
    let outstanding_balance: Decimal = active_loans.iter().map(loan::Model::remaining_balance).sum();
    let next_payment = active_loans.iter().map(loan::Model::monthly_payment).min();

    let recent_changes = credit_score::score_history(db, member_id, RECENT_CHANGES).await?;
    let credit_score = snapshot.member.credit_score;

    Ok(MemberReport {
        member: snapshot.member,
        credit_score,
        category: ScoreCategory::from_score(credit_score),
        total_savings,
        contribution_months,
        active_loans,
        outstanding_balance,
        next_payment,
        recent_changes,
    })
}

/// Builds the administrator overview.
pub async fn generate_sacco_overview(db: &DatabaseConnection) -> Result<SaccoOverview> {
    let member_count = Member::find().count(db).await?;

    let total_savings: Decimal = Contribution::find()
        .filter(contribution::Column::Status.eq(PaymentStatus::Completed))
        .all(db)
        .await?
        .iter()
        .map(contribution::Model::amount)
        .sum();

    let loans = Loan::find().all(db).await?;
    let active_loan_book: Decimal = loans
        .iter()
        .filter(|l| l.status == LoanStatus::Disbursed)
        .map(loan::Model::remaining_balance)
        .sum();
    let pending_applications = loans
        .iter()
        .filter(|l| l.status == LoanStatus::Pending)
        .count();
    let rejected = loans
        .iter()
        .filter(|l| l.status == LoanStatus::Rejected)
        .count();

    Ok(SaccoOverview {
        member_count,
        total_savings,
        active_loan_book,
        pending_applications,
        default_rate: calculate_default_rate(rejected, loans.len()),
    })
}

/// Rejected loans as a percentage of all loans, to one decimal place. Zero with no loans.
#[must_use]
pub fn calculate_default_rate(rejected: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }

    (Decimal::from(rejected) / Decimal::from(total) * Decimal::ONE_HUNDRED).round_dp(1)
}

/// Formats money with the currency label, e.g. `KSh 1,234.56`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("KSh {}", money::format_amount(amount))
}

/// Text gauge of where a score sits in the 300-850 range.
///
/// Creates a bar like: `[████░░░░░░] 488/850`
#[must_use]
pub fn format_score_gauge(score: i32, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = score.clamp(BASE_SCORE, MAX_SCORE);

    // Cast safety: the offset is in 0..=550 and length is a small display width
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = (f64::from(clamped - BASE_SCORE) / f64::from(MAX_SCORE - BASE_SCORE)
        * length as f64)
        .round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {score}/{MAX_SCORE}")
}

/// Formats a score change with an explicit sign: `+12`, `-50`, `0`.
#[must_use]
pub fn format_signed_change(change: i32) -> String {
    if change > 0 {
        format!("+{change}")
    } else {
        change.to_string()
    }
}

/// One line of score history, e.g. `+12 → 512 | New contribution received (2024-06-10)`.
#[must_use]
pub fn format_history_entry(entry: &credit_score_history::Model) -> String {
    format!(
        "{} → {} | {} ({})",
        format_signed_change(entry.change),
        entry.score,
        entry.reason,
        entry.date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::loan as loans, test_utils::*};
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(1234.56)), "KSh 1,234.56");
        assert_eq!(format_money(dec!(200000)), "KSh 200,000.00");
        assert_eq!(format_money(Decimal::ZERO), "KSh 0.00");
    }

    #[test]
    fn test_format_score_gauge() {
        assert_eq!(format_score_gauge(300, Some(10)), "[░░░░░░░░░░] 300/850");
        assert_eq!(format_score_gauge(850, Some(10)), "[██████████] 850/850");
        assert_eq!(format_score_gauge(575, Some(10)), "[█████░░░░░] 575/850");
        assert_eq!(format_score_gauge(488, None), "[███░░░░░░░] 488/850");
    }

    #[test]
    fn test_format_signed_change() {
        assert_eq!(format_signed_change(12), "+12");
        assert_eq!(format_signed_change(-50), "-50");
        assert_eq!(format_signed_change(0), "0");
    }

    #[test]
    fn test_default_rate() {
        assert_eq!(calculate_default_rate(0, 0), Decimal::ZERO);
        assert_eq!(calculate_default_rate(1, 4), dec!(25.0));
        assert_eq!(calculate_default_rate(1, 3), dec!(33.3));
    }

    #[tokio::test]
    async fn test_generate_member_report() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Samuel Ndegwa").await?;
        create_completed_contribution(&db, member.id, dec!(40000)).await?;
        create_completed_contribution(&db, member.id, dec!(10000)).await?;
        create_disbursed_loan(&db, member.id, dec!(10000), dec!(7500)).await?;
        create_disbursed_loan(&db, member.id, dec!(2000), Decimal::ZERO).await?;
        credit_score::update_score(&db, member.id, "Credit score check").await?;

        let report = generate_member_report(&db, member.id).await?;
        assert_eq!(report.total_savings, dec!(50000));
        assert_eq!(report.contribution_months, 1);
        assert_eq!(report.active_loans.len(), 1);
        assert_eq!(report.outstanding_balance, dec!(7500));
        assert_eq!(report.next_payment, Some(report.active_loans[0].monthly_payment()));
        assert_eq!(report.recent_changes.len(), 1);
        assert_eq!(report.category, ScoreCategory::from_score(report.credit_score));
        Ok(())
    }

    #[tokio::test]
    async fn test_member_report_recomputes_stale_score() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Grace Wanjiru").await?;
        create_completed_contribution(&db, member.id, dec!(5000)).await?;
        assert_eq!(member.credit_score, BASE_SCORE);

        let report = generate_member_report(&db, member.id).await?;
        let expected = credit_score::calculate_score(&db, member.id, chrono::Utc::now()).await?;
        assert!(report.credit_score > BASE_SCORE);
        assert_eq!(report.credit_score, expected);
        assert_eq!(report.member.credit_score, expected);
        assert_eq!(report.recent_changes.len(), 1);
        assert_eq!(report.recent_changes[0].reason, "Dashboard view");
        assert_eq!(report.recent_changes[0].change, expected - BASE_SCORE);

        // A second view with nothing new leaves the history alone
        let again = generate_member_report(&db, member.id).await?;
        assert_eq!(again.credit_score, expected);
        assert_eq!(again.recent_changes.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_member_report_unknown_member() -> Result<()> {
        let db = setup_test_db().await?;
        let result = generate_member_report(&db, 8).await;
        assert!(matches!(result, Err(Error::MemberNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_sacco_overview() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_member(&db, "Samuel Ndegwa").await?;
        let second = create_test_member(&db, "Joyce Muthoni").await?;
        create_completed_contribution(&db, first.id, dec!(4000)).await?;
        create_completed_contribution(&db, second.id, dec!(6000)).await?;
        create_disbursed_loan(&db, first.id, dec!(10000), dec!(7500)).await?;
        create_pending_loan(&db, second.id, dec!(3000)).await?;
        let doomed = create_pending_loan(&db, second.id, dec!(9000)).await?;
        loans::reject_loan(&db, doomed.id).await?;

        let overview = generate_sacco_overview(&db).await?;
        assert_eq!(overview.member_count, 2);
        assert_eq!(overview.total_savings, dec!(10000));
        assert_eq!(overview.active_loan_book, dec!(7500));
        assert_eq!(overview.pending_applications, 1);
        assert_eq!(overview.default_rate, dec!(33.3));
        Ok(())
    }
}
