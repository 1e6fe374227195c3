//! Loan eligibility, pricing, amortization and affordability.
//!
//! Eligibility and affordability never fail on policy grounds: every rule that does not
//! pass appends a human-readable reason, and callers render the list.

use crate::{
    core::{
        credit_score::BASE_SCORE,
        money,
        store::{MemberSnapshot, SaccoStore},
    },
    entities::{LoanStatus, contribution, loan, member},
    errors::Result,
};
use chrono::{DateTime, Datelike, Duration, Months, Utc};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use std::collections::HashSet;
use tracing::debug;

/// Distinct contribution months required before borrowing
pub const MIN_CONTRIBUTION_MONTHS: usize = 6;
/// Maximum loan as a multiple of completed savings
pub const LOAN_MULTIPLIER: Decimal = dec!(3);
/// Lowest stored score that may borrow
pub const MIN_CREDIT_SCORE: i32 = 400;
/// Active (disbursed, unpaid) loans allowed at once
pub const MAX_ACTIVE_LOANS: usize = 2;
/// How long a rejection blocks new applications
pub const REJECTION_COOLDOWN_DAYS: i64 = 90;

const INCOME_WINDOW_DAYS: i64 = 90;
const INCOME_SAMPLE_SIZE: usize = 3;
const INCOME_MULTIPLIER: Decimal = dec!(10);
const MAX_DEBT_TO_INCOME: Decimal = dec!(30);
const AFFORDABLE_SHARE: Decimal = dec!(0.30);
const MIN_ESTIMATED_INCOME: Decimal = dec!(10000);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Result of an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanEligibility {
    /// Whether every rule passed
    pub eligible: bool,
    /// Largest principal the member may request; zero when not eligible
    pub max_amount: Decimal,
    /// Score threshold applied
    pub min_credit_score: i32,
    /// The member's stored score
    pub current_credit_score: i32,
    /// Distinct calendar months with a completed contribution
    pub contribution_history: usize,
    /// One entry per failing rule, or a single congratulation
    pub reasons: Vec<String>,
}

/// Pricing of a prospective loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanDetails {
    /// Principal
    pub amount: Decimal,
    /// Annual rate in percent
    pub interest_rate: Decimal,
    /// Term in months
    pub term_months: u32,
    /// Fixed instalment, rounded to cents
    pub monthly_payment: Decimal,
    /// `monthly_payment * term_months`
    pub total_payable: Decimal,
    /// `total_payable - amount`
    pub total_interest: Decimal,
}

/// One row of an amortization table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// 1-based instalment number
    pub month: u32,
    /// Due date
    pub date: DateTime<Utc>,
    /// Instalment amount
    pub payment: Decimal,
    /// Principal portion
    pub principal: Decimal,
    /// Interest portion
    pub interest: Decimal,
    /// Balance after this instalment, never negative
    pub balance: Decimal,
}

/// Advisory affordability estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affordability {
    /// Whether every check passed
    pub affordable: bool,
    /// Estimated monthly income
    pub monthly_income: Decimal,
    /// Existing plus proposed instalments as a percentage of income
    pub debt_to_income_ratio: Decimal,
    /// 30% of estimated income
    pub max_affordable_payment: Decimal,
    /// One entry per failing check, or a single confirmation
    pub reasons: Vec<String>,
}

/// Applies the lending rules to a member's history as of `now`.
#[must_use]
pub fn assess_eligibility(
    member: &member::Model,
    contributions: &[contribution::Model],
    loans: &[loan::Model],
    now: DateTime<Utc>,
) -> LoanEligibility {
    let completed: Vec<&contribution::Model> =
        contributions.iter().filter(|c| c.is_completed()).collect();

    let mut reasons = Vec::new();

    let contribution_months = completed
        .iter()
        .map(|c| (c.date.year(), c.date.month()))
        .collect::<HashSet<_>>()
        .len();
    if contribution_months < MIN_CONTRIBUTION_MONTHS {
        reasons.push(format!(
            "Need at least {MIN_CONTRIBUTION_MONTHS} months of contributions (current: {contribution_months})"
        ));
    }

    if member.credit_score < MIN_CREDIT_SCORE {
        reasons.push(format!(
            "Credit score too low (minimum: {MIN_CREDIT_SCORE})"
        ));
    }

    let active_loans = loans.iter().filter(|l| l.is_active()).count();
    if active_loans >= MAX_ACTIVE_LOANS {
        reasons.push(format!(
            "Maximum of {MAX_ACTIVE_LOANS} active loans allowed"
        ));
    }

    let cooldown_start = now - Duration::days(REJECTION_COOLDOWN_DAYS);
    if loans
        .iter()
        .any(|l| l.status == LoanStatus::Rejected && l.application_date > cooldown_start)
    {
        reasons.push("Recent loan rejection found".to_string());
    }

    let eligible = reasons.is_empty();
    let max_amount = if eligible {
        let savings: Decimal = completed.iter().map(|c| c.amount()).sum();
        reasons.push("Congratulations! You are eligible for a loan".to_string());
        savings * LOAN_MULTIPLIER
    } else {
        Decimal::ZERO
    };

    LoanEligibility {
        eligible,
        max_amount,
        min_credit_score: MIN_CREDIT_SCORE,
        current_credit_score: member.credit_score,
        contribution_history: contribution_months,
        reasons,
    }
}

/// Loads a member and checks whether they may borrow right now.
pub async fn calculate_eligibility<S>(store: &S, member_id: i64) -> Result<LoanEligibility>
where
    S: SaccoStore + ?Sized,
{
    let Some(snapshot) = MemberSnapshot::load(store, member_id).await? else {
        debug!(member_id, "Eligibility requested for unknown member");
        return Ok(LoanEligibility {
            eligible: false,
            max_amount: Decimal::ZERO,
            min_credit_score: MIN_CREDIT_SCORE,
            current_credit_score: 0,
            contribution_history: 0,
            reasons: vec!["User not found".to_string()],
        });
    };

    Ok(assess_eligibility(
        &snapshot.member,
        &snapshot.contributions,
        &snapshot.loans,
        Utc::now(),
    ))
}

/// Annual interest rate in percent for a credit score.
#[must_use]
pub fn calculate_interest_rate(score: i32) -> Decimal {
    if score >= 750 {
        dec!(8.0)
    } else if score >= 700 {
        dec!(10.0)
    } else if score >= 650 {
        dec!(12.0)
    } else if score >= 600 {
        dec!(14.0)
    } else {
        dec!(16.0)
    }
}

fn monthly_rate(annual_percent: Decimal) -> Decimal {
    annual_percent / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR
}

/// Prices an amortizing loan at the rate for `score`.
///
/// The instalment is rounded to cents before deriving the totals, so
/// `total_payable == monthly_payment * term_months` and
/// `total_interest == total_payable - amount` hold exactly.
#[must_use]
pub fn calculate_loan_details(amount: Decimal, term_months: u32, score: i32) -> LoanDetails {
    let interest_rate = calculate_interest_rate(score);
    let r = monthly_rate(interest_rate);

    let raw_payment = if term_months == 0 {
        amount
    } else if r.is_zero() {
        amount / Decimal::from(term_months)
    } else {
        // amount * r / (1 - (1 + r)^-n), falling back to interest-only if (1 + r)^n overflows
        (Decimal::ONE + r)
            .checked_powu(u64::from(term_months))
            .and_then(|growth| {
                let discount = Decimal::ONE - Decimal::ONE.checked_div(growth)?;
                (amount * r).checked_div(discount)
            })
            .unwrap_or(amount * r)
    };

    let monthly_payment = money::round_cents(raw_payment);
    let total_payable = monthly_payment * Decimal::from(term_months.max(1));
    let total_interest = total_payable - amount;

    LoanDetails {
        amount,
        interest_rate,
        term_months,
        monthly_payment,
        total_payable,
        total_interest,
    }
}

/// Builds the month-by-month amortization table of a stored loan.
///
/// Due dates are the disbursement date (or application date, before disbursement)
/// advanced by whole calendar months; day 31 clamps to the end of shorter months.
#[must_use]
pub fn generate_payment_schedule(loan: &loan::Model) -> Vec<ScheduleEntry> {
    let r = monthly_rate(loan.interest_rate());
    let payment = loan.monthly_payment();
    let start = loan.disbursement_date.unwrap_or(loan.application_date);
    let term = u32::try_from(loan.term).unwrap_or(0);

    let mut balance = loan.amount();
    let mut schedule = Vec::with_capacity(term as usize);

    for month in 1..=term {
        let interest = balance * r;
        let principal = payment - interest;
        balance -= principal;

        schedule.push(ScheduleEntry {
            month,
            date: start
                .checked_add_months(Months::new(month))
                .unwrap_or(start),
            payment: money::round_cents(payment),
            principal: money::round_cents(principal),
            interest: money::round_cents(interest),
            balance: money::round_cents(balance.max(Decimal::ZERO)),
        });
    }

    schedule
}

/// Estimates whether a member can carry an extra loan, as of `now`.
///
/// Income is ten times the mean of the three most recent completed contributions in
/// the last 90 days. The proposed instalment is priced at the member's stored score.
#[must_use]
pub fn assess_affordability(
    credit_score: i32,
    contributions: &[contribution::Model],
    loans: &[loan::Model],
    amount: Decimal,
    term_months: u32,
    now: DateTime<Utc>,
) -> Affordability {
    let window_start = now - Duration::days(INCOME_WINDOW_DAYS);
    let mut recent: Vec<&contribution::Model> = contributions
        .iter()
        .filter(|c| c.is_completed() && c.date > window_start)
        .collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(INCOME_SAMPLE_SIZE);

    let average_contribution = if recent.is_empty() {
        Decimal::ZERO
    } else {
        recent.iter().map(|c| c.amount()).sum::<Decimal>() / Decimal::from(recent.len())
    };
    let monthly_income = average_contribution * INCOME_MULTIPLIER;

    let existing_payments: Decimal = loans
        .iter()
        .filter(|l| l.is_active())
        .map(loan::Model::monthly_payment)
        .sum();
    let proposed_payment = calculate_loan_details(amount, term_months, credit_score).monthly_payment;

    let debt_to_income_ratio = if monthly_income.is_zero() {
        Decimal::ONE_HUNDRED
    } else {
        (existing_payments + proposed_payment) / monthly_income * Decimal::ONE_HUNDRED
    };
    let max_affordable_payment = monthly_income * AFFORDABLE_SHARE;

    let mut reasons = Vec::new();

    if debt_to_income_ratio > MAX_DEBT_TO_INCOME {
        let mut shown =
            debt_to_income_ratio.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        shown.rescale(1);
        reasons.push(format!(
            "Debt-to-income ratio too high: {shown}% (max {MAX_DEBT_TO_INCOME}%)"
        ));
    }

    if proposed_payment > max_affordable_payment {
        reasons.push(format!(
            "Monthly payment exceeds affordable limit: KSh {} > KSh {}",
            money::format_amount(proposed_payment),
            money::format_amount(max_affordable_payment)
        ));
    }

    if monthly_income < MIN_ESTIMATED_INCOME {
        reasons.push("Insufficient income history to assess affordability".to_string());
    }

    let affordable = reasons.is_empty();
    if affordable {
        reasons.push("Loan payment is within affordable limits".to_string());
    }

    Affordability {
        affordable,
        monthly_income,
        debt_to_income_ratio,
        max_affordable_payment,
        reasons,
    }
}

/// Loads a member's history and estimates affordability of a new loan right now.
/// An unknown member is assessed with no history at the base score.
pub async fn calculate_affordability<S>(
    store: &S,
    member_id: i64,
    amount: Decimal,
    term_months: u32,
) -> Result<Affordability>
where
    S: SaccoStore + ?Sized,
{
    let credit_score = store
        .find_member(member_id)
        .await?
        .map_or(BASE_SCORE, |m| m.credit_score);
    let contributions = store.contributions_for(member_id).await?;
    let loans = store.loans_for(member_id).await?;

    Ok(assess_affordability(
        credit_score,
        &contributions,
        &loans,
        amount,
        term_months,
        Utc::now(),
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::PaymentStatus;
    use crate::test_utils::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
    }

    fn completed(id: i64, amount: Decimal, date: DateTime<Utc>) -> contribution::Model {
        contribution_model(id, 1, amount, date, PaymentStatus::Completed)
    }

    /// Six monthly contributions of `amount`, January to June 2024.
    fn six_months_of(amount: Decimal) -> Vec<contribution::Model> {
        (1..=6)
            .map(|m| completed(i64::from(m), amount, Utc.with_ymd_and_hms(2024, m, 5, 9, 0, 0).unwrap()))
            .collect()
    }

    fn scored_member(score: i32) -> member::Model {
        let mut member = member_model(1, Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
        member.credit_score = score;
        member
    }

    #[test]
    fn test_eligible_member() {
        let eligibility =
            assess_eligibility(&scored_member(520), &six_months_of(dec!(5000)), &[], now());

        assert!(eligibility.eligible);
        assert_eq!(eligibility.max_amount, dec!(90000));
        assert_eq!(eligibility.contribution_history, 6);
        assert_eq!(eligibility.current_credit_score, 520);
        assert_eq!(
            eligibility.reasons,
            vec!["Congratulations! You are eligible for a loan"]
        );
    }

    #[test]
    fn test_all_failing_rules_are_reported() {
        let contributions = vec![
            completed(1, dec!(1000), now()),
            completed(2, dec!(1000), now()),
            contribution_model(3, 1, dec!(1000), now(), PaymentStatus::Pending),
        ];
        let loans = vec![
            loan_model(1, 1, dec!(5000), LoanStatus::Disbursed, now() - Duration::days(200)),
            loan_model(2, 1, dec!(5000), LoanStatus::Disbursed, now() - Duration::days(150)),
            loan_model(3, 1, dec!(5000), LoanStatus::Rejected, now() - Duration::days(30)),
        ];

        let eligibility = assess_eligibility(&scored_member(350), &contributions, &loans, now());
        assert!(!eligibility.eligible);
        assert_eq!(eligibility.max_amount, Decimal::ZERO);
        assert_eq!(
            eligibility.reasons,
            vec![
                "Need at least 6 months of contributions (current: 1)",
                "Credit score too low (minimum: 400)",
                "Maximum of 2 active loans allowed",
                "Recent loan rejection found",
            ]
        );
    }

    #[test]
    fn test_paid_off_and_old_rejected_loans_do_not_block() {
        let mut repaid = loan_model(1, 1, dec!(5000), LoanStatus::Disbursed, now() - Duration::days(400));
        repaid.remaining_balance_minor = 0;
        let loans = vec![
            repaid,
            loan_model(2, 1, dec!(5000), LoanStatus::Disbursed, now() - Duration::days(300)),
            loan_model(3, 1, dec!(5000), LoanStatus::Rejected, now() - Duration::days(91)),
        ];

        let eligibility =
            assess_eligibility(&scored_member(450), &six_months_of(dec!(1000)), &loans, now());
        assert!(eligibility.eligible);
        assert_eq!(eligibility.max_amount, dec!(18000));
    }

    #[tokio::test]
    async fn test_calculate_eligibility_through_store_with_loans() -> Result<()> {
        let store = MemoryStore::default();
        let mut member = member_model(1, Utc::now() - Duration::days(730));
        member.credit_score = 615;
        store.add_member(member);
        for c in monthly_history(1, 6, dec!(1000)) {
            store.add_contribution(c);
        }

        let mut first = loan_model(1, 1, dec!(4000), LoanStatus::Disbursed, Utc::now() - Duration::days(200));
        first.disbursement_date = Some(Utc::now() - Duration::days(195));
        store.add_loan(first);
        store.add_payment(payment_model(1, 1, dec!(500), Utc::now() - Duration::days(160), PaymentStatus::Completed));
        // Rejected long enough ago not to block
        store.add_loan(loan_model(2, 1, dec!(9000), LoanStatus::Rejected, Utc::now() - Duration::days(120)));

        let eligibility = calculate_eligibility(&store, 1).await?;
        assert!(eligibility.eligible);
        assert_eq!(eligibility.current_credit_score, 615);
        assert_eq!(eligibility.contribution_history, 6);
        assert_eq!(eligibility.max_amount, dec!(18000));

        store.add_loan(loan_model(3, 1, dec!(3000), LoanStatus::Disbursed, Utc::now() - Duration::days(30)));
        let eligibility = calculate_eligibility(&store, 1).await?;
        assert!(!eligibility.eligible);
        assert_eq!(eligibility.max_amount, Decimal::ZERO);
        assert_eq!(eligibility.reasons, vec!["Maximum of 2 active loans allowed"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_eligibility_unknown_member() -> Result<()> {
        let store = MemoryStore::default();
        let eligibility = calculate_eligibility(&store, 404).await?;
        assert!(!eligibility.eligible);
        assert_eq!(eligibility.current_credit_score, 0);
        assert_eq!(eligibility.contribution_history, 0);
        assert_eq!(eligibility.reasons, vec!["User not found"]);
        Ok(())
    }

    #[test]
    fn test_interest_rate_bands() {
        assert_eq!(calculate_interest_rate(850), dec!(8.0));
        assert_eq!(calculate_interest_rate(750), dec!(8.0));
        assert_eq!(calculate_interest_rate(749), dec!(10.0));
        assert_eq!(calculate_interest_rate(700), dec!(10.0));
        assert_eq!(calculate_interest_rate(650), dec!(12.0));
        assert_eq!(calculate_interest_rate(600), dec!(14.0));
        assert_eq!(calculate_interest_rate(599), dec!(16.0));
        assert_eq!(calculate_interest_rate(300), dec!(16.0));
    }

    #[test]
    fn test_loan_details_reference_case() {
        let details = calculate_loan_details(dec!(100000), 12, 720);
        assert_eq!(details.interest_rate, dec!(10.0));
        assert_eq!(details.monthly_payment, dec!(8791.59));
        assert_eq!(details.total_payable, dec!(105499.08));
        assert_eq!(details.total_interest, dec!(5499.08));
    }

    #[test]
    fn test_loan_details_totals_are_consistent() {
        for (amount, term, score) in [
            (dec!(1000), 6, 300),
            (dec!(25000), 18, 610),
            (dec!(333333.33), 36, 690),
            (dec!(75000), 24, 800),
        ] {
            let details = calculate_loan_details(amount, term, score);
            assert_eq!(details.monthly_payment, money::round_cents(details.monthly_payment));
            assert_eq!(details.total_payable, details.monthly_payment * Decimal::from(term));
            assert_eq!(details.total_interest, details.total_payable - amount);
            assert!(details.total_interest > Decimal::ZERO);
        }
    }

    #[test]
    fn test_loan_details_zero_term() {
        let details = calculate_loan_details(dec!(5000), 0, 700);
        assert_eq!(details.monthly_payment, dec!(5000));
        assert_eq!(details.total_payable, dec!(5000));
        assert_eq!(details.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);

        let mut loan = loan_model(1, 1, dec!(1200), LoanStatus::Disbursed, now());
        loan.interest_rate_bps = 0;
        loan.term = 12;
        loan.monthly_payment_minor = 10_000;

        let schedule = generate_payment_schedule(&loan);
        assert_eq!(schedule.len(), 12);
        assert!(schedule.iter().all(|e| e.interest.is_zero() && e.principal == dec!(100)));
        assert_eq!(schedule[11].balance, Decimal::ZERO);
    }

    #[test]
    fn test_payment_schedule() {
        let details = calculate_loan_details(dec!(100000), 12, 720);
        let disbursed = Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap();

        let mut loan = loan_model(1, 1, dec!(100000), LoanStatus::Disbursed, now());
        loan.interest_rate_bps = 1000;
        loan.term = 12;
        loan.monthly_payment_minor = money::to_minor(details.monthly_payment).unwrap();
        loan.disbursement_date = Some(disbursed);

        let schedule = generate_payment_schedule(&loan);
        assert_eq!(schedule.len(), 12);

        let first = &schedule[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.interest, dec!(833.33));
        assert_eq!(first.principal, dec!(7958.26));
        assert_eq!(first.balance, dec!(92041.74));
        assert_eq!(first.date, Utc.with_ymd_and_hms(2024, 2, 29, 10, 0, 0).unwrap());
        assert_eq!(schedule[2].date, Utc.with_ymd_and_hms(2024, 4, 30, 10, 0, 0).unwrap());

        let last = schedule.last().unwrap();
        assert_eq!(last.month, 12);
        assert_eq!(last.balance, Decimal::ZERO);
        assert!(schedule.iter().all(|e| e.balance >= Decimal::ZERO));
        assert!(schedule.windows(2).all(|w| w[1].balance <= w[0].balance));
    }

    #[test]
    fn test_schedule_starts_from_application_before_disbursement() {
        let applied = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let mut loan = loan_model(1, 1, dec!(6000), LoanStatus::Pending, applied);
        loan.term = 6;

        let schedule = generate_payment_schedule(&loan);
        assert_eq!(schedule.len(), 6);
        assert_eq!(schedule[0].date, Utc.with_ymd_and_hms(2024, 4, 10, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_affordable_loan() {
        let contributions = vec![
            completed(1, dec!(6000), now() - Duration::days(5)),
            completed(2, dec!(3000), now() - Duration::days(35)),
            completed(3, dec!(3000), now() - Duration::days(65)),
            // Outside the sample: fourth most recent, and older than 90 days
            completed(4, dec!(100), now() - Duration::days(80)),
            completed(5, dec!(90000), now() - Duration::days(120)),
        ];

        let affordability =
            assess_affordability(720, &contributions, &[], dec!(100000), 12, now());
        assert_eq!(affordability.monthly_income, dec!(40000));
        assert_eq!(affordability.max_affordable_payment, dec!(12000));
        assert!(affordability.affordable);
        assert_eq!(
            affordability.reasons,
            vec!["Loan payment is within affordable limits"]
        );
    }

    #[test]
    fn test_unaffordable_loan_collects_every_reason() {
        let contributions = vec![completed(1, dec!(500), now() - Duration::days(3))];
        let mut existing = loan_model(1, 1, dec!(20000), LoanStatus::Disbursed, now());
        existing.monthly_payment_minor = 100_000;

        let affordability =
            assess_affordability(720, &contributions, &[existing], dec!(100000), 12, now());
        assert_eq!(affordability.monthly_income, dec!(5000));
        assert!(!affordability.affordable);
        assert_eq!(
            affordability.reasons,
            vec![
                "Debt-to-income ratio too high: 195.8% (max 30%)",
                "Monthly payment exceeds affordable limit: KSh 8,791.59 > KSh 1,500.00",
                "Insufficient income history to assess affordability",
            ]
        );
    }

    #[test]
    fn test_no_recent_income() {
        let affordability = assess_affordability(720, &[], &[], dec!(1000), 6, now());
        assert_eq!(affordability.monthly_income, Decimal::ZERO);
        assert_eq!(affordability.debt_to_income_ratio, Decimal::ONE_HUNDRED);
        assert!(!affordability.affordable);
        assert_eq!(affordability.reasons.len(), 3);
    }

    #[tokio::test]
    async fn test_calculate_affordability_unknown_member() -> Result<()> {
        let store = MemoryStore::default();
        let affordability = calculate_affordability(&store, 9, dec!(10000), 12).await?;
        assert!(!affordability.affordable);
        assert_eq!(
            affordability.reasons.last().unwrap(),
            "Insufficient income history to assess affordability"
        );
        Ok(())
    }
}
