//! Health insurance cover offered to members in good standing.
//!
//! Three fixed tiers are gated on credit score. A member holds at most one active cover,
//! which runs for a year from the subscription date.

use crate::{
    core::money,
    entities::{CoverageStatus, InsuranceCoverage, InsuranceTier, Member, insurance_coverage},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Lowest score that can hold any cover
pub const MIN_INSURANCE_SCORE: i32 = 500;
/// Length of one cover period
pub const COVER_PERIOD_DAYS: i64 = 365;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Fixed terms of one insurance tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierTerms {
    /// Which tier
    pub tier: InsuranceTier,
    /// Display name
    pub name: &'static str,
    /// Maximum annual payout
    pub coverage: Decimal,
    /// Monthly premium
    pub premium: Decimal,
    /// Lowest score allowed to subscribe
    pub min_credit_score: i32,
    /// Dependents covered in addition to the member
    pub max_dependents: u32,
    /// Benefits listed to members
    pub features: &'static [&'static str],
}

/// Every tier, cheapest first.
pub const TIERS: [TierTerms; 3] = [
    TierTerms {
        tier: InsuranceTier::Basic,
        name: "Basic Coverage",
        coverage: dec!(200000),
        premium: dec!(1500),
        min_credit_score: 500,
        max_dependents: 1,
        features: &[
            "Inpatient medical cover",
            "Emergency services",
            "Basic diagnostic tests",
        ],
    },
    TierTerms {
        tier: InsuranceTier::Standard,
        name: "Standard Coverage",
        coverage: dec!(500000),
        premium: dec!(2500),
        min_credit_score: 650,
        max_dependents: 3,
        features: &[
            "Comprehensive medical cover",
            "Outpatient services",
            "Dental and optical",
            "Maternity cover",
            "Annual health checkup",
        ],
    },
    TierTerms {
        tier: InsuranceTier::Premium,
        name: "Premium Coverage",
        coverage: dec!(1000000),
        premium: dec!(4000),
        min_credit_score: 750,
        max_dependents: 5,
        features: &[
            "Executive medical cover",
            "Specialist consultations",
            "Advanced diagnostics",
            "International emergency cover",
            "Wellness programs",
            "Alternative medicine",
            "Mental health support",
        ],
    },
];

/// Terms of a tier.
#[must_use]
pub fn tier_terms(tier: InsuranceTier) -> &'static TierTerms {
    match tier {
        InsuranceTier::Basic => &TIERS[0],
        InsuranceTier::Standard => &TIERS[1],
        InsuranceTier::Premium => &TIERS[2],
    }
}

/// Tiers a member with `score` may subscribe to.
#[must_use]
pub fn eligible_tiers(score: i32) -> Vec<&'static TierTerms> {
    TIERS
        .iter()
        .filter(|terms| score >= terms.min_credit_score)
        .collect()
}

/// Whole days until renewal, rounded up. Negative once the date has passed.
#[must_use]
pub fn days_until_renewal(coverage: &insurance_coverage::Model, now: DateTime<Utc>) -> i64 {
    let millis = (coverage.renewal_date - now).num_milliseconds();
    -(-millis).div_euclid(MILLIS_PER_DAY)
}

/// A member's active cover, if any. Active cover past its renewal date is marked
/// expired and not returned.
pub async fn current_coverage(
    db: &DatabaseConnection,
    member_id: i64,
) -> Result<Option<insurance_coverage::Model>> {
    let Some(coverage) = InsuranceCoverage::find()
        .filter(insurance_coverage::Column::MemberId.eq(member_id))
        .filter(insurance_coverage::Column::Status.eq(CoverageStatus::Active))
        .order_by_desc(insurance_coverage::Column::StartDate)
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    if coverage.renewal_date > Utc::now() {
        return Ok(Some(coverage));
    }

    let coverage_id = coverage.id;
    let mut active_model: insurance_coverage::ActiveModel = coverage.into();
    active_model.status = Set(CoverageStatus::Expired);
    active_model.update(db).await?;
    info!(member_id, coverage_id, "Insurance cover expired");
    Ok(None)
}

/// Subscribes a member to a tier.
///
/// Refused when the member already holds active cover, their stored score is below the
/// tier minimum, or `dependents` exceeds the tier allowance.
pub async fn subscribe(
    db: &DatabaseConnection,
    member_id: i64,
    tier: InsuranceTier,
    dependents: u32,
) -> Result<insurance_coverage::Model> {
    let terms = tier_terms(tier);
    let member = Member::find_by_id(member_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            id: member_id.to_string(),
        })?;

    if current_coverage(db, member.id).await?.is_some() {
        return Err(Error::Insurance {
            message: "You already have active insurance coverage".to_string(),
        });
    }

    if member.credit_score < terms.min_credit_score {
        return Err(Error::Insurance {
            message: format!(
                "{} requires a credit score of at least {} (current: {})",
                terms.name, terms.min_credit_score, member.credit_score
            ),
        });
    }

    if dependents > terms.max_dependents {
        return Err(Error::Insurance {
            message: format!(
                "{} covers at most {} dependents",
                terms.name, terms.max_dependents
            ),
        });
    }

    let start = Utc::now();
    let coverage = insurance_coverage::ActiveModel {
        member_id: Set(member.id),
        tier: Set(tier),
        coverage_minor: Set(money::to_minor(terms.coverage)?),
        premium_minor: Set(money::to_minor(terms.premium)?),
        dependents: Set(i32::try_from(dependents)?),
        status: Set(CoverageStatus::Active),
        start_date: Set(start),
        renewal_date: Set(start + Duration::days(COVER_PERIOD_DAYS)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(member_id = member.id, tier = %tier, "Insurance cover activated");
    Ok(coverage)
}
