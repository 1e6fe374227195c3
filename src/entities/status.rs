//! String-backed enums shared by several entities.
//!
//! Stored as lowercase text so the database stays readable from the `sqlite3` shell.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settlement state of a contribution or a loan payment.
/// Only `Completed` records count toward any financial calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PaymentStatus {
    /// Recorded but not yet confirmed
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Confirmed and counted
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Did not go through
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// Lifecycle of a loan: pending → approved → disbursed → completed, or pending → rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum LoanStatus {
    /// Application awaiting review
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved, not yet paid out
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Turned down; also counts as a default signal for scoring
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Paid out and being repaid
    #[sea_orm(string_value = "disbursed")]
    Disbursed,
    /// Fully repaid
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// How money moved into the SACCO.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PaymentMethod {
    /// Mobile money
    #[sea_orm(string_value = "mpesa")]
    Mpesa,
    /// Bank transfer
    #[sea_orm(string_value = "bank")]
    Bank,
    /// Cash handed to the treasurer
    #[sea_orm(string_value = "cash")]
    Cash,
}

/// Insurance tiers offered to members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum InsuranceTier {
    /// Entry level cover
    #[sea_orm(string_value = "basic")]
    Basic,
    /// Mid level cover
    #[sea_orm(string_value = "standard")]
    Standard,
    /// Top level cover
    #[sea_orm(string_value = "premium")]
    Premium,
}

/// State of an insurance policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum CoverageStatus {
    /// In force
    #[sea_orm(string_value = "active")]
    Active,
    /// Temporarily not in force
    #[sea_orm(string_value = "suspended")]
    Suspended,
    /// Past its renewal date
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl PaymentStatus {
    /// Lowercase label as stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl LoanStatus {
    /// Lowercase label as stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Disbursed => "disbursed",
            Self::Completed => "completed",
        }
    }
}

impl PaymentMethod {
    /// Lowercase label as stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mpesa => "mpesa",
            Self::Bank => "bank",
            Self::Cash => "cash",
        }
    }

    /// Parses a user supplied method name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "mpesa" | "m-pesa" => Some(Self::Mpesa),
            "bank" => Some(Self::Bank),
            "cash" => Some(Self::Cash),
            _ => None,
        }
    }
}

impl InsuranceTier {
    /// Lowercase label as stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }

    /// Parses a user supplied tier name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "standard" => Some(Self::Standard),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }
}

impl CoverageStatus {
    /// Lowercase label as stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Expired => "expired",
        }
    }
}

macro_rules! impl_display {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

impl_display!(PaymentStatus, LoanStatus, PaymentMethod, InsuranceTier, CoverageStatus);
