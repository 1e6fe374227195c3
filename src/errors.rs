//! Unified error type for SACCO Buddy.
//!
//! Every fallible operation in the crate returns [`Result`]. Loan eligibility and
//! affordability checks never produce errors; they report structured reason lists instead.

use crate::entities::LoanStatus;
use rust_decimal::Decimal;
use thiserror::Error;

/// All errors that can surface from the core, configuration and bot layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration, or invalid free-form input
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any error raised by `SeaORM` / the underlying `SQLite` driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No member registered for the given identifier
    #[error("Member not found: {id}")]
    MemberNotFound {
        /// Member id or Discord user id that was looked up
        id: String,
    },

    /// The Discord user already has a membership
    #[error("User {user_id} is already a registered member")]
    MemberAlreadyRegistered {
        /// Discord user id
        user_id: String,
    },

    /// No loan with the given id
    #[error("Loan not found: {id}")]
    LoanNotFound {
        /// Loan id
        id: i64,
    },

    /// No contribution with the given id
    #[error("Contribution not found: {id}")]
    ContributionNotFound {
        /// Contribution id
        id: i64,
    },

    /// A money amount was zero, negative, below a minimum, or out of range
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// A loan term outside the accepted bounds
    #[error("Invalid loan term: {months} months (allowed {min}-{max})")]
    InvalidTerm {
        /// Requested term
        months: i64,
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },

    /// A loan status change that the lifecycle does not allow
    #[error("Loan {id} cannot move from {from} to {to}")]
    InvalidLoanTransition {
        /// Loan id
        id: i64,
        /// Current status
        from: LoanStatus,
        /// Requested status
        to: LoanStatus,
    },

    /// A repayment against a loan that is not being serviced
    #[error("Loan {id} is {status} and cannot take repayments")]
    LoanNotRepayable {
        /// Loan id
        id: i64,
        /// Current status
        status: LoanStatus,
    },

    /// A contribution that is no longer pending
    #[error("Contribution {id} is already {status}")]
    ContributionAlreadySettled {
        /// Contribution id
        id: i64,
        /// Current status
        status: String,
    },

    /// Insurance subscription refused
    #[error("Insurance error: {message}")]
    Insurance {
        /// Why the subscription was refused
        message: String,
    },

    /// Caller lacks the admin role
    #[error("Only SACCO administrators can use this command")]
    NotAdmin,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Message formatting error
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Integer conversion error
    #[error("Integer conversion error: {0}")]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
