//! Core business logic - framework-agnostic SACCO operations.
//!
//! The scoring engine and loan calculator only read and write through
//! [`store::SaccoStore`]; the lifecycle modules work directly on a `SeaORM` connection.

/// Member contributions and their confirmation
pub mod contribution;
/// Credit scoring engine
pub mod credit_score;
/// Health insurance tiers and subscriptions
pub mod insurance;
/// Loan applications, review, disbursement and repayment
pub mod loan;
/// Eligibility, pricing, amortization and affordability
pub mod loan_calculator;
/// Member registration and lookup
pub mod member;
/// Conversions between stored minor units and decimals
pub mod money;
/// Dashboards, admin overview and text formatting
pub mod report;
/// Storage port used by the engines
pub mod store;
