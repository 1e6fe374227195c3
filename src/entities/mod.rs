//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod contribution;
pub mod credit_score_history;
pub mod insurance_coverage;
pub mod loan;
pub mod loan_payment;
pub mod member;
pub mod status;

// Re-export specific types to avoid conflicts
pub use contribution::{
    Column as ContributionColumn, Entity as Contribution, Model as ContributionModel,
};
pub use credit_score_history::{
    Column as CreditScoreHistoryColumn, Entity as CreditScoreHistory,
    Model as CreditScoreHistoryModel,
};
pub use insurance_coverage::{
    Column as InsuranceCoverageColumn, Entity as InsuranceCoverage,
    Model as InsuranceCoverageModel,
};
pub use loan::{Column as LoanColumn, Entity as Loan, Model as LoanModel};
pub use loan_payment::{
    Column as LoanPaymentColumn, Entity as LoanPayment, Model as LoanPaymentModel,
};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use status::{CoverageStatus, InsuranceTier, LoanStatus, PaymentMethod, PaymentStatus};
