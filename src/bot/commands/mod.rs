//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Administrator commands: contribution confirmation, loan review, overview
pub mod admin;

/// General utility commands
pub mod general;

/// Health insurance commands
pub mod insurance;

/// Loan commands
pub mod loan;

/// Membership, savings and credit score commands
pub mod member;

// Export commands
pub use admin::*;
pub use general::*;
pub use insurance::*;
pub use loan::*;
pub use member::*;
