//! Business logic services
//!
//! Reconciliation provisions moderation resources per community, the ledger
//! tracks activity from platform events, the sweep walks the escalation
//! tiers, and the report renders the ledger for the `afklist` command.

pub mod context;
pub mod error;
pub mod ledger;
pub mod reconciler;
pub mod report;
pub mod sweep;

// Re-export all services for convenience
pub use context::ServiceContext;
pub use error::{ServiceError, ServiceResult};
pub use ledger::ActivityLedger;
pub use reconciler::ResourceReconciler;
pub use report::AfkReport;
pub use sweep::InactivitySweep;
