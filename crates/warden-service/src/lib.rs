//! # warden-service
//!
//! Application layer: resource reconciliation, the activity ledger, the
//! periodic inactivity sweep, and the AFK report.

pub mod services;

pub use services::{
    ActivityLedger, AfkReport, InactivitySweep, ResourceReconciler, ServiceContext, ServiceError,
    ServiceResult,
};
