//! # warden-gateway
//!
//! Event plumbing between a chat platform adapter and the engine: typed
//! inbound events, a dispatcher that serializes each community's events
//! through its own worker, and the recurring sweep scheduler.

pub mod dispatcher;
pub mod events;
pub mod scheduler;

pub use dispatcher::{DispatcherConfig, EventDispatcher};
pub use events::{PlatformEvent, AFKLIST_COMMAND};
pub use scheduler::SweepScheduler;
