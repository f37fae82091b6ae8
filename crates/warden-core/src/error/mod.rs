//! Domain and platform error types

mod domain_error;
mod platform_error;

pub use domain_error::DomainError;
pub use platform_error::PlatformError;
