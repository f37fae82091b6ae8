//! Ports - interfaces the engine needs the outside world to implement

mod platform;

pub use platform::{
    ChannelRef, OverwriteTarget, Permission, PermissionOverwrite, PlatformClient, PlatformMember,
    PlatformResult,
};
