//! Domain entities - the persisted community and member records

mod community;
mod member;

pub use community::{CommunityRecord, ProvisionedResources, ResourceRef};
pub use member::{MemberRecord, RoleRef};
