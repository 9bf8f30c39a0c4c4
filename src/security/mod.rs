pub mod capabilities;
pub mod permissions;
pub mod url_validation;

pub use capabilities::{CallerContext, Capability, Role};
pub use permissions::PermissionGate;
