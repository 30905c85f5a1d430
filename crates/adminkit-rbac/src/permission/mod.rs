//! Permission representation: models, string codec and the principal's set

pub mod codec;
pub mod models;
pub mod set;

pub use codec::{
    decode, encode, is_valid_feature, is_well_formed, permission_label, DecodedPermission,
};
pub use models::{Action, Permission};
pub use set::{Grant, PermissionSet};
