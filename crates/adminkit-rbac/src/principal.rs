//! Authenticated user as handed over by the authentication service

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::evaluator::PolicyEvaluator;
use crate::permission::PermissionSet;

/// User object returned by login/signup, with its resolved permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithPermissions {
    pub id: String,
    pub email: String,
    pub name: String,
    /// `feature:action` strings, as resolved by the backend
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl UserWithPermissions {
    /// Parse the authenticator's JSON.
    ///
    /// Malformed permission entries are kept (they will never match) and
    /// reported in the log.
    pub fn from_json(json: &str) -> Result<Self> {
        let user: UserWithPermissions = serde_json::from_str(json)?;

        let report = PolicyEvaluator::validate_permissions(&user.permissions);
        if !report.valid {
            warn!(
                user = %user.id,
                invalid = ?report.invalid,
                "user carries malformed permissions"
            );
        }

        Ok(user)
    }

    /// The user's permissions as an evaluable set
    pub fn permission_set(&self) -> PermissionSet {
        self.permissions.iter().cloned().collect()
    }
}
