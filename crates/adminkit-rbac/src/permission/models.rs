//! Permission data models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::codec;
use crate::error::{Error, Result};

/// Operation class granted on a feature.
///
/// The two actions are independent: `write` does not imply `read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// View a feature
    Read,
    /// Modify a feature
    Write,
}

impl Action {
    /// Every action, in canonical order
    pub const ALL: [Action; 2] = [Action::Read, Action::Write];

    /// Wire form of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
        }
    }

    /// Exact, case-sensitive parse of the wire form
    pub fn parse(value: &str) -> Option<Action> {
        match value {
            "read" => Some(Action::Read),
            "write" => Some(Action::Write),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::parse(s).ok_or_else(|| Error::InvalidAction(s.to_string()))
    }
}

/// A single grant: an action on a feature.
///
/// The feature is kept as a free-form string so that features unknown to
/// [`Feature`](crate::catalog::Feature) still round-trip. Serialized as the
/// canonical `feature:action` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    /// Feature the permission is scoped to
    pub feature: String,
    /// Granted action
    pub action: Action,
}

impl Permission {
    /// Create a new permission without checking the feature.
    ///
    /// Use [`try_new`](Self::try_new) for untrusted input. A permission with
    /// an empty feature or one containing `:` is rejected by route tables and
    /// configuration validation, and is never granted.
    pub fn new(feature: impl Into<String>, action: Action) -> Self {
        Self {
            feature: feature.into(),
            action,
        }
    }

    /// Create a permission, rejecting features that would not encode to a
    /// well-formed string
    pub fn try_new(feature: impl Into<String>, action: Action) -> Result<Self> {
        let permission = Self::new(feature, action);
        if !permission.is_well_formed() {
            return Err(Error::InvalidPermission(permission.encode()));
        }
        Ok(permission)
    }

    /// Read access to a feature
    pub fn read(feature: impl Into<String>) -> Self {
        Self::new(feature, Action::Read)
    }

    /// Write access to a feature
    pub fn write(feature: impl Into<String>) -> Self {
        Self::new(feature, Action::Write)
    }

    /// Canonical `feature:action` form
    pub fn encode(&self) -> String {
        codec::encode(&self.feature, self.action)
    }

    /// Whether the encoded form parses back to this permission
    pub fn is_well_formed(&self) -> bool {
        codec::is_valid_feature(&self.feature)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.feature, codec::SEPARATOR, self.action)
    }
}

impl FromStr for Permission {
    type Err = Error;

    /// Strict parse; rejects anything [`codec::is_well_formed`] rejects
    fn from_str(s: &str) -> Result<Self> {
        if !codec::is_well_formed(s) {
            return Err(Error::InvalidPermission(s.to_string()));
        }
        let decoded = codec::decode(s);
        let action = decoded
            .known_action()
            .ok_or_else(|| Error::InvalidAction(decoded.action.to_string()))?;
        Ok(Permission::new(decoded.feature, action))
    }
}

impl TryFrom<String> for Permission {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.encode()
    }
}
