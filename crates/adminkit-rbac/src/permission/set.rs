//! The principal's permission list

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::codec;
use super::models::{Action, Permission};

/// Permission strings as received from the authenticator.
///
/// Order and duplicates are kept for display, but membership is set-based.
/// Malformed entries are retained verbatim; they never match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PermissionSet {
    entries: Vec<String>,
    index: HashSet<String>,
}

impl PermissionSet {
    /// Create an empty permission set
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact, case-sensitive membership test
    pub fn contains(&self, permission: &str) -> bool {
        self.index.contains(permission)
    }

    /// Membership test for a `(feature, action)` pair.
    ///
    /// A feature that is empty or contains `:` matches nothing, so a
    /// malformed entry such as `users:read:write` cannot satisfy
    /// `("users:read", Write)`.
    pub fn contains_pair(&self, feature: &str, action: Action) -> bool {
        codec::is_valid_feature(feature) && self.contains(&codec::encode(feature, action))
    }

    /// Entries in the order they were received
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of entries, counting duplicates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entries in received order
    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(entries: Vec<String>) -> Self {
        let index = entries.iter().cloned().collect();
        Self { entries, index }
    }
}

impl From<PermissionSet> for Vec<String> {
    fn from(set: PermissionSet) -> Self {
        set.entries
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        iter.into_iter()
            .map(Into::into)
            .collect::<Vec<String>>()
            .into()
    }
}

impl From<&[Permission]> for PermissionSet {
    fn from(permissions: &[Permission]) -> Self {
        permissions.iter().map(Permission::encode).collect()
    }
}

/// Anything that can be looked up in a [`PermissionSet`].
///
/// Lets required-permission lists be given as raw strings (as the UI layer
/// does) or as typed [`Permission`] values (as route configuration does).
pub trait Grant {
    /// Whether `set` holds this grant
    fn is_granted_by(&self, set: &PermissionSet) -> bool;
}

impl Grant for str {
    fn is_granted_by(&self, set: &PermissionSet) -> bool {
        set.contains(self)
    }
}

impl Grant for String {
    fn is_granted_by(&self, set: &PermissionSet) -> bool {
        set.contains(self)
    }
}

impl Grant for Permission {
    fn is_granted_by(&self, set: &PermissionSet) -> bool {
        set.contains_pair(&self.feature, self.action)
    }
}

impl<T: Grant + ?Sized> Grant for &T {
    fn is_granted_by(&self, set: &PermissionSet) -> bool {
        (**self).is_granted_by(set)
    }
}
