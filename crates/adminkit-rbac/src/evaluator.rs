//! Policy evaluation over a principal's permission set
//!
//! Every function here is a pure function of its arguments. Nothing returns
//! an error: malformed permission strings are treated as "no permission".

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::permission::{codec, Action, Grant, PermissionSet};
use crate::routes::RouteTable;

/// Grants that classify a principal as an administrator. Holding any one is
/// enough.
pub const ADMIN_PERMISSIONS: [&str; 3] = ["users:write", "settings:write", "administration:read"];

/// Outcome of [`PolicyEvaluator::validate_permissions`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no entry was rejected
    pub valid: bool,
    /// Rejected entries, in input order
    pub invalid: Vec<String>,
}

/// A UI element shown only when its requirement holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleElement {
    /// Identifier returned by [`PolicyEvaluator::visible_keys`]
    pub key: String,
    /// Raw permission strings guarding the element
    #[serde(alias = "requiredPermissions")]
    pub required_permissions: Vec<String>,
    /// Require every permission instead of any one of them
    #[serde(default, alias = "requireAll")]
    pub require_all: bool,
}

impl VisibleElement {
    /// Create an any-match element
    pub fn new(key: impl Into<String>, required_permissions: Vec<String>) -> Self {
        Self {
            key: key.into(),
            required_permissions,
            require_all: false,
        }
    }

    /// Switch the element to all-match
    pub fn requiring_all(mut self) -> Self {
        self.require_all = true;
        self
    }
}

/// Items that may be tied to a feature, for [`PolicyEvaluator::filter_by_write_permission`]
pub trait FeatureScoped {
    /// Feature the item belongs to; `None` means the item is unrestricted
    fn feature(&self) -> Option<&str>;
}

/// Stateless access-control decisions
pub struct PolicyEvaluator;

impl PolicyEvaluator {
    /// Check whether the set grants `action` on `feature`
    pub fn has_permission(set: &PermissionSet, feature: &str, action: Action) -> bool {
        set.contains_pair(feature, action)
    }

    /// Check whether the set holds the literal permission string
    pub fn check_permission(set: &PermissionSet, permission: &str) -> bool {
        set.contains(permission)
    }

    /// Check whether at least one required permission is granted.
    ///
    /// An empty `required` list is a denial.
    pub fn has_any_permission<G: Grant>(set: &PermissionSet, required: &[G]) -> bool {
        required.iter().any(|grant| grant.is_granted_by(set))
    }

    /// Check whether every required permission is granted.
    ///
    /// An empty `required` list is satisfied.
    pub fn has_all_permissions<G: Grant>(set: &PermissionSet, required: &[G]) -> bool {
        required.iter().all(|grant| grant.is_granted_by(set))
    }

    /// Any-match or all-match, as selected by `require_all`
    pub fn meets_requirement<G: Grant>(
        set: &PermissionSet,
        required: &[G],
        require_all: bool,
    ) -> bool {
        if require_all {
            Self::has_all_permissions(set, required)
        } else {
            Self::has_any_permission(set, required)
        }
    }

    /// Check whether the set may open `path`.
    ///
    /// # Arguments
    /// * `set` - The principal's permissions
    /// * `path` - Exact route path; no prefix or pattern matching is done
    /// * `table` - Route rules to consult
    ///
    /// # Returns
    /// `true` when no rule is configured for `path`, otherwise the result of
    /// the rule's any/all check
    pub fn can_access_route(set: &PermissionSet, path: &str, table: &RouteTable) -> bool {
        match table.lookup(path) {
            Some(rule) => rule.is_satisfied_by(set),
            None => true,
        }
    }

    /// Distinct features mentioned in the set, in first-seen order.
    ///
    /// Every entry contributes its feature segment, malformed ones included,
    /// so `["reports:delete"]` yields `["reports"]`. This is a superset of the
    /// keys of [`group_by_feature`](Self::group_by_feature), which only counts
    /// `read` and `write` grants.
    pub fn user_features(set: &PermissionSet) -> Vec<String> {
        let mut seen = HashSet::new();
        set.iter()
            .map(|permission| codec::decode(permission).feature)
            .filter(|feature| seen.insert(*feature))
            .map(str::to_string)
            .collect()
    }

    /// Distinct known actions granted on `feature`, in first-seen order
    pub fn feature_actions(set: &PermissionSet, feature: &str) -> Vec<Action> {
        let mut actions = Vec::new();
        for decoded in set.iter().map(codec::decode) {
            if decoded.feature != feature {
                continue;
            }
            if let Some(action) = decoded.known_action() {
                if !actions.contains(&action) {
                    actions.push(action);
                }
            }
        }
        actions
    }

    /// Whether the set grants `feature:write`
    pub fn can_write(set: &PermissionSet, feature: &str) -> bool {
        Self::has_permission(set, feature, Action::Write)
    }

    /// Whether the set grants `feature:read`; `write` does not imply it
    pub fn can_read(set: &PermissionSet, feature: &str) -> bool {
        Self::has_permission(set, feature, Action::Read)
    }

    /// Readable but not writable
    pub fn is_read_only(set: &PermissionSet, feature: &str) -> bool {
        Self::can_read(set, feature) && !Self::can_write(set, feature)
    }

    /// Check the set against [`ADMIN_PERMISSIONS`]
    pub fn has_admin_access(set: &PermissionSet) -> bool {
        Self::has_any_permission(set, &ADMIN_PERMISSIONS)
    }

    /// Report every entry that is not a well-formed `feature:read|write`
    pub fn validate_permissions<I, S>(permissions: I) -> ValidationReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let invalid: Vec<String> = permissions
            .into_iter()
            .filter(|permission| !codec::is_well_formed(permission.as_ref()))
            .map(|permission| permission.as_ref().to_string())
            .collect();

        ValidationReport {
            valid: invalid.is_empty(),
            invalid,
        }
    }

    /// Group the set's known grants by feature.
    ///
    /// Duplicate grants are kept, in received order. Entries whose action is
    /// not `read` or `write` are left out, so a feature that appears only
    /// with unknown actions is listed by
    /// [`user_features`](Self::user_features) but has no key here.
    pub fn group_by_feature(set: &PermissionSet) -> BTreeMap<String, Vec<Action>> {
        let mut grouped: BTreeMap<String, Vec<Action>> = BTreeMap::new();
        for decoded in set.iter().map(codec::decode) {
            if let Some(action) = decoded.known_action() {
                grouped
                    .entry(decoded.feature.to_string())
                    .or_default()
                    .push(action);
            }
        }
        grouped
    }

    /// Keys of the elements whose requirement holds, in input order
    pub fn visible_keys(set: &PermissionSet, elements: &[VisibleElement]) -> Vec<String> {
        elements
            .iter()
            .filter(|element| {
                Self::meets_requirement(
                    set,
                    element.required_permissions.as_slice(),
                    element.require_all,
                )
            })
            .map(|element| element.key.clone())
            .collect()
    }

    /// Keep items that are unscoped or whose feature the set can write
    pub fn filter_by_write_permission<'a, T: FeatureScoped>(
        set: &PermissionSet,
        items: &'a [T],
    ) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| match item.feature() {
                Some(feature) => Self::can_write(set, feature),
                None => true,
            })
            .collect()
    }
}
