//! Route permission table
//!
//! Maps a route path to the permissions required to open it. The table is
//! built once from configuration and never mutated; [`SharedRouteTable`]
//! swaps whole tables when configuration is reloaded.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Feature;
use crate::error::{Error, Result};
use crate::evaluator::PolicyEvaluator;
use crate::permission::{Permission, PermissionSet};

/// Required-permission policy attached to a route path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// Route path, e.g. `/users`
    pub path: String,
    /// Permissions checked for this route; must not be empty
    #[serde(alias = "requiredPermissions")]
    pub required_permissions: Vec<Permission>,
    /// Require every permission instead of any one of them
    #[serde(default, alias = "requireAll")]
    pub require_all: bool,
}

impl RouteRule {
    /// Create an any-match rule
    pub fn new(path: impl Into<String>, required_permissions: Vec<Permission>) -> Self {
        Self {
            path: path.into(),
            required_permissions,
            require_all: false,
        }
    }

    /// Switch the rule to all-match
    pub fn requiring_all(mut self) -> Self {
        self.require_all = true;
        self
    }

    /// Reject rules with no requirements or with a permission whose feature is
    /// empty or contains `:`
    pub fn validate(&self) -> Result<()> {
        if self.required_permissions.is_empty() {
            return Err(Error::Validation(format!(
                "route {} has no required permissions",
                self.path
            )));
        }
        if let Some(bad) = self
            .required_permissions
            .iter()
            .find(|permission| !permission.is_well_formed())
        {
            return Err(Error::InvalidPermission(format!(
                "route {} requires malformed permission {:?}",
                self.path,
                bad.encode()
            )));
        }
        Ok(())
    }

    /// Evaluate the rule against a principal's permissions
    pub fn is_satisfied_by(&self, set: &PermissionSet) -> bool {
        PolicyEvaluator::meets_requirement(
            set,
            self.required_permissions.as_slice(),
            self.require_all,
        )
    }
}

/// Static mapping from route path to [`RouteRule`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    rules: HashMap<String, RouteRule>,
}

impl RouteTable {
    /// Table with no rules; every route is unrestricted
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table, rejecting duplicate paths and invalid rules
    pub fn from_rules(rules: impl IntoIterator<Item = RouteRule>) -> Result<Self> {
        let mut table = HashMap::new();

        for rule in rules {
            rule.validate()?;
            if table.contains_key(&rule.path) {
                return Err(Error::DuplicateRoute(rule.path));
            }
            table.insert(rule.path.clone(), rule);
        }

        Ok(Self { rules: table })
    }

    /// The dashboard's built-in route policy
    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules()
                .into_iter()
                .map(|rule| (rule.path.clone(), rule))
                .collect(),
        }
    }

    /// Rule for an exact path, if one is configured
    pub fn lookup(&self, path: &str) -> Option<&RouteRule> {
        self.rules.get(path)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules sorted by path
    pub fn rules(&self) -> Vec<&RouteRule> {
        let mut rules: Vec<&RouteRule> = self.rules.values().collect();
        rules.sort_by(|a, b| a.path.cmp(&b.path));
        rules
    }
}

/// Built-in rules: one read permission per dashboard page, any-match
pub fn builtin_rules() -> Vec<RouteRule> {
    vec![
        RouteRule::new("/", vec![Feature::Dashboard.read()]),
        RouteRule::new("/users", vec![Feature::Users.read()]),
        RouteRule::new("/reports", vec![Feature::Reports.read()]),
        RouteRule::new("/monitoring", vec![Feature::Monitoring.read()]),
        RouteRule::new("/settings", vec![Feature::Settings.read()]),
        RouteRule::new("/admin", vec![Feature::Administration.read()]),
    ]
}

/// Route table shared between readers, replaceable as a whole.
///
/// Readers hold an `Arc` snapshot for the duration of an evaluation, so a
/// concurrent [`replace`](Self::replace) never exposes a half-updated table.
#[derive(Debug, Clone)]
pub struct SharedRouteTable {
    current: Arc<RwLock<Arc<RouteTable>>>,
}

impl SharedRouteTable {
    /// Wrap an initial table
    pub fn new(table: RouteTable) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    /// Current table
    pub fn snapshot(&self) -> Arc<RouteTable> {
        self.current.read().clone()
    }

    /// Install a new table, returning the one it replaced
    pub fn replace(&self, table: RouteTable) -> Arc<RouteTable> {
        let rules = table.len();
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(table));
        debug!(previous_rules = previous.len(), rules, "route table replaced");
        previous
    }
}

impl Default for SharedRouteTable {
    fn default() -> Self {
        Self::new(RouteTable::builtin())
    }
}

impl From<RouteTable> for SharedRouteTable {
    fn from(table: RouteTable) -> Self {
        Self::new(table)
    }
}
