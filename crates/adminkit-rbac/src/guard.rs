//! Guard adapters for the UI layer
//!
//! These translate evaluator answers into control-flow signals: a redirect
//! decision for route guards and a render decision for conditional guards.
//! They add no policy of their own beyond the unauthenticated short-circuit.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GuardConfig;
use crate::evaluator::PolicyEvaluator;
use crate::permission::{Action, PermissionSet};
use crate::principal::UserWithPermissions;
use crate::routes::SharedRouteTable;

/// Outcome of a route guard check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RouteDecision {
    /// Render the requested route
    Allow,
    /// Send the principal to the login page, remembering where they wanted to go
    RedirectToLogin { login_path: String, return_to: String },
    /// Authenticated but not permitted; send to the fallback page
    RedirectTo { path: String },
}

impl RouteDecision {
    /// True only for [`RouteDecision::Allow`]
    pub fn is_allowed(&self) -> bool {
        matches!(self, RouteDecision::Allow)
    }
}

impl fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteDecision::Allow => write!(f, "allow"),
            RouteDecision::RedirectToLogin { login_path, .. } => {
                write!(f, "redirect_to_login({})", login_path)
            }
            RouteDecision::RedirectTo { path } => write!(f, "redirect_to({})", path),
        }
    }
}

/// Guard in front of every routed page
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    table: SharedRouteTable,
    config: GuardConfig,
}

impl RouteGuard {
    /// Create a guard over a shared route table with the given redirects
    pub fn new(table: SharedRouteTable, config: GuardConfig) -> Self {
        Self { table, config }
    }

    /// Route table consulted by this guard
    pub fn table(&self) -> &SharedRouteTable {
        &self.table
    }

    /// Decide what to do with a navigation to `current_path`.
    ///
    /// Unauthenticated principals are redirected to login before any
    /// permission is looked at.
    pub fn check(
        &self,
        current_path: &str,
        is_authenticated: bool,
        set: &PermissionSet,
    ) -> RouteDecision {
        let decision = if !is_authenticated {
            RouteDecision::RedirectToLogin {
                login_path: self.config.login_path.clone(),
                return_to: current_path.to_string(),
            }
        } else if !PolicyEvaluator::can_access_route(set, current_path, &self.table.snapshot()) {
            RouteDecision::RedirectTo {
                path: self.config.fallback_path.clone(),
            }
        } else {
            RouteDecision::Allow
        };

        debug!(path = current_path, decision = %decision, "route guard");
        decision
    }

    /// Same as [`check`](Self::check), with `None` meaning unauthenticated
    pub fn check_user(
        &self,
        current_path: &str,
        user: Option<&UserWithPermissions>,
    ) -> RouteDecision {
        match user {
            Some(user) => self.check(current_path, true, &user.permission_set()),
            None => self.check(current_path, false, &PermissionSet::new()),
        }
    }
}

/// A resolved conditional-render requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// One action on one feature
    FeatureAction { feature: String, action: Action },
    /// A literal permission string
    Exact(String),
    /// A non-empty list with any/all semantics
    List {
        permissions: Vec<String>,
        require_all: bool,
    },
}

impl Requirement {
    /// Any one of `permissions`, as the legacy role guard checked
    pub fn any_of(permissions: Vec<String>) -> Self {
        Requirement::List {
            permissions,
            require_all: false,
        }
    }

    /// Every one of `permissions`
    pub fn all_of(permissions: Vec<String>) -> Self {
        Requirement::List {
            permissions,
            require_all: true,
        }
    }

    /// Evaluate against a permission set.
    ///
    /// A list requirement with no entries is never satisfied, whatever its
    /// `require_all` flag.
    pub fn is_satisfied_by(&self, set: &PermissionSet) -> bool {
        match self {
            Requirement::FeatureAction { feature, action } => {
                PolicyEvaluator::has_permission(set, feature, *action)
            }
            Requirement::Exact(permission) => PolicyEvaluator::check_permission(set, permission),
            Requirement::List { permissions, .. } if permissions.is_empty() => false,
            Requirement::List {
                permissions,
                require_all,
            } => PolicyEvaluator::meets_requirement(set, permissions.as_slice(), *require_all),
        }
    }
}

/// Declarative guard props as written by the UI layer.
///
/// Several forms may be filled in; the first complete one wins, in order:
/// feature and action, then exact permission, then permission list. Empty
/// strings and empty lists count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardSpec {
    pub feature: Option<String>,
    pub action: Option<Action>,
    pub permission: Option<String>,
    pub permissions: Option<Vec<String>>,
    #[serde(alias = "requireAll")]
    pub require_all: bool,
}

impl GuardSpec {
    /// Guard on one action of one feature
    pub fn feature_action(feature: impl Into<String>, action: Action) -> Self {
        Self {
            feature: Some(feature.into()),
            action: Some(action),
            ..Self::default()
        }
    }

    /// Guard on a literal permission string
    pub fn exact(permission: impl Into<String>) -> Self {
        Self {
            permission: Some(permission.into()),
            ..Self::default()
        }
    }

    /// Guard on a permission list with any/all semantics
    pub fn list(permissions: Vec<String>, require_all: bool) -> Self {
        Self {
            permissions: Some(permissions),
            require_all,
            ..Self::default()
        }
    }

    /// Pick the requirement by precedence; `None` when no form is complete
    pub fn resolve(&self) -> Option<Requirement> {
        let feature = self.feature.as_deref().filter(|f| !f.is_empty());
        if let (Some(feature), Some(action)) = (feature, self.action) {
            return Some(Requirement::FeatureAction {
                feature: feature.to_string(),
                action,
            });
        }

        if let Some(permission) = self.permission.as_deref().filter(|p| !p.is_empty()) {
            return Some(Requirement::Exact(permission.to_string()));
        }

        match &self.permissions {
            Some(permissions) if !permissions.is_empty() => Some(Requirement::List {
                permissions: permissions.clone(),
                require_all: self.require_all,
            }),
            _ => None,
        }
    }
}

/// Outcome of a conditional guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderDecision {
    Children,
    Fallback,
}

impl RenderDecision {
    /// True only for [`RenderDecision::Children`]
    pub fn renders_children(self) -> bool {
        self == RenderDecision::Children
    }
}

/// Guard around a piece of UI that only some principals may see
pub struct ConditionalGuard;

impl ConditionalGuard {
    /// Render children only when the spec resolves and is satisfied
    pub fn evaluate(spec: &GuardSpec, set: &PermissionSet) -> RenderDecision {
        let granted = spec
            .resolve()
            .map(|requirement| requirement.is_satisfied_by(set))
            .unwrap_or(false);

        if granted {
            RenderDecision::Children
        } else {
            RenderDecision::Fallback
        }
    }

    /// Evaluate an already-resolved requirement
    pub fn evaluate_requirement(requirement: &Requirement, set: &PermissionSet) -> RenderDecision {
        if requirement.is_satisfied_by(set) {
            RenderDecision::Children
        } else {
            RenderDecision::Fallback
        }
    }
}
