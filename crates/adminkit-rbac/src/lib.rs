//! Permission-based access control for the adminkit dashboard
//!
//! Evaluates a principal's `feature:action` permission list against route
//! rules, navigation items and conditional-render guards. Permissions come
//! from the authentication service already resolved; this crate only decides.

pub mod catalog;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod guard;
pub mod navigation;
pub mod permission;
pub mod principal;
pub mod routes;

pub use catalog::{available_permissions, Feature, Preset};
pub use config::{ConfigLoader, GuardConfig, RbacConfig};
pub use error::{Error, Result};
pub use evaluator::{FeatureScoped, PolicyEvaluator, ValidationReport, VisibleElement};
pub use guard::{
    ConditionalGuard, GuardSpec, RenderDecision, Requirement, RouteDecision, RouteGuard,
};
pub use navigation::{NavigationFilter, NavigationItem};
pub use permission::{Action, Grant, Permission, PermissionSet};
pub use principal::UserWithPermissions;
pub use routes::{RouteRule, RouteTable, SharedRouteTable};
