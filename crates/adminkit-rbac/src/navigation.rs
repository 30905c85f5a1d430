//! Navigation filtering

use serde::{Deserialize, Serialize};

use crate::catalog::Feature;
use crate::evaluator::PolicyEvaluator;
use crate::permission::{Permission, PermissionSet};
use crate::routes::RouteRule;

/// Entry of the dashboard sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    /// Display title
    pub title: String,
    /// Route the item links to
    #[serde(alias = "url")]
    pub path: String,
    /// Any one of these makes the item visible
    #[serde(alias = "requiredPermissions")]
    pub required_permissions: Vec<Permission>,
}

impl NavigationItem {
    /// Create a navigation item
    pub fn new(
        title: impl Into<String>,
        path: impl Into<String>,
        required_permissions: Vec<Permission>,
    ) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            required_permissions,
        }
    }

    /// Whether the item is visible to the given permissions.
    ///
    /// Always any-match; an item with no requirements is hidden.
    pub fn is_visible_to(&self, set: &PermissionSet) -> bool {
        PolicyEvaluator::has_any_permission(set, self.required_permissions.as_slice())
    }

    /// Route rule equivalent to this item's visibility requirement
    pub fn route_rule(&self) -> RouteRule {
        RouteRule::new(self.path.clone(), self.required_permissions.clone())
    }
}

/// Filters navigation items through the evaluator
pub struct NavigationFilter;

impl NavigationFilter {
    /// Items visible to `set`, in their original order
    pub fn visible_items<'a>(
        set: &PermissionSet,
        items: &'a [NavigationItem],
    ) -> Vec<&'a NavigationItem> {
        items.iter().filter(|item| item.is_visible_to(set)).collect()
    }
}

/// The dashboard's built-in sidebar, mirroring the built-in route table
pub fn builtin_navigation() -> Vec<NavigationItem> {
    vec![
        NavigationItem::new("Dashboard", "/", vec![Feature::Dashboard.read()]),
        NavigationItem::new("Users", "/users", vec![Feature::Users.read()]),
        NavigationItem::new("Reports", "/reports", vec![Feature::Reports.read()]),
        NavigationItem::new("Monitoring", "/monitoring", vec![Feature::Monitoring.read()]),
        NavigationItem::new("Settings", "/settings", vec![Feature::Settings.read()]),
        NavigationItem::new("Administration", "/admin", vec![Feature::Administration.read()]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Preset;
    use crate::routes::RouteTable;

    fn titles<'a>(items: &[&'a NavigationItem]) -> Vec<&'a str> {
        items.iter().map(|item| item.title.as_str()).collect()
    }

    #[test]
    fn test_visible_items_preserve_order() {
        let items = builtin_navigation();
        let set: PermissionSet = ["settings:read", "dashboard:read", "users:write"]
            .into_iter()
            .collect();

        let visible = NavigationFilter::visible_items(&set, &items);
        assert_eq!(titles(&visible), vec!["Dashboard", "Settings"]);
    }

    #[test]
    fn test_presets() {
        let items = builtin_navigation();

        let manager = PermissionSet::from(Preset::Manager.permissions().as_slice());
        let visible = NavigationFilter::visible_items(&manager, &items);
        assert_eq!(
            titles(&visible),
            vec!["Dashboard", "Users", "Reports", "Monitoring"]
        );

        let super_admin = PermissionSet::from(Preset::SuperAdmin.permissions().as_slice());
        assert_eq!(NavigationFilter::visible_items(&super_admin, &items).len(), 6);
    }

    #[test]
    fn test_empty_set_sees_nothing() {
        let items = builtin_navigation();
        assert!(NavigationFilter::visible_items(&PermissionSet::new(), &items).is_empty());
    }

    #[test]
    fn test_item_without_requirements_is_hidden() {
        let items = vec![NavigationItem::new("Help", "/help", vec![])];
        let set: PermissionSet = ["dashboard:read"].into_iter().collect();
        assert!(NavigationFilter::visible_items(&set, &items).is_empty());
    }

    #[test]
    fn test_builtin_navigation_matches_route_table() {
        let table = RouteTable::builtin();
        for item in builtin_navigation() {
            assert_eq!(table.lookup(&item.path), Some(&item.route_rule()));
        }
    }

    #[test]
    fn test_deserialize_with_url_alias() {
        let json = r#"{"title":"Users","url":"/users","requiredPermissions":["users:read"]}"#;
        let item: NavigationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.path, "/users");
        assert_eq!(item.required_permissions, vec![Permission::read("users")]);
    }
}
