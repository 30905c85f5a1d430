//! Integration tests for adminkit-rbac: configuration, guards and navigation together

use adminkit_rbac::{
    Action, ConditionalGuard, ConfigLoader, GuardSpec, NavigationFilter, Permission,
    PermissionSet, PolicyEvaluator, Preset, RbacConfig, RenderDecision, RouteDecision, RouteGuard,
    RouteRule, RouteTable, SharedRouteTable, UserWithPermissions,
};
use serial_test::serial;
use std::io::Write;

fn scenario_set() -> PermissionSet {
    [
        "users:read",
        "users:write",
        "reports:read",
        "dashboard:read",
        "dashboard:write",
    ]
    .into_iter()
    .collect()
}

fn scenario_table() -> RouteTable {
    RouteTable::from_rules(vec![
        RouteRule::new(
            "/admin",
            vec![Permission::read("admin"), Permission::write("admin")],
        )
        .requiring_all(),
        RouteRule::new(
            "/dashboard",
            vec![Permission::read("dashboard"), Permission::read("reports")],
        ),
    ])
    .unwrap()
}

// ============================================================================
// Evaluation scenarios
// ============================================================================

#[test]
fn test_typical_manager_scenario() {
    let set = scenario_set();
    let table = scenario_table();

    assert!(PolicyEvaluator::has_permission(&set, "users", Action::Write));
    assert!(!PolicyEvaluator::has_permission(&set, "settings", Action::Read));

    assert!(PolicyEvaluator::is_read_only(&set, "reports"));
    assert!(!PolicyEvaluator::is_read_only(&set, "users"));

    assert!(PolicyEvaluator::has_admin_access(&set));

    assert!(!PolicyEvaluator::can_access_route(&set, "/admin", &table));
    assert!(PolicyEvaluator::can_access_route(&set, "/dashboard", &table));
}

#[test]
fn test_empty_permission_set_scenario() {
    let set = PermissionSet::new();
    let table = scenario_table();

    assert!(!PolicyEvaluator::has_admin_access(&set));
    assert!(PolicyEvaluator::user_features(&set).is_empty());
    assert!(PolicyEvaluator::group_by_feature(&set).is_empty());

    assert!(!PolicyEvaluator::can_access_route(&set, "/admin", &table));
    assert!(!PolicyEvaluator::can_access_route(&set, "/dashboard", &table));
    assert!(PolicyEvaluator::can_access_route(&set, "/somewhere-else", &table));
}

#[test]
fn test_presets_against_builtin_routes() {
    let table = RouteTable::builtin();

    let viewer = PermissionSet::from(Preset::Viewer.permissions().as_slice());
    assert!(PolicyEvaluator::can_access_route(&viewer, "/", &table));
    assert!(!PolicyEvaluator::can_access_route(&viewer, "/users", &table));
    assert!(!PolicyEvaluator::has_admin_access(&viewer));

    let admin = PermissionSet::from(Preset::Admin.permissions().as_slice());
    for rule in table.rules() {
        assert!(
            PolicyEvaluator::can_access_route(&admin, &rule.path, &table),
            "admin preset should reach {}",
            rule.path
        );
    }
    assert!(PolicyEvaluator::has_admin_access(&admin));
    assert!(PolicyEvaluator::is_read_only(&admin, "monitoring"));
}

// ============================================================================
// Guards and navigation from an authenticated user
// ============================================================================

#[test]
fn test_user_json_through_guards_and_navigation() {
    let user = UserWithPermissions::from_json(
        r#"{
            "id": "u-7",
            "email": "manager@example.com",
            "name": "Manager",
            "permissions": ["dashboard:read", "users:read", "reports:read", "reports:write"]
        }"#,
    )
    .unwrap();

    let config = RbacConfig::default();
    let guard = RouteGuard::new(
        SharedRouteTable::new(config.route_table().unwrap()),
        config.guard.clone(),
    );

    assert!(guard.check_user("/reports", Some(&user)).is_allowed());
    assert_eq!(
        guard.check_user("/settings", Some(&user)),
        RouteDecision::RedirectTo {
            path: "/unauthorized".to_string()
        }
    );
    assert_eq!(
        guard.check_user("/settings", None),
        RouteDecision::RedirectToLogin {
            login_path: "/auth".to_string(),
            return_to: "/settings".to_string(),
        }
    );

    let set = user.permission_set();
    let visible: Vec<&str> = NavigationFilter::visible_items(&set, &config.navigation)
        .into_iter()
        .map(|item| item.title.as_str())
        .collect();
    assert_eq!(visible, vec!["Dashboard", "Users", "Reports"]);

    assert_eq!(
        ConditionalGuard::evaluate(&GuardSpec::feature_action("reports", Action::Write), &set),
        RenderDecision::Children
    );
    assert_eq!(
        ConditionalGuard::evaluate(&GuardSpec::exact("users:write"), &set),
        RenderDecision::Fallback
    );
}

// ============================================================================
// Configuration loading
// ============================================================================

#[test]
#[serial]
fn test_load_config_from_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[guard]
login_path = "/login"

[[routes]]
path = "/admin"
required_permissions = ["administration:read", "administration:write"]
require_all = true

[[navigation]]
title = "Admin"
path = "/admin"
required_permissions = ["administration:read"]
"#
    )
    .unwrap();

    let config = ConfigLoader::with_path(file.path()).load().unwrap();
    assert_eq!(config.guard.login_path, "/login");
    assert_eq!(config.guard.fallback_path, "/unauthorized");
    assert_eq!(config.routes.len(), 1);
    assert_eq!(config.navigation.len(), 1);

    let table = config.route_table().unwrap();
    let reader: PermissionSet = ["administration:read"].into_iter().collect();
    assert!(!PolicyEvaluator::can_access_route(&reader, "/admin", &table));
    assert!(PolicyEvaluator::can_access_route(&reader, "/", &table));
}

#[test]
#[serial]
fn test_load_config_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ConfigLoader::with_path(dir.path().join("absent.toml")).load();
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_load_config_without_file_uses_builtin_policy() {
    let config = ConfigLoader::new()
        .with_env_prefix("ADMINKIT_TEST_NOTHING")
        .load()
        .unwrap();
    assert_eq!(config, RbacConfig::default());
}

#[test]
#[serial]
fn test_environment_overrides_guard_paths() {
    std::env::set_var("ADMINKIT_ITEST_GUARD__FALLBACK_PATH", "/no-access");

    let result = ConfigLoader::new().with_env_prefix("ADMINKIT_ITEST").load();

    std::env::remove_var("ADMINKIT_ITEST_GUARD__FALLBACK_PATH");

    let config = result.unwrap();
    assert_eq!(config.guard.fallback_path, "/no-access");
    assert_eq!(config.guard.login_path, "/auth");
}

#[test]
#[serial]
fn test_invalid_config_file_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[[routes]]
path = "users"
required_permissions = ["users:read"]
"#
    )
    .unwrap();

    assert!(ConfigLoader::with_path(file.path()).load().is_err());
}
