//! Access-control configuration
//!
//! Route rules, navigation items and guard redirect targets are loaded from
//! an optional TOML file layered with `ADMINKIT_*` environment variables.
//! Anything not configured falls back to the built-in dashboard policy.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::navigation::{builtin_navigation, NavigationItem};
use crate::routes::{builtin_rules, RouteRule, RouteTable};

/// Default redirect for unauthenticated principals
pub const DEFAULT_LOGIN_PATH: &str = "/auth";
/// Default redirect for authenticated principals lacking permission
pub const DEFAULT_FALLBACK_PATH: &str = "/unauthorized";
/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "ADMINKIT";

/// Redirect targets used by the route guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub login_path: String,
    pub fallback_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            fallback_path: DEFAULT_FALLBACK_PATH.to_string(),
        }
    }
}

/// Complete access-control configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RbacConfig {
    /// Route permission rules
    pub routes: Vec<RouteRule>,
    /// Sidebar entries
    pub navigation: Vec<NavigationItem>,
    /// Guard redirect targets
    pub guard: GuardConfig,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            routes: builtin_rules(),
            navigation: builtin_navigation(),
            guard: GuardConfig::default(),
        }
    }
}

impl RbacConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RbacConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check paths and rule shapes
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for rule in &self.routes {
            validate_path("route", &rule.path)?;
            rule.validate()?;
            if !seen.insert(rule.path.as_str()) {
                return Err(Error::DuplicateRoute(rule.path.clone()));
            }
        }

        for item in &self.navigation {
            if item.title.trim().is_empty() {
                return Err(Error::Validation(format!(
                    "navigation item for {} has no title",
                    item.path
                )));
            }
            validate_path("navigation item", &item.path)?;
            if let Some(bad) = item
                .required_permissions
                .iter()
                .find(|permission| !permission.is_well_formed())
            {
                return Err(Error::InvalidPermission(format!(
                    "navigation item {} requires malformed permission {:?}",
                    item.title,
                    bad.encode()
                )));
            }
        }

        validate_path("guard login_path", &self.guard.login_path)?;
        validate_path("guard fallback_path", &self.guard.fallback_path)?;
        Ok(())
    }

    /// Build the route table described by this configuration
    pub fn route_table(&self) -> Result<RouteTable> {
        RouteTable::from_rules(self.routes.iter().cloned())
    }
}

fn validate_path(what: &str, path: &str) -> Result<()> {
    if path.is_empty() || !path.starts_with('/') {
        return Err(Error::Validation(format!(
            "{} path must start with '/': {:?}",
            what, path
        )));
    }
    Ok(())
}

/// Loads [`RbacConfig`] from file and environment
pub struct ConfigLoader {
    /// Optional TOML file
    config_path: Option<PathBuf>,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Loader using only defaults and the environment
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Loader reading the given TOML file; the file must exist
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: Some(path.as_ref().to_path_buf()),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load, merge and validate the configuration
    pub fn load(&self) -> Result<RbacConfig> {
        let mut builder = Config::builder();

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                )));
            }
            debug!(path = %path.display(), "loading access-control config");
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: RbacConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        info!(
            routes = config.routes.len(),
            navigation = config.navigation.len(),
            "access-control config loaded"
        );
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::{Action, Permission};

    #[test]
    fn test_default_config_is_valid() {
        let config = RbacConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.routes.len(), 6);
        assert_eq!(config.navigation.len(), 6);
        assert_eq!(config.guard.login_path, "/auth");
        assert_eq!(config.guard.fallback_path, "/unauthorized");
    }

    #[test]
    fn test_from_toml_str() {
        let toml = r#"
            [guard]
            fallback_path = "/forbidden"

            [[routes]]
            path = "/admin"
            required_permissions = ["admin:read", "admin:write"]
            require_all = true

            [[routes]]
            path = "/dashboard"
            required_permissions = ["dashboard:read", "reports:read"]
        "#;

        let config = RbacConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.guard.fallback_path, "/forbidden");
        assert_eq!(config.guard.login_path, "/auth");
        assert_eq!(config.routes.len(), 2);
        assert!(config.routes[0].require_all);
        assert!(!config.routes[1].require_all);
        // Navigation was not configured, so the built-in sidebar remains
        assert_eq!(config.navigation.len(), 6);

        let table = config.route_table().unwrap();
        assert_eq!(
            table.lookup("/dashboard").unwrap().required_permissions,
            vec![Permission::read("dashboard"), Permission::read("reports")]
        );
    }

    #[test]
    fn test_malformed_permission_in_config_is_rejected() {
        let toml = r#"
            [[routes]]
            path = "/users"
            required_permissions = ["users:delete"]
        "#;
        assert!(RbacConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = RbacConfig::default();
        config.routes.push(RouteRule::new("/users", vec![Permission::write("users")]));
        assert!(matches!(config.validate(), Err(Error::DuplicateRoute(_))));

        let mut config = RbacConfig::default();
        config.routes.push(RouteRule::new("reports", vec![Permission::read("x")]));
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let mut config = RbacConfig::default();
        config.routes.push(RouteRule::new("/empty", vec![]));
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let mut config = RbacConfig::default();
        config.guard.fallback_path = String::new();
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let mut config = RbacConfig::default();
        config.navigation[0].title = " ".to_string();
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_malformed_typed_permission_fails_validation() {
        let mut config = RbacConfig::default();
        config
            .routes
            .push(RouteRule::new("/x", vec![Permission::new("", Action::Read)]));
        assert!(matches!(config.validate(), Err(Error::InvalidPermission(_))));
        assert!(config.route_table().is_err());

        let mut config = RbacConfig::default();
        config
            .routes
            .push(RouteRule::new("/x", vec![Permission::write("users:read")]));
        assert!(matches!(config.validate(), Err(Error::InvalidPermission(_))));

        let mut config = RbacConfig::default();
        config.navigation[0]
            .required_permissions
            .push(Permission::new("", Action::Write));
        assert!(matches!(config.validate(), Err(Error::InvalidPermission(_))));
    }

    #[test]
    fn test_valid_config_survives_toml_roundtrip() {
        let mut config = RbacConfig::default();
        config.routes.push(
            RouteRule::new("/x", vec![Permission::read("x"), Permission::write("x")])
                .requiring_all(),
        );
        config.validate().unwrap();

        let reparsed = RbacConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_toml_roundtrip_keeps_rules() {
        let config = RbacConfig::default();
        let toml = config.to_toml_string().unwrap();
        let parsed = RbacConfig::from_toml_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }
}
