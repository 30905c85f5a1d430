//! Subcommand implementations
//!
//! Each command renders its result to a string so that `main` only deals
//! with printing and the exit status.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use adminkit_rbac::{
    Action, ConfigLoader, NavigationFilter, PermissionSet, PolicyEvaluator, Preset, RbacConfig,
    RouteGuard, SharedRouteTable, UserWithPermissions,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "adminkit")]
#[command(about = "Evaluate adminkit dashboard access-control decisions", version)]
pub struct Cli {
    /// TOML file with routes, navigation and guard settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Comma-separated permission list, e.g. users:read,reports:write
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub permissions: Vec<String>,

    /// Use a reference permission set (super_admin, admin, manager, user, viewer)
    #[arg(long, global = true, conflicts_with_all = ["permissions", "user"])]
    pub preset: Option<String>,

    /// JSON user object as returned by the authentication service
    #[arg(short, long, global = true, conflicts_with = "permissions")]
    pub user: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a single feature/action grant
    Check {
        /// Feature name, e.g. users
        feature: String,
        /// Action: read or write
        action: String,
    },
    /// Run the route guard for a path
    Route {
        /// Route path, e.g. /admin
        path: String,
        /// Evaluate as a signed-out visitor
        #[arg(long)]
        unauthenticated: bool,
    },
    /// List the navigation items visible to the principal
    Nav,
    /// Summarize features, actions and admin status
    Features,
    /// Report malformed permission strings
    Validate,
}

/// Rendered command result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    /// False when the check was denied or validation failed
    pub success: bool,
}

impl Outcome {
    fn new(output: String, success: bool) -> Self {
        Self { output, success }
    }
}

/// Execute the parsed command line
pub fn run(cli: &Cli) -> Result<Outcome> {
    let config = load_config(cli.config.as_deref())?;
    let set = resolve_permissions(cli)?;
    debug!(entries = set.len(), "resolved permission set");

    match &cli.command {
        Commands::Check { feature, action } => check(&set, feature, action, cli.json),
        Commands::Route {
            path,
            unauthenticated,
        } => route(&config, &set, path, !unauthenticated, cli.json),
        Commands::Nav => nav(&config, &set, cli.json),
        Commands::Features => features(&set, cli.json),
        Commands::Validate => validate(&set, cli.json),
    }
}

fn load_config(path: Option<&Path>) -> Result<RbacConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    loader.load().context("failed to load access-control configuration")
}

fn resolve_permissions(cli: &Cli) -> Result<PermissionSet> {
    if let Some(name) = &cli.preset {
        let preset: Preset = name.parse()?;
        return Ok(PermissionSet::from(preset.permissions().as_slice()));
    }

    if let Some(path) = &cli.user {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read user file {}", path.display()))?;
        let user = UserWithPermissions::from_json(&content)?;
        return Ok(user.permission_set());
    }

    Ok(cli
        .permissions
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect())
}

fn check(set: &PermissionSet, feature: &str, action: &str, as_json: bool) -> Result<Outcome> {
    let action: Action = action.parse()?;
    let granted = PolicyEvaluator::has_permission(set, feature, action);

    let output = if as_json {
        serde_json::to_string_pretty(&json!({
            "feature": feature,
            "action": action,
            "granted": granted,
        }))?
    } else {
        format!(
            "{}:{} {}",
            feature,
            action,
            if granted { "granted" } else { "denied" }
        )
    };

    Ok(Outcome::new(output, granted))
}

fn route(
    config: &RbacConfig,
    set: &PermissionSet,
    path: &str,
    is_authenticated: bool,
    as_json: bool,
) -> Result<Outcome> {
    let guard = RouteGuard::new(
        SharedRouteTable::new(config.route_table()?),
        config.guard.clone(),
    );
    let decision = guard.check(path, is_authenticated, set);

    let output = if as_json {
        serde_json::to_string_pretty(&decision)?
    } else {
        format!("{} -> {}", path, decision)
    };

    Ok(Outcome::new(output, decision.is_allowed()))
}

fn nav(config: &RbacConfig, set: &PermissionSet, as_json: bool) -> Result<Outcome> {
    let visible = NavigationFilter::visible_items(set, &config.navigation);

    let output = if as_json {
        serde_json::to_string_pretty(&visible)?
    } else {
        let mut out = String::new();
        for item in &visible {
            writeln!(out, "{:<16} {}", item.title, item.path)?;
        }
        if visible.is_empty() {
            out.push_str("(no visible navigation items)\n");
        }
        out
    };

    Ok(Outcome::new(output, true))
}

fn features(set: &PermissionSet, as_json: bool) -> Result<Outcome> {
    let grouped = PolicyEvaluator::group_by_feature(set);
    let admin = PolicyEvaluator::has_admin_access(set);

    let output = if as_json {
        let features: Vec<_> = PolicyEvaluator::user_features(set)
            .into_iter()
            .map(|feature| {
                json!({
                    "feature": feature,
                    "actions": PolicyEvaluator::feature_actions(set, &feature),
                    "read_only": PolicyEvaluator::is_read_only(set, &feature),
                })
            })
            .collect();
        serde_json::to_string_pretty(&json!({
            "features": features,
            "grouped": grouped,
            "admin": admin,
        }))?
    } else {
        let mut out = String::new();
        for (feature, actions) in &grouped {
            let actions: Vec<&str> = actions.iter().map(Action::as_str).collect();
            let marker = if PolicyEvaluator::is_read_only(set, feature) {
                " (read-only)"
            } else {
                ""
            };
            writeln!(out, "{:<16} {}{}", feature, actions.join(", "), marker)?;
        }
        writeln!(out, "admin access: {}", if admin { "yes" } else { "no" })?;
        out
    };

    Ok(Outcome::new(output, true))
}

fn validate(set: &PermissionSet, as_json: bool) -> Result<Outcome> {
    let report = PolicyEvaluator::validate_permissions(set.iter());

    let output = if as_json {
        serde_json::to_string_pretty(&report)?
    } else if report.valid {
        format!("all {} permissions are well formed", set.len())
    } else {
        let mut out = format!("{} malformed permission(s):\n", report.invalid.len());
        for invalid in &report.invalid {
            writeln!(out, "  {:?}", invalid)?;
        }
        out
    };

    Ok(Outcome::new(output, report.valid))
}
