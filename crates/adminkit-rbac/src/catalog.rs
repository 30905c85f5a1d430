//! Known features and reference permission sets
//!
//! The backend is the source of truth for a principal's permissions; this
//! catalog only names what the dashboard knows about. Unknown features coming
//! from the backend are still evaluated normally.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::permission::{Action, Permission};

/// Features of the admin dashboard that permissions are scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Users,
    Reports,
    Settings,
    Monitoring,
    Dashboard,
    ActivityLogs,
    System,
    Administration,
}

impl Feature {
    /// Every known feature
    pub const ALL: [Feature; 8] = [
        Feature::Users,
        Feature::Reports,
        Feature::Settings,
        Feature::Monitoring,
        Feature::Dashboard,
        Feature::ActivityLogs,
        Feature::System,
        Feature::Administration,
    ];

    /// Wire form of the feature
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Users => "users",
            Feature::Reports => "reports",
            Feature::Settings => "settings",
            Feature::Monitoring => "monitoring",
            Feature::Dashboard => "dashboard",
            Feature::ActivityLogs => "activity_logs",
            Feature::System => "system",
            Feature::Administration => "administration",
        }
    }

    /// Permission for `action` on this feature
    pub fn permission(self, action: Action) -> Permission {
        Permission::new(self.as_str(), action)
    }

    /// `feature:read`
    pub fn read(self) -> Permission {
        self.permission(Action::Read)
    }

    /// `feature:write`
    pub fn write(self) -> Permission {
        self.permission(Action::Write)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| Error::UnknownFeature(s.to_string()))
    }
}

/// Every `feature:action` pair of the known features
pub fn available_permissions() -> Vec<Permission> {
    Feature::ALL
        .iter()
        .flat_map(|feature| Action::ALL.iter().map(move |action| feature.permission(*action)))
        .collect()
}

/// Reference permission sets for typical dashboard users.
///
/// These are fixtures for tests and the CLI. They are not roles: nothing in
/// this crate resolves a principal's permissions from a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    SuperAdmin,
    Admin,
    Manager,
    User,
    Viewer,
}

impl Preset {
    /// Every preset, most privileged first
    pub const ALL: [Preset; 5] = [
        Preset::SuperAdmin,
        Preset::Admin,
        Preset::Manager,
        Preset::User,
        Preset::Viewer,
    ];

    /// Snake-case name accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Preset::SuperAdmin => "super_admin",
            Preset::Admin => "admin",
            Preset::Manager => "manager",
            Preset::User => "user",
            Preset::Viewer => "viewer",
        }
    }

    /// Permissions granted by the preset
    pub fn permissions(&self) -> Vec<Permission> {
        use Feature::*;

        match self {
            Preset::SuperAdmin => available_permissions(),
            Preset::Admin => vec![
                Dashboard.read(),
                Users.read(),
                Users.write(),
                Reports.read(),
                Reports.write(),
                Settings.read(),
                Settings.write(),
                Monitoring.read(),
                ActivityLogs.read(),
                Administration.read(),
            ],
            Preset::Manager => vec![
                Dashboard.read(),
                Users.read(),
                Reports.read(),
                Reports.write(),
                Monitoring.read(),
            ],
            Preset::User => vec![Dashboard.read(), Reports.read()],
            Preset::Viewer => vec![Dashboard.read()],
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == normalized)
            .ok_or_else(|| Error::Config(format!("unknown preset: {}", s)))
    }
}
