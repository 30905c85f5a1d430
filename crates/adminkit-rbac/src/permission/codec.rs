//! Conversion between `feature:action` strings and their parts
//!
//! This is the only place that looks inside a permission string. Everything
//! else treats permissions either as opaque strings or as [`Permission`]
//! values.
//!
//! [`Permission`]: super::Permission

use super::models::Action;

/// Separator between the feature and action segments
pub const SEPARATOR: char = ':';

/// Borrowed halves of a permission string, as produced by [`decode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedPermission<'a> {
    /// Everything before the first `:`
    pub feature: &'a str,
    /// Everything after the first `:`, empty when there is no `:`
    pub action: &'a str,
}

impl<'a> DecodedPermission<'a> {
    /// The action segment as a known [`Action`], if it is one
    pub fn known_action(&self) -> Option<Action> {
        Action::parse(self.action)
    }
}

/// Build the canonical `feature:action` string.
///
/// No escaping is done; a feature containing `:` will not decode back to
/// itself.
pub fn encode(feature: &str, action: Action) -> String {
    let action = action.as_str();
    let mut encoded = String::with_capacity(feature.len() + 1 + action.len());
    encoded.push_str(feature);
    encoded.push(SEPARATOR);
    encoded.push_str(action);
    encoded
}

/// Split a permission string on its first `:`.
///
/// Never fails. A string without `:` decodes to the whole string as the
/// feature and an empty action.
pub fn decode(permission: &str) -> DecodedPermission<'_> {
    match permission.split_once(SEPARATOR) {
        Some((feature, action)) => DecodedPermission { feature, action },
        None => DecodedPermission {
            feature: permission,
            action: "",
        },
    }
}

/// True iff `feature` can stand on the left of a well-formed permission:
/// non-empty and free of `:`
pub fn is_valid_feature(feature: &str) -> bool {
    !feature.is_empty() && !feature.contains(SEPARATOR)
}

/// True iff the string is a non-empty feature, one `:`, and `read` or `write`
pub fn is_well_formed(permission: &str) -> bool {
    let decoded = decode(permission);
    permission.contains(SEPARATOR)
        && !decoded.feature.is_empty()
        && decoded.known_action().is_some()
}

/// Human-readable label, e.g. `activity_logs:read` -> `Activity Logs - Read`
pub fn permission_label(permission: &str) -> String {
    let decoded = decode(permission);
    let feature_label = decoded
        .feature
        .split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    format!("{} - {}", feature_label, capitalize(decoded.action))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
