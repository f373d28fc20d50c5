//! Dotted storage addresses inside the external store

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde::Serializer;

use crate::error::ConfigError;

/// Mount point used when a configuration does not override it.
pub const DEFAULT_MOUNT_POINT: &str = "inputs";

/// A dotted path (e.g. `"page.inputs"`) addressing the subtree of the
/// store where a form's field states live.
///
/// # Example
///
/// ```
/// use mountform_lib::config::MountPoint;
///
/// let mount_point: MountPoint = "page.inputs".parse().unwrap();
/// assert_eq!(mount_point.segments().collect::<Vec<_>>(), vec!["page", "inputs"]);
/// assert!("page..inputs".parse::<MountPoint>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountPoint(String);

impl MountPoint {
    /// Parses a dotted path, rejecting empty paths and empty segments.
    pub fn new(path: impl Into<String>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ConfigError::invalid_mount_point(path, "path is empty"));
        }
        if path.split('.').any(str::is_empty) {
            return Err(ConfigError::invalid_mount_point(path, "path has an empty segment"));
        }
        Ok(Self(path))
    }

    /// Returns the dotted path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl Default for MountPoint {
    fn default() -> Self {
        Self(DEFAULT_MOUNT_POINT.to_string())
    }
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MountPoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for MountPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
