//! Configuration errors raised while building a form configuration.

/// Error returned when a [`FormConfig`](crate::config::FormConfig) or
/// [`MountPoint`](crate::config::MountPoint) cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The mount point is empty or contains an empty dotted segment.
    #[error("invalid mount point '{mount_point}': {reason}")]
    InvalidMountPoint {
        mount_point: String,
        reason: &'static str,
    },

    /// A field was declared with the reserved form-metadata key.
    #[error("'{field}' is reserved for form metadata and cannot name a field")]
    ReservedFieldName { field: String },

    /// The same field name was declared twice.
    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },
}

impl ConfigError {
    /// Creates a new invalid mount point error.
    pub fn invalid_mount_point(mount_point: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidMountPoint {
            mount_point: mount_point.into(),
            reason,
        }
    }
}
