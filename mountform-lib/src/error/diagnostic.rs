//! Non-fatal configuration diagnostics.

/// A configuration problem detected while orchestrating a batch.
///
/// Diagnostics never abort a call: the offending field is dropped from the
/// batch and every other field proceeds normally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    /// An update referenced a field that is not in the configuration.
    #[error("{field} is not a valid input")]
    UnknownField { field: String },

    /// A validator returned something other than a boolean, a string or a
    /// deferred outcome.
    #[error(
        "validator for '{field}' must return a boolean representing valid/invalid, \
         a string representing errorText, or a deferred outcome; got {kind} instead"
    )]
    UnsupportedOutcome { field: String, kind: &'static str },
}

impl Diagnostic {
    /// Returns the name of the field the diagnostic refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownField { field } | Self::UnsupportedOutcome { field, .. } => field,
        }
    }
}
