//! Classification of validator outcomes

use std::fmt;

use serde_json::Value;

use super::Settlement;
use super::ValidationOutcome;
use crate::error::Diagnostic;
use crate::model::FieldState;
use crate::model::error_marker;
use crate::model::kind_of;

/// A validator outcome resolved against the field's previous value.
pub enum Classified {
    /// The proposed value is accepted.
    Accepted { value: Value },
    /// The proposed value is rejected; the previous value is kept.
    Rejected {
        previous: Value,
        error: Value,
        error_text: Option<String>,
    },
    /// The proposed value awaits an async settlement.
    Pending {
        value: Value,
        previous: Value,
        settlement: Settlement,
    },
}

impl Classified {
    /// The patch applied in the immediate phase.
    pub fn immediate_patch(&self) -> FieldState {
        match self {
            Self::Accepted { value } => FieldState::new(value.clone()).with_validating(false),
            Self::Rejected {
                previous,
                error,
                error_text,
            } => FieldState::rejected(previous.clone(), error.clone(), error_text.clone())
                .with_validating(false),
            Self::Pending { value, .. } => FieldState::new(value.clone()).with_validating(true),
        }
    }

    /// Returns `true` if the field still awaits a settlement.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

impl fmt::Debug for Classified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { value } => f.debug_struct("Accepted").field("value", value).finish(),
            Self::Rejected {
                previous,
                error,
                error_text,
            } => f
                .debug_struct("Rejected")
                .field("previous", previous)
                .field("error", error)
                .field("error_text", error_text)
                .finish(),
            Self::Pending { value, previous, .. } => f
                .debug_struct("Pending")
                .field("value", value)
                .field("previous", previous)
                .finish_non_exhaustive(),
        }
    }
}

/// Classifies a validator outcome for one field.
///
/// A deferred outcome for a value equal to the previous one is accepted
/// immediately; its settlement is dropped without being polled.
pub fn classify(
    field: &str,
    proposed: Value,
    previous: Value,
    outcome: ValidationOutcome,
) -> Result<Classified, Diagnostic> {
    match outcome {
        ValidationOutcome::Accepted => Ok(Classified::Accepted { value: proposed }),
        ValidationOutcome::Rejected => Ok(Classified::Rejected {
            error: error_marker(&proposed),
            previous,
            error_text: None,
        }),
        ValidationOutcome::RejectedWithText(text) => Ok(Classified::Rejected {
            error: error_marker(&proposed),
            previous,
            error_text: Some(text),
        }),
        ValidationOutcome::Deferred(_) if proposed == previous => {
            Ok(Classified::Accepted { value: proposed })
        }
        ValidationOutcome::Deferred(settlement) => Ok(Classified::Pending {
            value: proposed,
            previous,
            settlement,
        }),
        ValidationOutcome::Unsupported(value) => Err(Diagnostic::UnsupportedOutcome {
            field: field.to_string(),
            kind: kind_of(&value),
        }),
    }
}

/// Awaits a settlement and returns the field's final patch.
pub async fn settle(value: Value, previous: Value, settlement: Settlement) -> FieldState {
    match settlement.await {
        Ok(()) => FieldState::new(value),
        Err(error_text) => FieldState::rejected(previous, error_marker(&value), error_text),
    }
}
