//! What a validator returns

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

/// Eventual result of an async validator: `Err(reason)` rejects the value.
pub type Settlement = BoxFuture<'static, Result<(), Option<String>>>;

/// The value produced by a validator.
pub enum ValidationOutcome {
    /// The value is valid.
    Accepted,
    /// The value is invalid, without a message.
    Rejected,
    /// The value is invalid, with the given message.
    RejectedWithText(String),
    /// The value will be validated asynchronously.
    Deferred(Settlement),
    /// A dynamic return shape that is neither a boolean nor a string.
    Unsupported(Value),
}

impl ValidationOutcome {
    /// Wraps a future into a deferred outcome.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<(), Option<String>>> + Send + 'static,
    {
        Self::Deferred(future.boxed())
    }
}

impl From<bool> for ValidationOutcome {
    fn from(valid: bool) -> Self {
        if valid { Self::Accepted } else { Self::Rejected }
    }
}

impl From<String> for ValidationOutcome {
    fn from(text: String) -> Self {
        Self::RejectedWithText(text)
    }
}

impl From<&str> for ValidationOutcome {
    fn from(text: &str) -> Self {
        Self::RejectedWithText(text.to_string())
    }
}

impl From<Value> for ValidationOutcome {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(valid) => valid.into(),
            Value::String(text) => text.into(),
            other => Self::Unsupported(other),
        }
    }
}

impl fmt::Debug for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("Accepted"),
            Self::Rejected => f.write_str("Rejected"),
            Self::RejectedWithText(text) => f.debug_tuple("RejectedWithText").field(text).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
            Self::Unsupported(value) => f.debug_tuple("Unsupported").field(value).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_value() {
        assert!(matches!(ValidationOutcome::from(json!(true)), ValidationOutcome::Accepted));
        assert!(matches!(ValidationOutcome::from(json!(false)), ValidationOutcome::Rejected));
        assert!(matches!(
            ValidationOutcome::from(json!("Too short!")),
            ValidationOutcome::RejectedWithText(text) if text == "Too short!"
        ));
        assert!(matches!(
            ValidationOutcome::from(json!(42)),
            ValidationOutcome::Unsupported(_)
        ));
    }

    #[test]
    fn test_empty_string_still_rejects() {
        assert!(matches!(
            ValidationOutcome::from(""),
            ValidationOutcome::RejectedWithText(text) if text.is_empty()
        ));
    }
}
