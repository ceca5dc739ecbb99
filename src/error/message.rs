//! Human-readable messages from failed calls
//!
//! Callers that need to show a failure to the user go through
//! [`extract_message`] instead of probing error shapes themselves.

use serde_json::Value;

use super::AppError;

/// Something that may carry a message safe to show to a user
pub trait MessageSource {
    fn try_extract_message(&self) -> Option<String>;
}

/// User-facing message for `source`, or `fallback` when it has none.
pub fn extract_message<S: MessageSource + ?Sized>(source: &S, fallback: &str) -> String {
    source
        .try_extract_message()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

impl MessageSource for AppError {
    fn try_extract_message(&self) -> Option<String> {
        match self {
            AppError::BadRequest(msg) => Some(msg.clone()),
            // internal details stay in the logs
            AppError::Internal(_) => None,
        }
    }
}

impl MessageSource for anyhow::Error {
    fn try_extract_message(&self) -> Option<String> {
        match self.downcast_ref::<AppError>() {
            Some(app) => app.try_extract_message(),
            None => None,
        }
    }
}

/// Error envelopes returned by the booking API: `{"message": ..}`,
/// `{"error": ..}` (string or `{"message": ..}`), or
/// `{"errors": [{"msg": ..} | ".."]}`.
impl MessageSource for Value {
    fn try_extract_message(&self) -> Option<String> {
        if let Some(msg) = self.get("message").and_then(Value::as_str) {
            return Some(msg.to_string());
        }

        match self.get("error") {
            Some(Value::String(msg)) => return Some(msg.clone()),
            Some(nested @ Value::Object(_)) => {
                if let Some(msg) = nested.try_extract_message() {
                    return Some(msg);
                }
            }
            _ => {}
        }

        let first = self.get("errors")?.as_array()?.first()?;
        match first {
            Value::String(msg) => Some(msg.clone()),
            other => other
                .get("msg")
                .or_else(|| other.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}
