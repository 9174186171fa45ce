use thiserror::Error;

use crate::environment::ElementId;

pub type Result<T> = std::result::Result<T, GremlinError>;

/// Faults that abort a single gremlin invocation.
///
/// None of these are fatal to the process; the caller decides whether to keep
/// invoking.
#[derive(Debug, Error)]
pub enum GremlinError {
    #[error("invalid range: min {min} cannot be greater than max {max}")]
    InvalidRange { min: i64, max: i64 },

    #[error("unknown element: {0}")]
    UnknownElement(ElementId),

    #[error("drawn index {index} is out of range for {len} registered elements")]
    IndexOutOfRange { index: u64, len: usize },

    #[error("{strategy} failed: {message}")]
    Strategy {
        strategy: &'static str,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GremlinError {
    #[must_use]
    pub fn strategy(strategy: &'static str, message: impl Into<String>) -> Self {
        Self::Strategy {
            strategy,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GremlinError;
    use crate::environment::ElementId;

    #[test]
    fn invalid_range_message_names_both_bounds() {
        let error = GremlinError::InvalidRange { min: 0, max: -3 };
        assert_eq!(
            error.to_string(),
            "invalid range: min 0 cannot be greater than max -3"
        );
    }

    #[test]
    fn unknown_element_displays_id() {
        let error = GremlinError::UnknownElement(ElementId::new(7));
        assert_eq!(error.to_string(), "unknown element: element#7");
    }

    #[test]
    fn strategy_constructor_preserves_name_and_message() {
        let error = GremlinError::strategy("position selector", "boom");
        assert_eq!(error.to_string(), "position selector failed: boom");
    }
}
