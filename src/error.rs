use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    #[error("Invalid attribute value {text:?}: {reason}")]
    InvalidAttributeValue { text: String, reason: &'static str },
    #[error("Invalid spring parameters: stiffness {stiffness} must be positive, damping {damping} must not be negative")]
    InvalidSpringParameters { stiffness: f64, damping: f64 },
    #[error("Start attribute uses {start} but end attribute uses {end}")]
    MismatchedTransform { start: String, end: String },
    #[error("Failed to schedule frame: {0}")]
    Schedule(String),
}

impl AnimationError {
    pub(crate) fn invalid_attribute(text: &str, reason: &'static str) -> Self {
        AnimationError::InvalidAttributeValue {
            text: text.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnimationError>;
