//! Result envelope returned by lifecycle operations.

use serde::{Deserialize, Serialize};

/// A human-readable message paired with the affected entity's public fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// What happened, phrased for the end user.
    pub message: String,
    /// The affected entity or entities.
    pub data: T,
}

impl<T> Outcome<T> {
    /// Wrap `data` with a message.
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    /// Transform the payload while keeping the message.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            message: self.message,
            data: f(self.data),
        }
    }
}
