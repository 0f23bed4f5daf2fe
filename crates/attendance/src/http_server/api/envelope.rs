//! Failure bodies returned in place of upstream JSON.
//!
//! Successful replies are the upstream JSON passed through untouched; these
//! shapes only appear when the proxy itself has to answer.

use serde::{Deserialize, Serialize};

/// Failure shape for the attendee list. It keeps the list fields so the
/// client can render an empty table without special-casing errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendeesEnvelope {
    pub success: bool,
    pub count: u64,
    pub attendees: Vec<serde_json::Value>,
    pub registered: Vec<serde_json::Value>,
    pub error: String,
}

impl AttendeesEnvelope {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            count: 0,
            attendees: Vec::new(),
            registered: Vec::new(),
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

impl MessageEnvelope {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
