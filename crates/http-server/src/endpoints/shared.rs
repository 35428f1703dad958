use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The `{message}` body used by delete confirmations and every error status.
#[derive(Serialize, Deserialize, TS, Debug, Clone, Default, PartialEq)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
