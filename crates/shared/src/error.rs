use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body some endpoints attach to a non-2xx response. The `message`
/// field is optional on the wire; callers fall back to the numeric
/// status when it is absent or the body is not JSON at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// A server-reported failure carried alongside its HTTP status.
#[derive(Debug, Clone, Error)]
#[error("{}", self.display_message())]
pub struct ApiRejection {
    pub status: u16,
    pub message: Option<String>,
}

impl ApiRejection {
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// The server message when one was parseable, otherwise the status.
    pub fn display_message(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => format!("HTTP status {}", self.status),
        }
    }
}
