//! UI/backend events and error modeling for the desktop controller.

use shared::domain::{Post, PostId};

use crate::ui::app::ThumbnailImage;

pub enum UiEvent {
    PostsLoaded(Vec<Post>),
    PostLoaded {
        request_id: u64,
        post: Option<Post>,
    },
    ThumbnailLoaded {
        post_id: PostId,
        image: ThumbnailImage,
    },
    ThumbnailFailed {
        post_id: PostId,
        reason: String,
    },
    ContactAccepted,
    ContactRejected {
        status: u16,
        message: Option<String>,
    },
    Info(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Api,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    WorkerStartup,
    PostList,
    PostDetail { request_id: u64 },
    ContactSubmit,
}

/// Maps a raw failure string to what the list/detail views should say.
/// Transport-shaped failures get a retry hint; everything else is
/// surfaced as an API error with the original text.
pub fn classify_fetch_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("request failed")
        || lower.contains("failed to reach")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Server unreachable; check your network and retry.".to_string()
    } else {
        format!("API error: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("request failed")
            || message_lower.contains("failed to reach")
            || message_lower.contains("connection")
            || message_lower.contains("timed out")
            || message_lower.contains("dns")
            || message_lower.contains("network")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("status")
            || message_lower.contains("unexpected response")
            || message_lower.contains("rejected")
        {
            UiErrorCategory::Api
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
