//! Flash notices.
//!
//! Short messages shown once after an action, e.g. "Sofa added to cart." or a
//! rejected quantity change. Full-page flows stash them in the session across
//! the redirect; HTMX responses render them inline.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session_keys;

/// How a notice is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    /// CSS modifier used by the flash partial.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A one-shot message for the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Queue this notice for the next full page render.
    ///
    /// Session failures are logged and the notice dropped; a lost flash
    /// message never fails the request.
    pub async fn stash(self, session: &Session) {
        let mut pending = take_all(session).await;
        pending.push(self);
        if let Err(e) = session.insert(session_keys::NOTICES, &pending).await {
            tracing::warn!("Failed to stash notice: {e}");
        }
    }
}

/// Remove and return every pending notice.
pub async fn take_all(session: &Session) -> Vec<Notice> {
    session
        .remove::<Vec<Notice>>(session_keys::NOTICES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}
