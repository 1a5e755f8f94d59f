//! User-facing feedback values.
//!
//! Every operation that would pop a toast in a UI instead returns a
//! [`Notice`]; the presentation layer decides how to show it.

use serde::Serialize;

use crate::error::ApiError;

pub const SIGN_IN_MESSAGE: &str = "Your session has expired. Please sign in again.";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to manage inventory.";
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Pick the text a user should see for a failed request.
    ///
    /// Auth failures get a sign-in or permission message. A backend
    /// rejection carries the backend's own message. Everything else is
    /// generic; details go to the log, not the user.
    #[must_use]
    pub fn from_error(err: &ApiError) -> Self {
        match err {
            ApiError::Unauthorized(_) => Self::error(SIGN_IN_MESSAGE),
            ApiError::Forbidden(_) => Self::error(FORBIDDEN_MESSAGE),
            ApiError::Rejected(message) if !message.trim().is_empty() => {
                Self::error(message.trim())
            }
            _ => Self::error(GENERIC_MESSAGE),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, NoticeLevel::Error)
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}
