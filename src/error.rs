use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("local storage is unavailable")]
    StorageUnavailable,

    #[error("local storage rejected the write for key {key}")]
    StorageWrite { key: String },

    #[error("stored settings are corrupt: {0}")]
    CorruptSettings(#[from] serde_json::Error),

    #[error("at least one connection profile is required")]
    LastProfile,

    #[error("profile not found: {id}")]
    UnknownProfile { id: String },

    #[error("command rejected: {message}")]
    CommandRejected { message: String },

    #[error("speech recognition is not supported by this browser")]
    SpeechUnsupported,

    #[error("speech recognition failed: {message}")]
    Speech { message: String },
}

impl AppError {
    /// Errors the user should see instead of only finding them in the console.
    /// Failed commands are logged only.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::LastProfile)
    }

    #[must_use]
    pub fn speech(message: impl Into<String>) -> Self {
        Self::Speech {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn last_profile_message_is_readable() {
        let err = AppError::LastProfile;
        assert_eq!(err.to_string(), "at least one connection profile is required");
        assert!(err.is_user_visible());
    }

    #[test]
    fn corrupt_settings_wraps_serde_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppError = parse.into();
        assert!(err.to_string().starts_with("stored settings are corrupt"));
        assert!(!err.is_user_visible());
    }

    #[test]
    fn rejected_command_is_logged_not_shown() {
        let err = AppError::CommandRejected {
            message: "Failed to establish connection with VNC server.".into(),
        };
        assert!(err.to_string().starts_with("command rejected"));
        assert!(!err.is_user_visible());
    }
}
