use crate::external::system_settings::{SettingKey, SettingsError};
use serde_json::{json, Value};
use thiserror::Error;

/// Typed failures of bridge calls
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("WRITE_SETTINGS permission not granted")]
    PermissionDenied,

    #[error("{message}: setting {key} not found")]
    NotFound { message: String, key: SettingKey },

    #[error("{message}: {source}")]
    Platform {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl BridgeError {
    pub fn invalid_argument(message: impl Into<String>) -> BridgeError {
        BridgeError::InvalidArgument(message.into())
    }

    pub fn platform(message: &str, source: impl Into<anyhow::Error>) -> BridgeError {
        BridgeError::Platform {
            message: message.to_owned(),
            source: source.into(),
        }
    }

    /// Attach `message` to a failure of the settings store
    pub fn from_settings(message: &str, error: SettingsError) -> BridgeError {
        match error {
            SettingsError::NotFound(key) => BridgeError::NotFound {
                message: message.to_owned(),
                key,
            },
            SettingsError::Platform(source) => BridgeError::platform(message, source),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::InvalidArgument(_) => "INVALID_ARGUMENT",
            BridgeError::PermissionDenied => "PERMISSION_DENIED",
            BridgeError::NotFound { .. } => "NOT_FOUND",
            BridgeError::Platform { .. } => "PLATFORM_ERROR",
        }
    }

    /// The rejection as sent back to callers of the method surface
    pub fn to_json(&self) -> Value {
        json!({
            "code": self.code(),
            "message": self.to_string(),
        })
    }
}
