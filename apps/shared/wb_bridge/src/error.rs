use thiserror::Error;
use wb_protocol::EditorMode;

/// Failure categories of a bridge request
///
/// None of them is fatal: the dispatcher turns every variant into an error
/// response and keeps serving.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Named entity, component, field or array index does not exist
    #[error("{0}")]
    NotFound(String),

    /// Required parameter missing or malformed, detected before any native call
    #[error("{0}")]
    InvalidRequest(String),

    /// A native call reported failure for a well-formed request
    #[error("{0}")]
    NativeRejected(String),

    /// A required host module is not present right now
    #[error("{0}")]
    Unavailable(String),
}

/// Category of a [`BridgeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidRequest,
    NativeRejected,
    Unavailable,
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::NotFound(_) => ErrorKind::NotFound,
            BridgeError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            BridgeError::NativeRejected(_) => ErrorKind::NativeRejected,
            BridgeError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }

    /// Missing required request parameter
    pub fn missing(param: &str, action: &str) -> Self {
        BridgeError::InvalidRequest(format!("{} parameter required for {}", param, action))
    }

    /// World editor API missing in the given mode
    pub fn world_unavailable(mode: EditorMode) -> Self {
        match mode {
            EditorMode::NoWorldEditor => {
                BridgeError::Unavailable("WorldEditor module not available".to_string())
            }
            EditorMode::Game | EditorMode::Edit => {
                BridgeError::Unavailable("WorldEditorAPI not available".to_string())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
