use thiserror::Error;

use super::mcp::{INTERNAL_FAULT, INVALID_PARAMS, METHOD_NOT_FOUND};

/// Terminal outcome of a request that could not produce a result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    #[error("tool name empty")]
    ToolNameEmpty,
    #[error("tool not found: {0}")]
    ToolNotFound(String),
    #[error("method not supported: {0}")]
    MethodNotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::ToolNameEmpty | DispatchError::ToolNotFound(_) => INVALID_PARAMS,
            DispatchError::MethodNotFound(_) => METHOD_NOT_FOUND,
            DispatchError::Internal(_) => INTERNAL_FAULT,
        }
    }

    /// Client-caused errors, as opposed to server faults.
    pub fn is_protocol_error(&self) -> bool {
        !matches!(self, DispatchError::Internal(_))
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(e: serde_json::Error) -> Self {
        DispatchError::Internal(e.to_string())
    }
}
