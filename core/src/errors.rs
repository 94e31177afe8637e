/*
Error types for the GIO oracle client
Each layer keeps the kind it was given: a transport failure surfaced through
the EVM runner is still a transport failure.
*/

use thiserror::Error;

/// Errors that can occur while talking to the host or running a call
#[derive(Debug, Error)]
pub enum GioEvmError {
    /// The channel failed before a GIO response was decoded
    #[error("gio transport failed: {0}")]
    Transport(String),

    /// The host answered with a GIO response code other than 200
    #[error("gio domain {domain:#x} failed with response code {code}")]
    Protocol { domain: u32, code: u32 },

    /// A response payload did not match the layout its domain requires
    #[error("gio response decoding failed: {0}")]
    Decoding(String),

    /// The EVM reported an exceptional halt or could not run the call
    #[error("call failed: {0}")]
    Execution(String),
}

/// Result type for GIO oracle operations
pub type Result<T> = core::result::Result<T, GioEvmError>;

impl From<reqwest::Error> for GioEvmError {
    fn from(err: reqwest::Error) -> Self {
        GioEvmError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for GioEvmError {
    fn from(err: url::ParseError) -> Self {
        GioEvmError::Transport(err.to_string())
    }
}

impl From<alloy_primitives::hex::FromHexError> for GioEvmError {
    fn from(err: alloy_primitives::hex::FromHexError) -> Self {
        GioEvmError::Transport(err.to_string())
    }
}

impl From<alloy_rlp::Error> for GioEvmError {
    fn from(err: alloy_rlp::Error) -> Self {
        GioEvmError::Decoding(err.to_string())
    }
}
