//! Shared error type across addrPrism crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request body.
    BadRequest,
    /// The normalization engine rejected or failed the call.
    Engine,
    /// Unsupported config/protocol version.
    UnsupportedVersion,
    /// Invalid configuration.
    Config,
    /// I/O failure (bind, TLS material, config file).
    Io,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Engine => "ENGINE",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Config => "CONFIG",
            ClientCode::Io => "IO",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, AddrPrismError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum AddrPrismError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("engine: {0}")]
    Engine(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("config: {0}")]
    Config(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl AddrPrismError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            AddrPrismError::BadRequest(_) => ClientCode::BadRequest,
            AddrPrismError::Engine(_) => ClientCode::Engine,
            AddrPrismError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            AddrPrismError::Config(_) => ClientCode::Config,
            AddrPrismError::Io(_) => ClientCode::Io,
            AddrPrismError::Internal(_) => ClientCode::Internal,
        }
    }
}
