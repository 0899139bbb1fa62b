use thiserror::Error;

use crate::registry::ResponseCode;

/// Lifecycle violations detected by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StateError {
    /// Operation requires platform power.
    #[error("simulator is powered off")]
    PoweredOff,
    /// Operation requires a manufactured TPM.
    #[error("simulator has not been manufactured")]
    NotManufactured,
    /// Command issued before `TPM2_Startup`.
    #[error("tpm has not been started")]
    NotStarted,
    /// `TPM2_Startup` issued twice within one power cycle.
    #[error("tpm is already started")]
    AlreadyStarted,
}

/// Inputs the adapter cannot coerce into engine types.
///
/// Raised before any engine call is made.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ArgumentError {
    /// Hex string is missing its `0x` prefix, has no digits or has a non-hex digit.
    #[error("malformed hex integer {0:?}")]
    MalformedHex(String),
    /// Text input contains a character outside the byte range.
    #[error("character {ch:?} at position {position} does not fit in a byte")]
    NonByteCharacter {
        /// Offending character.
        ch: char,
        /// Character index in the input.
        position: usize,
    },
    /// PCR index outside the 24-entry selection mask.
    #[error("pcr index {0} is outside the selectable range 0..24")]
    PcrIndexOutOfRange(u8),
    /// Signature scheme the engine cannot produce.
    #[error("unsupported signature scheme {0}")]
    UnsupportedScheme(crate::registry::AlgorithmId),
    /// Input longer than the engine parameter can carry.
    #[error("{field} is {len} bytes, at most {max} allowed")]
    Oversize {
        /// Parameter name.
        field: &'static str,
        /// Supplied length.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },
    /// Parameter the bound engine has no slot for, given a non-default value.
    #[error("{0} is not supported by this engine")]
    Unsupported(&'static str),
}

/// Failure reported through an engine port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum EngineError {
    /// Engine rejected the request with a non-success response code.
    #[error("engine returned {0}")]
    Failure(ResponseCode),
    /// Engine refused the call in its current lifecycle state.
    #[error(transparent)]
    State(#[from] StateError),
    /// Engine cannot express the named request parameter; nothing was sent.
    #[error("{0} is not supported by this engine")]
    Unsupported(&'static str),
}

/// Error surfaced by every adapter and controller operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// Engine failure carrying the untouched response code.
    #[error("tpm command failed: {0}")]
    Engine(ResponseCode),
    /// Lifecycle violation passed through from the engine.
    #[error(transparent)]
    State(#[from] StateError),
    /// Input coercion failed before the engine was called.
    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

impl Error {
    /// Returns the engine response code for engine failures.
    #[must_use]
    pub const fn response_code(&self) -> Option<ResponseCode> {
        match self {
            Self::Engine(rc) => Some(*rc),
            Self::State(_) | Self::Argument(_) => None,
        }
    }
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Failure(rc) => Self::Engine(rc),
            EngineError::State(state) => Self::State(state),
            EngineError::Unsupported(parameter) => {
                Self::Argument(ArgumentError::Unsupported(parameter))
            }
        }
    }
}
