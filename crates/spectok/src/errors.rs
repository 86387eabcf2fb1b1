//! # Error Types

use crate::regex::ErrorWrapper;

/// Errors from spectok operations.
#[derive(Debug, thiserror::Error)]
pub enum SpectokError {
    /// Invalid construction parameters.
    ///
    /// Duplicate or missing mandatory special tokens, capacities out of range,
    /// unusable vocabulary paths.
    #[error("config error: {0}")]
    Config(String),

    /// Malformed vocabulary source.
    ///
    /// Wrong record shape, non-contiguous ranks, duplicate spans.
    #[error("format error: {0}")]
    Format(String),

    /// A rank below 256 does not map to the single byte of the same value.
    #[error("identity violation: rank {rank} maps to {found:?}, expected [{rank}]")]
    IdentityViolation {
        /// The offending rank.
        rank: usize,

        /// The bytes the vocabulary declared for the rank.
        found: Vec<u8>,
    },

    /// A single-token lookup did not encode to exactly one rank.
    #[error("token {token:?} should correspond to exactly one id, but got {ranks:?}")]
    AmbiguousToken {
        /// The token text.
        token: String,

        /// The ranks the engine produced for it.
        ranks: Vec<u64>,
    },

    /// A token id outside the flat id space.
    #[error("token id {id} out of range for vocab size {vocab_size}")]
    TokenOutOfRange {
        /// The offending id.
        id: u64,

        /// The size of the id space.
        vocab_size: usize,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("regex error: {0}")]
    Regex(#[from] ErrorWrapper),
}

/// Result type for spectok operations.
pub type SPResult<T> = core::result::Result<T, SpectokError>;

impl SpectokError {
    /// Is this a construction-time error?
    ///
    /// Construction errors are fatal for the instance being built;
    /// per-call errors (ambiguous tokens, out-of-range ids) are recoverable.
    pub fn is_construction_error(&self) -> bool {
        !matches!(
            self,
            Self::AmbiguousToken { .. } | Self::TokenOutOfRange { .. }
        )
    }
}
