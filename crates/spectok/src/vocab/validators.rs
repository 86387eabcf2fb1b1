//! Validators for vocabulary invariants.
use crate::{errors::SpectokError, types::TokenType};

/// The size of the u8 space.
pub const U8_SIZE: usize = u8::MAX as usize + 1;

/// Validates that every id in `[0, vocab_size)` fits in `T`.
pub fn try_token_capacity<T: TokenType>(vocab_size: usize) -> crate::errors::SPResult<usize> {
    if vocab_size > 0 && T::from_usize(vocab_size - 1).is_none() {
        Err(SpectokError::Config(format!(
            "vocab size ({vocab_size}) exceeds token type capacity"
        )))
    } else {
        Ok(vocab_size)
    }
}

/// Validates that an inner vocabulary covers the whole u8 space.
pub fn try_inner_vocab_size(size: usize) -> crate::errors::SPResult<usize> {
    if size < U8_SIZE {
        Err(SpectokError::Format(format!(
            "vocab size ({size}) must be >= {U8_SIZE}"
        )))
    } else {
        Ok(size)
    }
}

/// Validates the identity constraint for the first 256 ranks.
///
/// A rank `< 256` must map to exactly the single byte equal to the rank;
/// ranks `>= 256` are unconstrained.
pub fn try_identity_span(
    rank: usize,
    span: &[u8],
) -> crate::errors::SPResult<()> {
    if rank < U8_SIZE && span != [rank as u8] {
        return Err(SpectokError::IdentityViolation {
            rank,
            found: span.to_vec(),
        });
    }
    Ok(())
}
