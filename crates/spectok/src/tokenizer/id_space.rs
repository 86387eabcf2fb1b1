//! # Identifier Space
//!
//! One flat id space: ``[0, num_special_tokens)`` are special tokens;
//! ``[num_special_tokens, vocab_size)`` are base-vocabulary ranks,
//! shifted up by `num_special_tokens`.

use crate::{
    errors::{SPResult, SpectokError},
    types::TokenType,
    vocab::validators::try_token_capacity,
};

/// A classified flat id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenId<T: TokenType> {
    /// A special token; the registry index.
    Special(usize),

    /// A base-vocabulary rank.
    Inner(T),
}

/// The flat id space layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdSpace<T: TokenType> {
    offset: T,
    num_special_tokens: usize,
    vocab_size: usize,
}

impl<T: TokenType> IdSpace<T> {
    /// Lay out an id space.
    ///
    /// ## Arguments
    /// * `num_special_tokens` - the special-token capacity.
    /// * `inner_vocab_size` - the number of base-vocabulary ranks.
    ///
    /// ## Returns
    /// The layout, or a `Config` error if `T` cannot hold every id.
    pub fn new(
        num_special_tokens: usize,
        inner_vocab_size: usize,
    ) -> SPResult<Self> {
        let vocab_size = num_special_tokens
            .checked_add(inner_vocab_size)
            .ok_or_else(|| SpectokError::Config("vocab size overflows usize".to_string()))?;
        try_token_capacity::<T>(vocab_size)?;

        let offset = T::from_usize(num_special_tokens).ok_or_else(|| {
            SpectokError::Config(format!(
                "num_special_tokens ({num_special_tokens}) exceeds token type capacity"
            ))
        })?;

        Ok(Self {
            offset,
            num_special_tokens,
            vocab_size,
        })
    }

    /// The number of special ids.
    pub fn num_special_tokens(&self) -> usize {
        self.num_special_tokens
    }

    /// The number of base-vocabulary ranks.
    pub fn inner_vocab_size(&self) -> usize {
        self.vocab_size - self.num_special_tokens
    }

    /// The total number of ids.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Shift a base rank into the flat space.
    pub fn to_flat(
        &self,
        rank: T,
    ) -> T {
        rank + self.offset
    }

    /// Shift a flat id back to its base rank.
    ///
    /// Only valid for ids ``>= num_special_tokens``; see [`Self::classify`].
    pub fn to_inner(
        &self,
        id: T,
    ) -> T {
        id - self.offset
    }

    /// Is `id` a special id?
    pub fn is_special(
        &self,
        id: T,
    ) -> bool {
        id < self.offset
    }

    /// The flat id of a special-token index.
    pub fn special_to_flat(
        &self,
        index: usize,
    ) -> SPResult<T> {
        if index >= self.num_special_tokens {
            return Err(self.out_of_range(index as u64));
        }
        T::from_usize(index).ok_or_else(|| self.out_of_range(index as u64))
    }

    /// Classify a flat id.
    ///
    /// ## Returns
    /// The [`TokenId`], or `TokenOutOfRange` for ids ``>= vocab_size``.
    pub fn classify(
        &self,
        id: T,
    ) -> SPResult<TokenId<T>> {
        match id.to_usize() {
            Some(idx) if idx < self.num_special_tokens => Ok(TokenId::Special(idx)),
            Some(idx) if idx < self.vocab_size => Ok(TokenId::Inner(self.to_inner(id))),
            _ => Err(self.out_of_range(id.to_u64().unwrap_or(u64::MAX))),
        }
    }

    fn out_of_range(
        &self,
        id: u64,
    ) -> SpectokError {
        SpectokError::TokenOutOfRange {
            id,
            vocab_size: self.vocab_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        type T = u32;
        let space = IdSpace::<T>::new(3, 258).unwrap();

        assert_eq!(space.vocab_size(), 261);
        assert_eq!(space.num_special_tokens(), 3);
        assert_eq!(space.inner_vocab_size(), 258);

        assert_eq!(space.to_flat(65), 68);
        assert_eq!(space.to_inner(68), 65);
        assert!(space.is_special(2));
        assert!(!space.is_special(3));
    }

    #[test]
    fn test_classify() {
        type T = u32;
        let space = IdSpace::<T>::new(3, 258).unwrap();

        assert_eq!(space.classify(0).unwrap(), TokenId::Special(0));
        assert_eq!(space.classify(2).unwrap(), TokenId::Special(2));
        assert_eq!(space.classify(3).unwrap(), TokenId::Inner(0));
        assert_eq!(space.classify(260).unwrap(), TokenId::Inner(257));
        assert!(matches!(
            space.classify(261),
            Err(SpectokError::TokenOutOfRange {
                id: 261,
                vocab_size: 261
            })
        ));
    }

    #[test]
    fn test_round_trip() {
        type T = u16;
        let space = IdSpace::<T>::new(1000, 300).unwrap();
        for rank in [0, 1, 255, 299] {
            let id = space.to_flat(rank);
            assert_eq!(space.classify(id).unwrap(), TokenId::Inner(rank));
        }
    }

    #[test]
    fn test_special_to_flat() {
        type T = u32;
        let space = IdSpace::<T>::new(3, 256).unwrap();
        assert_eq!(space.special_to_flat(2).unwrap(), 2);
        assert!(space.special_to_flat(3).is_err());
    }

    #[test]
    fn test_capacity() {
        assert!(IdSpace::<u8>::new(3, 256).is_err());
        assert!(IdSpace::<u16>::new(1000, 64536).is_ok());
        assert!(IdSpace::<u16>::new(1000, 64537).is_err());
    }
}
