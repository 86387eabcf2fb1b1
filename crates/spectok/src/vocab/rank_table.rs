//! # Rank Table ``{ Vec<u8> <-> T }``
//!
//! The validated, immutable mapping between byte spans and contiguous ranks.

use core::fmt::Debug;

use crate::{
    errors::{SPResult, SpectokError},
    types::{TokenType, hash_map_with_capacity},
    vocab::{
        SpanTokenMap,
        TokenSpanMap,
        validators::{U8_SIZE, try_identity_span, try_inner_vocab_size, try_token_capacity},
    },
};

/// Merge-rank table.
///
/// Invariants, checked at construction:
/// * ranks are exactly the contiguous range ``[0, len)``;
/// * rank `i < 256` is the single byte `i`;
/// * spans are unique;
/// * ``len >= 256``, so every byte is encodable.
#[derive(Clone, PartialEq)]
pub struct RankTable<T: TokenType> {
    /// Map of ``{ Vec<u8> -> T }``.
    span_map: SpanTokenMap<T>,

    /// Table mapping from rank (position) to span.
    rank_spans: Vec<Vec<u8>>,
}

impl<T: TokenType> Debug for RankTable<T> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("RankTable")
            .field("len", &self.len())
            .finish()
    }
}

impl<T: TokenType> RankTable<T> {
    /// Build a [`RankTable`] from spans in rank order.
    ///
    /// ## Arguments
    /// * `rank_spans` - the span for rank `i` at position `i`.
    ///
    /// ## Returns
    /// A validated table, or a `Format` / `IdentityViolation` / `Config` error.
    pub fn from_rank_spans(rank_spans: Vec<Vec<u8>>) -> SPResult<Self> {
        // Corrupt byte ranks are reported before the table size.
        for (rank, span) in rank_spans.iter().take(U8_SIZE).enumerate() {
            try_identity_span(rank, span)?;
        }
        try_inner_vocab_size(rank_spans.len())?;
        try_token_capacity::<T>(rank_spans.len())?;

        let mut span_map: SpanTokenMap<T> = hash_map_with_capacity(rank_spans.len());
        for (rank, span) in rank_spans.iter().enumerate() {
            // try_token_capacity bounds every rank.
            let token = T::from_usize(rank).ok_or_else(|| {
                SpectokError::Config(format!("rank {rank} exceeds token type capacity"))
            })?;

            if let Some(prev) = span_map.insert(span.clone(), token) {
                return Err(SpectokError::Format(format!(
                    "duplicate span {span:?} for ranks {prev} and {rank}"
                )));
            }
        }

        let table = Self {
            span_map,
            rank_spans,
        };
        table.try_validate()?;
        Ok(table)
    }

    /// Re-check size, key-uniqueness, and rank surjectivity.
    fn try_validate(&self) -> SPResult<()> {
        if self.span_map.len() != self.rank_spans.len() {
            return Err(SpectokError::Format(format!(
                "span map has {} entries, expected {}",
                self.span_map.len(),
                self.rank_spans.len()
            )));
        }

        let mut seen = vec![false; self.rank_spans.len()];
        for token in self.span_map.values() {
            match token.to_usize() {
                Some(rank) if rank < seen.len() => seen[rank] = true,
                _ => {
                    return Err(SpectokError::Format(format!(
                        "rank {token} outside [0, {})",
                        seen.len()
                    )));
                }
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(SpectokError::Format(format!(
                "ranks are not contiguous: missing rank {missing}"
            )));
        }

        Ok(())
    }

    /// The number of ranks in the table.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.rank_spans.len()
    }

    /// Get the ``{ Vec<u8> -> T }`` span map.
    pub fn span_map(&self) -> &SpanTokenMap<T> {
        &self.span_map
    }

    /// Get the rank-ordered spans.
    pub fn rank_spans(&self) -> &[Vec<u8>] {
        &self.rank_spans
    }

    /// Return the rank for the span, if any.
    pub fn lookup_rank(
        &self,
        span: &[u8],
    ) -> Option<T> {
        self.span_map.get(span).copied()
    }

    /// Return the span for the rank, if any.
    pub fn lookup_span(
        &self,
        rank: T,
    ) -> Option<&[u8]> {
        rank.to_usize()
            .and_then(|r| self.rank_spans.get(r))
            .map(Vec::as_slice)
    }

    /// Iterate ``(rank, span)`` pairs in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (T, &[u8])> + '_ {
        self.rank_spans
            .iter()
            .enumerate()
            .filter_map(|(rank, span)| T::from_usize(rank).map(|t| (t, span.as_slice())))
    }

    /// Build a ``{ T -> Vec<u8> }`` map, with every rank shifted by `offset`.
    pub fn shifted_token_spans(
        &self,
        offset: T,
    ) -> TokenSpanMap<T> {
        self.iter()
            .map(|(rank, span)| (rank + offset, span.to_vec()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::identity_spans;

    #[test]
    fn test_identity_table() {
        type T = u32;
        let table = RankTable::<T>::from_rank_spans(identity_spans()).unwrap();

        assert_eq!(table.len(), 256);
        for i in 0..256_u32 {
            assert_eq!(table.lookup_span(i), Some([i as u8].as_slice()));
            assert_eq!(table.lookup_rank(&[i as u8]), Some(i));
        }
        assert_eq!(table.lookup_span(256), None);
        assert_eq!(format!("{table:?}"), "RankTable { len: 256 }");
    }

    #[test]
    fn test_merges() {
        type T = u32;
        let mut spans = identity_spans();
        spans.push(b"ab".to_vec());
        spans.push(b"abc".to_vec());

        let table = RankTable::<T>::from_rank_spans(spans).unwrap();
        assert_eq!(table.len(), 258);
        assert_eq!(table.lookup_rank(b"ab"), Some(256));
        assert_eq!(table.lookup_rank(b"abc"), Some(257));
        assert_eq!(table.lookup_rank(b"bc"), None);

        assert_eq!(
            table.iter().map(|(t, _)| t).collect::<Vec<_>>(),
            (0..258).collect::<Vec<T>>()
        );

        let shifted = table.shifted_token_spans(3);
        assert_eq!(shifted.len(), 258);
        assert_eq!(shifted[&3], vec![0]);
        assert_eq!(shifted[&260], b"abc".to_vec());
    }

    #[test]
    fn test_identity_violation() {
        let mut spans = identity_spans();
        spans[3] = vec![4];

        assert!(matches!(
            RankTable::<u32>::from_rank_spans(spans),
            Err(SpectokError::IdentityViolation { rank: 3, .. })
        ));
    }

    #[test]
    fn test_identity_violation_in_short_table() {
        let spans = vec![vec![0], vec![1], vec![2], vec![4]];

        assert!(matches!(
            RankTable::<u32>::from_rank_spans(spans),
            Err(SpectokError::IdentityViolation { rank: 3, .. })
        ));
    }

    #[test]
    fn test_duplicate_span() {
        let mut spans = identity_spans();
        spans.push(b"ab".to_vec());
        spans.push(b"ab".to_vec());

        assert!(matches!(
            RankTable::<u32>::from_rank_spans(spans),
            Err(SpectokError::Format(_))
        ));
    }

    #[test]
    fn test_too_small() {
        let mut spans = identity_spans();
        spans.truncate(100);

        assert!(matches!(
            RankTable::<u32>::from_rank_spans(spans),
            Err(SpectokError::Format(_))
        ));
    }

    #[test]
    fn test_token_capacity() {
        let mut spans = identity_spans();
        spans.push(b"ab".to_vec());

        assert!(matches!(
            RankTable::<u8>::from_rank_spans(spans),
            Err(SpectokError::Config(_))
        ));
    }
}
