//! # Testing Utilities
//!
//! Small vocabularies for unit tests, integration tests and benchmarks.

use crate::{
    tokenizer::{ShiftedTokenizer, TokenizerOptions},
    types::TokenType,
    vocab::{RankTable, io::RankRecord},
};

/// The 256 identity spans: rank `i` is the byte `i`.
pub fn identity_spans() -> Vec<Vec<u8>> {
    (0..=u8::MAX).map(|b| vec![b]).collect()
}

/// Build rank records: the identity bytes, then `merges` from rank 256.
pub fn build_test_records<S: AsRef<[u8]>>(merges: &[S]) -> Vec<RankRecord> {
    identity_spans()
        .into_iter()
        .chain(merges.iter().map(|m| m.as_ref().to_vec()))
        .enumerate()
        .map(|(rank, span)| RankRecord::new(rank as u64, &span))
        .collect()
}

/// Build a [`RankTable`]: the identity bytes, then `merges` from rank 256.
///
/// ## Panics
/// If the merges are not unique.
pub fn build_test_table<T: TokenType>(merges: &[&str]) -> RankTable<T> {
    let mut spans = identity_spans();
    spans.extend(merges.iter().map(|m| m.as_bytes().to_vec()));
    RankTable::from_rank_spans(spans).expect("valid test table")
}

/// Build a [`ShiftedTokenizer`] with the default sentinels.
///
/// ## Arguments
/// * `merges` - merge spans, ranked from 256.
/// * `num_special_tokens` - the special-token capacity.
///
/// ## Panics
/// If the configuration is invalid.
pub fn build_test_tokenizer<T: TokenType>(
    merges: &[&str],
    num_special_tokens: usize,
) -> ShiftedTokenizer<T> {
    TokenizerOptions::default()
        .with_num_special_tokens(num_special_tokens)
        .build(build_test_table(merges))
        .expect("valid test tokenizer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_test_records() {
        let records = build_test_records(&[b"ab"]);
        assert_eq!(records.len(), 257);
        assert_eq!(records[65].token_bytes, "QQ==");
        assert_eq!(records[65].token_str, "A");
        assert_eq!(records[256].token_bytes, "YWI=");
    }
}
