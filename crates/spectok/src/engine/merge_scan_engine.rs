//! # Merge Scan BPE Engine
//!
//! Splits text into words with the pre-segmentation regex; then
//! incrementally re-scans each word for the lowest-rank merge,
//! and iterates until no more merges remain.

use core::ops::Range;
use std::sync::Arc;

use crate::{
    engine::BpeEngine,
    errors::{SPResult, SpectokError},
    regex::{RegexWrapper, RegexWrapperPattern},
    types::TokenType,
    vocab::{RankTable, validators::U8_SIZE},
};

/// Walk the word spans of `text`, covering any bytes the regex skips.
///
/// Unmatched gaps, and the tail after an aborted scan, are emitted as words.
pub fn for_each_word_range<F>(
    word_re: &RegexWrapper,
    text: &str,
    mut f: F,
) where
    F: FnMut(Range<usize>),
{
    let mut last = 0;
    for range in word_re.find_ranges(text) {
        if range.is_empty() {
            continue;
        }
        if last < range.start {
            f(last..range.start);
        }
        last = range.end;
        f(range);
    }
    if last < text.len() {
        f(last..text.len());
    }
}

/// A [`BpeEngine`] which incrementally scans for merges.
#[derive(Clone)]
pub struct MergeScanBpeEngine<T: TokenType> {
    table: Arc<RankTable<T>>,
    byte_ranks: Vec<T>,
    word_re: RegexWrapper,
}

impl<T: TokenType> MergeScanBpeEngine<T> {
    /// Build an engine.
    ///
    /// ## Arguments
    /// * `table` - the rank table.
    /// * `pattern` - the word pre-segmentation pattern.
    pub fn new<P>(
        table: Arc<RankTable<T>>,
        pattern: P,
    ) -> SPResult<Self>
    where
        P: Into<RegexWrapperPattern>,
    {
        let pattern = pattern.into();
        log::debug!("BPE engine pattern: {}", pattern.as_str());
        let word_re = pattern.compile()?;

        let byte_ranks = (0..U8_SIZE)
            .map(|b| {
                T::from_usize(b).ok_or_else(|| {
                    SpectokError::Config(format!("byte rank {b} exceeds token type capacity"))
                })
            })
            .collect::<SPResult<Vec<T>>>()?;

        Ok(Self {
            table,
            byte_ranks,
            word_re,
        })
    }

    /// The rank table.
    pub fn table(&self) -> &Arc<RankTable<T>> {
        &self.table
    }

    /// The compiled word regex.
    pub fn word_regex(&self) -> &RegexWrapper {
        &self.word_re
    }

    /// Encode one word, appending ranks to the buffer.
    pub fn encode_append_word(
        &self,
        word: &[u8],
        ranks: &mut Vec<T>,
    ) {
        if let Some(rank) = self.table.lookup_rank(word) {
            ranks.push(rank);
            return;
        }

        // (start offset, rank) of each part.
        let mut parts: Vec<(usize, T)> = word
            .iter()
            .enumerate()
            .map(|(idx, &b)| (idx, self.byte_ranks[b as usize]))
            .collect();

        while parts.len() >= 2 {
            // Find the lowest ranked merge available; ties go left.
            let best = (0..parts.len() - 1)
                .filter_map(|idx| {
                    let start = parts[idx].0;
                    let end = parts.get(idx + 2).map_or(word.len(), |p| p.0);
                    self.table
                        .lookup_rank(&word[start..end])
                        .map(|rank| (rank, idx))
                })
                .min();

            match best {
                Some((rank, idx)) => {
                    parts[idx].1 = rank;
                    parts.remove(idx + 1);
                }
                None => break,
            }
        }

        ranks.extend(parts.into_iter().map(|(_, rank)| rank));
    }
}

impl<T: TokenType> BpeEngine<T> for MergeScanBpeEngine<T> {
    fn vocab_size(&self) -> usize {
        self.table.len()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text, ranks)))]
    fn encode_append(
        &self,
        text: &str,
        ranks: &mut Vec<T>,
    ) {
        for_each_word_range(&self.word_re, text, |range| {
            self.encode_append_word(text[range].as_bytes(), ranks)
        });
    }

    fn decode_single_token_bytes(
        &self,
        rank: T,
    ) -> SPResult<Vec<u8>> {
        self.table
            .lookup_span(rank)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| SpectokError::TokenOutOfRange {
                id: rank.to_u64().unwrap_or(u64::MAX),
                vocab_size: self.table.len(),
            })
    }
}
