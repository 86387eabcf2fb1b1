//! # BPE Engine Trait

use crate::{errors::SPResult, types::TokenType};

/// A byte-pair merge engine over inner ranks.
///
/// Engines know nothing of special tokens or the shifted id space;
/// every rank in and out is a base-vocabulary rank.
pub trait BpeEngine<T: TokenType>: Send + Sync {
    /// The number of ranks the engine can produce.
    fn vocab_size(&self) -> usize;

    /// Encode text, appending ranks to a target buffer.
    ///
    /// ## Arguments
    /// * `text` - the text to encode.
    /// * `ranks` - the target buffer.
    fn encode_append(
        &self,
        text: &str,
        ranks: &mut Vec<T>,
    );

    /// Encode text into ranks.
    fn encode(
        &self,
        text: &str,
    ) -> Vec<T> {
        let mut ranks = Vec::new();
        self.encode_append(text, &mut ranks);
        ranks
    }

    /// Decode the byte span of a single rank.
    ///
    /// ## Returns
    /// The bytes, or `TokenOutOfRange` for unknown ranks.
    fn decode_single_token_bytes(
        &self,
        rank: T,
    ) -> SPResult<Vec<u8>>;

    /// Decode ranks into their concatenated bytes.
    fn decode(
        &self,
        ranks: &[T],
    ) -> SPResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(ranks.len() * 4);
        for &rank in ranks {
            buf.extend(self.decode_single_token_bytes(rank)?);
        }
        Ok(buf)
    }
}
