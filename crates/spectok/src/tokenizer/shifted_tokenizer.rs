//! # Shifted Tokenizer
//!
//! Text <-> flat ids, with special tokens at ``[0, num_special_tokens)``
//! and base-vocabulary ranks shifted above them.

use std::sync::Arc;

use crate::{
    engine::BpeEngine,
    errors::{SPResult, SpectokError},
    segmentation::{SpanRef, SpecialSegmentor},
    support::strings::string_from_utf8_lossy,
    tokenizer::{IdSpace, TokenId},
    types::TokenType,
    vocab::{RankTable, SpanTokenMap, SpecialTokenList, TokenSpanMap},
};

/// BPE tokenizer over a shifted special-token id space.
///
/// Immutable after construction; share it behind an [`Arc`].
#[derive(Clone)]
pub struct ShiftedTokenizer<T: TokenType> {
    name: Option<String>,
    table: Arc<RankTable<T>>,
    engine: Arc<dyn BpeEngine<T>>,
    specials: Arc<SpecialTokenList>,
    segmentor: SpecialSegmentor,
    id_space: IdSpace<T>,

    /// Flat id of each special index.
    special_ids: Vec<T>,
}

impl<T: TokenType> ShiftedTokenizer<T> {
    /// Assemble a tokenizer from its parts.
    ///
    /// ## Arguments
    /// * `name` - an optional display name.
    /// * `table` - the base vocabulary.
    /// * `engine` - a BPE engine over `table`.
    /// * `specials` - the special-token registry.
    /// * `literal_specials` - also match verbatim registry entries in text.
    pub fn new(
        name: Option<String>,
        table: Arc<RankTable<T>>,
        engine: Arc<dyn BpeEngine<T>>,
        specials: Arc<SpecialTokenList>,
        literal_specials: bool,
    ) -> SPResult<Self> {
        if engine.vocab_size() != table.len() {
            return Err(SpectokError::Config(format!(
                "engine vocab size ({}) does not match rank table ({})",
                engine.vocab_size(),
                table.len()
            )));
        }

        let id_space = IdSpace::new(specials.len(), table.len())?;
        let special_ids = (0..specials.len())
            .map(|idx| id_space.special_to_flat(idx))
            .collect::<SPResult<Vec<T>>>()?;
        let segmentor = SpecialSegmentor::new(specials.clone(), literal_specials)?;

        log::info!(
            "Tokenizer vocab size: {} ({} special + {} inner)",
            id_space.vocab_size(),
            id_space.num_special_tokens(),
            id_space.inner_vocab_size()
        );

        Ok(Self {
            name,
            table,
            engine,
            specials,
            segmentor,
            id_space,
            special_ids,
        })
    }

    /// The tokenizer name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The total number of ids: ``num_special_tokens + inner_vocab_size``.
    pub fn vocab_size(&self) -> usize {
        self.id_space.vocab_size()
    }

    /// The number of special ids.
    pub fn num_special_tokens(&self) -> usize {
        self.id_space.num_special_tokens()
    }

    /// The number of base-vocabulary ranks.
    pub fn inner_vocab_size(&self) -> usize {
        self.id_space.inner_vocab_size()
    }

    /// The id space layout.
    pub fn id_space(&self) -> &IdSpace<T> {
        &self.id_space
    }

    /// The special-token registry.
    pub fn special_tokens(&self) -> &SpecialTokenList {
        &self.specials
    }

    /// The base vocabulary.
    pub fn rank_table(&self) -> &Arc<RankTable<T>> {
        &self.table
    }

    /// The BPE engine.
    pub fn engine(&self) -> &Arc<dyn BpeEngine<T>> {
        &self.engine
    }

    /// The `<unk>` id.
    pub fn unk_id(&self) -> T {
        self.special_ids[self.specials.unk_id()]
    }

    /// The `<s>` id.
    pub fn bos_id(&self) -> T {
        self.special_ids[self.specials.bos_id()]
    }

    /// The `</s>` id.
    pub fn eos_id(&self) -> T {
        self.special_ids[self.specials.eos_id()]
    }

    /// The ``{ bytes -> inner rank }`` map; unshifted.
    pub fn encoder(&self) -> &SpanTokenMap<T> {
        self.table.span_map()
    }

    /// Alias of [`Self::encoder`].
    pub fn vocab(&self) -> &SpanTokenMap<T> {
        self.encoder()
    }

    /// Build the ``{ flat id -> bytes }`` map.
    ///
    /// Holds the shifted base vocabulary and the registry entries as UTF-8.
    pub fn decoder(&self) -> TokenSpanMap<T> {
        let mut decoder = self.table.shifted_token_spans(self.id_space.to_flat(T::zero()));
        for (&id, token) in self.special_ids.iter().zip(self.specials.iter()) {
            decoder.insert(id, token.as_bytes().to_vec());
        }
        decoder
    }

    fn encode_append_plain(
        &self,
        text: &str,
        ids: &mut Vec<T>,
    ) {
        let start = ids.len();
        self.engine.encode_append(text, ids);
        for id in &mut ids[start..] {
            *id = self.id_space.to_flat(*id);
        }
    }

    /// Encode text into flat ids.
    ///
    /// `<SPECIAL_{n}>` markers become id `n` directly; everything else
    /// goes through the BPE engine and is shifted.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text)))]
    pub fn text_to_ids(
        &self,
        text: &str,
    ) -> Vec<T> {
        let mut ids = Vec::with_capacity(text.len() / 3 + 1);
        self.segmentor.for_each_span(text, |span| match span {
            SpanRef::Plain(range) => self.encode_append_plain(&text[range], &mut ids),
            SpanRef::Special { id, .. } => ids.push(self.special_ids[id]),
        });
        ids
    }

    /// Encode text into byte tokens.
    ///
    /// Special references are emitted as their UTF-8 text; plain text as
    /// one byte string per rank.
    pub fn text_to_tokens(
        &self,
        text: &str,
    ) -> SPResult<Vec<Vec<u8>>> {
        let mut tokens = Vec::new();
        let mut result: SPResult<()> = Ok(());
        self.segmentor.for_each_span(text, |span| {
            if result.is_err() {
                return;
            }
            match span {
                SpanRef::Special { range, .. } => tokens.push(text[range].as_bytes().to_vec()),
                SpanRef::Plain(range) => {
                    for rank in self.engine.encode(&text[range]) {
                        match self.engine.decode_single_token_bytes(rank) {
                            Ok(bytes) => tokens.push(bytes),
                            Err(err) => {
                                result = Err(err);
                                return;
                            }
                        }
                    }
                }
            }
        });
        result.map(|_| tokens)
    }

    /// Join byte tokens into text, replacing invalid UTF-8.
    pub fn tokens_to_text<B: AsRef<[u8]>>(
        &self,
        tokens: &[B],
    ) -> String {
        let buf = tokens
            .iter()
            .flat_map(|t| t.as_ref().iter().copied())
            .collect::<Vec<u8>>();
        string_from_utf8_lossy(buf)
    }

    /// Look up a single token's flat id.
    ///
    /// Registry entries map to their index; anything else must encode
    /// to exactly one rank.
    ///
    /// ## Returns
    /// The id, or `AmbiguousToken` when the token is not a single rank.
    pub fn token_to_id(
        &self,
        token: &str,
    ) -> SPResult<T> {
        if let Some(idx) = self.specials.index_of(token) {
            return Ok(self.special_ids[idx]);
        }

        match self.engine.encode(token).as_slice() {
            [rank] => Ok(self.id_space.to_flat(*rank)),
            ranks => Err(SpectokError::AmbiguousToken {
                token: token.to_string(),
                ranks: ranks.iter().filter_map(|r| r.to_u64()).collect(),
            }),
        }
    }

    /// Convert byte tokens to flat ids.
    ///
    /// Registry entries map to their index; anything else is encoded,
    /// and may yield several ids.
    pub fn tokens_to_ids<B: AsRef<[u8]>>(
        &self,
        tokens: &[B],
    ) -> Vec<T> {
        let mut ids = Vec::with_capacity(tokens.len());
        for token in tokens {
            let text = String::from_utf8_lossy(token.as_ref());
            match self.specials.index_of(&text) {
                Some(idx) => ids.push(self.special_ids[idx]),
                None => self.encode_append_plain(&text, &mut ids),
            }
        }
        ids
    }

    /// Convert flat ids to byte tokens.
    ///
    /// ## Returns
    /// One byte string per id, or `TokenOutOfRange`.
    pub fn ids_to_tokens(
        &self,
        ids: &[T],
    ) -> SPResult<Vec<Vec<u8>>> {
        ids.iter()
            .map(|&id| match self.id_space.classify(id)? {
                TokenId::Special(idx) => Ok(self.special_token_bytes(idx)),
                TokenId::Inner(rank) => self.engine.decode_single_token_bytes(rank),
            })
            .collect()
    }

    fn special_token_bytes(
        &self,
        idx: usize,
    ) -> Vec<u8> {
        self.specials
            .get(idx)
            .map(|s| s.as_bytes().to_vec())
            .unwrap_or_default()
    }

    /// Decode flat ids into text.
    ///
    /// ## Arguments
    /// * `ids` - the flat ids.
    /// * `skip_special_tokens` - drop special ids instead of emitting their text.
    ///
    /// ## Returns
    /// The text, or `TokenOutOfRange` for ids ``>= vocab_size``.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, ids)))]
    pub fn ids_to_text(
        &self,
        ids: &[T],
        skip_special_tokens: bool,
    ) -> SPResult<String> {
        let mut text = String::new();
        let mut run: Vec<T> = Vec::new();

        for &id in ids {
            match self.id_space.classify(id)? {
                TokenId::Inner(rank) => run.push(rank),
                TokenId::Special(idx) => {
                    self.flush_run(&mut run, &mut text)?;
                    if !skip_special_tokens && let Some(token) = self.specials.get(idx) {
                        text.push_str(token);
                    }
                }
            }
        }
        self.flush_run(&mut run, &mut text)?;

        Ok(text)
    }

    /// Decode flat ids into text, skipping special tokens.
    pub fn ids_to_text_default(
        &self,
        ids: &[T],
    ) -> SPResult<String> {
        self.ids_to_text(ids, true)
    }

    fn flush_run(
        &self,
        run: &mut Vec<T>,
        text: &mut String,
    ) -> SPResult<()> {
        if !run.is_empty() {
            let bytes = self.engine.decode(run)?;
            text.push_str(&string_from_utf8_lossy(bytes));
            run.clear();
        }
        Ok(())
    }

    /// Encode a batch of texts.
    ///
    /// Runs in parallel with the `rayon` feature.
    pub fn text_to_ids_batch<S>(
        &self,
        batch: &[S],
    ) -> Vec<Vec<T>>
    where
        S: AsRef<str> + Sync,
    {
        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                use rayon::prelude::*;
                batch.par_iter().map(|text| self.text_to_ids(text.as_ref())).collect()
            } else {
                batch.iter().map(|text| self.text_to_ids(text.as_ref())).collect()
            }
        }
    }

    /// Decode a batch of id sequences.
    ///
    /// Runs in parallel with the `rayon` feature.
    pub fn ids_to_text_batch<V>(
        &self,
        batch: &[V],
        skip_special_tokens: bool,
    ) -> SPResult<Vec<String>>
    where
        V: AsRef<[T]> + Sync,
    {
        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                use rayon::prelude::*;
                batch
                    .par_iter()
                    .map(|ids| self.ids_to_text(ids.as_ref(), skip_special_tokens))
                    .collect()
            } else {
                batch
                    .iter()
                    .map(|ids| self.ids_to_text(ids.as_ref(), skip_special_tokens))
                    .collect()
            }
        }
    }
}
