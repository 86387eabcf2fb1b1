//! # Tokenizer Options

use std::{path::Path, sync::Arc};

use crate::{
    engine::MergeScanBpeEngine,
    errors::{SPResult, SpectokError},
    patterns::{
        DEFAULT_NUM_SPECIAL_TOKENS,
        DEFAULT_SPECIAL_TOKENS,
        DEFAULT_TIKTOKEN_MAX_VOCAB,
        PATTERN_TIKTOKEN,
    },
    regex::RegexWrapperPattern,
    tokenizer::ShiftedTokenizer,
    types::TokenType,
    vocab::{RankTable, SpecialTokenList, io::load_rank_table_path},
};

/// Options for configuring a [`ShiftedTokenizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizerOptions {
    /// The word pre-segmentation pattern.
    pub pattern: RegexWrapperPattern,

    /// The total flat id capacity; specials included.
    pub vocab_size: usize,

    /// The number of reserved special ids.
    pub num_special_tokens: usize,

    /// The leading special tokens; fillers pad the rest.
    pub special_tokens: Vec<String>,

    /// Also treat verbatim registry entries in text as special tokens.
    pub literal_specials: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            pattern: PATTERN_TIKTOKEN.to_pattern(),
            vocab_size: DEFAULT_TIKTOKEN_MAX_VOCAB,
            num_special_tokens: DEFAULT_NUM_SPECIAL_TOKENS,
            special_tokens: DEFAULT_SPECIAL_TOKENS.iter().map(|s| s.to_string()).collect(),
            literal_specials: false,
        }
    }
}

impl TokenizerOptions {
    /// Sets the word pre-segmentation pattern.
    pub fn with_pattern<P: Into<RegexWrapperPattern>>(
        mut self,
        pattern: P,
    ) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Sets the total flat id capacity.
    pub fn with_vocab_size(
        mut self,
        vocab_size: usize,
    ) -> Self {
        self.vocab_size = vocab_size;
        self
    }

    /// Sets the number of reserved special ids.
    pub fn with_num_special_tokens(
        mut self,
        num_special_tokens: usize,
    ) -> Self {
        self.num_special_tokens = num_special_tokens;
        self
    }

    /// Sets the leading special tokens.
    pub fn with_special_tokens<S: AsRef<str>>(
        mut self,
        special_tokens: &[S],
    ) -> Self {
        self.special_tokens = special_tokens
            .iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        self
    }

    /// Sets whether verbatim registry entries are special-token references.
    pub fn with_literal_specials(
        mut self,
        literal_specials: bool,
    ) -> Self {
        self.literal_specials = literal_specials;
        self
    }

    /// The cap on base-vocabulary ranks: ``vocab_size - num_special_tokens``.
    ///
    /// ## Returns
    /// The cap, or a `Config` error unless
    /// ``len(special_tokens) <= num_special_tokens < vocab_size``.
    pub fn inner_vocab_cap(&self) -> SPResult<usize> {
        if self.special_tokens.len() > self.num_special_tokens {
            return Err(SpectokError::Config(format!(
                "{} special tokens exceed num_special_tokens ({})",
                self.special_tokens.len(),
                self.num_special_tokens
            )));
        }
        if self.num_special_tokens >= self.vocab_size {
            return Err(SpectokError::Config(format!(
                "num_special_tokens ({}) must be < vocab_size ({})",
                self.num_special_tokens, self.vocab_size
            )));
        }
        Ok(self.vocab_size - self.num_special_tokens)
    }

    /// Build a [`ShiftedTokenizer`] over a rank table.
    ///
    /// Tables longer than [`Self::inner_vocab_cap`] are cut to their leading ranks.
    pub fn build<T: TokenType>(
        &self,
        table: RankTable<T>,
    ) -> SPResult<ShiftedTokenizer<T>> {
        self.build_named(None, table)
    }

    /// Build a named [`ShiftedTokenizer`] over a rank table.
    pub fn build_named<T: TokenType>(
        &self,
        name: Option<String>,
        table: RankTable<T>,
    ) -> SPResult<ShiftedTokenizer<T>> {
        let cap = self.inner_vocab_cap()?;

        let table = if table.len() > cap {
            log::info!("Cutting vocab to first {cap} tokens.");
            RankTable::from_rank_spans(table.rank_spans()[..cap].to_vec())?
        } else {
            table
        };
        let table = Arc::new(table);

        let specials = SpecialTokenList::build(&self.special_tokens, self.num_special_tokens)?;
        let engine = MergeScanBpeEngine::new(table.clone(), self.pattern.clone())?;

        ShiftedTokenizer::new(
            name,
            table,
            Arc::new(engine),
            Arc::new(specials),
            self.literal_specials,
        )
    }

    /// Load a vocabulary file and build a [`ShiftedTokenizer`].
    ///
    /// The format is inferred from the extension (`.json` or `.tiktoken`);
    /// the tokenizer is named after the file's parent directory.
    pub fn load<T: TokenType>(
        &self,
        path: impl AsRef<Path>,
    ) -> SPResult<ShiftedTokenizer<T>> {
        let path = path.as_ref();
        let cap = self.inner_vocab_cap()?;

        let table = load_rank_table_path(path, Some(cap))?;

        let name = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned());

        self.build_named(name, table)
    }
}
