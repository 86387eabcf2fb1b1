//! # Special Token Registry
//!
//! The ordered list of reserved special tokens; a token's position is its id.

use crate::{
    errors::{SPResult, SpectokError},
    patterns::{BOS_TOKEN, DEFAULT_SPECIAL_TOKENS, EOS_TOKEN, UNK_TOKEN, format_special_marker},
    types::SPHashMap,
};

/// The ids of the mandatory sentinel tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SentinelIds {
    /// The `<unk>` id.
    pub unk: usize,

    /// The `<s>` id.
    pub bos: usize,

    /// The `</s>` id.
    pub eos: usize,
}

/// Ordered list of unique special tokens.
///
/// The caller's tokens come first, then `<SPECIAL_{i}>` fillers up to the
/// configured capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialTokenList {
    tokens: Vec<String>,
    index: SPHashMap<String, usize>,
    sentinels: SentinelIds,
}

impl SpecialTokenList {
    /// Build the registry from the caller's tokens, padded to `capacity`.
    ///
    /// ## Arguments
    /// * `user_tokens` - the leading tokens; must hold the three sentinels.
    /// * `capacity` - the final length of the registry.
    ///
    /// ## Returns
    /// The registry, or a `Config` error on duplicates, a missing sentinel,
    /// too many tokens, or a filler name collision.
    pub fn build<S: AsRef<str>>(
        user_tokens: &[S],
        capacity: usize,
    ) -> SPResult<Self> {
        if user_tokens.len() > capacity {
            return Err(SpectokError::Config(format!(
                "{} special tokens exceed num_special_tokens ({capacity})",
                user_tokens.len()
            )));
        }

        let mut tokens: Vec<String> = Vec::with_capacity(capacity);
        let mut index: SPHashMap<String, usize> = SPHashMap::default();

        for token in user_tokens {
            let token = token.as_ref();
            if index.insert(token.to_string(), tokens.len()).is_some() {
                return Err(SpectokError::Config(format!(
                    "special tokens must be unique: {token:?} is repeated"
                )));
            }
            tokens.push(token.to_string());
        }

        let find = |name: &str| {
            index.get(name).copied().ok_or_else(|| {
                SpectokError::Config(format!("special tokens must include {name:?}"))
            })
        };
        let sentinels = SentinelIds {
            unk: find(UNK_TOKEN)?,
            bos: find(BOS_TOKEN)?,
            eos: find(EOS_TOKEN)?,
        };

        let num_user = tokens.len();
        if num_user < capacity {
            log::info!(
                "Adding special tokens {}, ..., {}",
                format_special_marker(num_user),
                format_special_marker(capacity - 1)
            );
        }
        for id in num_user..capacity {
            let filler = format_special_marker(id);
            if index.insert(filler.clone(), id).is_some() {
                return Err(SpectokError::Config(format!(
                    "special token {filler:?} collides with a generated filler"
                )));
            }
            tokens.push(filler);
        }

        Ok(Self {
            tokens,
            index,
            sentinels,
        })
    }

    /// Build the registry from [`DEFAULT_SPECIAL_TOKENS`].
    pub fn with_default_tokens(capacity: usize) -> SPResult<Self> {
        Self::build(&DEFAULT_SPECIAL_TOKENS, capacity)
    }

    /// The number of special tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get the token at `id`, if any.
    pub fn get(
        &self,
        id: usize,
    ) -> Option<&str> {
        self.tokens.get(id).map(String::as_str)
    }

    /// Get the id of `token`, if it is registered.
    pub fn index_of(
        &self,
        token: &str,
    ) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Iterate the tokens in id order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(String::as_str)
    }

    /// The tokens, in id order.
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    /// The sentinel ids.
    pub fn sentinels(&self) -> SentinelIds {
        self.sentinels
    }

    /// The `<unk>` id.
    pub fn unk_id(&self) -> usize {
        self.sentinels.unk
    }

    /// The `<s>` id.
    pub fn bos_id(&self) -> usize {
        self.sentinels.bos
    }

    /// The `</s>` id.
    pub fn eos_id(&self) -> usize {
        self.sentinels.eos
    }
}
