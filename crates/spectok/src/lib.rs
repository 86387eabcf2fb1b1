//! # `spectok` BPE Tokenizer
//!
//! A byte-pair-encoding tokenizer with a reserved bank of special-token ids.
//!
//! The flat id space is laid out as:
//! * ``[0, num_special_tokens)`` - special tokens: `<unk>`, `<s>`, `</s>`,
//!   user tokens, then `<SPECIAL_{i}>` fillers.
//! * ``[num_special_tokens, vocab_size)`` - base-vocabulary ranks, shifted
//!   up by `num_special_tokens`.
//!
//! A literal `<SPECIAL_{n}>` marker in text encodes to special id `n` when
//! `n < num_special_tokens`. Markers can't be escaped; a marker whose
//! numeral is not a special id stays plain text and goes through BPE.
//!
//! See:
//! * [`tokenizer`] to build and use a [`ShiftedTokenizer`].
//! * [`vocab`] for rank tables, vocab io, and the special-token registry.
//! * [`engine`] for the BPE merge engine.
//!
//! ```rust,ignore
//! use spectok::TokenizerOptions;
//!
//! type T = u32;
//!
//! let tok = TokenizerOptions::default()
//!     .with_num_special_tokens(1000)
//!     .load::<T>("vocabs/my-vocab/vocab.json")?;
//!
//! let ids = tok.text_to_ids("<SPECIAL_1>hello world<SPECIAL_2>");
//! let text = tok.ids_to_text(&ids, false)?;
//! ```
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
#![warn(missing_docs, unused)]

pub mod engine;
pub mod errors;
pub mod patterns;
pub mod regex;
pub mod segmentation;
pub mod support;
pub mod tokenizer;
pub mod types;
pub mod vocab;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[doc(inline)]
pub use errors::{SPResult, SpectokError};
#[doc(inline)]
pub use tokenizer::{ShiftedTokenizer, TokenizerOptions};
#[doc(inline)]
pub use types::TokenType;
#[doc(inline)]
pub use vocab::{RankTable, SpecialTokenList};
