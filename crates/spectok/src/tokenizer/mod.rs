//! # Tokenizer
//!
//! [`TokenizerOptions`] builds a [`ShiftedTokenizer`] from a rank table
//! or a vocabulary file.

mod id_space;
mod shifted_tokenizer;
mod tokenizer_options;

pub use id_space::*;
pub use shifted_tokenizer::*;
pub use tokenizer_options::*;
