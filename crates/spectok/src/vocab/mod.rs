//! # Vocabulary
//!
//! * [`RankTable`] - the validated ``{ Vec<u8> <-> rank }`` merge table.
//! * [`SpecialTokenList`] - the reserved special-token registry.
//! * [`io`] - rank table readers and writers.

pub mod io;
mod rank_table;
mod special_tokens;
pub mod validators;
mod vocab_types;

pub use rank_table::*;
pub use special_tokens::*;
pub use vocab_types::*;
