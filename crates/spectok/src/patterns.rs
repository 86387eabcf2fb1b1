//! # Patterns and Default Names
//!
//! Process-wide immutable configuration: the pre-segmentation pattern,
//! the special-token marker syntax, and the default sentinel names.

use crate::regex::ConstRegexWrapperPattern;

/// A macro to concatenate multiple string literals with a specified separator.
///
/// # Examples
///
/// ```rust
/// use spectok::join_strs;
///
/// let result = join_strs!(",", ("Hello", "World", "Rust"));
/// assert_eq!(result, "Hello,World,Rust");
///
/// let result = join_strs!(";", ("OnlyOne"));
/// assert_eq!(result, "OnlyOne");
/// ```
#[macro_export]
macro_rules! join_strs {
    ($sep:literal, ($first:literal $(, $rest:literal)* $(,)?)) => {
        concat!($first $(, $sep, $rest)*)
    };
}

/// An extension of [`join_strs!()`] which uses the "|" as the separator.
#[macro_export]
macro_rules! join_patterns {
    ($($e:expr),* $(,)?) => { $crate::join_strs!("|", ($($e),*)) };
}

/// The pre-segmentation word pattern for tiktoken-trained vocabularies.
///
/// Must be supplied verbatim for compatibility with externally trained
/// vocabularies. Requires `fancy_regex` for the `(?!\S)` lookahead.
pub const PATTERN_TIKTOKEN: ConstRegexWrapperPattern = ConstRegexWrapperPattern::Fancy(join_patterns!(
    r"[^\r\n\p{L}\p{N}]?[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}]*[\p{Ll}\p{Lm}\p{Lo}\p{M}]+",
    r"[^\r\n\p{L}\p{N}]?[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}]+[\p{Ll}\p{Lm}\p{Lo}\p{M}]*",
    r"\p{N}",
    r" ?[^\s\p{L}\p{N}]+[\r\n/]*",
    r"\s*[\r\n]+",
    r"\s+(?!\S)",
    r"\s+",
));

/// Default total vocabulary size: `2**17`.
pub const DEFAULT_TIKTOKEN_MAX_VOCAB: usize = 1 << 17;

/// Default number of reserved special-token ids.
pub const DEFAULT_NUM_SPECIAL_TOKENS: usize = 1000;

/// Unknown-token sentinel.
pub const UNK_TOKEN: &str = "<unk>";

/// Begin-of-sequence sentinel.
pub const BOS_TOKEN: &str = "<s>";

/// End-of-sequence sentinel.
pub const EOS_TOKEN: &str = "</s>";

/// The mandatory sentinels, in their conventional order.
pub const DEFAULT_SPECIAL_TOKENS: [&str; 3] = [UNK_TOKEN, BOS_TOKEN, EOS_TOKEN];

/// Prefix of the special-token marker syntax.
pub const SPECIAL_MARKER_PREFIX: &str = "<SPECIAL_";

/// Suffix of the special-token marker syntax.
pub const SPECIAL_MARKER_SUFFIX: &str = ">";

/// Scanner for the literal `<SPECIAL_{digits}>` marker syntax.
///
/// The single capture group holds the numeral.
pub const SPECIAL_MARKER_PATTERN: ConstRegexWrapperPattern =
    ConstRegexWrapperPattern::Basic(r"<SPECIAL_([0-9]+)>");

/// Format the canonical `<SPECIAL_{id}>` marker for a special id.
pub fn format_special_marker(id: usize) -> String {
    format!("{SPECIAL_MARKER_PREFIX}{id}{SPECIAL_MARKER_SUFFIX}")
}

/// Parse a full `<SPECIAL_{digits}>` marker into its numeral.
///
/// ## Returns
/// `None` if `text` is not exactly one marker, or the numeral overflows `usize`.
pub fn parse_special_marker(text: &str) -> Option<usize> {
    let digits = text
        .strip_prefix(SPECIAL_MARKER_PREFIX)?
        .strip_suffix(SPECIAL_MARKER_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
