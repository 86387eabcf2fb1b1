//! # Regex Utilities
//!
//! The tiktoken-style pre-segmentation pattern requires lookahead, which needs
//! the extended machinery provided by the [`fancy_regex`] crate; but naturally,
//! this has performance costs. Simple patterns (such as the special-token marker
//! scanner) use the standard [`regex`] crate.
//!
//! * Labeling Patterns - [`RegexWrapperPattern`]
//!   * [`RegexWrapperPattern::Basic`] - a pattern which was written for [`regex`].
//!   * [`RegexWrapperPattern::Fancy`] - a pattern which was written for [`fancy_regex`].
//!   * [`RegexWrapperPattern::Adaptive`] - unknown target, try basic; then fall-up to fancy.
//! * Wrapping Compiled Regex - [`RegexWrapper`]

pub mod exact_match_union;
pub mod regex_wrapper;

#[doc(inline)]
pub use exact_match_union::exact_match_union_regex_pattern;
#[doc(inline)]
pub use regex_wrapper::{
    ConstRegexWrapperPattern,
    ErrorWrapper,
    MatchRanges,
    RegexWrapper,
    RegexWrapperPattern,
};
