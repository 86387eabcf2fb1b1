//! # Vocabulary Types

use crate::types::SPHashMap;

/// `{ Vec<u8> -> T }` map.
///
/// ## Style Hints
/// Instance names should prefer `span_map`, or `span_token_map`.
pub type SpanTokenMap<T> = SPHashMap<Vec<u8>, T>;

/// `{ T -> Vec<u8> }` map.
///
/// ## Style Hints
/// Instance names should prefer `token_spans`, or `token_span_map`.
pub type TokenSpanMap<T> = SPHashMap<T, Vec<u8>>;
