//! # Special Segmentor

use core::ops::Range;
use std::sync::Arc;

use crate::{
    errors::SPResult,
    patterns::{SPECIAL_MARKER_PATTERN, parse_special_marker},
    regex::{RegexWrapper, RegexWrapperPattern, exact_match_union_regex_pattern},
    vocab::SpecialTokenList,
};

/// Span Reference for [`SpecialSegmentor`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpanRef {
    /// Text for the BPE engine.
    Plain(Range<usize>),

    /// A special-token reference.
    Special {
        /// The byte range of the reference.
        range: Range<usize>,

        /// The special id.
        id: usize,
    },
}

impl SpanRef {
    /// The byte range of the span.
    pub fn range(&self) -> &Range<usize> {
        match self {
            Self::Plain(range) => range,
            Self::Special { range, .. } => range,
        }
    }
}

impl From<SpanRef> for Range<usize> {
    fn from(span: SpanRef) -> Self {
        match span {
            SpanRef::Plain(range) => range,
            SpanRef::Special { range, .. } => range,
        }
    }
}

/// Splits text into plain spans and special-token references.
///
/// `<SPECIAL_{n}>` is always a reference to special id `n`; markers whose
/// numeral is not a special id stay plain text. With `literal_specials`,
/// verbatim registry entries are references too.
///
/// Empty plain segments contribute nothing and are not emitted.
#[derive(Clone)]
pub struct SpecialSegmentor {
    special_re: RegexWrapper,
    specials: Arc<SpecialTokenList>,
    literal_specials: bool,
}

impl SpecialSegmentor {
    /// Build a segmentor over a special-token registry.
    ///
    /// ## Arguments
    /// * `specials` - the registry; its length bounds valid marker ids.
    /// * `literal_specials` - also match verbatim registry entries.
    pub fn new(
        specials: Arc<SpecialTokenList>,
        literal_specials: bool,
    ) -> SPResult<Self> {
        let marker = SPECIAL_MARKER_PATTERN.as_str();

        let literals = if literal_specials {
            specials
                .iter()
                .filter(|tok| !tok.is_empty() && parse_special_marker(tok).is_none())
                .collect::<Vec<_>>()
        } else {
            Vec::new()
        };

        // Leftmost-first; markers win ties.
        let pattern = if literals.is_empty() {
            SPECIAL_MARKER_PATTERN.to_pattern()
        } else {
            let union = exact_match_union_regex_pattern(&literals);
            RegexWrapperPattern::Basic(format!("{marker}|{}", union.as_str()))
        };

        Ok(Self {
            special_re: pattern.compile()?,
            specials,
            literal_specials,
        })
    }

    /// The special-token registry.
    pub fn specials(&self) -> &Arc<SpecialTokenList> {
        &self.specials
    }

    /// Are verbatim registry entries matched?
    pub fn literal_specials(&self) -> bool {
        self.literal_specials
    }

    /// Resolve a matched special span to its id.
    fn resolve(
        &self,
        span: &str,
    ) -> Option<usize> {
        match parse_special_marker(span) {
            Some(id) if id < self.specials.len() => Some(id),
            Some(_) => None,
            None => self.specials.index_of(span),
        }
    }

    /// Visit every [`SpanRef`] in order.
    ///
    /// The visited ranges cover `text` exactly.
    pub fn for_each_span<F>(
        &self,
        text: &str,
        mut f: F,
    ) where
        F: FnMut(SpanRef),
    {
        let mut plain_start = 0;
        for range in self.special_re.find_ranges(text) {
            let Some(id) = self.resolve(&text[range.clone()]) else {
                // Unresolved markers stay in the surrounding plain text.
                continue;
            };

            if plain_start < range.start {
                f(SpanRef::Plain(plain_start..range.start));
            }
            plain_start = range.end;
            f(SpanRef::Special { range, id });
        }
        if plain_start < text.len() {
            f(SpanRef::Plain(plain_start..text.len()));
        }
    }

    /// Split text into [`SpanRef`]s.
    pub fn split_spans(
        &self,
        text: &str,
    ) -> Vec<SpanRef> {
        let mut spans = Vec::new();
        self.for_each_span(text, |span| spans.push(span));
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmentor(
        user: &[&str],
        capacity: usize,
        literal_specials: bool,
    ) -> SpecialSegmentor {
        let specials = SpecialTokenList::build(user, capacity).unwrap();
        SpecialSegmentor::new(Arc::new(specials), literal_specials).unwrap()
    }

    #[test]
    fn test_markers() {
        let seg = segmentor(&["<unk>", "<s>", "</s>"], 10, false);
        let text = "<SPECIAL_1>hi<SPECIAL_2><SPECIAL_9>";

        assert_eq!(
            seg.split_spans(text),
            vec![
                SpanRef::Special { range: 0..11, id: 1 },
                SpanRef::Plain(11..13),
                SpanRef::Special { range: 13..24, id: 2 },
                SpanRef::Special { range: 24..35, id: 9 },
            ]
        );
    }

    #[test]
    fn test_no_markers() {
        let seg = segmentor(&["<unk>", "<s>", "</s>"], 3, false);

        assert_eq!(seg.split_spans(""), Vec::<SpanRef>::new());
        assert_eq!(seg.split_spans("hello"), vec![SpanRef::Plain(0..5)]);

        // literal_specials is off.
        assert_eq!(seg.split_spans("<s>"), vec![SpanRef::Plain(0..3)]);
    }

    #[test]
    fn test_out_of_range_marker_is_plain() {
        let seg = segmentor(&["<unk>", "<s>", "</s>"], 5, false);
        let text = "a<SPECIAL_5>b<SPECIAL_4><SPECIAL_99999999999999999999999>";

        assert_eq!(
            seg.split_spans(text),
            vec![
                SpanRef::Plain(0..13),
                SpanRef::Special { range: 13..24, id: 4 },
                SpanRef::Plain(24..text.len()),
            ]
        );
    }

    #[test]
    fn test_literal_specials() {
        let seg = segmentor(&["<unk>", "<s>", "</s>", "<|tool|>"], 6, true);
        let text = "<s>go<|tool|><SPECIAL_5></s>";

        let spans = seg.split_spans(text);
        assert_eq!(
            spans
                .iter()
                .map(|s| match s {
                    SpanRef::Special { id, .. } => format!("#{id}"),
                    SpanRef::Plain(r) => text[r.clone()].to_string(),
                })
                .collect::<Vec<_>>(),
            vec!["#1", "go", "#3", "#5", "#2"]
        );
    }

    #[test]
    fn test_spans_cover_text() {
        let seg = segmentor(&["<unk>", "<s>", "</s>"], 4, true);
        let text = "x<SPECIAL_3><unk> <SPECIAL_7>y</s>";

        let mut end = 0;
        for span in seg.split_spans(text) {
            let range = Range::from(span);
            assert_eq!(range.start, end);
            end = range.end;
        }
        assert_eq!(end, text.len());
    }
}
