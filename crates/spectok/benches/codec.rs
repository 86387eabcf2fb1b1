#![allow(missing_docs)]

use divan::{Bencher, black_box, counter::BytesCount};
use spectok::{RankTable, ShiftedTokenizer, TokenizerOptions};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

type T = u32;

static CORPUS: &str = "The quick brown fox jumps over the lazy dog. \
It's a beautiful day, and I'll be taking my 3 dogs for a walk.\n\
caf\u{00e9} na\u{00ef}ve \u{4f60}\u{597d} \u{1f600}\n";

const MERGES: &[&str] = &[
    "th", "he", "the", " the", "in", "er", "an", " a", "ll", "  ", "ou", "on", " b", " d", " f",
    " w", "ing", " and", " be", " dog",
];

fn corpus() -> String {
    format!("<SPECIAL_1>{}<SPECIAL_2>", CORPUS.repeat(50))
}

fn tokenizer() -> ShiftedTokenizer<T> {
    let spans = (0..=u8::MAX)
        .map(|b| vec![b])
        .chain(MERGES.iter().map(|m| m.as_bytes().to_vec()))
        .collect();
    let table = RankTable::from_rank_spans(spans).unwrap();
    TokenizerOptions::default().build(table).unwrap()
}

#[divan::bench]
fn text_to_ids(bencher: Bencher) {
    let text = corpus();
    let tok = tokenizer();
    bencher
        .counter(BytesCount::new(text.len()))
        .bench(|| tok.text_to_ids(black_box(&text)));
}

#[divan::bench]
fn ids_to_text(bencher: Bencher) {
    let text = corpus();
    let tok = tokenizer();
    let ids = tok.text_to_ids(&text);
    bencher
        .counter(BytesCount::new(text.len()))
        .bench(|| tok.ids_to_text(black_box(&ids), false).unwrap());
}

#[divan::bench]
fn text_to_ids_batch(bencher: Bencher) {
    let batch = vec![corpus(); 16];
    let tok = tokenizer();
    bencher
        .counter(BytesCount::new(batch.iter().map(String::len).sum::<usize>()))
        .bench(|| tok.text_to_ids_batch(black_box(&batch)));
}
