//! # Tiktoken Rank Vocabulary IO
//!
//! Lines are:
//! ```terminaloutput
//! {BASE64 SPAN} {RANK}
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use base64::{Engine, prelude::BASE64_STANDARD};

use crate::{
    errors::{SPResult, SpectokError},
    types::TokenType,
    vocab::{RankTable, io::truncate_records},
};

fn parse_line(
    lineno: usize,
    line: &str,
) -> SPResult<(Vec<u8>, u64)> {
    let (b64, rank) = line.split_once(' ').ok_or_else(|| {
        SpectokError::Format(format!("line {lineno}: expected \"{{BASE64}} {{RANK}}\""))
    })?;

    let span = BASE64_STANDARD
        .decode(b64)
        .map_err(|err| SpectokError::Format(format!("line {lineno}: {err}")))?;

    let rank = rank
        .trim()
        .parse::<u64>()
        .map_err(|err| SpectokError::Format(format!("line {lineno}: {err}")))?;

    Ok((span, rank))
}

/// Read a [`RankTable`] from a base64 vocab line reader.
///
/// Blank lines are skipped. Ranks must equal the entry's position.
///
/// # Arguments
/// * `reader` - the line reader.
/// * `max_entries` - keep at most this many leading entries.
pub fn read_base64_rank_table<T, R>(
    reader: R,
    max_entries: Option<usize>,
) -> SPResult<RankTable<T>>
where
    T: TokenType,
    R: BufRead,
{
    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(parse_line(idx + 1, &line)?);
    }
    log::info!("Vocab size: {}", entries.len());

    let entries = truncate_records(entries, max_entries);

    let mut spans = Vec::with_capacity(entries.len());
    for (position, (span, rank)) in entries.into_iter().enumerate() {
        if rank != position as u64 {
            return Err(SpectokError::Format(format!(
                "entry {position} declares rank {rank}"
            )));
        }
        spans.push(span);
    }

    RankTable::from_rank_spans(spans)
}

/// Load a [`RankTable`] from a base64 vocab file.
///
/// # Arguments
/// * `path` - the path to the vocabulary file.
/// * `max_entries` - keep at most this many leading entries.
pub fn load_base64_rank_table_path<T, P>(
    path: P,
    max_entries: Option<usize>,
) -> SPResult<RankTable<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    read_base64_rank_table(reader, max_entries)
}

/// Write a [`RankTable`] to a [`Write`] writer.
///
/// # Arguments
/// * `table` - the table to save.
/// * `writer` - the writer to target.
pub fn write_base64_rank_table<T, W>(
    table: &RankTable<T>,
    writer: &mut W,
) -> SPResult<()>
where
    T: TokenType,
    W: Write,
{
    for (rank, span) in table.rank_spans().iter().enumerate() {
        writeln!(writer, "{} {}", BASE64_STANDARD.encode(span), rank)?;
    }
    writer.flush()?;
    Ok(())
}

/// Save a [`RankTable`] to a base64 vocab file.
pub fn save_base64_rank_table_path<T, P>(
    table: &RankTable<T>,
    path: P,
) -> SPResult<()>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write_base64_rank_table(table, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::identity_spans;

    #[test]
    fn test_save_load_tiktoken() {
        type T = u32;
        let mut spans = identity_spans();
        spans.push(b"apple".to_vec());
        spans.push(b"banana".to_vec());
        let table = RankTable::<T>::from_rank_spans(spans).unwrap();

        tempdir::TempDir::new("vocab_test")
            .and_then(|dir| {
                let path = dir.path().join("vocab.tiktoken");

                save_base64_rank_table_path(&table, &path).expect("Failed to save vocab");

                let loaded: RankTable<T> =
                    load_base64_rank_table_path(&path, None).expect("Failed to load vocab");
                assert_eq!(loaded, table);

                let truncated: RankTable<T> =
                    load_base64_rank_table_path(&path, Some(257)).expect("Failed to load vocab");
                assert_eq!(truncated.len(), 257);
                assert_eq!(truncated.lookup_rank(b"banana"), None);

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_bad_lines() {
        type T = u32;
        let mut text = String::new();
        for i in 0..256_u32 {
            text.push_str(&format!("{} {i}\n", BASE64_STANDARD.encode([i as u8])));
        }

        let bad = format!("{text}YWI=\n");
        assert!(matches!(
            read_base64_rank_table::<T, _>(bad.as_bytes(), None),
            Err(SpectokError::Format(_))
        ));

        let bad = format!("{text}YWI= 300\n");
        assert!(matches!(
            read_base64_rank_table::<T, _>(bad.as_bytes(), None),
            Err(SpectokError::Format(_))
        ));

        let good = format!("{text}\nYWI= 256\n");
        let table = read_base64_rank_table::<T, _>(good.as_bytes(), None).unwrap();
        assert_eq!(table.lookup_rank(b"ab"), Some(256));
    }
}
