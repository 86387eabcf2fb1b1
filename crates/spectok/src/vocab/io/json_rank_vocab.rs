//! # JSON Rank Vocabulary IO
//!
//! The vocabulary file is a JSON list of records:
//! ```json
//! [{"rank": 0, "token_bytes": "AA==", "token_str": "\u0000"}, ...]
//! ```

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use base64::{Engine, prelude::BASE64_STANDARD};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{SPResult, SpectokError},
    support::strings::string_from_utf8_lossy,
    types::TokenType,
    vocab::{RankTable, io::truncate_records},
};

/// One record of a JSON rank vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankRecord {
    /// The rank; must equal the record's position.
    pub rank: u64,

    /// The base64-encoded byte span.
    pub token_bytes: String,

    /// Informational text rendering of the span; not validated.
    pub token_str: String,
}

impl RankRecord {
    /// Build a record for a span.
    pub fn new(
        rank: u64,
        span: &[u8],
    ) -> Self {
        Self {
            rank,
            token_bytes: BASE64_STANDARD.encode(span),
            token_str: string_from_utf8_lossy(span.to_vec()),
        }
    }

    /// Decode the base64 span.
    pub fn decode_span(&self) -> SPResult<Vec<u8>> {
        BASE64_STANDARD.decode(&self.token_bytes).map_err(|err| {
            SpectokError::Format(format!(
                "rank {}: invalid token_bytes {:?}: {err}",
                self.rank, self.token_bytes
            ))
        })
    }
}

/// Build a [`RankTable`] from a list of [`RankRecord`]s.
///
/// ## Arguments
/// * `records` - the records, in rank order.
/// * `max_entries` - keep at most this many leading records.
pub fn rank_table_from_records<T: TokenType>(
    records: Vec<RankRecord>,
    max_entries: Option<usize>,
) -> SPResult<RankTable<T>> {
    let records = truncate_records(records, max_entries);

    let mut spans = Vec::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        if record.rank != position as u64 {
            return Err(SpectokError::Format(format!(
                "record {position} declares rank {}",
                record.rank
            )));
        }
        spans.push(record.decode_span()?);
    }

    RankTable::from_rank_spans(spans)
}

/// Read a [`RankTable`] from a JSON record reader.
///
/// ## Arguments
/// * `reader` - the JSON source.
/// * `max_entries` - keep at most this many leading records.
pub fn read_json_rank_table<T, R>(
    reader: R,
    max_entries: Option<usize>,
) -> SPResult<RankTable<T>>
where
    T: TokenType,
    R: Read,
{
    let records: Vec<RankRecord> = serde_json::from_reader(reader)
        .map_err(|err| SpectokError::Format(format!("invalid rank records: {err}")))?;
    log::info!("Vocab size: {}", records.len());

    rank_table_from_records(records, max_entries)
}

/// Load a [`RankTable`] from a JSON vocab file.
///
/// ## Arguments
/// * `path` - the path to the vocabulary file.
/// * `max_entries` - keep at most this many leading records.
pub fn load_json_rank_table_path<T, P>(
    path: P,
    max_entries: Option<usize>,
) -> SPResult<RankTable<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    read_json_rank_table(reader, max_entries)
}

/// Write a [`RankTable`] as a JSON record list.
pub fn write_json_rank_table<T, W>(
    table: &RankTable<T>,
    writer: &mut W,
) -> SPResult<()>
where
    T: TokenType,
    W: Write,
{
    let records = table
        .rank_spans()
        .iter()
        .enumerate()
        .map(|(rank, span)| RankRecord::new(rank as u64, span))
        .collect::<Vec<_>>();

    serde_json::to_writer(&mut *writer, &records)?;
    writer.flush()?;
    Ok(())
}

/// Save a [`RankTable`] to a JSON vocab file.
pub fn save_json_rank_table_path<T, P>(
    table: &RankTable<T>,
    path: P,
) -> SPResult<()>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write_json_rank_table(table, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build_test_records, identity_spans};

    #[test]
    fn test_read_records() {
        type T = u32;
        let json = serde_json::to_string(&build_test_records(&[b"ab"])).unwrap();

        let table: RankTable<T> = read_json_rank_table(json.as_bytes(), None).unwrap();
        assert_eq!(table.len(), 257);
        assert_eq!(table.lookup_rank(b"ab"), Some(256));
    }

    #[test]
    fn test_truncation() {
        type T = u32;
        let json = serde_json::to_string(&build_test_records(&[b"ab", b"cd"])).unwrap();

        let table: RankTable<T> = read_json_rank_table(json.as_bytes(), Some(257)).unwrap();
        assert_eq!(table.len(), 257);
        assert_eq!(table.lookup_rank(b"cd"), None);

        // Truncation happens before validation.
        let mut records = build_test_records(&[b"ab"]);
        records.push(RankRecord::new(999, b"zz"));
        let table: RankTable<T> = rank_table_from_records(records, Some(257)).unwrap();
        assert_eq!(table.len(), 257);
    }

    #[test]
    fn test_bad_shape() {
        type T = u32;
        for json in [
            r#"{"rank": 0}"#,
            r#"[{"rank": 0, "token_bytes": "AA=="}]"#,
            r#"[{"rank": 0, "token_bytes": "AA==", "token_str": "", "extra": 1}]"#,
            r#"[{"rank": "0", "token_bytes": "AA==", "token_str": ""}]"#,
        ] {
            assert!(matches!(
                read_json_rank_table::<T, _>(json.as_bytes(), None),
                Err(SpectokError::Format(_))
            ));
        }
    }

    #[test]
    fn test_rank_position_mismatch() {
        type T = u32;
        let mut records = build_test_records(&[b"ab", b"cd"]);
        records[257].rank = 300;

        assert!(matches!(
            rank_table_from_records::<T>(records, None),
            Err(SpectokError::Format(_))
        ));
    }

    #[test]
    fn test_identity_violation_after_truncation() {
        type T = u32;
        let merges = (0..44).map(|i| format!("m{i}")).collect::<Vec<_>>();
        let mut records = build_test_records(&merges);
        records[3] = RankRecord::new(3, &[4]);

        assert!(matches!(
            rank_table_from_records::<T>(records.clone(), Some(100)),
            Err(SpectokError::IdentityViolation { rank: 3, .. })
        ));
        assert!(matches!(
            rank_table_from_records::<T>(records, None),
            Err(SpectokError::IdentityViolation { rank: 3, .. })
        ));
    }

    #[test]
    fn test_bad_base64() {
        type T = u32;
        let mut records = build_test_records(&[b"ab"]);
        records[256].token_bytes = "!!".to_string();

        assert!(matches!(
            rank_table_from_records::<T>(records, None),
            Err(SpectokError::Format(_))
        ));
    }

    #[test]
    fn test_save_load_json() {
        type T = u32;
        let mut spans = identity_spans();
        spans.push(b"hello".to_vec());
        spans.push(vec![0xe2, 0x82]);
        let table = RankTable::<T>::from_rank_spans(spans).unwrap();

        tempdir::TempDir::new("vocab_test")
            .and_then(|dir| {
                let path = dir.path().join("vocab.json");

                save_json_rank_table_path(&table, &path).expect("Failed to save vocab");

                let loaded: RankTable<T> =
                    load_json_rank_table_path(&path, None).expect("Failed to load vocab");

                assert_eq!(loaded, table);

                Ok(())
            })
            .unwrap();
    }
}
