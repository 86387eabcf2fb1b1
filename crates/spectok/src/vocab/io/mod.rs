//! # Vocabulary IO

mod base64_rank_vocab;
mod json_rank_vocab;

use std::path::Path;

pub use base64_rank_vocab::*;
pub use json_rank_vocab::*;

use crate::{
    errors::{SPResult, SpectokError},
    types::TokenType,
    vocab::RankTable,
};

/// Keep at most `max_entries` leading records.
pub(crate) fn truncate_records<R>(
    mut records: Vec<R>,
    max_entries: Option<usize>,
) -> Vec<R> {
    if let Some(max) = max_entries
        && records.len() > max
    {
        log::info!("Cutting vocab to first {max} tokens.");
        records.truncate(max);
    }
    records
}

/// On-disk rank vocabulary formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankTableFormat {
    /// A JSON list of `{rank, token_bytes, token_str}` records.
    Json,

    /// `{BASE64} {RANK}` lines.
    Base64Lines,
}

impl RankTableFormat {
    /// Infer the format from a path's extension.
    ///
    /// `.json` is [`RankTableFormat::Json`]; `.tiktoken` is
    /// [`RankTableFormat::Base64Lines`].
    pub fn from_path(path: impl AsRef<Path>) -> SPResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("tiktoken") => Ok(Self::Base64Lines),
            _ => Err(SpectokError::Config(format!(
                "unrecognized vocab format: {}",
                path.display()
            ))),
        }
    }

    /// Load a [`RankTable`] in this format.
    pub fn load_path<T: TokenType>(
        &self,
        path: impl AsRef<Path>,
        max_entries: Option<usize>,
    ) -> SPResult<RankTable<T>> {
        match self {
            Self::Json => load_json_rank_table_path(path, max_entries),
            Self::Base64Lines => load_base64_rank_table_path(path, max_entries),
        }
    }

    /// Save a [`RankTable`] in this format.
    pub fn save_path<T: TokenType>(
        &self,
        table: &RankTable<T>,
        path: impl AsRef<Path>,
    ) -> SPResult<()> {
        match self {
            Self::Json => save_json_rank_table_path(table, path),
            Self::Base64Lines => save_base64_rank_table_path(table, path),
        }
    }
}

/// Load a [`RankTable`], inferring the format from the extension.
///
/// ## Arguments
/// * `path` - the vocabulary file; must exist.
/// * `max_entries` - keep at most this many leading records.
pub fn load_rank_table_path<T: TokenType>(
    path: impl AsRef<Path>,
    max_entries: Option<usize>,
) -> SPResult<RankTable<T>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(SpectokError::Config(format!(
            "vocab file not found: {}",
            path.display()
        )));
    }
    RankTableFormat::from_path(path)?.load_path(path, max_entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::identity_spans;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            RankTableFormat::from_path("a/b/vocab.json").unwrap(),
            RankTableFormat::Json
        );
        assert_eq!(
            RankTableFormat::from_path("vocab.tiktoken").unwrap(),
            RankTableFormat::Base64Lines
        );
        assert!(matches!(
            RankTableFormat::from_path("vocab.txt"),
            Err(SpectokError::Config(_))
        ));
        assert!(matches!(
            RankTableFormat::from_path("vocab"),
            Err(SpectokError::Config(_))
        ));
    }

    #[test]
    fn test_load_rank_table_path() {
        type T = u32;
        let table = RankTable::<T>::from_rank_spans(identity_spans()).unwrap();

        tempdir::TempDir::new("vocab_test")
            .and_then(|dir| {
                for name in ["vocab.json", "vocab.tiktoken"] {
                    let path = dir.path().join(name);
                    RankTableFormat::from_path(&path)
                        .unwrap()
                        .save_path(&table, &path)
                        .unwrap();

                    let loaded: RankTable<T> = load_rank_table_path(&path, None).unwrap();
                    assert_eq!(loaded, table);
                }

                assert!(matches!(
                    load_rank_table_path::<T>(dir.path().join("missing.json"), None),
                    Err(SpectokError::Config(_))
                ));

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_truncate_records() {
        assert_eq!(truncate_records(vec![1, 2, 3], Some(2)), vec![1, 2]);
        assert_eq!(truncate_records(vec![1, 2, 3], Some(5)), vec![1, 2, 3]);
        assert_eq!(truncate_records(vec![1, 2, 3], None), vec![1, 2, 3]);
    }
}
