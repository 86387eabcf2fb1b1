use std::io::{BufRead, Write};

use spectok::ShiftedTokenizer;

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
    tokenizer_args::TokenizerArgs,
};

/// The tokenizer mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenizerMode {
    /// Text to ids.
    Encode,

    /// Ids to text.
    Decode,
}

/// Mode selection for the tokenizer.
#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
pub struct TokenizerModeArgs {
    /// Encode from text to tokens.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    encode: bool,

    /// Decode from tokens to text.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    decode: bool,
}

impl TokenizerModeArgs {
    /// Get the tokenizer mode.
    pub fn mode(&self) -> TokenizerMode {
        if self.encode {
            TokenizerMode::Encode
        } else {
            TokenizerMode::Decode
        }
    }
}

/// Args for the cat command.
#[derive(clap::Args, Debug)]
pub struct CatArgs {
    #[command(flatten)]
    tokenizer: TokenizerArgs,

    #[command(flatten)]
    tokenizer_mode: TokenizerModeArgs,

    /// Render special ids as their token text when decoding.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    keep_specials: bool,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    logging: LogArgs,
}

impl CatArgs {
    /// Run the cat command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let tokenizer = self.tokenizer.load_tokenizer()?;

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;

        match self.tokenizer_mode.mode() {
            TokenizerMode::Encode => run_cat_encode(&mut reader, &mut writer, &tokenizer)?,
            TokenizerMode::Decode => run_cat_decode(
                &mut reader,
                &mut writer,
                &tokenizer,
                !self.keep_specials,
            )?,
        }

        Ok(())
    }
}

/// Encode each input line, end-of-line included, to a line of space-separated ids.
fn run_cat_encode(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    tokenizer: &ShiftedTokenizer<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut line = String::new();
    while reader.read_line(&mut line)? > 0 {
        let ids = tokenizer.text_to_ids(&line);

        for (idx, id) in ids.iter().enumerate() {
            write!(writer, "{}{}", if idx == 0 { "" } else { " " }, id)?;
        }
        writeln!(writer)?;
        writer.flush()?;

        line.clear();
    }
    Ok(())
}

/// Decode each line of space-separated ids back to text.
fn run_cat_decode(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    tokenizer: &ShiftedTokenizer<u32>,
    skip_special_tokens: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in reader.lines() {
        let ids = line?
            .split_whitespace()
            .map(|s| s.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()?;

        let text = tokenizer.ids_to_text(&ids, skip_special_tokens)?;

        write!(writer, "{}", text)?;
        writer.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use spectok::{RankTable, TokenizerOptions};

    use super::*;

    fn tokenizer() -> ShiftedTokenizer<u32> {
        let spans = (0..=u8::MAX)
            .map(|b| vec![b])
            .chain(["he", "ll", "hell"].iter().map(|m| m.as_bytes().to_vec()))
            .collect();
        let table = RankTable::from_rank_spans(spans).unwrap();
        TokenizerOptions::default()
            .with_num_special_tokens(10)
            .build(table)
            .unwrap()
    }

    #[test]
    fn test_cat_round_trip() {
        let tok = tokenizer();
        let text = "<SPECIAL_1>hello\nworld\n";

        let mut encoded = Vec::new();
        run_cat_encode(&mut Cursor::new(text), &mut encoded, &tok).unwrap();
        let encoded = String::from_utf8(encoded).unwrap();
        assert_eq!(encoded.lines().count(), 2);
        assert!(encoded.starts_with("1 "));

        let mut decoded = Vec::new();
        run_cat_decode(&mut Cursor::new(&encoded), &mut decoded, &tok, false).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "<s>hello\nworld\n");

        let mut skipped = Vec::new();
        run_cat_decode(&mut Cursor::new(&encoded), &mut skipped, &tok, true).unwrap();
        assert_eq!(String::from_utf8(skipped).unwrap(), "hello\nworld\n");
    }

    #[test]
    fn test_cat_decode_bad_id() {
        let tok = tokenizer();
        let mut out = Vec::new();
        assert!(run_cat_decode(&mut Cursor::new("1 x 2\n"), &mut out, &tok, false).is_err());
        assert!(run_cat_decode(&mut Cursor::new("99999\n"), &mut out, &tok, false).is_err());
    }
}
