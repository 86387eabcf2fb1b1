use std::path::PathBuf;

use spectok::{ShiftedTokenizer, TokenizerOptions};

/// Vocabulary and id-layout arg group.
#[derive(clap::Args, Debug)]
pub struct TokenizerArgs {
    /// Vocabulary file (`.json` or `.tiktoken`).
    #[arg(long)]
    pub vocab: PathBuf,

    /// Total flat id capacity, specials included.
    #[arg(long)]
    pub vocab_size: Option<usize>,

    /// Number of reserved special ids.
    #[arg(long)]
    pub num_special_tokens: Option<usize>,

    /// Leading special token; may be repeated.
    ///
    /// Replaces the default `<unk>`, `<s>`, `</s>` list.
    #[arg(long = "special-token")]
    pub special_tokens: Vec<String>,

    /// Also match verbatim special tokens in text.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub literal_specials: bool,
}

impl TokenizerArgs {
    /// Build the [`TokenizerOptions`] described by these args.
    pub fn options(&self) -> TokenizerOptions {
        let mut options = TokenizerOptions::default().with_literal_specials(self.literal_specials);
        if let Some(vocab_size) = self.vocab_size {
            options = options.with_vocab_size(vocab_size);
        }
        if let Some(num_special_tokens) = self.num_special_tokens {
            options = options.with_num_special_tokens(num_special_tokens);
        }
        if !self.special_tokens.is_empty() {
            options = options.with_special_tokens(self.special_tokens.as_slice());
        }
        options
    }

    /// Load the tokenizer.
    pub fn load_tokenizer(&self) -> Result<ShiftedTokenizer<u32>, Box<dyn std::error::Error>> {
        log::info!("Loading vocab: {}", self.vocab.display());
        Ok(self.options().load(&self.vocab)?)
    }
}
