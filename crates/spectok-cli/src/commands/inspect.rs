use std::io::Write;

use spectok::ShiftedTokenizer;

use crate::{input_output::OutputArgs, logging::LogArgs, tokenizer_args::TokenizerArgs};

/// Args for the inspect command.
#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    tokenizer: TokenizerArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    logging: LogArgs,
}

impl InspectArgs {
    /// Run the inspect command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let tokenizer = self.tokenizer.load_tokenizer()?;
        let mut writer = self.output.open_writer()?;

        write_summary(&mut writer, &tokenizer)?;
        writer.flush()?;

        Ok(())
    }
}

fn write_summary(
    writer: &mut dyn Write,
    tokenizer: &ShiftedTokenizer<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let specials = tokenizer.special_tokens();

    writeln!(writer, "name: {}", tokenizer.name().unwrap_or("-"))?;
    writeln!(writer, "vocab_size: {}", tokenizer.vocab_size())?;
    writeln!(writer, "inner_vocab_size: {}", tokenizer.inner_vocab_size())?;
    writeln!(
        writer,
        "special ids: [0, {})",
        tokenizer.num_special_tokens()
    )?;
    writeln!(
        writer,
        "inner ids: [{}, {})",
        tokenizer.num_special_tokens(),
        tokenizer.vocab_size()
    )?;
    for (label, id) in [
        ("unk", tokenizer.unk_id()),
        ("bos", tokenizer.bos_id()),
        ("eos", tokenizer.eos_id()),
    ] {
        let token = specials.get(id as usize).unwrap_or("?");
        writeln!(writer, "{label}_id: {id} {token}")?;
    }
    Ok(())
}
