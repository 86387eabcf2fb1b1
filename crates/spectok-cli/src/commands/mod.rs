use crate::commands::{cat::CatArgs, inspect::InspectArgs};

pub mod cat;
pub mod inspect;

/// Subcommands for spectok.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Act as a streaming tokenizer.
    Cat(CatArgs),

    /// Describe the id layout of a vocabulary.
    Inspect(InspectArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Cat(cmd) => cmd.run(),
            Commands::Inspect(cmd) => cmd.run(),
        }
    }
}
