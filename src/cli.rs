use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Data directory holding config.yaml, the FAQ files, and model cache.
    /// Defaults to FAQBOT_BASE_PATH, then ~/.config/faqbot.
    #[clap(short, long)]
    pub base_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start faqbot as a service.
    Daemon {},

    /// Ask a single question and print the reply as JSON.
    Ask {
        /// The question text
        message: String,
    },

    /// Print autocomplete suggestions for a partial query.
    /// Does not load the embedding model.
    Suggest {
        /// The partial query
        query: String,
    },
}
