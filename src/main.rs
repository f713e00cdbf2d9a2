use clap::Parser;

mod cli;
mod config;
mod corpus;
mod engine;
mod format;
mod normalize;
mod semantic;
#[cfg(test)]
mod tests;
mod voice;
mod web;

use config::Config;
use corpus::{Corpus, SUGGESTION_LIMIT};
use engine::ChatEngine;
use voice::VoiceClient;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = cli::Args::parse();

    let base_path = config::resolve_base_path(args.base_path);
    let config = Config::load_with(&base_path)?;

    match args.command {
        cli::Command::Daemon {} => {
            let engine = ChatEngine::boot(&config, &base_path)?;
            let voice = VoiceClient::new(config.voice.clone())?;
            web::start_daemon(engine, voice, config);
            Ok(())
        }

        cli::Command::Ask { message } => {
            let engine = ChatEngine::boot(&config, &base_path)?;
            let reply = engine.reply(&message)?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
            Ok(())
        }

        cli::Command::Suggest { query } => {
            let corpus = Corpus::load(
                &base_path.join(&config.corpus.json_file),
                &base_path.join(&config.corpus.csv_file),
            )?;
            let suggestions = corpus.suggestions(&query, SUGGESTION_LIMIT);
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
            Ok(())
        }
    }
}
