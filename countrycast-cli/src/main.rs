//! Binary crate for the `countrycast` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive prompts and configuration
//! - Printing the rendered page as text or HTML

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = env_logger::Env::default().default_filter_or("warn");
    env_logger::init_from_env(env);

    let cmd = cli::Cli::parse();
    log::debug!("{cmd:?}");
    cmd.run().await
}
