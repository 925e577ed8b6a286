//! `qrstamp`: read, bump and compare `createTime` stamps in QR codes.

mod cli;
mod commands;
mod config;
mod output;
mod timing;
mod utils;

use anyhow::Result;
use clap::Parser as _;
use qrstamp_input::RealStdinReader;

use crate::cli::{Cli, Commands};
use crate::commands::{
    BumpSource, generate_completions, run_bump, run_compare, run_config, run_read,
};
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    timing::init_tracing(cli.verbose, cli.timing);

    let mut stdin = RealStdinReader::new();

    match cli.command {
        Commands::Read { images, stdin: from_stdin } => {
            let json = cli.json || Config::load()?.output.json;
            run_read(images, from_stdin, &mut stdin, json).await
        }
        Commands::Bump {
            image,
            text,
            stdin: from_stdin,
            output,
            width,
            margin,
        } => {
            let config = Config::load()?;
            let source = match (image, text) {
                (Some(path), _) => BumpSource::Image(path),
                (None, Some(text)) => BumpSource::Text(text),
                (None, None) if from_stdin => BumpSource::Stdin,
                (None, None) => anyhow::bail!("Provide an image, --text or --stdin"),
            };
            run_bump(
                source,
                &mut stdin,
                output,
                &config.encode_options(width, margin)?,
                cli.json || config.output.json,
            )
        }
        Commands::Compare { images, stdin: from_stdin } => {
            let json = cli.json || Config::load()?.output.json;
            run_compare(images, from_stdin, &mut stdin, json).await
        }
        Commands::Config { action } => run_config(action),
        Commands::Completions { shell } => Ok(generate_completions(shell)?),
    }
}
