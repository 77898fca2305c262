mod artifacts;
mod commands;
mod output;
mod xml_output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dnsdumpster_lib::{ClientConfig, DnsDumpster};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "dnsdumpster")]
#[command(about = "Look up A, MX, NS and TXT records for a domain on DNSDumpster")]
struct Cli {
    /// Output format: table, json, csv, markdown or xml
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Log requests, extracted URLs and skipped rows
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search DNS records for a domain
    Search(commands::search::SearchArgs),
    /// Fetch and print the session authorization token
    Token,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("dnsdumpster={}", level).parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = OutputFormat::from_arg(&cli.output);

    let config = ClientConfig::from_env();
    let client = DnsDumpster::with_config(&config).await?;

    match &cli.command {
        Commands::Search(args) => commands::search::run(args, &client, &format).await?,
        Commands::Token => commands::token::run(&client)?,
    }

    Ok(())
}
