mod commands;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adlabel")]
#[command(about = "Label the creative elements of short-form video ads and export them as CSV")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze videos (local files or URLs) and print their labeled reports
    Analyze {
        /// Video files or http(s) URLs
        #[arg(required = true)]
        sources: Vec<String>,

        /// Force re-analysis even if a cached analysis exists
        #[arg(short, long)]
        force: bool,

        /// Recover sections from text that lacks bold headers
        #[arg(short, long)]
        lenient: bool,

        /// Write the CSV export to this path
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Write the batch results as JSON to this path
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
    },

    /// Convert saved batch results (JSON) to CSV
    Export {
        /// JSON file with an `analysisResults` array
        input: PathBuf,

        /// Output path. Prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a saved analysis text and print it
    Parse {
        file: PathBuf,

        #[arg(short, long)]
        lenient: bool,
    },

    /// Summarize ad formats across stored clips
    Formats {
        /// JSON array of clip records
        clips: PathBuf,

        /// List the videos whose dominant ad type is this format
        #[arg(long, value_name = "NAME")]
        format: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Analyze {
            sources,
            force,
            lenient,
            csv,
            json,
        } => {
            commands::analyze(commands::AnalyzeArgs {
                sources,
                force,
                lenient,
                csv,
                json,
            })
            .await
        }
        Command::Export { input, output } => commands::export(&input, output.as_deref()).await,
        Command::Parse { file, lenient } => commands::parse(&file, lenient).await,
        Command::Formats { clips, format } => commands::formats(&clips, format.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}
