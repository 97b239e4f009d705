use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser};
use gistify::config::{self, Config};
use gistify::logging;
use gistify::processing::{FinalSummary, SummaryOutcome, SummaryService};

#[derive(Parser)]
#[command(
    name = "gistify-cli",
    about = "Summarize long text or a .txt/.pdf/.docx document"
)]
struct Cli {
    #[command(flatten)]
    input: InputArgs,
    /// Override the chunk character budget (CHUNK_MAX_CHARS).
    #[arg(long)]
    max_chars: Option<usize>,
    /// Override the overlap carried between chunks (CHUNK_OVERLAP_CHARS).
    #[arg(long)]
    overlap_chars: Option<usize>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Text to summarize.
    #[arg(short, long)]
    text: Option<String>,
    /// Path of a .txt, .pdf, or .docx file to summarize.
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_cli_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = effective_config(
        config::init_config().context("Failed to load configuration")?,
        &cli,
    )?;
    let service = SummaryService::from_config(&config);

    let result = match (cli.input.text, cli.input.file) {
        (Some(text), _) => service.summarize_text(&text).await,
        (None, Some(path)) => service.summarize_file(&path).await,
        (None, None) => bail!("either --text or --file is required"),
    };
    Ok(render(result))
}

fn effective_config(base: &Config, cli: &Cli) -> Result<Config> {
    let mut config = base.clone();
    if let Some(max_chars) = cli.max_chars {
        if max_chars == 0 {
            bail!("--max-chars must be greater than zero");
        }
        config.chunk_max_chars = max_chars;
    }
    if let Some(overlap_chars) = cli.overlap_chars {
        config.chunk_overlap_chars = overlap_chars;
    }
    Ok(config)
}

fn render(result: FinalSummary) -> ExitCode {
    match result {
        Ok(SummaryOutcome::Completed(report)) => {
            println!("Summary:\n{}", report.text);
            ExitCode::SUCCESS
        }
        Ok(SummaryOutcome::NoContent) => {
            println!("There is no text to summarize.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
