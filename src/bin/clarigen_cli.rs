//! clarigen-cli - resolve queries from the terminal.
//!
//! `ask` runs the interactive loop on stdin/stdout, `batch` resolves a file
//! of queries concurrently and `check` pings both model servers.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use clarigen::application::{AnswerSource, BatchRunner, ResolutionMachine};
use clarigen::bootstrap;
use clarigen::config::AppConfig;
use clarigen::domain::clarification::{ClarificationStrategy, QueryStatus};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Parser)]
#[command(name = "clarigen-cli", about = "Ambiguous query resolution from the terminal")]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve one query, asking clarifying questions on stdin
    Ask {
        #[arg(value_name = "QUERY", required = true)]
        query: Vec<String>,
    },
    /// Resolve every line of a file and print one record per line
    Batch {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Check that both model servers are reachable
    Check,
}

/// Per-run overrides of the loaded pipeline settings.
#[derive(Debug, Args, Clone)]
struct Overrides {
    #[arg(long, global = true)]
    strategy: Option<ClarificationStrategy>,
    #[arg(long, global = true)]
    max_attempts: Option<u32>,
    #[arg(long, global = true)]
    no_validate: bool,
}

impl Overrides {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(strategy) = self.strategy {
            config.pipeline.clarification_strategy = strategy;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.pipeline.max_clarification_attempts = max_attempts;
        }
        if self.no_validate {
            config.pipeline.validate_clarifications = false;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("clarigen-cli: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<ExitCode> {
    let mut config = AppConfig::load()?;
    cli.overrides.apply(&mut config);
    bootstrap::init_tracing(&config.server);
    config.validate()?;

    let machine = Arc::new(bootstrap::build_machine(&config)?);
    match cli.command {
        Command::Ask { query } => ask(&machine, query.join(" ")).await,
        Command::Batch { file } => batch(machine, config.pipeline.batch_concurrency, file).await,
        Command::Check => check(&machine).await,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Commands
// ════════════════════════════════════════════════════════════════════════════

async fn ask(machine: &ResolutionMachine, query: String) -> CliResult<ExitCode> {
    let record = machine
        .run_interactive(query, StdinAnswerSource::new())
        .await;

    if record.status() == QueryStatus::Error {
        eprintln!(
            "Could not resolve query: {}",
            record.error_message().unwrap_or("unknown error")
        );
        return Ok(ExitCode::FAILURE);
    }
    if record.is_ambiguous() == Some(true) {
        println!("Reformulated: {}", record.final_output());
    } else {
        println!("Query is clear: {}", record.final_output());
    }
    Ok(ExitCode::SUCCESS)
}

async fn batch(
    machine: Arc<ResolutionMachine>,
    concurrency: usize,
    file: PathBuf,
) -> CliResult<ExitCode> {
    let contents = tokio::fs::read_to_string(&file).await?;
    let queries: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let records = BatchRunner::new(machine, concurrency).run(queries).await;

    let mut stdout = std::io::stdout().lock();
    let mut failed = 0;
    for record in &records {
        if record.status() == QueryStatus::Error {
            failed += 1;
        }
        writeln!(stdout, "{}", record.to_blob()?.to_json_string())?;
    }
    if failed > 0 {
        eprintln!("{failed} of {} queries failed", records.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

async fn check(machine: &ResolutionMachine) -> CliResult<ExitCode> {
    let (detector, resolver) = tokio::join!(
        machine.detector().check_connection(),
        machine.resolver().check_connection(),
    );

    let mut healthy = true;
    for (name, result) in [("detector", detector), ("resolver", resolver)] {
        match result {
            Ok(()) => println!("{name}: ok"),
            Err(e) => {
                healthy = false;
                println!("{name}: unreachable ({e})");
            }
        }
    }
    Ok(if healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Terminal answer source
// ════════════════════════════════════════════════════════════════════════════

/// Prints each question and reads the answer from the next stdin line.
///
/// End of input closes the source.
struct StdinAnswerSource {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinAnswerSource {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl AnswerSource for StdinAnswerSource {
    async fn answer(&mut self, question: &str) -> Option<String> {
        println!("{question}");
        print!("> ");
        let _ = std::io::stdout().flush();

        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read answer from stdin");
                None
            }
        }
    }
}
