//! Verdict CLI
//!
//! Answers questions about a remote document and prints the results as JSON
//! on stdout. Logs go to stderr. This binary is the same boundary an HTTP
//! layer would call: a document URL plus questions in, one result per
//! question out, in order.

use anyhow::Context;
use clap::Parser;
use verdict_core::{config::AppConfig, logging, VectorBackend};
use verdict_pipeline::Pipeline;

/// Ask questions about a remote document and get coverage decisions
#[derive(Parser, Debug)]
#[command(name = "verdict")]
#[command(about = "Document question answering with coverage decisions", long_about = None)]
#[command(version)]
struct Cli {
    /// URL of the document to analyze (PDF, DOCX, HTML, EML, or plain text)
    #[arg(short, long)]
    document: String,

    /// Questions to ask about the document
    #[arg(required = true)]
    questions: Vec<String>,

    /// Number of chunks retrieved per question
    #[arg(long)]
    top_k: Option<usize>,

    /// Generative model identifier
    #[arg(short, long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Vector store backend (flat, neighbor, remote)
    #[arg(long, env = "VERDICT_VECTOR_BACKEND")]
    vector_backend: Option<String>,

    /// Print only the answers array, not the full results
    #[arg(long)]
    answers_only: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load()?;

    let backend = cli
        .vector_backend
        .as_deref()
        .map(VectorBackend::parse)
        .transpose()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.model,
        backend,
        cli.top_k,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color, cli.log_json)?;

    tracing::info!(
        document = %cli.document,
        questions = cli.questions.len(),
        "Starting verdict run"
    );

    let pipeline = Pipeline::new(config)?;
    let results = pipeline
        .run(&cli.document, &cli.questions)
        .await
        .context("pipeline run failed")?;

    let output = if cli.answers_only {
        let answers: Vec<&str> = results.iter().map(|r| r.answer.as_str()).collect();
        serde_json::to_string_pretty(&answers)?
    } else {
        serde_json::to_string_pretty(&results)?
    };

    println!("{}", output);

    Ok(())
}
