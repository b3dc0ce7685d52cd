//! codegrade - structured extraction of code-review reports
//!
//! ## Commands
//!
//! - `extract`: Turn a model's review text into a score / strengths / improvements record
//! - `prompt`: Render the reviewer prompt for a code submission
//! - `config`: Print the default extractor configuration as TOML

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use uuid::Uuid;

use codegrade_core::{
    build_review_prompt, render_report_md, write_report_json, Extractor, ExtractorConfig,
    ReportArtifact, ReviewRequest, METRICS,
};

#[derive(Parser)]
#[command(name = "codegrade")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Structured extraction of LLM code-review reports", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a structured record from review text
    Extract {
        /// File holding the review text ("-" reads stdin)
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Extractor configuration (TOML)
        #[arg(short, long, env = "CODEGRADE_CONFIG")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Model name recorded in persistence rows
        #[arg(short, long, default_value = "unknown")]
        model: String,

        /// Task id recorded in persistence rows
        #[arg(long)]
        task_id: Option<Uuid>,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the reviewer prompt for a code file
    Prompt {
        /// Source file to review
        #[arg(long)]
        code: PathBuf,

        /// Submission title
        #[arg(short, long, default_value = "")]
        title: String,

        /// Submission description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Print the default extractor configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Report artifact with extraction diagnostics
    Json,
    /// Human-readable markdown report
    Markdown,
    /// Persistence row
    Row,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    codegrade_core::init_tracing(cli.json, level);

    let result = match cli.command {
        Commands::Extract {
            input,
            config,
            format,
            model,
            task_id,
            output,
        } => cmd_extract(
            &input,
            config.as_deref(),
            format,
            &model,
            task_id,
            output.as_deref(),
        ),
        Commands::Prompt {
            code,
            title,
            description,
        } => cmd_prompt(&code, &title, &description),
        Commands::Config => cmd_config(),
    };

    METRICS.flush();
    result
}

fn cmd_extract(
    input: &Path,
    config: Option<&Path>,
    format: OutputFormat,
    model: &str,
    task_id: Option<Uuid>,
    output: Option<&Path>,
) -> Result<()> {
    let extractor = load_extractor(config)?;
    let text = read_input(input)?;
    let extraction = extractor.extract_with_diagnostics(&text);

    info!(
        score = extraction.record.score.value(),
        strengths = extraction.record.strengths.len(),
        improvements = extraction.record.improvements.len(),
        fallback = extraction.diagnostics.used_fallback(),
        "extracted evaluation"
    );

    if let (OutputFormat::Json, Some(path)) = (format, output) {
        write_report_json(path, &ReportArtifact::new(extraction))?;
        println!("Wrote report artifact to {:?}", path);
        return Ok(());
    }

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&ReportArtifact::new(extraction))?,
        OutputFormat::Markdown => render_report_md(&extraction.record),
        OutputFormat::Row => {
            serde_json::to_string_pretty(&extraction.record.to_row(model, task_id))?
        }
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output to {:?}", path))?;
            println!("Wrote {:?} output to {:?}", format, path);
        }
        None => println!("{}", rendered.trim_end()),
    }
    Ok(())
}

fn cmd_prompt(code: &Path, title: &str, description: &str) -> Result<()> {
    let source = std::fs::read_to_string(code)
        .with_context(|| format!("Failed to read code file: {:?}", code))?;
    let request = ReviewRequest::new(source)
        .with_title(title)
        .with_description(description)
        .validate()
        .with_context(|| format!("Invalid submission: {:?}", code))?;

    println!("{}", build_review_prompt(&request));
    Ok(())
}

fn cmd_config() -> Result<()> {
    let rendered = ExtractorConfig::default().to_toml_string()?;
    print!("{}", rendered);
    Ok(())
}

fn load_extractor(config: Option<&Path>) -> Result<Extractor> {
    match config {
        Some(path) => {
            let config = ExtractorConfig::load(path)
                .with_context(|| format!("Failed to load config: {:?}", path))?;
            Extractor::new(config).with_context(|| format!("Invalid config: {:?}", path))
        }
        None => Ok(Extractor::default()),
    }
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read review text from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read review text: {:?}", input))
}
