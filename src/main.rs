use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use filingqa::config::{self, RunConfig};
use filingqa::files::{load_metadata, load_questions, save_answers};
use filingqa::{
    AnswerKind, BatchRunner, LlmClientBuilder, MetadataIndex, Question, QuestionProcessor,
    QuestionProcessorBuilder, RunError, logging, lookup,
};
use tracing::info;

/// filingqa - answer questions about companies from their annual reports
#[derive(Parser)]
#[command(name = "filingqa")]
#[command(about = "Answer questions about annual-report PDFs using metadata and an LLM")]
#[command(version)]
struct Cli {
    /// Logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer every question in the questions file
    Run(RunCommand),
    /// Look up the metadata record for a company
    FindCompany(FindCompanyCommand),
    /// Walk a single ad hoc question through the pipeline, printing each step
    Probe(ProbeCommand),
}

#[derive(Parser)]
struct RunCommand {
    /// Directory containing <sha1>.pdf files (default: $PDF_DIR or ~/Downloads/pdfs)
    #[arg(long, value_name = "DIR")]
    pdf_dir: Option<PathBuf>,

    /// Path to the PDF metadata JSON file
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_METADATA_PATH)]
    pdf_meta: PathBuf,

    /// Path to the questions JSON file
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_QUESTIONS_PATH)]
    questions: PathBuf,

    /// Path to save the results to
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Process only the question at this 0-based index
    #[arg(long, value_name = "INDEX")]
    single_question: Option<usize>,

    /// Pause between questions, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 500)]
    delay_ms: u64,
}

#[derive(Parser)]
struct FindCompanyCommand {
    /// Name of the company to search for
    #[arg(value_name = "COMPANY")]
    company_name: String,

    /// Path to the PDF metadata JSON file
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_METADATA_PATH)]
    pdf_meta: PathBuf,

    /// Enable fuzzy matching for company names
    #[arg(long)]
    fuzzy: bool,
}

#[derive(Parser)]
struct ProbeCommand {
    /// Question text
    #[arg(value_name = "QUESTION")]
    text: String,

    /// Expected answer kind (number, name, names, boolean, ...)
    #[arg(long, default_value = "boolean")]
    kind: String,

    /// Directory containing <sha1>.pdf files (default: $PDF_DIR or ~/Downloads/pdfs)
    #[arg(long, value_name = "DIR")]
    pdf_dir: Option<PathBuf>,

    /// Path to the PDF metadata JSON file
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_METADATA_PATH)]
    pdf_meta: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

fn main() {
    config::load_dotenv();
    let cli = Cli::parse();
    logging::init(cli.log_level.as_filter());

    let result = match cli.command {
        Commands::Run(cmd) => handle_run(cmd),
        Commands::FindCompany(cmd) => handle_find_company(&cmd),
        Commands::Probe(cmd) => handle_probe(cmd),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error was caused by invalid user input.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<RunError>().is_some()
}

fn load_index(path: &std::path::Path) -> Result<MetadataIndex> {
    let records = load_metadata(path).context("Failed to load PDF metadata")?;
    Ok(MetadataIndex::build(records))
}

fn build_processor(index: MetadataIndex, pdf_dir: PathBuf) -> Result<QuestionProcessor> {
    let client = LlmClientBuilder::new()
        .build()
        .context("Failed to create LLM client")?;
    Ok(QuestionProcessorBuilder::new(index, Arc::new(client))
        .pdf_dir(pdf_dir)
        .build())
}

fn handle_run(cmd: RunCommand) -> Result<()> {
    let config = RunConfig {
        pdf_dir: cmd.pdf_dir.unwrap_or_else(config::default_pdf_dir),
        metadata_path: cmd.pdf_meta,
        questions_path: cmd.questions,
        output_path: cmd.output,
        single_question: cmd.single_question,
        delay: Duration::from_millis(cmd.delay_ms),
    };
    execute_run(&config)
}

/// Loads inputs, answers the questions and writes the answer sheet.
fn execute_run(config: &RunConfig) -> Result<()> {
    let index = load_index(&config.metadata_path)?;
    let questions = load_questions(&config.questions_path).context("Failed to load questions")?;
    info!(
        documents = index.len(),
        questions = questions.len(),
        pdf_dir = %config.pdf_dir.display(),
        "loaded inputs"
    );

    let processor = build_processor(index, config.pdf_dir.clone())?;
    let runner = BatchRunner::new(&processor).delay(config.delay);

    let sheet = match config.single_question {
        Some(i) => runner.run_single(&questions, i)?,
        None => runner.run_all(&questions),
    };

    save_answers(&sheet, &config.output_path).context("Failed to save results")?;
    Ok(())
}

fn handle_find_company(cmd: &FindCompanyCommand) -> Result<()> {
    let index = load_index(&cmd.pdf_meta)?;
    let stdin = io::stdin();
    lookup::find_company(
        &cmd.company_name,
        &index,
        cmd.fuzzy,
        &mut stdin.lock(),
        &mut io::stdout(),
    )
    .context("Failed to run company lookup")
}

fn handle_probe(cmd: ProbeCommand) -> Result<()> {
    let index = load_index(&cmd.pdf_meta)?;
    let pdf_dir = cmd.pdf_dir.unwrap_or_else(config::default_pdf_dir);
    let processor = build_processor(index, pdf_dir)?;
    let question = Question::new(cmd.text, AnswerKind::parse(&cmd.kind));

    println!("Testing question: {}", question.text);

    let company = processor.company_name(&question.text);
    println!("Extracted company name: {}", company.as_deref().unwrap_or("<none>"));

    if let Some(sha1) = company.as_deref().and_then(|name| processor.resolve(name)) {
        println!("Found PDF with SHA1: {sha1}");
        if let Some(meta) = processor.index().metadata(&sha1) {
            println!(
                "Metadata for company: {}",
                serde_json::to_string_pretty(meta)?
            );
        }
        println!("Expected file: {}", processor.document_path(&sha1).display());
    } else {
        println!("No matching document");
    }

    let record = processor.process(&question);
    println!("Result: {}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_run_with_single_question() {
        let cli = Cli::try_parse_from([
            "filingqa",
            "--log-level",
            "debug",
            "run",
            "--single-question",
            "3",
            "--delay-ms",
            "0",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(cmd) => {
                assert_eq!(cmd.single_question, Some(3));
                assert_eq!(cmd.delay_ms, 0);
                assert_eq!(cmd.pdf_meta, PathBuf::from("pdf-meta.json"));
                assert_eq!(cmd.output, PathBuf::from("answers.json"));
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn cli_parses_find_company_fuzzy() {
        let cli =
            Cli::try_parse_from(["filingqa", "find-company", "Acme Corp", "--fuzzy"]).unwrap();
        match cli.command {
            Commands::FindCompany(cmd) => {
                assert_eq!(cmd.company_name, "Acme Corp");
                assert!(cmd.fuzzy);
            }
            _ => panic!("expected find-company command"),
        }
    }

    #[test]
    fn log_level_maps_to_filter() {
        assert_eq!(LogLevel::Warning.as_filter(), "warn");
        assert_eq!(LogLevel::Critical.as_filter(), "error");
    }

    #[test]
    fn out_of_range_index_is_user_error() {
        let err = anyhow::Error::new(RunError::IndexOutOfRange { index: 4, len: 2 });
        assert!(is_user_error(&err));
        assert!(!is_user_error(&anyhow::anyhow!("disk full")));
    }

    #[test]
    fn missing_metadata_fails_before_any_work() {
        let config = RunConfig {
            metadata_path: PathBuf::from("/nonexistent/pdf-meta.json"),
            ..RunConfig::default()
        };
        let err = execute_run(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to load PDF metadata"));
    }
}
