use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use labsense::api::{serve_until_ctrl_c, ApiContext};
use labsense::config::{AppConfig, APP_VERSION};
use labsense::crypto::ReportKey;
use labsense::db::{EncryptedReportStore, MemoryReportStore, ReportStore};
use labsense::pipeline::explain::LanguageModel;
use labsense::pipeline::extraction::TextSource;
use labsense::pipeline::prescription::plan_prescriptions;
use labsense::pipeline::processor::{AnalysisRequest, ReportAnalyzer};
use labsense::pipeline::AnalysisError;
use labsense::reporting::{
    analyze_and_record, catalog_entry, catalog_listing, load_patient_history,
};

/// Exit status when the input held nothing to analyse.
const EXIT_NOTHING_TO_ANALYZE: u8 = 2;

#[derive(Parser)]
#[command(name = "labsense")]
#[command(version, about = "Medical lab report analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AnalyzeOptions {
    /// Patient name the report is stored under
    #[arg(long)]
    patient: String,
    /// Report date (YYYY-MM-DD); defaults to the date printed in the report, then today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Ask the configured language model for explanations the built-in table lacks
    #[arg(long)]
    use_llm: bool,
    /// Do not read or write report history
    #[arg(long)]
    no_store: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a report file (text, PDF, or image)
    Analyze {
        /// Path to the report
        file: PathBuf,
        #[command(flatten)]
        options: AnalyzeOptions,
    },
    /// Analyse report text given on the command line
    Text {
        /// Report text
        text: String,
        #[command(flatten)]
        options: AnalyzeOptions,
    },
    /// Show a patient's stored reports, newest first
    History {
        /// Patient name
        patient: String,
        /// Number of reports (defaults to LABSENSE_HISTORY_LIMIT)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List the recognised tests and reference ranges
    Catalog {
        /// Show a single test (case-insensitive)
        #[arg(long)]
        test: Option<String>,
    },
    /// Extract prescriptions and next-dose reminders from a file
    Prescriptions {
        /// Path to the prescription (text, PDF, or image)
        file: PathBuf,
    },
    /// Run the HTTP API
    Serve {
        /// Bind address (defaults to LABSENSE_BIND_ADDR)
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Print a new base64 key for LABSENSE_ENCRYPTION_KEY
    GenerateKey,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    labsense::init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(AnalysisError::NothingToAnalyze(reason)) = e.downcast_ref::<AnalysisError>() {
                eprintln!("{reason}");
                return ExitCode::from(EXIT_NOTHING_TO_ANALYZE);
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Analyze { file, options } => {
            let config = AppConfig::from_env()?;
            let extracted = text_source(&config)
                .extract_file(&file)
                .with_context(|| format!("Could not extract text from {}", file.display()))?;
            analyze_text(&config, &extracted.text, &options)
        }
        Commands::Text { text, options } => {
            let config = AppConfig::from_env()?;
            analyze_text(&config, &text, &options)
        }
        Commands::History { patient, limit } => {
            let config = AppConfig::from_env()?;
            let store = open_store(&config)?;
            let limit = limit.unwrap_or(config.history_limit);
            print_json(&load_patient_history(&store, &patient, limit)?)
        }
        Commands::Catalog { test: None } => print_json(&catalog_listing()),
        Commands::Catalog { test: Some(name) } => match catalog_entry(&name) {
            Some(entry) => print_json(&entry),
            None => anyhow::bail!("Unknown test: {name}"),
        },
        Commands::Prescriptions { file } => {
            let config = AppConfig::from_env()?;
            let extracted = text_source(&config)
                .extract_file(&file)
                .with_context(|| format!("Could not extract text from {}", file.display()))?;
            let now = chrono::Local::now().naive_local();
            print_json(&plan_prescriptions(&extracted.text, now))
        }
        Commands::Serve { addr } => serve(addr),
        Commands::GenerateKey => {
            println!("{}", ReportKey::generate().to_base64());
            Ok(())
        }
    }
}

fn analyze_text(config: &AppConfig, text: &str, options: &AnalyzeOptions) -> anyhow::Result<()> {
    let model = if options.use_llm {
        config.llm.language_model_or_disabled()
    } else {
        LanguageModel::Disabled
    };
    let analyzer = ReportAnalyzer::new(model);
    let store: Box<dyn ReportStore> = if options.no_store {
        Box::new(MemoryReportStore::new())
    } else {
        Box::new(open_store(config)?)
    };

    let request = AnalysisRequest {
        patient_name: &options.patient,
        raw_text: text,
        report_date: options.date,
    };
    let outcome = analyze_and_record(&analyzer, store.as_ref(), config.history_limit, &request)?;
    print_json(&outcome)
}

fn serve(addr: Option<SocketAddr>) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let addr = addr.unwrap_or(config.bind_addr);
    let store = open_store(&config)?;
    let ctx = ApiContext::new(
        Arc::new(store),
        text_source(&config),
        config.llm.language_model_or_disabled(),
        config.history_limit,
    );

    tracing::info!(%addr, version = APP_VERSION, "Labsense API starting");
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(serve_until_ctrl_c(ctx.clone(), addr))
        .with_context(|| format!("API server on {addr} failed"))?;
    Ok(())
}

fn open_store(config: &AppConfig) -> anyhow::Result<EncryptedReportStore> {
    let key = config.report_key()?;
    let path = &config.database_path;
    EncryptedReportStore::open(path, key)
        .with_context(|| format!("Cannot open report database at {}", path.display()))
}

fn text_source(config: &AppConfig) -> TextSource {
    TextSource::with_ocr(config.ocr_engine())
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
