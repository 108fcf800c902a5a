use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pennywise_finance::{extract_monthly_totals, month_abbrev, summarize, MonthlyTotals};
use pennywise_ingest::{load_document_text, load_tabular, normalize, write_records_csv};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod context;
mod llm;
mod session;
mod speech;
mod state;

use config::{env_lookup, load_config, Config};
use context::StatementContext;
use llm::HttpCompleter;
use session::{ChatSession, SessionSettings};

#[derive(Parser, Debug)]
#[command(name = "pennywise", version, about = "Personal finance chat over your bank statements")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chat with the assistant about a CSV and/or PDF statement
    Chat {
        /// Transaction CSV (columns among date, description, amount, type)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// PDF statement; monthly totals are extracted from its text
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Read replies aloud with a local text-to-speech command
        #[arg(long)]
        speak: bool,
    },

    /// Clean a raw CSV export and save the normalized rows
    Clean {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },

    /// Print income/spend totals for a CSV statement (no model call)
    Summary {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Print per-month totals found in a PDF statement (no model call)
    Months {
        #[arg(long)]
        pdf: PathBuf,

        /// Stop reading once this many characters have been extracted
        #[arg(long)]
        max_chars: Option<usize>,
    },

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.pennywise/config.toml if none exists
    Init,

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Chat { csv, pdf, speak } => {
            let cfg = effective_config()?;
            run_chat(&cfg, csv, pdf, speak)?;
        }

        Command::Clean { input, output } => {
            let (read, kept) = clean_statement(&input, &output)?;
            println!("Loaded {read} rows from {}", input.display());
            println!("Kept {kept} cleaned transactions");
            println!("Saved to {}", output.display());
        }

        Command::Summary { csv } => print!("{}", summary_report(&csv)),

        Command::Months { pdf, max_chars } => {
            let cfg = effective_config()?;
            let limit = max_chars.unwrap_or(cfg.chat.max_excerpt_chars);
            let text = load_document_text(&pdf, limit);
            print!("{}", monthly_report(&extract_monthly_totals(&text)));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = effective_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise only warnings and errors, on stderr.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Normalize `input` and write it to `output`. Returns rows read and rows kept.
fn clean_statement(input: &Path, output: &Path) -> Result<(usize, usize)> {
    if !input.exists() {
        bail!("CSV not found: {}", input.display());
    }
    let raw = load_tabular(input);
    let records = normalize(&raw);
    write_records_csv(output, &records).with_context(|| format!("saving {}", output.display()))?;
    Ok((raw.len(), records.len()))
}

fn summary_report(csv: &Path) -> String {
    let summary = summarize(&normalize(&load_tabular(csv)));
    match summary.net() {
        Some(net) => format!("{summary}\nNet: {net:.2}\n"),
        None => format!("{summary}\n"),
    }
}

fn monthly_report(totals: &MonthlyTotals) -> String {
    if totals.is_empty() {
        return format!("{totals}\n");
    }
    totals
        .iter()
        .map(|(month, total)| format!("{:<4} {:>12.2}\n", month_abbrev(month), total))
        .collect()
}

fn effective_config() -> Result<Config> {
    let mut cfg = load_config()?;
    cfg.apply_env(env_lookup);
    Ok(cfg)
}

fn run_chat(cfg: &Config, csv: Option<PathBuf>, pdf: Option<PathBuf>, speak: bool) -> Result<()> {
    // Fail before touching any data if the service cannot be reached at all.
    let api_key = cfg.credential(env_lookup)?;
    let completer = HttpCompleter::new(
        cfg.llm.provider,
        cfg.llm.base_url.as_deref(),
        api_key,
        cfg.llm.temperature,
    );

    let statement = StatementContext::from_sources(csv.as_deref(), pdf.as_deref(), &cfg.chat);
    let settings = SessionSettings {
        model: cfg.llm.model.clone(),
        max_tokens: cfg.llm.max_tokens,
        memory_capacity: cfg.chat.memory_capacity,
    };

    tracing::info!(model = %settings.model, "starting chat session");
    let mut session = ChatSession::new(completer, speech::speech_backend(speak), settings, statement);

    let stdin = std::io::stdin();
    session.run(stdin.lock(), std::io::stdout())
}
