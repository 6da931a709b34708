//! `inline-text` command-line tool: inspect boundaries and replay scripts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inline_text::inspect::{boundaries_at, InspectOptions};
use inline_text::replay::{
    load_script, run_gesture_script, run_span_script, GestureScript, SpanScript,
};
use inline_text::GestureConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "inline_text=info,inline_text_core=warn,inline_text_gestures=warn";

#[derive(Parser)]
#[command(name = "inline-text", about = "Text boundary, span, and gesture tools", version)]
struct Cli {
    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the enclosing unit of every granularity at an offset
    Boundaries {
        text: String,
        /// Byte offset into TEXT
        #[arg(short, long, default_value = "0")]
        offset: usize,
        /// Soft-wrap lines at this many columns
        #[arg(short, long)]
        width: Option<usize>,
        /// Treat the text as obscured (password field); also enabled by
        /// INLINE_TEXT_OBSCURE_TEXT
        #[arg(long)]
        obscure: bool,
    },
    /// Replay a pointer script through the tap/drag recognizer
    Replay { script: PathBuf },
    /// Apply a span script and print the surviving spans
    Spans { script: PathBuf },
}

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string(value).context("failed to encode output")?
    );
    Ok(())
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    let config = GestureConfig::from_env();

    match cli.command {
        Commands::Boundaries {
            text,
            offset,
            width,
            obscure,
        } => {
            let options = InspectOptions {
                wrap_width: width,
                obscure_text: obscure || config.obscure_text,
            };
            let reports = boundaries_at(&text, offset, options);
            if cli.json {
                print_json(&reports)?;
            } else {
                for report in &reports {
                    println!("{}", report);
                }
            }
        }
        Commands::Replay { script } => {
            let script: GestureScript = load_script(&script)?;
            let records = run_gesture_script(&script, config);
            for record in &records {
                if cli.json {
                    print_json(record)?;
                } else {
                    println!("{}", record);
                }
            }
        }
        Commands::Spans { script } => {
            let script: SpanScript = load_script(&script)?;
            let report = run_span_script(&script)?;
            if cli.json {
                print_json(&report)?;
            } else {
                for span in &report.spans {
                    println!("{}", span);
                }
            }
        }
    }

    Ok(())
}
