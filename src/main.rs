//! persona-corpus CLI
//!
//! Usage:
//!   persona-corpus "data/Harry AI"                          # pairs, sequential stages
//!   persona-corpus "data/Harry AI" --augment                # + style-augmented duplicates
//!   persona-corpus "data/Harry AI" --mode lines             # unique target lines only
//!   persona-corpus "data/Harry AI" --stage-mode pattern     # stage hint in metadata
//!   persona-corpus "data/Harry AI" --json-summary           # machine-readable summary

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use persona_corpus::core::{write_jsonl, Pipeline, RunSummary};
use persona_corpus::types::{ExtractionMode, PipelineConfig, StageMode};
use persona_corpus::{DEFAULT_TARGET_SPEAKER, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "persona-corpus",
    version = VERSION,
    about = "Build a persona training corpus from exported conversation logs",
    long_about = "Walks a directory of exported conversations (message_*.json), repairs\n\
                  mis-encoded text, redacts phone numbers, URLs and known names, pairs\n\
                  each reply of the target speaker with the message before it and labels\n\
                  it with a conversation stage.\n\n\
                  Modes:\n  \
                  pairs  - prompt + reply records with a stage tag (default)\n  \
                  lines  - unique target-speaker lines, no prompt\n\n\
                  Stage modes:\n  \
                  sequential - stateful keyword classifier (default)\n  \
                  pattern    - stateless regex detector, written to metadata\n  \
                  none       - no stage label"
)]
struct Args {
    /// Root directory of the exported conversations
    input: PathBuf,

    /// Output JSONL file
    #[arg(short, long, default_value = "data/training_data_final.jsonl")]
    output: PathBuf,

    /// Sender whose replies become training labels
    #[arg(short, long, default_value = DEFAULT_TARGET_SPEAKER)]
    speaker: String,

    /// Override the system framing segment
    #[arg(long)]
    system_prompt: Option<String>,

    /// Extraction mode: pairs or lines
    #[arg(short, long, default_value = "pairs")]
    mode: ExtractionMode,

    /// Stage labeling: sequential, pattern or none
    #[arg(long, default_value = "sequential")]
    stage_mode: StageMode,

    /// Append a style-augmented duplicate for each reply without an idiom
    #[arg(short, long)]
    augment: bool,

    /// Attach source file and reply time to each record
    #[arg(long)]
    metadata: bool,

    /// Additional name to redact (repeatable)
    #[arg(long = "redact-name", value_name = "NAME")]
    redact_names: Vec<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    json_summary: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn to_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::for_speaker(&self.speaker);
        if let Some(ref prompt) = self.system_prompt {
            config.system_prompt = prompt.clone();
        }
        config.mode = self.mode;
        config.stage_mode = self.stage_mode;
        config.augment = self.augment;
        config.include_metadata = self.metadata;
        config.extra_names = self.redact_names.clone();
        config
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = args.to_config();
    tracing::debug!(
        speaker = %config.target_speaker,
        system_prompt = %config.system_prompt,
        "configuration ready"
    );

    let mut pipeline = Pipeline::new(config).context("Invalid configuration")?;
    let output = pipeline
        .run(&args.input)
        .with_context(|| format!("Cannot build corpus from {}", args.input.display()))?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    let file = File::create(&args.output)
        .with_context(|| format!("Cannot create {}", args.output.display()))?;
    let written = write_jsonl(&output.records, BufWriter::new(file))
        .with_context(|| format!("Cannot write {}", args.output.display()))?;

    if args.json_summary {
        println!("{}", serde_json::to_string_pretty(&output.summary)?);
    } else {
        print_summary(&output.summary, written, &args);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Human-readable run summary
fn print_summary(summary: &RunSummary, written: usize, args: &Args) {
    println!("{}", "========================================".bold());
    println!("{}", format!("  persona-corpus v{}", VERSION).bold());
    println!("{}", "========================================".bold());
    println!(
        "Files:   {} found, {} skipped",
        summary.files_found,
        if summary.files_skipped > 0 {
            summary.files_skipped.to_string().yellow()
        } else {
            summary.files_skipped.to_string().normal()
        }
    );
    println!("Convos:  {}", summary.conversations);
    println!("Records: {} extracted, {} augmented", summary.records, summary.augmented);

    if summary.dropped.total() > 0 {
        println!("Dropped:");
        for (reason, count) in summary.dropped.iter() {
            let code = format!("{:<28}", reason.code());
            println!("  {} {:>6}  {}", code.dimmed(), count, reason.description());
        }
    }

    println!();
    println!(
        "{} {} examples to {}",
        "Wrote".green().bold(),
        written,
        args.output.display()
    );
}
