//! Unify command implementation
//!
//! The unify command executes the full pipeline against an input
//! directory:
//! 1. Load the ISSN link table and priority overrides, if given
//! 2. Load per-source record files (JSON Lines, one file per source)
//! 3. Audit link-table consistency of the raw records
//! 4. Run the four-phase unification engine
//! 5. Write unified records, the conflict report, and a run summary

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the unify command
#[derive(Args, Debug)]
pub struct UnifyArgs {
    /// Input directory with per-source record files (*.jsonl)
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "JOURNAL_UNIFY_INPUT",
        default_value = "data/raw"
    )]
    pub input_dir: PathBuf,

    /// ISSN link table: JSON object mapping ISSN to linking ISSN
    #[arg(long, value_name = "PATH")]
    pub link_table: Option<PathBuf>,

    /// Source priority overrides (YAML mapping source tag to priority)
    #[arg(long, value_name = "PATH")]
    pub priorities: Option<PathBuf>,

    /// Output directory for unified data
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "JOURNAL_UNIFY_OUTPUT",
        default_value = "data/unified"
    )]
    pub output_dir: PathBuf,

    /// Output filename for the unified records
    #[arg(long, value_name = "NAME", default_value = "unified_journals.jsonl")]
    pub output_file: String,

    /// Show detailed progress information
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the unify command
pub fn execute(args: UnifyArgs) -> Result<()> {
    use console::style;
    use indicatif::ProgressBar;
    use journal_unify::config::{LinkTable, SourcePriorities};
    use journal_unify::conflicts::link_consistency;
    use journal_unify::export;
    use journal_unify::input;
    use journal_unify::phases::orchestrator;
    use journal_unify::stats::CoverageSummary;
    use std::fs;
    use std::time::Instant;

    let start_time = Instant::now();

    if !args.quiet {
        println!("🔗 Journal Unify");
        println!();
    }

    // Static tables
    let links = match &args.link_table {
        Some(path) => input::read_link_table(path)?,
        None => LinkTable::new(),
    };
    let priorities = match &args.priorities {
        Some(path) => SourcePriorities::from_yaml(&fs::read_to_string(path)?)?,
        None => SourcePriorities::default(),
    };
    if !args.quiet && args.verbose {
        println!("📋 Link table entries: {}", links.len());
    }

    // Load per-source record files
    let files = input::list_record_files(&args.input_dir)?;
    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    let mut records = Vec::new();
    for path in &files {
        records.extend(input::read_records_file(path)?);
        progress.inc(1);
    }
    progress.finish_and_clear();
    if !args.quiet {
        println!(
            "📥 Loaded {} records from {} files",
            records.len(),
            files.len()
        );
    }

    fs::create_dir_all(&args.output_dir)?;

    // Pre-engine audit: records combining ISSNs of two different journals
    if !links.is_empty() {
        let inconsistencies = link_consistency(&records, &links);
        if !inconsistencies.is_empty() {
            let path = args.output_dir.join("link_inconsistencies.json");
            fs::write(&path, serde_json::to_string_pretty(&inconsistencies)?)?;
            if !args.quiet {
                println!(
                    "⚠️  {} records combine ISSNs of different journals (see {})",
                    inconsistencies.len(),
                    path.display()
                );
            }
        }
    }

    match orchestrator::unify(records, &links, &priorities) {
        Ok(outcome) => {
            outcome.stats.log_summary();
            let coverage = CoverageSummary::from_records(&outcome.records);
            coverage.log_summary();

            let records_path = args.output_dir.join(&args.output_file);
            export::write_records(&outcome.records, &records_path)?;
            if !outcome.conflicts.is_empty() {
                export::write_conflicts(
                    &outcome.conflicts,
                    &args.output_dir.join("conflicts.json"),
                )?;
            }
            export::write_summary(
                &outcome.stats,
                &coverage,
                &args.output_dir.join("summary.json"),
            )?;

            if !args.quiet {
                let duration = start_time.elapsed();
                println!(
                    "{} Unified {} records into {} journals in {:.2}s",
                    style("✓").green(),
                    outcome.stats.records_total,
                    outcome.stats.unified_total,
                    duration.as_secs_f64()
                );
                println!("   Records written to: {}", records_path.display());
                if !outcome.conflicts.is_empty() {
                    println!(
                        "   {} conflicts logged to: {}",
                        outcome.conflicts.len(),
                        args.output_dir.join("conflicts.json").display()
                    );
                }
            }

            Ok(())
        }
        Err(e) => {
            if !args.quiet {
                println!("{} Unification failed", style("✗").red());
                println!();
            }
            Err(e.into())
        }
    }
}
