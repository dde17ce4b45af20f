use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use adverge::config::Config;

/// adverge: are the ads you see personalized?
///
/// Compares the vocabulary of advertisement and organic videos in donated
/// TikTok metadata, per user and across the whole cohort, using
/// Jensen-Shannon divergence.
#[derive(Parser)]
#[command(name = "adverge", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single user's metadata table
    User {
        /// CSV table with isAdvertisement and suggestedWords columns
        file: PathBuf,
    },

    /// Analyze every user table in a directory and write the cohort report
    Cohort {
        /// Directory of per-user CSV tables (default: ADVERGE_DATA_DIR or ./data)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Where to write cohort-summary.csv and .json (default: ADVERGE_OUTPUT_DIR or ./output)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Number of tables to analyze in parallel (default: ADVERGE_CONCURRENCY or 4)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Show the most probable ad and organic words for one user
    Vocab {
        /// CSV table with isAdvertisement and suggestedWords columns
        file: PathBuf,

        /// Number of words to list per side (default: 15)
        #[arg(long, default_value = "15")]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("adverge=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::User { file } => {
            let records = adverge::corpus::loader::load_records(&file, &config.schema)?;
            let result = adverge::analysis::user::analyze_records(&records)
                .with_context(|| format!("Cannot analyze {}", file.display()))?;

            let summary = adverge::analysis::user::UserSummary {
                user: user_label(&file),
                result,
            };
            adverge::output::terminal::display_user_summary(&summary);
        }

        Commands::Cohort {
            data_dir,
            output_dir,
            concurrency,
        } => {
            let mut config = config;
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(n) = concurrency {
                config.concurrency = n.max(1);
            }
            config.require_data_dir()?;

            info!(data_dir = %config.data_dir.display(), "Starting cohort run");

            let report =
                adverge::analysis::cohort::run(&config.data_dir, &config.cohort_options()).await?;

            adverge::output::terminal::display_cohort_report(&report);

            let csv_path = config.output_dir.join("cohort-summary.csv");
            let json_path = config.output_dir.join("cohort-summary.json");
            adverge::output::report::write_csv(&report, &csv_path)?;
            adverge::output::report::write_json(&report, &json_path)?;

            println!(
                "\n{}",
                format!(
                    "Reports saved to: {} and {}",
                    csv_path.display(),
                    json_path.display()
                )
                .bold()
            );
        }

        Commands::Vocab { file, top } => {
            let records = adverge::corpus::loader::load_records(&file, &config.schema)?;
            let split = adverge::corpus::split::split_corpus(&records);
            let comparison = adverge::analysis::user::VocabularyComparison::from_split(&split)
                .with_context(|| format!("Cannot compare vocabularies in {}", file.display()))?;

            println!(
                "User {}: {} ad tokens, {} organic tokens ({} rows without suggested words)",
                user_label(&file),
                split.ad.len(),
                split.non_ad.len(),
                split.skipped_rows
            );
            adverge::output::terminal::display_vocabulary(&comparison, top);
        }
    }

    Ok(())
}

/// User id from the file name, falling back to the file stem.
fn user_label(file: &Path) -> String {
    adverge::analysis::user::extract_user_id(file).unwrap_or_else(|_| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string())
    })
}
