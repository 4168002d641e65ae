use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::config::Config;
use crate::migration::source::{list_candidates, list_jobs, read_record};
use crate::migration::store::render_record;
use crate::migration::{render_summary, run_migration, MigrationOptions};
use crate::normalize::{normalize_with_depth, validate_structure, SkillDepth};

#[derive(Parser)]
#[command(name = "candidates")]
#[command(version, about = "Validate and normalize candidate application records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Clone, Default)]
pub struct ScanArgs {
    /// Root of the job folders (overrides CANDIDATES_DATA_DIR)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Follow nested skill categories to any depth (legacy records)
    #[arg(long)]
    pub deep_skills: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize every invalid record in place, keeping a backup of each
    Migrate {
        #[command(flatten)]
        scan: ScanArgs,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Report record validity without writing (same as `migrate --dry-run`)
    Validate {
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// List job postings that have a job description
    Jobs {
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// List the candidates who applied to a job
    List {
        job: String,

        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print the normalized form of a single record file
    Normalize {
        file: PathBuf,

        #[arg(long)]
        deep_skills: bool,
    },
}

fn skill_depth(deep: bool) -> SkillDepth {
    if deep {
        SkillDepth::Unbounded
    } else {
        SkillDepth::OneLevel
    }
}

pub async fn handle_command(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Command::Migrate { scan, dry_run } => migrate(config, scan, dry_run).await,
        Command::Validate { scan } => migrate(config, scan, true).await,
        Command::Jobs { data_dir } => {
            let config = config.with_data_dir(data_dir);
            let jobs = list_jobs(&config.data_dir).await?;
            if jobs.is_empty() {
                info!("No jobs found in {}", config.data_dir.display());
            }
            for job in jobs {
                println!("{:<24} {}", job.id, preview(&job.description, 72));
            }
            Ok(())
        }
        Command::List { job, data_dir } => {
            let config = config.with_data_dir(data_dir);
            let candidates = list_candidates(&config.data_dir, &job, &config.record_file).await?;
            info!("{} candidate(s) for {job}", candidates.len());
            for c in candidates {
                let mark = if c.valid { "✅" } else { "⚠️ " };
                println!(
                    "{mark} {:<24} {:<28} {:<24} {:<12} {} skills",
                    c.folder, c.name, c.target_role, c.status, c.skill_count
                );
            }
            Ok(())
        }
        Command::Normalize { file, deep_skills } => {
            let raw = read_record(&file).await?;
            let report = validate_structure(&raw.value);
            for issue in &report.issues {
                warn!("{}: {issue}", file.display());
            }
            let record = normalize_with_depth(&raw.value, skill_depth(deep_skills));
            println!("{}", render_record(&file, &record)?);
            Ok(())
        }
    }
}

async fn migrate(config: Config, scan: ScanArgs, dry_run: bool) -> Result<()> {
    let config = config.with_data_dir(scan.data_dir);
    let options = MigrationOptions {
        dry_run,
        skill_depth: skill_depth(scan.deep_skills),
    };
    let summary = run_migration(&config, options).await?;

    if scan.json {
        let text =
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{text}");
    } else {
        print!("{}", render_summary(&summary));
    }
    Ok(())
}

/// First line of `text`, cut to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    if line.chars().count() <= max {
        return line.to_string();
    }
    let cut: String = line.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
