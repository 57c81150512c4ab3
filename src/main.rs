use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use racepoints::{
    fetch::ErgastClient,
    leaderboard::{self, Board, Kind},
    merge::{self, MergeOutcome},
    publish,
    season::{self, Mode},
    Config,
};
use std::{path::PathBuf, process::ExitCode, time::Duration};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "racepoints", version, about = "Official F1 points: fetch, merge, publish")]
struct Cli {
    /// Root for `seasons/<season>/raw/` output
    #[arg(long, global = true, env = "RACEPOINTS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// API mirror base URL, in priority order (repeatable)
    #[arg(long = "mirror", global = true)]
    mirrors: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch race points and/or standings for one or more seasons
    Fetch {
        #[arg(long, conflicts_with = "seasons")]
        season: Option<u32>,
        /// Comma-separated list, e.g. 2023,2024,2025
        #[arg(long, value_delimiter = ',')]
        seasons: Vec<u32>,
        #[arg(long, default_value_t = Mode::Both)]
        mode: Mode,
    },
    /// Combine `<table><year>.csv` files into `<table>.csv`
    Merge {
        #[arg(long, env = "RACEPOINTS_MERGE_ROOT")]
        root: Option<PathBuf>,
        /// Only merge this table directory
        #[arg(long)]
        table: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Copy a season's tables to the public site directory
    Publish {
        #[arg(long, default_value_t = 2025)]
        season: u32,
        #[arg(long, env = "RACEPOINTS_PUBLIC_DIR")]
        public_dir: Option<PathBuf>,
    },
    /// Print a points leaderboard from a CSV table
    Top {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "driver")]
        kind: Kind,
        #[arg(short, long, default_value_t = 10)]
        n: usize,
        /// Only rank the latest (season, round) snapshot
        #[arg(long)]
        latest: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();

    // ─── 2) resolve configuration ────────────────────────────────────
    let cli = Cli::parse();
    let mut cfg = Config::from_env();
    if let Some(dir) = cli.data_dir {
        cfg.data_dir = dir;
    }
    if !cli.mirrors.is_empty() {
        cfg.mirrors = cli.mirrors;
    }
    if let Some(secs) = cli.timeout_secs {
        cfg.timeout = Duration::from_secs(secs.max(1));
    }

    // ─── 3) dispatch ─────────────────────────────────────────────────
    let failures = match cli.command {
        Command::Fetch {
            season,
            seasons,
            mode,
        } => {
            let seasons: Vec<u32> = match season {
                Some(s) => vec![s],
                None => seasons.into_iter().filter(|s| *s > 0).collect(),
            };
            if seasons.is_empty() {
                bail!("pass --season 2025 or --seasons 2023,2024,2025");
            }
            fetch_seasons(&cfg, &seasons, mode).await?
        }
        Command::Merge {
            root,
            table,
            dry_run,
        } => {
            let root = root.unwrap_or_else(|| cfg.merge_root.clone());
            merge_tables(&root, table.as_deref(), dry_run)?
        }
        Command::Publish { season, public_dir } => {
            if let Some(dir) = public_dir {
                cfg.public_dir = dir;
            }
            let report = publish::publish_season(&cfg.season_raw_dir(season), &cfg.season_public_dir(season))
                .with_context(|| format!("publishing season {}", season))?;
            info!(path = %report.target.display(), "exported season {}", season);
            for name in &report.copied {
                info!("  copied  {}", name);
            }
            for name in &report.missing {
                warn!("  missing {}", name);
            }
            0
        }
        Command::Top {
            file,
            kind,
            n,
            latest,
        } => {
            let mut table = leaderboard::load_table(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            if latest {
                table = leaderboard::latest_round(&table);
            }
            match leaderboard::leaderboard(&table, kind, n) {
                Ok(entries) => {
                    print!("{}", Board(&entries));
                    0
                }
                Err(e) => {
                    error!(file = %file.display(), "{}", e);
                    1
                }
            }
        }
    };

    if failures > 0 {
        error!(failures, "finished with failures");
        return Ok(ExitCode::FAILURE);
    }
    info!("all done");
    Ok(ExitCode::SUCCESS)
}

/// Run each season independently; returns how many failed.
async fn fetch_seasons(cfg: &Config, seasons: &[u32], mode: Mode) -> Result<usize> {
    let client = ErgastClient::new(cfg).context("building HTTP client")?;
    info!(mirrors = ?client.mirrors(), timeout = ?cfg.timeout, "fetching {} season(s)", seasons.len());

    let report = season::run_seasons(&client, seasons, mode, |s| cfg.season_raw_dir(s)).await;

    for (s, outcome) in &report.seasons {
        // failures already logged by run_seasons
        let Ok(summary) = outcome else { continue };
        for t in &summary.tables {
            info!(season = s, rows = t.rows, "wrote {}", t.path.display());
        }
        if !summary.skipped_rounds.is_empty() {
            info!(season = s, rounds = ?summary.skipped_rounds, "rounds without results yet");
        }
        info!(season = s, "wrote official points CSVs to {}", summary.raw_dir.display());
    }
    Ok(report.failures())
}

/// Merge every table under `root`; returns how many tables failed.
fn merge_tables(root: &std::path::Path, table: Option<&str>, dry_run: bool) -> Result<usize> {
    let report = merge::merge_all(root, table, dry_run)
        .with_context(|| format!("merging tables under {}", root.display()))?;

    for (name, outcome) in &report.tables {
        match outcome {
            Ok(MergeOutcome::Written { target, inputs, rows }) => {
                info!(table = %name, rows, "wrote {} ({} inputs)", target.display(), inputs.len());
            }
            Ok(MergeOutcome::DryRun { target, inputs }) => {
                info!(table = %name, "[dry-run] would write {} from {} files", target.display(), inputs.len());
                for i in inputs {
                    info!("  - {}", i);
                }
            }
            Ok(MergeOutcome::Empty { inputs }) => {
                info!(table = %name, files = inputs.len(), "year files are all empty; nothing written");
            }
            Ok(MergeOutcome::NoYearFiles) => {
                info!(table = %name, "no year files; skipped");
            }
            // already logged by merge_all
            Err(_) => {}
        }
    }
    Ok(report.failures())
}
