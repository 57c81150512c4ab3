// src/season/mod.rs

pub mod race_points;
pub mod rows;
pub mod schedule;
pub mod standings;
pub mod write;

#[cfg(test)]
pub(crate) mod testing;

use std::{fmt, path::Path, path::PathBuf, str::FromStr};

use tokio::time::Instant;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::fetch::ResultsSource;
pub use race_points::{fetch_race_points, RacePoints};
pub use rows::{TableRow, TableSchema};
pub use standings::{fetch_standings, Standings};
use write::write_table;

/// Which tables a season run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Race,
    Standings,
    #[default]
    Both,
}

impl Mode {
    pub fn includes_race(self) -> bool {
        matches!(self, Mode::Race | Mode::Both)
    }

    pub fn includes_standings(self) -> bool {
        matches!(self, Mode::Standings | Mode::Both)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "race" => Ok(Mode::Race),
            "standings" => Ok(Mode::Standings),
            "both" => Ok(Mode::Both),
            other => Err(format!("unknown mode '{other}' (expected race, standings or both)")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Race => "race",
            Mode::Standings => "standings",
            Mode::Both => "both",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub table: &'static str,
    pub path: PathBuf,
    pub rows: usize,
}

/// What one season run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonSummary {
    pub season: u32,
    pub raw_dir: PathBuf,
    pub tables: Vec<WrittenTable>,
    /// Rounds scheduled but without results yet (race mode only).
    pub skipped_rounds: Vec<u32>,
}

/// Fetch one season and write its tables under `raw_dir`, replacing any
/// earlier output. The schedule table is written on every run.
#[instrument(level = "info", skip(source, raw_dir), fields(raw_dir = %raw_dir.display()))]
pub async fn run_season<S>(source: &S, season: u32, mode: Mode, raw_dir: &Path) -> Result<SeasonSummary>
where
    S: ResultsSource + ?Sized,
{
    let rounds = source.rounds(season).await?;
    let mut tables = Vec::new();
    let mut skipped_rounds = Vec::new();

    write_into(raw_dir, &rows::SCHEDULE, &rounds, &mut tables)?;

    if mode.includes_race() {
        let points = race_points::race_points_for_rounds(source, &rounds).await?;
        write_into(raw_dir, &rows::DRIVER_RACE_POINTS, &points.drivers, &mut tables)?;
        write_into(raw_dir, &rows::CONSTRUCTOR_RACE_POINTS, &points.constructors, &mut tables)?;
        skipped_rounds = points.skipped_rounds;
    }

    if mode.includes_standings() {
        let standings = standings::standings_for_rounds(source, &rounds).await?;
        write_into(raw_dir, &rows::DRIVER_STANDINGS, &standings.drivers, &mut tables)?;
        write_into(raw_dir, &rows::CONSTRUCTOR_STANDINGS, &standings.constructors, &mut tables)?;
    }

    info!(
        season,
        %mode,
        tables = tables.len(),
        skipped = skipped_rounds.len(),
        "season written"
    );
    Ok(SeasonSummary {
        season,
        raw_dir: raw_dir.to_path_buf(),
        tables,
        skipped_rounds,
    })
}

/// Per-season outcomes of a batch run.
#[derive(Debug, Default)]
pub struct SeasonBatchReport {
    pub seasons: Vec<(u32, Result<SeasonSummary>)>,
}

impl SeasonBatchReport {
    pub fn failures(&self) -> usize {
        self.seasons.iter().filter(|(_, r)| r.is_err()).count()
    }
}

/// Run each season in order into `raw_dir_for(season)`. A failing season is
/// logged and recorded; the ones after it still run.
pub async fn run_seasons<S, F>(source: &S, seasons: &[u32], mode: Mode, raw_dir_for: F) -> SeasonBatchReport
where
    S: ResultsSource + ?Sized,
    F: Fn(u32) -> PathBuf,
{
    let mut report = SeasonBatchReport::default();
    for &season in seasons {
        let start = Instant::now();
        let raw_dir = raw_dir_for(season);
        let outcome = run_season(source, season, mode, &raw_dir).await;
        match &outcome {
            Ok(_) => info!(season, elapsed = ?start.elapsed(), "season done"),
            Err(e) => error!(season, error = %e, "season failed"),
        }
        report.seasons.push((season, outcome));
    }
    report
}

fn write_into<R: TableRow>(
    raw_dir: &Path,
    schema: &TableSchema,
    rows: &[R],
    tables: &mut Vec<WrittenTable>,
) -> Result<()> {
    let path = raw_dir.join(schema.file_name());
    let rows = write_table(schema, rows, &path)?;
    tables.push(WrittenTable {
        table: schema.name,
        path,
        rows,
    });
    Ok(())
}
