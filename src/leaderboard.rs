// src/leaderboard.rs
//
// Reading side of the combined files: resolve logical columns through alias
// lists and rank rows by points.

use std::{fmt, fs, path::Path, str::FromStr};

use tracing::debug;

use crate::csv_codec::{decode_record, non_empty_lines};
use crate::error::{IoContext, PipelineError, Result};

pub const DRIVER_NAME_CANDIDATES: &[&str] = &["driver_name", "driver", "name", "driverName", "full_name"];
pub const CONSTRUCTOR_NAME_CANDIDATES: &[&str] = &["constructor_name", "constructor", "team", "name"];
pub const POINTS_CANDIDATES: &[&str] = &["points", "pts", "total_points"];

/// A parsed CSV: header plus rows, each row as long as it came in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Value of `column` in `row`; short rows read as empty.
    pub fn value<'a>(&self, row: &'a [String], column: &str) -> &'a str {
        self.column_index(column)
            .and_then(|i| row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

pub fn parse_table(text: &str) -> Result<Table> {
    let mut lines = non_empty_lines(text).into_iter();
    let Some(header) = lines.next() else {
        return Ok(Table::default());
    };
    let columns = decode_record(header)?;
    let rows = lines.map(decode_record).collect::<Result<Vec<_>>>()?;
    Ok(Table { columns, rows })
}

/// Bytes that are not UTF-8 are replaced rather than rejected.
pub fn load_table(path: &Path) -> Result<Table> {
    let raw = fs::read(path).at(path)?;
    parse_table(&String::from_utf8_lossy(&raw))
}

/// First candidate, in candidate order, matching a column case-insensitively.
/// Returns the column's actual spelling.
pub fn pick_column<'a>(columns: &'a [String], candidates: &[&str]) -> Result<&'a str> {
    candidates
        .iter()
        .find_map(|cand| columns.iter().find(|c| c.eq_ignore_ascii_case(cand)))
        .map(String::as_str)
        .ok_or_else(|| PipelineError::MissingRequiredColumn {
            wanted: candidates.iter().map(|c| c.to_string()).collect(),
            found: columns.to_vec(),
        })
}

/// Numeric value for ranking; anything unparsable counts as zero.
pub fn points_value(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Rows sorted by `points_column` descending (stable), first `n` kept.
pub fn top_n<'a>(table: &'a Table, points_column: &str, n: usize) -> Vec<&'a [String]> {
    let mut rows: Vec<&[String]> = table.rows.iter().map(Vec::as_slice).collect();
    rows.sort_by(|a, b| {
        points_value(table.value(b, points_column)).total_cmp(&points_value(table.value(a, points_column)))
    });
    rows.truncate(n);
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    #[default]
    Driver,
    Constructor,
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driver" | "drivers" => Ok(Kind::Driver),
            "constructor" | "constructors" | "team" => Ok(Kind::Constructor),
            other => Err(format!("unknown kind '{other}' (expected driver or constructor)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub points: f64,
}

enum NameSource<'a> {
    Column(&'a str),
    Joined(&'a str, &'a str),
}

impl NameSource<'_> {
    fn render(&self, table: &Table, row: &[String]) -> String {
        match self {
            NameSource::Column(c) => table.value(row, c).to_string(),
            NameSource::Joined(a, b) => {
                format!("{} {}", table.value(row, a), table.value(row, b))
                    .trim()
                    .to_string()
            }
        }
    }
}

fn resolve_name<'a>(table: &'a Table, kind: Kind) -> Result<NameSource<'a>> {
    match kind {
        Kind::Constructor => pick_column(&table.columns, CONSTRUCTOR_NAME_CANDIDATES).map(NameSource::Column),
        Kind::Driver => {
            let direct = pick_column(&table.columns, DRIVER_NAME_CANDIDATES);
            if let Ok(col) = direct {
                return Ok(NameSource::Column(col));
            }
            if let (Ok(given), Ok(family)) = (
                pick_column(&table.columns, &["driver_givenName"]),
                pick_column(&table.columns, &["driver_familyName"]),
            ) {
                debug!(given, family, "no driver name column; joining given and family names");
                return Ok(NameSource::Joined(given, family));
            }
            pick_column(&table.columns, &["driverAbbr"])
                .map(|col| {
                    debug!(column = col, "no driver name column; falling back to abbreviation");
                    NameSource::Column(col)
                })
                .map_err(|_| PipelineError::MissingRequiredColumn {
                    wanted: DRIVER_NAME_CANDIDATES.iter().map(|c| c.to_string()).collect(),
                    found: table.columns.clone(),
                })
        }
    }
}

/// Keep only rows of the latest `(season, round)` when both columns exist.
/// Standings files hold one snapshot per round; the latest is the table.
pub fn latest_round(table: &Table) -> Table {
    let (Some(si), Some(ri)) = (table.column_index("season"), table.column_index("round")) else {
        return table.clone();
    };
    let key = |row: &Vec<String>| {
        let num = |i: usize| row.get(i).and_then(|v| v.trim().parse::<u32>().ok()).unwrap_or(0);
        (num(si), num(ri))
    };
    let Some(max) = table.rows.iter().map(key).max() else {
        return table.clone();
    };
    Table {
        columns: table.columns.clone(),
        rows: table.rows.iter().filter(|r| key(*r) == max).cloned().collect(),
    }
}

/// Top `n` names by points for a driver or constructor table.
pub fn leaderboard(table: &Table, kind: Kind, n: usize) -> Result<Vec<Entry>> {
    let name = resolve_name(table, kind)?;
    let points = pick_column(&table.columns, POINTS_CANDIDATES)?;
    Ok(top_n(table, points, n)
        .into_iter()
        .map(|row| Entry {
            name: name.render(table, row),
            points: points_value(table.value(row, points)),
        })
        .collect())
}

/// Plain-text rendering, one ranked line per entry.
pub struct Board<'a>(pub &'a [Entry]);

impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.0.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
        for (i, e) in self.0.iter().enumerate() {
            writeln!(f, "{:>3}. {:<width$}  {}", i + 1, e.name, e.points, width = width)?;
        }
        Ok(())
    }
}
