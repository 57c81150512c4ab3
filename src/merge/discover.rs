// src/merge/discover.rs

use std::{fs, path::Path, path::PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::{IoContext, Result};

/// `<base><YYYY>.csv`, extension case-insensitive. The lazy base means the
/// year is always the four digits right before the extension.
static YEAR_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?P<base>.+?)(?P<year>\d{4})\.csv$").expect("year suffix regex"));

/// One per-year export of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearFile {
    pub base: String,
    pub year: u32,
    pub name: String,
    pub path: PathBuf,
}

/// Split a file name into `(base, year)` if it carries a year suffix.
pub fn parse_year_file_name(name: &str) -> Option<(String, u32)> {
    let caps = YEAR_SUFFIX.captures(name)?;
    let year = caps["year"].parse().ok()?;
    Some((caps["base"].to_string(), year))
}

/// Year files in `table_dir`, oldest first (ties by name). Everything else,
/// including an already-combined `<base>.csv`, is ignored.
pub fn discover_year_files(table_dir: &Path) -> Result<Vec<YearFile>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(table_dir).at(table_dir)? {
        let entry = entry.at(table_dir)?;
        if !entry.file_type().at(entry.path())?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        match parse_year_file_name(&name) {
            Some((base, year)) => {
                trace!(file = %name, year, "year file");
                files.push(YearFile {
                    base,
                    year,
                    path: entry.path(),
                    name,
                });
            }
            None => debug!(file = %name, dir = %table_dir.display(), "not a year file; ignored"),
        }
    }

    files.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.name.cmp(&b.name)));
    Ok(files)
}
