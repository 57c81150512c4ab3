// src/merge/mod.rs

pub mod discover;

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{error, info, instrument, warn};

use crate::csv_codec::non_empty_byte_lines;
use crate::error::{IoContext, PipelineError, Result};
use crate::utils::write_atomically;
pub use discover::{discover_year_files, parse_year_file_name, YearFile};

/// Header and data lines of one year file, as raw bytes. Exports are not
/// always UTF-8, and nothing here needs to decode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearContent {
    pub name: String,
    pub header: Vec<u8>,
    pub rows: Vec<Vec<u8>>,
}

/// Result of merging one table directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No `<base><year>.csv` files in the directory.
    NoYearFiles,
    /// Year files exist but all of them are empty; nothing was written.
    Empty { inputs: Vec<String> },
    /// Dry run: validated, nothing written.
    DryRun { target: PathBuf, inputs: Vec<String> },
    Written {
        target: PathBuf,
        inputs: Vec<String>,
        rows: usize,
    },
}

/// Read a year file. `None` when it has no non-empty lines.
pub fn read_year_file(file: &YearFile) -> Result<Option<YearContent>> {
    let raw = fs::read(&file.path).at(&file.path)?;
    let mut lines = non_empty_byte_lines(&raw).into_iter();
    let header = match lines.next() {
        Some(h) => h.to_vec(),
        None => return Ok(None),
    };
    Ok(Some(YearContent {
        name: file.name.clone(),
        header,
        rows: lines.map(<[u8]>::to_vec).collect(),
    }))
}

/// Every header must match the first one byte for byte.
pub fn check_headers(table: &str, contents: &[YearContent]) -> Result<()> {
    let Some(first) = contents.first() else {
        return Ok(());
    };
    for other in &contents[1..] {
        if other.header != first.header {
            return Err(PipelineError::HeaderMismatch {
                table: table.to_string(),
                first_file: first.name.clone(),
                first_header: String::from_utf8_lossy(&first.header).into_owned(),
                other_file: other.name.clone(),
                other_header: String::from_utf8_lossy(&other.header).into_owned(),
            });
        }
    }
    Ok(())
}

/// Header line, then every data line in input order, LF-terminated.
pub fn combine(contents: &[YearContent]) -> Option<Vec<u8>> {
    let first = contents.first()?;
    let mut out = Vec::new();
    out.extend_from_slice(&first.header);
    out.push(b'\n');
    for c in contents {
        for row in &c.rows {
            out.extend_from_slice(row);
            out.push(b'\n');
        }
    }
    Some(out)
}

/// Combine the year files in `table_dir` into `<base>.csv` in the same
/// directory. A header mismatch aborts before anything is written, so an
/// existing combined file is left untouched.
#[instrument(level = "info", skip(table_dir), fields(table = %table_name(table_dir)))]
pub fn merge_table(table_dir: &Path, dry_run: bool) -> Result<MergeOutcome> {
    if !table_dir.is_dir() {
        return Err(PipelineError::MissingDirectory(table_dir.to_path_buf()));
    }
    let table = table_name(table_dir);

    let files = discover_year_files(table_dir)?;
    let Some(first) = files.first() else {
        info!("no year files; skipping");
        return Ok(MergeOutcome::NoYearFiles);
    };
    let base = first.base.clone();
    let target = table_dir.join(format!("{}.csv", base));

    let mut contents = Vec::with_capacity(files.len());
    for file in &files {
        if file.base != base {
            warn!(file = %file.name, expected = %base, "year file base differs from the first file");
        }
        match read_year_file(file)? {
            Some(content) => contents.push(content),
            None => info!(file = %file.name, "empty year file; contributes nothing"),
        }
    }

    check_headers(&table, &contents)?;

    let inputs: Vec<String> = contents.iter().map(|c| c.name.clone()).collect();
    let Some(bytes) = combine(&contents) else {
        info!(files = files.len(), "all year files empty; nothing written");
        return Ok(MergeOutcome::Empty {
            inputs: files.iter().map(|f| f.name.clone()).collect(),
        });
    };

    if dry_run {
        info!(path = %target.display(), inputs = ?inputs, "[dry-run] would write combined file");
        return Ok(MergeOutcome::DryRun { target, inputs });
    }

    let rows = contents.iter().map(|c| c.rows.len()).sum();
    write_atomically(&target, &bytes)?;
    info!(path = %target.display(), inputs = inputs.len(), rows, "combined file written");
    Ok(MergeOutcome::Written {
        target,
        inputs,
        rows,
    })
}

/// Per-table outcomes of a batch merge.
#[derive(Debug, Default)]
pub struct MergeReport {
    pub tables: Vec<(String, Result<MergeOutcome>)>,
}

impl MergeReport {
    pub fn failures(&self) -> usize {
        self.tables.iter().filter(|(_, r)| r.is_err()).count()
    }
}

/// Merge every table directory under `root` (or only `root/<table>`).
/// A failing table is logged and recorded; the others still run.
#[instrument(level = "info", skip(root), fields(root = %root.display()))]
pub fn merge_all(root: &Path, table: Option<&str>, dry_run: bool) -> Result<MergeReport> {
    if !root.is_dir() {
        return Err(PipelineError::MissingDirectory(root.to_path_buf()));
    }

    let table_dirs: Vec<PathBuf> = match table {
        Some(t) => vec![root.join(t)],
        None => {
            let mut dirs = Vec::new();
            for entry in fs::read_dir(root).at(root)? {
                let entry = entry.at(root)?;
                if entry.file_type().at(entry.path())?.is_dir() {
                    dirs.push(entry.path());
                }
            }
            dirs.sort();
            dirs
        }
    };

    let mut report = MergeReport::default();
    for dir in table_dirs {
        let name = table_name(&dir);
        let outcome = merge_table(&dir, dry_run);
        if let Err(e) = &outcome {
            error!(table = %name, error = %e, "merge failed");
        }
        report.tables.push((name, outcome));
    }
    Ok(report)
}

fn table_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.display().to_string())
}
