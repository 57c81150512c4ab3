// src/config.rs

use std::{env, path::PathBuf, time::Duration};

use tracing::warn;

/// Ergast-compatible mirrors, tried in this order.
pub const DEFAULT_MIRRORS: &[&str] = &["https://api.jolpi.ca/ergast", "https://ergast.com/mrd"];

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime settings shared by every pipeline stage.
///
/// Built from defaults, then environment (`RACEPOINTS_DATA_DIR`,
/// `RACEPOINTS_MERGE_ROOT`, `RACEPOINTS_PUBLIC_DIR`, `RACEPOINTS_MIRRORS`,
/// `RACEPOINTS_TIMEOUT_SECS`), then CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root holding `seasons/<season>/raw/`.
    pub data_dir: PathBuf,
    /// Root holding the per-table year directories for the merge step.
    pub merge_root: PathBuf,
    /// Public site root; published files land in `<public_dir>/data/<season>/`.
    pub public_dir: PathBuf,
    pub mirrors: Vec<String>,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            merge_root: PathBuf::from("mycsv"),
            public_dir: PathBuf::from("docs"),
            mirrors: DEFAULT_MIRRORS.iter().map(|m| m.to_string()).collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Defaults overridden by any `RACEPOINTS_*` variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(dir) = lookup("RACEPOINTS_DATA_DIR").filter(|s| !s.trim().is_empty()) {
            cfg.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(dir) = lookup("RACEPOINTS_MERGE_ROOT").filter(|s| !s.trim().is_empty()) {
            cfg.merge_root = PathBuf::from(dir.trim());
        }
        if let Some(dir) = lookup("RACEPOINTS_PUBLIC_DIR").filter(|s| !s.trim().is_empty()) {
            cfg.public_dir = PathBuf::from(dir.trim());
        }
        if let Some(raw) = lookup("RACEPOINTS_MIRRORS") {
            let mirrors = parse_mirror_list(&raw);
            if mirrors.is_empty() {
                warn!(value = %raw, "RACEPOINTS_MIRRORS has no usable entries; keeping defaults");
            } else {
                cfg.mirrors = mirrors;
            }
        }
        if let Some(raw) = lookup("RACEPOINTS_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring invalid RACEPOINTS_TIMEOUT_SECS"),
            }
        }

        cfg
    }

    /// `<data_dir>/seasons/<season>/raw`
    pub fn season_raw_dir(&self, season: u32) -> PathBuf {
        self.data_dir
            .join("seasons")
            .join(season.to_string())
            .join("raw")
    }

    /// `<public_dir>/data/<season>`
    pub fn season_public_dir(&self, season: u32) -> PathBuf {
        self.public_dir.join("data").join(season.to_string())
    }
}

/// Split a mirror list on commas and/or whitespace, dropping blanks.
pub fn parse_mirror_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
