// src/publish.rs

use std::{fs, path::Path, path::PathBuf};

use tracing::{info, instrument, warn};

use crate::error::{IoContext, PipelineError, Result};

/// Files copied from a season's raw directory to the public site.
pub const MANIFEST: &[&str] = &[
    "f1_official_driver_standings.csv",
    "f1_official_constructor_standings.csv",
    "f1_official_driver_race_points.csv",
    "f1_official_constructor_race_points.csv",
    "dim_round.csv",
    "dim_round_dates.csv",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub target: PathBuf,
    pub copied: Vec<String>,
    pub missing: Vec<String>,
}

/// Copy every manifest file present in `raw_dir` into `public_dir`.
/// Absent files are reported, not treated as errors.
#[instrument(level = "info", skip_all, fields(from = %raw_dir.display(), to = %public_dir.display()))]
pub fn publish_season(raw_dir: &Path, public_dir: &Path) -> Result<PublishReport> {
    if !raw_dir.is_dir() {
        return Err(PipelineError::MissingDirectory(raw_dir.to_path_buf()));
    }
    fs::create_dir_all(public_dir).at(public_dir)?;

    let mut report = PublishReport {
        target: public_dir.to_path_buf(),
        copied: Vec::new(),
        missing: Vec::new(),
    };

    for name in MANIFEST {
        let src = raw_dir.join(name);
        if !src.is_file() {
            warn!(file = name, "not found in raw dir; skipped");
            report.missing.push(name.to_string());
            continue;
        }
        let dst = public_dir.join(name);
        fs::copy(&src, &dst).at(&src)?;
        report.copied.push(name.to_string());
    }

    info!(copied = report.copied.len(), missing = report.missing.len(), "season published");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_present_and_reports_missing() {
        let tmp = tempdir().unwrap();
        let raw = tmp.path().join("raw");
        let public = tmp.path().join("docs").join("data").join("2025");
        fs::create_dir_all(&raw).unwrap();
        fs::write(raw.join("f1_official_driver_standings.csv"), "h\n1\n").unwrap();
        fs::write(raw.join("dim_round_dates.csv"), "h\n2\n").unwrap();
        fs::write(raw.join("scratch.csv"), "not in manifest\n").unwrap();

        let report = publish_season(&raw, &public).unwrap();

        assert_eq!(
            report.copied,
            vec!["f1_official_driver_standings.csv", "dim_round_dates.csv"]
        );
        assert_eq!(report.missing.len(), MANIFEST.len() - 2);
        assert_eq!(
            fs::read_to_string(public.join("dim_round_dates.csv")).unwrap(),
            "h\n2\n"
        );
        assert!(!public.join("scratch.csv").exists());
    }

    #[test]
    fn missing_raw_dir_is_an_error() {
        let tmp = tempdir().unwrap();
        let err = publish_season(&tmp.path().join("nope"), &tmp.path().join("out")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingDirectory(_)));
        assert!(!tmp.path().join("out").exists());
    }
}
