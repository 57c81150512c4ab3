// src/utils.rs

use std::{fs, io::Write, path::Path};

use crate::error::{IoContext, Result};

/// Replace `path` with `bytes` via a temp file in the same directory and a
/// rename, so readers see either the old file or the new one.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).at(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".racepoints-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .at(dir)?;
    tmp.write_all(bytes).at(tmp.path())?;
    tmp.as_file().sync_all().at(tmp.path())?;
    tmp.persist(path).map_err(|e| e.error).at(path)?;
    Ok(())
}
