// src/season/write.rs

use std::path::Path;

use tracing::debug;

use super::rows::{TableRow, TableSchema};
use crate::csv_codec::encode_record;
use crate::error::Result;
use crate::utils::write_atomically;

/// Render `rows` under `schema`'s header, every column in schema order.
/// Columns a row does not know render as empty fields.
pub fn render_table<R: TableRow>(schema: &TableSchema, rows: &[R]) -> Result<Vec<u8>> {
    let mut out = encode_record(schema.columns)?;
    out.push('\n');
    for row in rows {
        let line = encode_record(
            schema
                .columns
                .iter()
                .map(|col| row.field(col).unwrap_or_default()),
        )?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out.into_bytes())
}

/// Write a whole table to `dest`, replacing any previous file.
pub fn write_table<R: TableRow>(schema: &TableSchema, rows: &[R], dest: &Path) -> Result<usize> {
    let bytes = render_table(schema, rows)?;
    write_atomically(dest, &bytes)?;
    debug!(table = schema.name, rows = rows.len(), path = %dest.display(), "table written");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::rows::{ConstructorResultRow, CONSTRUCTOR_RACE_POINTS};
    use std::fs;
    use tempfile::tempdir;

    struct Sparse;

    impl TableRow for Sparse {
        fn field(&self, column: &str) -> Option<String> {
            match column {
                "season" => Some("2025".into()),
                "constructor_name" => Some("Kick Sauber, F1 Team".into()),
                _ => None,
            }
        }
    }

    fn mclaren() -> ConstructorResultRow {
        ConstructorResultRow {
            season: 2025,
            round: 1,
            race_name: "Australian Grand Prix".into(),
            points: 25.0,
            constructor_code: "mclaren".into(),
            constructor_abbr: "MCL".into(),
            constructor_name: "McLaren".into(),
        }
    }

    #[test]
    fn missing_fields_render_empty_and_quotes_apply() {
        let bytes = render_table(&CONSTRUCTOR_RACE_POINTS, &[Sparse]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "season,round,raceName,points,constructorCode,constructorAbbr,constructor_name\n\
             2025,,,,,,\"Kick Sauber, F1 Team\"\n"
        );
    }

    #[test]
    fn header_only_for_no_rows() {
        let bytes = render_table::<ConstructorResultRow>(&CONSTRUCTOR_RACE_POINTS, &[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "season,round,raceName,points,constructorCode,constructorAbbr,constructor_name\n"
        );
    }

    #[test]
    fn rewrite_is_byte_identical_and_overwrites() {
        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("seasons").join("2025").join("raw").join("c.csv");

        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, "stale,content\nmore\nlines\n").unwrap();

        write_table(&CONSTRUCTOR_RACE_POINTS, &[mclaren()], &dest).unwrap();
        let first = fs::read(&dest).unwrap();
        write_table(&CONSTRUCTOR_RACE_POINTS, &[mclaren()], &dest).unwrap();
        let second = fs::read(&dest).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            String::from_utf8(first).unwrap(),
            "season,round,raceName,points,constructorCode,constructorAbbr,constructor_name\n\
             2025,1,Australian Grand Prix,25,mclaren,MCL,McLaren\n"
        );
    }
}
