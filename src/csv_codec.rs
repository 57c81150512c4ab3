// src/csv_codec.rs
//
// Row <-> line encoding shared by the season writer, the merge engine and the
// leaderboard. Fields never contain embedded newlines in the files we produce,
// so everything here is line oriented.

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::error::Result;

const BOM: char = '\u{feff}';
const BOM_BYTES: &[u8] = b"\xef\xbb\xbf";

/// Builder for every CSV writer in the crate: comma, LF, quote only when needed.
pub fn writer_builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder
        .delimiter(b',')
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .has_headers(false);
    builder
}

/// Encode one row as a single CSV line, without the terminator.
pub fn encode_record<I, S>(fields: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut wtr = writer_builder().from_writer(Vec::new());
    wtr.write_record(fields)?;
    let mut bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decode a single CSV line into its fields. A blank line decodes to no fields.
pub fn decode_record(line: &str) -> Result<Vec<String>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    if !rdr.read_record(&mut record)? {
        return Ok(Vec::new());
    }
    Ok(record.iter().map(str::to_string).collect())
}

/// Drop a leading UTF-8 byte-order mark, if any.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// Drop a leading UTF-8 byte-order mark from raw file bytes.
pub fn strip_bom_bytes(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(BOM_BYTES).unwrap_or(bytes)
}

/// `(start, end)` offsets of each line. Terminators are ASCII, so the
/// offsets are char boundaries whenever the input is UTF-8.
fn line_spans(bytes: &[u8]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                spans.push((start, i));
                start = i + 1;
            }
            b'\r' => {
                spans.push((start, i));
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        spans.push((start, bytes.len()));
    }
    spans
}

/// Split on LF, CRLF or a lone CR. A trailing terminator yields no extra line.
pub fn split_lines(text: &str) -> Vec<&str> {
    line_spans(text.as_bytes())
        .into_iter()
        .map(|(a, b)| &text[a..b])
        .collect()
}

/// BOM-stripped, line-split text with empty lines removed.
pub fn non_empty_lines(text: &str) -> Vec<&str> {
    split_lines(strip_bom(text))
        .into_iter()
        .filter(|l| !l.is_empty())
        .collect()
}

/// Byte-level [`non_empty_lines`], for files in an unknown encoding.
pub fn non_empty_byte_lines(bytes: &[u8]) -> Vec<&[u8]> {
    let bytes = strip_bom_bytes(bytes);
    line_spans(bytes)
        .into_iter()
        .map(|(a, b)| &bytes[a..b])
        .filter(|l| !l.is_empty())
        .collect()
}
