//! Raw r/Place log ingestion.
//!
//! Input rows look like:
//!
//! ```text
//! timestamp,user_id,pixel_color,coordinate
//! 2022-04-04 00:53:51.577 UTC,ovTZk4GyTS1mDQnTbV+vDOCu1f+u6w+CkIZ6445vD4XN8alFy/6GtNkYp5MSic6Tjo/fBCCGe6oZKMAN3rEZHw==,#00CCC0,"826,1048"
//! ```
//!
//! Rows that fail to parse, use an off-palette color, fall outside the canvas, or describe a
//! moderation rectangle (four coordinates) are rejected and counted.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::events::file::{EVENT_FILE_EXTENSION, EventFileHeader, write_event_file};
use crate::foundation::core::{Canvas, PixelEvent};
use crate::foundation::error::PlaceError;
use crate::foundation::palette::palette_index_of_hex;

const EXPECTED_HEADER: &str = "timestamp,user_id,pixel_color,coordinate";

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("the outfile must have a .{} extension (got '{}')", EVENT_FILE_EXTENSION, .path.display())]
    WrongExtension { path: PathBuf },

    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' does not start with the header '{}'", .path.display(), EXPECTED_HEADER)]
    MissingHeader { path: PathBuf },

    #[error(transparent)]
    Output(#[from] PlaceError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrimOpts {
    pub canvas: Canvas,
}

impl Default for TrimOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 2000,
                height: 2000,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub accepted: u64,
    pub rejected: u64,
    pub duplicates: u64,
}

/// A validated, sorted, deduplicated event log ready to be persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortedLog {
    pub header: EventFileHeader,
    pub events: Vec<PixelEvent>,
    pub report: IngestReport,
}

/// Validate, sort and persist `infile` as an event file at `outfile`.
///
/// The extension check happens before `infile` is opened, so a bad `outfile` leaves no trace.
#[tracing::instrument]
pub fn trim(infile: &Path, outfile: &Path, opts: &TrimOpts) -> Result<IngestReport, IngestError> {
    if outfile.extension().and_then(|e| e.to_str()) != Some(EVENT_FILE_EXTENSION) {
        return Err(IngestError::WrongExtension {
            path: outfile.to_path_buf(),
        });
    }

    let file = File::open(infile).map_err(|source| IngestError::Io {
        path: infile.to_path_buf(),
        source,
    })?;
    let log = sort_log(BufReader::new(file), infile, opts)?;
    write_event_file(outfile, &log.header, &log.events)?;

    tracing::info!(
        accepted = log.report.accepted,
        rejected = log.report.rejected,
        duplicates = log.report.duplicates,
        out = %outfile.display(),
        "trim complete"
    );
    Ok(log.report)
}

/// Parse and validate every row of `reader`, then sort and deduplicate.
///
/// Timestamps in the result are rebased so the earliest accepted event is at 0 ms.
pub fn sort_log(
    reader: impl BufRead,
    source_path: &Path,
    opts: &TrimOpts,
) -> Result<SortedLog, IngestError> {
    let io_err = |source: std::io::Error| IngestError::Io {
        path: source_path.to_path_buf(),
        source,
    };

    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => line.map_err(io_err)?,
        None => String::new(),
    };
    if header.trim() != EXPECTED_HEADER {
        return Err(IngestError::MissingHeader {
            path: source_path.to_path_buf(),
        });
    }

    let mut report = IngestReport::default();
    let mut rows: Vec<(i64, u16, u16, u8)> = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(&line, opts.canvas) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                report.rejected += 1;
                // Header is line 1.
                tracing::debug!(line = line_no + 2, reason, "rejected row");
            }
        }
    }

    rows.sort_by_key(|r| r.0);
    let before = rows.len();
    dedup_within_ties(&mut rows);
    report.duplicates = (before - rows.len()) as u64;
    report.accepted = rows.len() as u64;

    let origin_unix_ms = rows.first().map_or(0, |r| r.0);
    let events = rows
        .into_iter()
        .map(|(ts, x, y, color)| PixelEvent::new(ts - origin_unix_ms, x, y, color))
        .collect();

    Ok(SortedLog {
        header: EventFileHeader {
            canvas: opts.canvas,
            origin_unix_ms,
        },
        events,
        report,
    })
}

/// Drop exact repeats among rows sharing a timestamp. `rows` must be sorted by timestamp; the
/// first occurrence of each tie keeps its position.
fn dedup_within_ties(rows: &mut Vec<(i64, u16, u16, u8)>) {
    let mut seen: HashSet<(u16, u16, u8)> = HashSet::new();
    let mut current_ts = None;
    rows.retain(|&(ts, x, y, color)| {
        if current_ts != Some(ts) {
            current_ts = Some(ts);
            seen.clear();
        }
        seen.insert((x, y, color))
    });
}

fn parse_row(line: &str, canvas: Canvas) -> Result<(i64, u16, u16, u8), &'static str> {
    let fields = split_csv_line(line).ok_or("unbalanced quotes")?;
    let [ts, _user, color, coord] = fields.as_slice() else {
        return Err("expected 4 fields");
    };

    let ts = parse_timestamp_ms(ts).ok_or("bad timestamp")?;
    let color = palette_index_of_hex(color.trim()).ok_or("color not in palette")?;

    let parts: Vec<&str> = coord.split(',').map(str::trim).collect();
    let (x, y) = match parts.as_slice() {
        [x, y] => (x, y),
        [_, _, _, _] => return Err("moderation rectangle"),
        _ => return Err("bad coordinate"),
    };
    let x: u16 = x.parse().map_err(|_| "bad coordinate")?;
    let y: u16 = y.parse().map_err(|_| "bad coordinate")?;
    if !canvas.contains(x, y) {
        return Err("coordinate outside canvas");
    }
    Ok((ts, x, y, color))
}

/// `2022-04-04 00:53:51.577 UTC` -> unix milliseconds. Fractional seconds are optional.
fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let naive = raw.strip_suffix(" UTC").unwrap_or(raw);
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Split one CSV line, honoring double-quoted fields (with `""` escapes).
fn split_csv_line(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match (ch, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                cur.push('"');
                chars.next();
            }
            ('"', _) => in_quotes = !in_quotes,
            (',', false) => fields.push(std::mem::take(&mut cur)),
            _ => cur.push(ch),
        }
    }
    if in_quotes {
        return None;
    }
    fields.push(cur);
    Some(fields)
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/trim.rs"]
mod tests;
