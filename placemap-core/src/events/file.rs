//! Columnar on-disk event file.
//!
//! All integers are little-endian. Layout:
//!
//! ```text
//! magic "PXEV" | u8 version | u32 width | u32 height | i64 origin_unix_ms | u64 count
//! i64 timestamp_ms * count
//! u16 x            * count
//! u16 y            * count
//! u8  color        * count
//! ```
//!
//! Rows are sorted ascending by timestamp. The reader streams each column through its own
//! buffered cursor, so memory use does not grow with the file.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::events::source::EventSource;
use crate::foundation::core::{Canvas, PixelEvent};
use crate::foundation::error::{PlaceError, PlaceResult};

/// File extension expected for event files.
pub const EVENT_FILE_EXTENSION: &str = "pxl";

const MAGIC: [u8; 4] = *b"PXEV";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: u64 = 4 + 1 + 4 + 4 + 8 + 8;
const ROW_LEN: u64 = 8 + 2 + 2 + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventFileHeader {
    pub canvas: Canvas,
    /// Unix time (ms) that event timestamp 0 corresponds to.
    pub origin_unix_ms: i64,
}

/// Write `events` (already sorted) to `path`.
pub fn write_event_file(
    path: impl AsRef<Path>,
    header: &EventFileHeader,
    events: &[PixelEvent],
) -> PlaceResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| PlaceError::io(path, e))?;
    let mut w = BufWriter::new(file);
    write_columns(&mut w, header, events).map_err(|e| PlaceError::io(path, e))?;
    w.flush().map_err(|e| PlaceError::io(path, e))
}

fn write_columns(
    w: &mut dyn Write,
    header: &EventFileHeader,
    events: &[PixelEvent],
) -> std::io::Result<()> {
    w.write_all(&MAGIC)?;
    w.write_all(&[FORMAT_VERSION])?;
    w.write_all(&header.canvas.width.to_le_bytes())?;
    w.write_all(&header.canvas.height.to_le_bytes())?;
    w.write_all(&header.origin_unix_ms.to_le_bytes())?;
    w.write_all(&(events.len() as u64).to_le_bytes())?;

    for ev in events {
        w.write_all(&ev.timestamp_ms.to_le_bytes())?;
    }
    for ev in events {
        w.write_all(&ev.x.to_le_bytes())?;
    }
    for ev in events {
        w.write_all(&ev.y.to_le_bytes())?;
    }
    for ev in events {
        w.write_all(&[ev.color])?;
    }
    Ok(())
}

/// Lazy reader over an event file. Yields events in file order.
#[derive(Debug)]
pub struct EventFileReader {
    path: PathBuf,
    header: EventFileHeader,
    count: u64,
    next_row: u64,
    timestamps: BufReader<File>,
    xs: BufReader<File>,
    ys: BufReader<File>,
    colors: BufReader<File>,
}

impl EventFileReader {
    #[tracing::instrument]
    pub fn open(path: &Path) -> PlaceResult<Self> {
        let mut file = File::open(path).map_err(|e| PlaceError::io(path, e))?;
        let file_len = file
            .metadata()
            .map_err(|e| PlaceError::io(path, e))?
            .len();
        if file_len < HEADER_LEN {
            return Err(PlaceError::data_integrity(format!(
                "event file '{}' is too short for a header",
                path.display()
            )));
        }

        let mut raw = [0u8; HEADER_LEN as usize];
        file.read_exact(&mut raw)
            .map_err(|e| PlaceError::io(path, e))?;
        let (header, count) = decode_header(&raw).map_err(|detail| {
            PlaceError::data_integrity(format!("event file '{}': {detail}", path.display()))
        })?;

        let expected = count
            .checked_mul(ROW_LEN)
            .and_then(|body| body.checked_add(HEADER_LEN));
        if expected != Some(file_len) {
            return Err(PlaceError::data_integrity(format!(
                "event file '{}' declares {count} rows but is {file_len} bytes long",
                path.display()
            )));
        }

        let ts_at = HEADER_LEN;
        let x_at = ts_at + count * 8;
        let y_at = x_at + count * 2;
        let color_at = y_at + count * 2;

        tracing::debug!(rows = count, "opened event file");
        Ok(Self {
            path: path.to_path_buf(),
            header,
            count,
            next_row: 0,
            timestamps: column_cursor(path, ts_at)?,
            xs: column_cursor(path, x_at)?,
            ys: column_cursor(path, y_at)?,
            colors: column_cursor(path, color_at)?,
        })
    }

    pub fn header(&self) -> EventFileHeader {
        self.header
    }

    /// Total number of rows in the file.
    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn read_row(&mut self) -> std::io::Result<PixelEvent> {
        let mut ts = [0u8; 8];
        self.timestamps.read_exact(&mut ts)?;
        let mut x = [0u8; 2];
        self.xs.read_exact(&mut x)?;
        let mut y = [0u8; 2];
        self.ys.read_exact(&mut y)?;
        let mut color = [0u8; 1];
        self.colors.read_exact(&mut color)?;
        Ok(PixelEvent {
            timestamp_ms: i64::from_le_bytes(ts),
            x: u16::from_le_bytes(x),
            y: u16::from_le_bytes(y),
            color: color[0],
        })
    }
}

impl Iterator for EventFileReader {
    type Item = PlaceResult<PixelEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row >= self.count {
            return None;
        }
        self.next_row += 1;
        match self.read_row() {
            Ok(ev) => Some(Ok(ev)),
            Err(e) => {
                // A short read leaves the cursors misaligned; stop yielding after reporting it.
                self.next_row = self.count;
                Some(Err(PlaceError::io(&self.path, e)))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.next_row) as usize;
        (left, Some(left))
    }
}

impl EventSource for EventFileReader {
    fn canvas(&self) -> Canvas {
        self.header.canvas
    }
}

fn column_cursor(path: &Path, offset: u64) -> PlaceResult<BufReader<File>> {
    let mut f = File::open(path).map_err(|e| PlaceError::io(path, e))?;
    f.seek(SeekFrom::Start(offset))
        .map_err(|e| PlaceError::io(path, e))?;
    Ok(BufReader::new(f))
}

fn decode_header(raw: &[u8; HEADER_LEN as usize]) -> Result<(EventFileHeader, u64), String> {
    if raw[0..4] != MAGIC {
        return Err("bad magic bytes (not an event file)".to_string());
    }
    if raw[4] != FORMAT_VERSION {
        return Err(format!(
            "unsupported format version {} (expected {FORMAT_VERSION})",
            raw[4]
        ));
    }
    let width = u32::from_le_bytes([raw[5], raw[6], raw[7], raw[8]]);
    let height = u32::from_le_bytes([raw[9], raw[10], raw[11], raw[12]]);
    let mut origin = [0u8; 8];
    origin.copy_from_slice(&raw[13..21]);
    let mut count = [0u8; 8];
    count.copy_from_slice(&raw[21..29]);

    let canvas = Canvas::new(width, height).map_err(|e| e.to_string())?;
    Ok((
        EventFileHeader {
            canvas,
            origin_unix_ms: i64::from_le_bytes(origin),
        },
        u64::from_le_bytes(count),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/events/file.rs"]
mod tests;
