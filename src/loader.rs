//! Tabular sensor record loading.
//!
//! Ingestion is best-effort: short rows and rows with non-numeric fields are
//! dropped and counted, never reported as errors. Only structural problems
//! (missing axis columns, unreadable file) fail a load.

use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{MotionError, Result};
use crate::types::{AccelData, AxisChannels, GyroData, ImuRecord, TimedAxes};

/// Rule for finding the x/y/z columns by header name.
///
/// Headers are trimmed and lower-cased, then the first column containing the
/// axis letter wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisMatch {
    /// Plain substring match on all three axes.
    #[default]
    Substring,
    /// Substring match, except the z column may not contain "abs".
    ExcludeAbsZ,
}

impl AxisMatch {
    /// Returns the `(x, y, z)` column indices.
    pub fn locate(self, headers: &[String]) -> Result<(usize, usize, usize)> {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let x = normalized.iter().position(|h| h.contains('x'));
        let y = normalized.iter().position(|h| h.contains('y'));
        let z = match self {
            AxisMatch::Substring => normalized.iter().position(|h| h.contains('z')),
            AxisMatch::ExcludeAbsZ => normalized
                .iter()
                .position(|h| h.contains('z') && !h.contains("abs")),
        };

        match (x, y, z) {
            (Some(x), Some(y), Some(z)) => Ok((x, y, z)),
            _ => Err(MotionError::schema(format!(
                "cannot find X/Y/Z columns. Found: {:?}",
                normalized
            ))),
        }
    }
}

/// Opens a file, decompressing transparently when it ends in `.gz`.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if path.extension().map(|e| e == "gz").unwrap_or(false) {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
}

/// Walks every record after the header. Undecodable records are skipped;
/// I/O failures are propagated.
fn for_each_row<R: Read>(
    reader: &mut csv::Reader<R>,
    mut f: impl FnMut(&StringRecord) -> bool,
) -> Result<(usize, usize)> {
    let mut kept = 0usize;
    let mut dropped = 0usize;
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                if f(&record) {
                    kept += 1;
                } else {
                    log::trace!("dropping malformed row {:?}", record);
                    dropped += 1;
                }
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::trace!("dropping undecodable row: {}", e);
                dropped += 1;
            }
        }
    }
    Ok((kept, dropped))
}

/// Reads the header row; `None` for an empty input.
fn read_header<R: Read>(reader: &mut csv::Reader<R>) -> Result<Option<StringRecord>> {
    let mut header = StringRecord::new();
    match reader.read_record(&mut header) {
        Ok(true) => Ok(Some(header)),
        Ok(false) => Ok(None),
        Err(e) if e.is_io_error() => Err(e.into()),
        Err(e) => Err(MotionError::schema(format!("unreadable header row: {}", e))),
    }
}

fn field(record: &StringRecord, idx: usize) -> Option<f64> {
    record.get(idx)?.trim().parse::<f64>().ok()
}

fn fields<const N: usize>(record: &StringRecord, columns: [usize; N]) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    for (slot, idx) in out.iter_mut().zip(columns) {
        *slot = field(record, idx)?;
    }
    Some(out)
}

// ─── Name-matched x/y/z form ─────────────────────────────────────────────────

/// Reads three name-matched axis columns.
pub fn parse_axes<R: Read>(reader: R, rule: AxisMatch) -> Result<AxisChannels> {
    let mut rdr = csv_reader(reader);
    let header = read_header(&mut rdr)?.ok_or_else(|| MotionError::schema("missing header row"))?;
    let headers: Vec<String> = header.iter().map(str::to_string).collect();
    let (xi, yi, zi) = rule.locate(&headers)?;

    let mut axes = AxisChannels::default();
    let (kept, dropped) = for_each_row(&mut rdr, |row| match fields(row, [xi, yi, zi]) {
        Some([x, y, z]) => {
            axes.push(x, y, z);
            true
        }
        None => false,
    })?;
    log::debug!(
        "axis columns x={} y={} z={}: kept {} rows, dropped {}",
        xi,
        yi,
        zi,
        kept,
        dropped
    );
    Ok(axes)
}

pub fn load_axes(path: &Path, rule: AxisMatch) -> Result<AxisChannels> {
    parse_axes(open_input(path)?, rule)
}

// ─── Positional forms ────────────────────────────────────────────────────────

/// Reads the merged `time, ax, ay, az, gx, gy, gz` form. The header row is
/// skipped without inspection.
pub fn parse_imu<R: Read>(reader: R) -> Result<ImuRecord> {
    let mut rdr = csv_reader(reader);
    let mut record = ImuRecord::default();
    if read_header(&mut rdr)?.is_none() {
        return Ok(record);
    }
    let (kept, dropped) = for_each_row(&mut rdr, |row| match fields(row, [0, 1, 2, 3, 4, 5, 6]) {
        Some([t, ax, ay, az, gx, gy, gz]) => {
            record.push(
                t,
                AccelData { x: ax, y: ay, z: az },
                GyroData { x: gx, y: gy, z: gz },
            );
            true
        }
        None => false,
    })?;
    log::debug!("imu record: kept {} rows, dropped {}", kept, dropped);
    Ok(record)
}

pub fn load_imu(path: &Path) -> Result<ImuRecord> {
    parse_imu(open_input(path)?)
}

/// Reads a single-sensor `time, x, y, z` export. The header row is skipped.
pub fn parse_timed_axes<R: Read>(reader: R) -> Result<TimedAxes> {
    let mut rdr = csv_reader(reader);
    let mut axes = TimedAxes::default();
    if read_header(&mut rdr)?.is_none() {
        return Ok(axes);
    }
    let (kept, dropped) = for_each_row(&mut rdr, |row| match fields(row, [0, 1, 2, 3]) {
        Some([t, x, y, z]) => {
            axes.push(t, x, y, z);
            true
        }
        None => false,
    })?;
    log::debug!("timed axes: kept {} rows, dropped {}", kept, dropped);
    Ok(axes)
}

pub fn load_timed_axes(path: &Path) -> Result<TimedAxes> {
    parse_timed_axes(open_input(path)?)
}
