//! Chunked CSV scanline source
//!
//! The expected shape is a header row naming the depth column plus one
//! column per sample (`depth,0,1,...,W-1`), then one scanline per data
//! row. The header is validated once at construction; after that, rows
//! are surfaced individually as parsed-or-malformed outcomes so a single
//! bad row never takes down the stream. Only an I/O failure of the
//! underlying reader is fatal.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::errors::{IngestError, IngestResult};
use crate::models::DepthKey;

/// One successfully parsed scanline: quantized depth plus its samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RawScanline {
    pub depth: DepthKey,
    pub samples: Vec<u8>,
}

/// Outcome of parsing a single data row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Parsed(RawScanline),
    Malformed { line: u64, reason: String },
}

/// CSV reader that validates the header once and yields bounded chunks.
#[derive(Debug)]
pub struct CsvScanlineReader<R: Read> {
    reader: Reader<R>,
    source_width: usize,
    record: StringRecord,
    line: u64,
}

impl CsvScanlineReader<File> {
    pub fn open(path: impl AsRef<Path>, source_width: usize) -> IngestResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, source_width)
    }
}

impl<R: Read> CsvScanlineReader<R> {
    /// Wrap a reader, consuming and validating the header row. A header
    /// with the wrong column count fails the whole run up front.
    pub fn from_reader(reader: R, source_width: usize) -> IngestResult<Self> {
        let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
        let actual = csv_reader.headers()?.len();
        if actual != source_width + 1 {
            return Err(IngestError::SchemaMismatch {
                expected: source_width,
                actual,
            });
        }
        Ok(Self {
            reader: csv_reader,
            source_width,
            record: StringRecord::new(),
            line: 1,
        })
    }

    /// Read up to `max_rows` data rows. An empty result means the stream
    /// is exhausted.
    pub fn read_chunk(&mut self, max_rows: usize) -> IngestResult<Vec<RowOutcome>> {
        let mut rows = Vec::with_capacity(max_rows);
        while rows.len() < max_rows {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {
                    self.line += 1;
                    rows.push(parse_record(&self.record, self.source_width, self.line));
                }
                Ok(false) => break,
                Err(e) => {
                    if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                        return Err(IngestError::Csv(e));
                    }
                    self.line += 1;
                    rows.push(RowOutcome::Malformed {
                        line: self.line,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(rows)
    }
}

fn parse_record(record: &StringRecord, source_width: usize, line: u64) -> RowOutcome {
    if record.len() != source_width + 1 {
        return RowOutcome::Malformed {
            line,
            reason: format!(
                "expected {} columns, got {}",
                source_width + 1,
                record.len()
            ),
        };
    }

    let depth_field = &record[0];
    let depth = match depth_field.trim().parse::<f64>() {
        Ok(value) => match DepthKey::from_f64(value) {
            Some(key) => key,
            None => {
                return RowOutcome::Malformed {
                    line,
                    reason: format!("non-finite depth '{depth_field}'"),
                };
            }
        },
        Err(_) => {
            return RowOutcome::Malformed {
                line,
                reason: format!("unparseable depth '{depth_field}'"),
            };
        }
    };

    let mut samples = Vec::with_capacity(source_width);
    for (column, field) in record.iter().skip(1).enumerate() {
        match field.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => samples.push(clamp_sample(value)),
            _ => {
                return RowOutcome::Malformed {
                    line,
                    reason: format!("unparseable sample in column {}: '{field}'", column + 1),
                };
            }
        }
    }

    RowOutcome::Parsed(RawScanline { depth, samples })
}

/// Samples are nominally integers in 0..=255, but real exports carry
/// floats and out-of-range values: fractions round, excursions clamp.
fn clamp_sample(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
