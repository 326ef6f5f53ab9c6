//! CSV table reader.
//!
//! Reads a CSV (optionally gzip-compressed) and returns every row as a
//! [`RawRecord`] keyed by the column headers in the first row. The whole
//! table is materialized before anything downstream runs.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use collision_map_collision_models::RawRecord;

use crate::SourceError;
use crate::progress::ProgressCallback;

/// How often (in rows) progress is reported while reading.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Options controlling how a CSV table is read.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter byte (defaults to `,`).
    pub delimiter: u8,
    /// Force gzip decompression. Files ending in `.gz` are always
    /// decompressed.
    pub gzip: bool,
    /// Optional cap on the number of rows to read.
    pub limit: Option<u64>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            gzip: false,
            limit: None,
        }
    }
}

/// A fully read CSV table.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    /// Trimmed column headers, in file order.
    pub headers: Vec<String>,
    /// One record per data row.
    pub records: Vec<RawRecord>,
}

/// Reads a CSV file from disk.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened, decompressed, or
/// parsed, or if it has no header row.
pub fn read_csv_file(
    path: &Path,
    options: &CsvOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<CsvTable, SourceError> {
    let file = File::open(path)?;
    let gzip = options.gzip || path.extension().is_some_and(|ext| ext == "gz");

    log::info!(
        "Reading {}{}",
        path.display(),
        if gzip { " (gzip)" } else { "" }
    );

    let reader: Box<dyn Read> = if gzip {
        Box::new(flate2::read::GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    read_csv(reader, options, progress)
}

/// Reads a CSV table from any reader.
///
/// Headers and values are trimmed. Rows shorter than the header yield empty
/// strings for the missing columns.
///
/// # Errors
///
/// Returns [`SourceError`] if the input cannot be parsed or has no header
/// row.
pub fn read_csv<R: Read>(
    reader: R,
    options: &CsvOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<CsvTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(SourceError::Parse {
            message: "CSV file contains no header row".to_owned(),
        });
    }

    let mut records = Vec::new();
    let mut pending: u64 = 0;

    for result in reader.records() {
        if let Some(max) = options.limit
            && records.len() as u64 >= max
        {
            log::info!("Reached row limit ({max}), stopping CSV parse");
            break;
        }

        let row = result?;

        let record: RawRecord = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.as_str(), row.get(i).unwrap_or("").trim()))
            .collect();
        records.push(record);

        pending += 1;
        if pending == PROGRESS_INTERVAL {
            progress.inc(pending);
            pending = 0;
        }
    }

    progress.inc(pending);
    progress.finish(format!("read {} rows", records.len()));
    log::info!("Parsed {} rows ({} columns)", records.len(), headers.len());

    Ok(CsvTable { headers, records })
}
