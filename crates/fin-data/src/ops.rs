//! Dataset operations: inspect, convert (text → binary) and combine.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use fin_core::Position;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::header::Header;
use crate::store::{CHUNK_RECORDS, StoreWriter, open_for_read, read_header, read_records};

/// Records buffered before each batched append during convert.
const CONVERT_BATCH: usize = 16_384;

/// Why an input file was skipped instead of processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The path does not exist.
    NotFound,
    /// The path is a directory.
    IsADirectory,
    /// The path could not be inspected.
    Unreadable,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotFound => write!(f, "does not exist"),
            SkipReason::IsADirectory => write!(f, "is a directory"),
            SkipReason::Unreadable => write!(f, "is unreadable"),
        }
    }
}

/// One skipped input, surfaced to the caller rather than swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// The skipped path.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Summary of a combine run.
#[derive(Debug, Clone, Default)]
pub struct OpReport {
    /// Final record count of the output file.
    pub records: u64,
    /// Number of input files actually read.
    pub files_read: usize,
    /// Inputs that were skipped.
    pub skipped: Vec<Skipped>,
}

/// Summary of a convert run.
#[derive(Debug, Clone, Default)]
pub struct ConvertReport {
    /// Final record count of the output file (including resumed records).
    pub records: u64,
    /// Number of input files actually read.
    pub files_read: usize,
    /// Inputs that were skipped.
    pub skipped: Vec<Skipped>,
    /// Lines that failed to parse and were dropped.
    pub bad_lines: u64,
}

/// Classify an input path, returning the reason to skip it if any.
pub(crate) fn classify(path: &Path) -> Option<SkipReason> {
    match fs::metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Some(SkipReason::NotFound),
        Err(_) => Some(SkipReason::Unreadable),
        Ok(meta) if meta.is_dir() => Some(SkipReason::IsADirectory),
        Ok(_) => None,
    }
}

/// Read a file's record count from its header alone.
pub fn inspect(path: &Path) -> Result<u64, StoreError> {
    let mut reader = open_for_read(path)?;
    Ok(read_header(&mut reader)?.record_count)
}

/// Convert text-record files into one binary store file.
///
/// If `output` already exists it is resumed: new records are appended
/// after the ones its header counts. Unparsable lines are dropped with a
/// warning; missing or directory inputs are skipped with a warning.
pub fn convert(inputs: &[PathBuf], output: &Path) -> Result<ConvertReport, StoreError> {
    let mut report = ConvertReport::default();

    let mut writer = if output.exists() {
        let (writer, header) = StoreWriter::append_to(output)?;
        info!(
            path = %output.display(),
            records = header.record_count,
            "resuming existing output file"
        );
        writer
    } else {
        info!(path = %output.display(), "created new output file");
        StoreWriter::create(output, &Header::default())?
    };

    let mut batch = Vec::with_capacity(CONVERT_BATCH);

    for input in inputs {
        if skip(input, &mut report.skipped).is_some() {
            continue;
        }

        info!(path = %input.display(), "reading text records");
        let reader = BufReader::new(File::open(input)?);

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Position>() {
                Ok(position) => {
                    batch.push(position);
                    if batch.len() == CONVERT_BATCH {
                        writer.append(&batch)?;
                        batch.clear();
                        info!(records = writer.count(), "converted records");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "dropping unparsable line");
                    report.bad_lines += 1;
                }
            }
        }

        writer.append(&batch)?;
        batch.clear();
        report.files_read += 1;
    }

    report.records = writer.finalize()?;
    info!(
        path = %output.display(),
        records = report.records,
        files = report.files_read,
        "convert finished"
    );
    Ok(report)
}

/// Concatenate store files into one, preserving record order.
///
/// Fails with [`StoreError::AlreadyExists`] before writing anything if
/// the destination exists. Skippable inputs are skipped with a warning.
pub fn combine(inputs: &[PathBuf], output: &Path) -> Result<OpReport, StoreError> {
    let mut report = OpReport::default();
    let mut writer = StoreWriter::create_new(output, &Header::default())?;

    for input in inputs {
        if skip(input, &mut report.skipped).is_some() {
            continue;
        }

        let mut reader = open_for_read(input)?;
        let header = read_header(&mut reader)?;
        info!(
            path = %input.display(),
            records = header.record_count,
            "combining input"
        );

        let mut remaining = header.record_count;
        while remaining > 0 {
            let chunk = remaining.min(CHUNK_RECORDS);
            let records = read_records(&mut reader, chunk)?;
            writer.append(&records)?;
            remaining -= chunk;
        }
        report.files_read += 1;
    }

    report.records = writer.finalize()?;
    info!(
        path = %output.display(),
        records = report.records,
        files = report.files_read,
        "combine finished"
    );
    Ok(report)
}

/// Record and log a skip if the path is not a readable file.
pub(crate) fn skip(path: &Path, skipped: &mut Vec<Skipped>) -> Option<SkipReason> {
    let reason = classify(path)?;
    warn!(path = %path.display(), "{reason}, skipping");
    skipped.push(Skipped {
        path: path.to_path_buf(),
        reason,
    });
    Some(reason)
}
