//! Bounded-memory external shuffle over record-store files.
//!
//! Two phases. Phase 1 streams every input record and appends it to one
//! of B temporary bucket files, chosen by an independent uniform draw, so
//! bucketing needs O(1) memory regardless of corpus size. Phase 2 loads
//! each bucket in turn, permutes it uniformly at random, appends it to
//! the output and deletes the bucket file.
//!
//! The result is not a uniform permutation of the whole corpus:
//! cross-bucket order is the bucket-processing order, and only the order
//! inside each bucket is uniform. Independent bucket assignment plus full
//! in-bucket randomization is still enough to destroy any ordering
//! correlation in the source data, and it is the design point that keeps
//! memory bounded. More buckets mean less memory and better global mixing
//! but weaker mixing inside each (smaller) bucket; the trade-off is
//! exposed through [`ShuffleOptions`], not fixed.
//!
//! [`shuffle_split`] is the multi-output variant: the buckets are the
//! permanent outputs, named by a `$`-placeholder pattern, and each one is
//! permuted in place instead of being merged.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, info};

use crate::error::{ConfigError, ShuffleError};
use crate::header::Header;
use crate::ops::{Skipped, skip};
use crate::store::{
    CHUNK_RECORDS, StoreWriter, open_for_read, read_dataset, read_header, read_records,
    write_dataset,
};

/// Tunable policy for the external shuffle.
#[derive(Debug, Clone)]
pub struct ShuffleOptions {
    /// Fixed bucket count; when `None`, the count is derived from
    /// `max_bucket_records`.
    pub bucket_count: Option<u64>,
    /// Target upper bound on records per bucket when deriving the count.
    pub max_bucket_records: u64,
}

impl Default for ShuffleOptions {
    fn default() -> ShuffleOptions {
        ShuffleOptions {
            bucket_count: None,
            // 2^27 records per bucket keeps a loaded bucket comfortably
            // in memory at 47 bytes per record.
            max_bucket_records: 1 << 27,
        }
    }
}

impl ShuffleOptions {
    /// Resolve the bucket count for a corpus of `total_records`.
    pub fn resolve_bucket_count(&self, total_records: u64) -> Result<u64, ConfigError> {
        if let Some(count) = self.bucket_count {
            if count == 0 {
                return Err(ConfigError::InvalidBucketCount { given: 0 });
            }
            return Ok(count);
        }
        if self.max_bucket_records == 0 {
            return Err(ConfigError::InvalidBucketCount { given: 0 });
        }
        Ok(total_records.div_ceil(self.max_bucket_records).max(1))
    }
}

/// Summary of a shuffle run.
#[derive(Debug, Clone, Default)]
pub struct ShuffleReport {
    /// Final record count of the output file.
    pub records: u64,
    /// Number of temporary buckets used.
    pub buckets: u64,
    /// Number of input files actually read.
    pub files_read: usize,
    /// Inputs that were skipped.
    pub skipped: Vec<Skipped>,
}

/// RAII guard for a temporary bucket file: dropping it unlinks the file,
/// on success and on every error path alike.
struct TempBucket {
    path: PathBuf,
}

impl Drop for TempBucket {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Shuffle every record of `inputs` into `output`.
///
/// Missing, unreadable or directory inputs are skipped and reported; a
/// temp directory that cannot be created is fatal. The caller supplies
/// the generator, so deterministic seeding is a caller decision.
pub fn shuffle<R: Rng>(
    inputs: &[PathBuf],
    temp_dir: &Path,
    output: &Path,
    options: &ShuffleOptions,
    rng: &mut R,
) -> Result<ShuffleReport, ShuffleError> {
    let mut report = ShuffleReport::default();

    let mut usable = Vec::new();
    for input in inputs {
        if skip(input, &mut report.skipped).is_none() {
            usable.push(input.clone());
        }
    }

    let mut total = 0u64;
    for input in &usable {
        let mut reader = open_for_read(input)?;
        total += read_header(&mut reader)?.record_count;
    }

    let bucket_count = options.resolve_bucket_count(total)?;
    report.buckets = bucket_count;

    fs::create_dir_all(temp_dir).map_err(|_| ConfigError::InvalidTempDir {
        path: temp_dir.to_path_buf(),
    })?;
    info!(
        records = total,
        files = usable.len(),
        buckets = bucket_count,
        "shuffling"
    );

    // Phase 1: distribute every record to a uniformly chosen bucket.
    let mut guards = Vec::with_capacity(bucket_count as usize);
    let mut writers = Vec::with_capacity(bucket_count as usize);
    for i in 0..bucket_count {
        let path = temp_dir.join(format!("fin-shuffle-{i}.tmp"));
        writers.push(StoreWriter::create(&path, &Header::default())?);
        guards.push(TempBucket { path });
    }

    for input in &usable {
        let mut reader = open_for_read(input)?;
        let header = read_header(&mut reader)?;
        info!(
            path = %input.display(),
            records = header.record_count,
            "bucketing input"
        );

        let mut remaining = header.record_count;
        while remaining > 0 {
            let chunk = remaining.min(CHUNK_RECORDS);
            let records = read_records(&mut reader, chunk)?;
            for record in &records {
                let index = rng.gen_range(0..bucket_count) as usize;
                writers[index].append_one(record)?;
            }
            remaining -= chunk;
        }
        report.files_read += 1;
    }

    for writer in writers {
        writer.finalize()?;
    }

    // Phase 2: permute each bucket in memory and merge into the output.
    let mut out = StoreWriter::create(output, &Header::default())?;
    for (i, guard) in guards.into_iter().enumerate() {
        let mut bucket = read_dataset(&guard.path, u64::MAX)?;
        debug!(bucket = i, records = bucket.len(), "shuffling bucket");
        bucket.shuffle(rng);
        out.append(&bucket.positions)?;
        // Guard drops here, deleting the merged bucket file before the
        // next one is loaded.
    }

    report.records = out.finalize()?;
    info!(
        path = %output.display(),
        records = report.records,
        "shuffle finished"
    );
    Ok(report)
}

/// Expand a part pattern: every `$` becomes the one-based part number.
fn part_path(pattern: &str, part: u64) -> PathBuf {
    PathBuf::from(pattern.replace('$', &part.to_string()))
}

/// Shuffle every record of `inputs` across `parts` output files.
///
/// Output paths come from `pattern` with each `$` replaced by the part
/// number (1-based), e.g. `"out-$.fin"` → `out-1.fin`, `out-2.fin`, ...
/// Each record lands in a uniformly chosen part; each part is then
/// permuted in place. The parts are the permanent outputs, so no temp
/// directory is involved. Existing part files are overwritten.
pub fn shuffle_split<R: Rng>(
    inputs: &[PathBuf],
    pattern: &str,
    parts: u64,
    rng: &mut R,
) -> Result<ShuffleReport, ShuffleError> {
    if !pattern.contains('$') {
        return Err(ConfigError::InvalidOutputPattern {
            pattern: pattern.to_string(),
        }
        .into());
    }
    if parts == 0 {
        return Err(ConfigError::InvalidBucketCount { given: 0 }.into());
    }

    let mut report = ShuffleReport {
        buckets: parts,
        ..ShuffleReport::default()
    };

    let mut writers = Vec::with_capacity(parts as usize);
    for part in 1..=parts {
        let path = part_path(pattern, part);
        info!(path = %path.display(), "created output part");
        writers.push(StoreWriter::create(&path, &Header::default())?);
    }

    for input in inputs {
        if skip(input, &mut report.skipped).is_some() {
            continue;
        }

        let mut reader = open_for_read(input)?;
        let header = read_header(&mut reader)?;
        info!(
            path = %input.display(),
            records = header.record_count,
            "distributing input"
        );

        let mut remaining = header.record_count;
        while remaining > 0 {
            let chunk = remaining.min(CHUNK_RECORDS);
            let records = read_records(&mut reader, chunk)?;
            for record in &records {
                let index = rng.gen_range(0..parts) as usize;
                writers[index].append_one(record)?;
            }
            remaining -= chunk;
        }
        report.files_read += 1;
    }

    for writer in writers {
        report.records += writer.finalize()?;
    }

    // Second pass: permute each part in place.
    for part in 1..=parts {
        let path = part_path(pattern, part);
        let mut data = read_dataset(&path, u64::MAX)?;
        debug!(path = %path.display(), records = data.len(), "shuffling part");
        data.shuffle(rng);
        write_dataset(&path, &data)?;
    }

    info!(
        records = report.records,
        parts,
        "split shuffle finished"
    );
    Ok(report)
}
