//! Reading and writing record-store files.
//!
//! A store file is a fixed-size [`Header`] followed by a contiguous array
//! of fixed-size position records. Reads are chunked purely to bound peak
//! buffer size; the result is identical to a single read.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use fin_core::{Position, RECORD_SIZE};
use tracing::debug;

use crate::dataset::DataSet;
use crate::error::StoreError;
use crate::header::{HEADER_SIZE, Header};

/// Records per read chunk.
pub const CHUNK_RECORDS: u64 = 1 << 20;

/// Open a store file for reading.
///
/// Fails with [`StoreError::NotFound`] or [`StoreError::NotAFile`] so
/// callers can classify skippable inputs without touching the filesystem
/// themselves.
pub fn open_for_read(path: &Path) -> Result<BufReader<File>, StoreError> {
    let meta = fs::metadata(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::from(e)
        }
    })?;
    if meta.is_dir() {
        return Err(StoreError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    Ok(BufReader::new(File::open(path)?))
}

/// Read the fixed-size header prefix.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Header, StoreError> {
    let mut buf = [0u8; HEADER_SIZE];
    let got = read_fully(reader, &mut buf)?;
    if got < HEADER_SIZE {
        return Err(StoreError::Truncated {
            wanted: HEADER_SIZE as u64,
            got: got as u64,
        });
    }
    Ok(Header::from_bytes(&buf))
}

/// Read exactly `count` records, in fixed-size chunks.
///
/// Callers bound `count` by `min(max, header.record_count)`. Fails with
/// [`StoreError::Truncated`] if fewer bytes are available than requested.
pub fn read_records<R: Read>(reader: &mut R, count: u64) -> Result<Vec<Position>, StoreError> {
    read_records_chunked(reader, count, CHUNK_RECORDS)
}

fn read_records_chunked<R: Read>(
    reader: &mut R,
    count: u64,
    chunk_records: u64,
) -> Result<Vec<Position>, StoreError> {
    // Cap the initial allocation: a corrupt header must not trigger a
    // giant reservation before truncation is detected.
    let mut records = Vec::with_capacity(count.min(chunk_records) as usize);
    let mut remaining = count;

    while remaining > 0 {
        let chunk = remaining.min(chunk_records) as usize;
        let byte_len = chunk * RECORD_SIZE;

        let mut buf = vec![0u8; byte_len];
        let got = read_fully(reader, &mut buf)?;
        if got < byte_len {
            return Err(StoreError::Truncated {
                wanted: count * RECORD_SIZE as u64,
                got: (records.len() * RECORD_SIZE + got) as u64,
            });
        }

        for raw in buf.chunks_exact(RECORD_SIZE) {
            let mut bytes = [0u8; RECORD_SIZE];
            bytes.copy_from_slice(raw);
            records.push(Position::from_bytes(&bytes)?);
        }

        remaining -= chunk as u64;
        debug!(read = records.len(), total = count, "read record chunk");
    }

    Ok(records)
}

/// Read a whole file: header plus up to `max` records.
pub fn read_dataset(path: &Path, max: u64) -> Result<DataSet, StoreError> {
    let mut reader = open_for_read(path)?;
    let header = read_header(&mut reader)?;
    let count = header.record_count.min(max);
    let positions = read_records(&mut reader, count)?;
    Ok(DataSet { header, positions })
}

/// Read until the buffer is full or the stream ends; returns bytes filled.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// A write session for one store file.
///
/// State machine: created (header written, count 0) → appending
/// (repeatable) → finalized (count field rewritten with the true total).
/// The on-disk count is untrusted until [`finalize`](Self::finalize) runs,
/// so a crash mid-write leaves a file that reads as empty rather than
/// corrupt.
pub struct StoreWriter {
    writer: BufWriter<File>,
    written: u64,
}

impl StoreWriter {
    /// Create (or overwrite) a store file, writing `header` with count 0.
    pub fn create(path: &Path, header: &Header) -> Result<StoreWriter, StoreError> {
        Self::start(File::create(path)?, header)
    }

    /// Create a store file, failing with [`StoreError::AlreadyExists`] if
    /// the path exists. Used by no-clobber operations (combine).
    pub fn create_new(path: &Path, header: &Header) -> Result<StoreWriter, StoreError> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    StoreError::AlreadyExists {
                        path: path.to_path_buf(),
                    }
                } else {
                    StoreError::from(e)
                }
            })?;
        Self::start(file, header)
    }

    /// Reopen an existing store file for appending after its current
    /// records. Returns the writer and the header that was on disk.
    pub fn append_to(path: &Path) -> Result<(StoreWriter, Header), StoreError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let header = read_header(&mut &file)?;

        let offset = HEADER_SIZE as u64 + header.record_count * RECORD_SIZE as u64;
        let mut writer = BufWriter::new(file);
        writer.seek(SeekFrom::Start(offset))?;

        Ok((
            StoreWriter {
                writer,
                written: header.record_count,
            },
            header,
        ))
    }

    fn start(file: File, header: &Header) -> Result<StoreWriter, StoreError> {
        let mut on_disk = header.clone();
        on_disk.record_count = 0;

        let mut writer = BufWriter::new(file);
        writer.write_all(&on_disk.to_bytes())?;

        Ok(StoreWriter { writer, written: 0 })
    }

    /// Append records at the current end of the data section.
    pub fn append(&mut self, records: &[Position]) -> Result<(), StoreError> {
        for record in records {
            self.writer.write_all(&record.to_bytes())?;
        }
        self.written += records.len() as u64;
        Ok(())
    }

    /// Append a single record.
    pub fn append_one(&mut self, record: &Position) -> Result<(), StoreError> {
        self.writer.write_all(&record.to_bytes())?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far (including any resumed ones).
    pub const fn count(&self) -> u64 {
        self.written
    }

    /// Flush all data and rewrite the header's count field with the true
    /// total. Returns the final record count.
    pub fn finalize(mut self) -> Result<u64, StoreError> {
        self.writer.seek(SeekFrom::Start(0))?;
        self.writer.write_all(&self.written.to_le_bytes())?;
        self.writer.flush()?;
        Ok(self.written)
    }
}

/// Create a store file holding exactly the given data set.
pub fn write_dataset(path: &Path, data: &DataSet) -> Result<u64, StoreError> {
    let mut writer = StoreWriter::create(path, &data.header)?;
    writer.append(&data.positions)?;
    writer.finalize()
}
