//! Record-store files and the bounded-memory external shuffle.

pub mod dataset;
pub mod error;
pub mod header;
pub mod ops;
pub mod shuffle;
pub mod store;

pub use dataset::DataSet;
pub use error::{ConfigError, ShuffleError, StoreError};
pub use header::{HEADER_SIZE, Header};
pub use ops::{ConvertReport, OpReport, SkipReason, Skipped, combine, convert, inspect};
pub use shuffle::{ShuffleOptions, ShuffleReport, shuffle, shuffle_split};
pub use store::{CHUNK_RECORDS, StoreWriter, open_for_read, read_dataset, read_header, read_records, write_dataset};
