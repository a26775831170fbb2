//! The fixed-size record-store file header.

use std::fmt;

/// Capacity of each engine identifier field.
pub const ENGINE_LEN: usize = 128;

/// Capacity of the free-text comment field.
pub const COMMENTS_LEN: usize = 1024;

/// Size of the header on the wire, in bytes.
pub const HEADER_SIZE: usize = 8 + 2 * ENGINE_LEN + COMMENTS_LEN;

/// One header per file: authoritative record count plus fixed-size,
/// null-padded identifier and comment buffers.
///
/// `record_count` must equal the number of records physically following
/// the header; every write path keeps it correct by finalizing (see
/// [`StoreWriter`](crate::store::StoreWriter)).
#[derive(Clone, PartialEq, Eq)]
pub struct Header {
    /// Number of records following the header.
    pub record_count: u64,
    engine_1: [u8; ENGINE_LEN],
    engine_2: [u8; ENGINE_LEN],
    comments: [u8; COMMENTS_LEN],
}

impl Default for Header {
    fn default() -> Header {
        Header {
            record_count: 0,
            engine_1: [0; ENGINE_LEN],
            engine_2: [0; ENGINE_LEN],
            comments: [0; COMMENTS_LEN],
        }
    }
}

impl Header {
    /// Return the first engine identifier.
    pub fn engine_1(&self) -> String {
        read_padded(&self.engine_1)
    }

    /// Set the first engine identifier, truncating to capacity.
    pub fn set_engine_1(&mut self, value: &str) {
        write_padded(&mut self.engine_1, value);
    }

    /// Return the second engine identifier.
    pub fn engine_2(&self) -> String {
        read_padded(&self.engine_2)
    }

    /// Set the second engine identifier, truncating to capacity.
    pub fn set_engine_2(&mut self, value: &str) {
        write_padded(&mut self.engine_2, value);
    }

    /// Return the free-text comment.
    pub fn comments(&self) -> String {
        read_padded(&self.comments)
    }

    /// Set the free-text comment, truncating to capacity.
    pub fn set_comments(&mut self, value: &str) {
        write_padded(&mut self.comments, value);
    }

    /// Serialize to the fixed-size wire header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..8].copy_from_slice(&self.record_count.to_le_bytes());
        out[8..8 + ENGINE_LEN].copy_from_slice(&self.engine_1);
        out[8 + ENGINE_LEN..8 + 2 * ENGINE_LEN].copy_from_slice(&self.engine_2);
        out[8 + 2 * ENGINE_LEN..].copy_from_slice(&self.comments);
        out
    }

    /// Reconstruct a header from wire bytes.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Header {
        let mut count = [0u8; 8];
        count.copy_from_slice(&bytes[0..8]);

        let mut header = Header {
            record_count: u64::from_le_bytes(count),
            ..Header::default()
        };
        header.engine_1.copy_from_slice(&bytes[8..8 + ENGINE_LEN]);
        header
            .engine_2
            .copy_from_slice(&bytes[8 + ENGINE_LEN..8 + 2 * ENGINE_LEN]);
        header.comments.copy_from_slice(&bytes[8 + 2 * ENGINE_LEN..]);
        header
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("record_count", &self.record_count)
            .field("engine_1", &self.engine_1())
            .field("engine_2", &self.engine_2())
            .field("comments", &self.comments())
            .finish()
    }
}

/// Read a null-padded buffer as a string, stopping at the first null.
fn read_padded(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Write a string into a null-padded buffer, truncating to capacity.
fn write_padded(buf: &mut [u8], value: &str) {
    buf.fill(0);
    let bytes = value.as_bytes();
    let len = bytes.len().min(buf.len());
    buf[..len].copy_from_slice(&bytes[..len]);
}

#[cfg(test)]
mod tests {
    use super::{ENGINE_LEN, HEADER_SIZE, Header};

    #[test]
    fn header_size() {
        assert_eq!(HEADER_SIZE, 1288);
    }

    #[test]
    fn default_is_blank() {
        let header = Header::default();
        assert_eq!(header.record_count, 0);
        assert_eq!(header.engine_1(), "");
        assert_eq!(header.engine_2(), "");
        assert_eq!(header.comments(), "");
    }

    #[test]
    fn string_fields_roundtrip() {
        let mut header = Header::default();
        header.set_engine_1("koivisto 9.0");
        header.set_engine_2("stockfish 16");
        header.set_comments("self-play, depth 9");

        assert_eq!(header.engine_1(), "koivisto 9.0");
        assert_eq!(header.engine_2(), "stockfish 16");
        assert_eq!(header.comments(), "self-play, depth 9");
    }

    #[test]
    fn long_strings_truncate() {
        let mut header = Header::default();
        let long = "x".repeat(ENGINE_LEN + 50);
        header.set_engine_1(&long);
        assert_eq!(header.engine_1().len(), ENGINE_LEN);
    }

    #[test]
    fn set_clears_previous_value() {
        let mut header = Header::default();
        header.set_engine_1("a-long-engine-name");
        header.set_engine_1("b");
        assert_eq!(header.engine_1(), "b");
    }

    #[test]
    fn bytes_roundtrip() {
        let mut header = Header::default();
        header.record_count = 123_456_789;
        header.set_engine_1("e1");
        header.set_engine_2("e2");
        header.set_comments("hello");

        let back = Header::from_bytes(&header.to_bytes());
        assert_eq!(back, header);
    }

    #[test]
    fn count_is_little_endian_at_offset_zero() {
        let mut header = Header::default();
        header.record_count = 0x0102_0304;
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..8], &[0x04, 0x03, 0x02, 0x01, 0, 0, 0, 0]);
    }
}
