//! Minimal BCS (Binary Canonical Serialization) codec
//!
//! Only the shapes that appear in transaction data are covered:
//! little-endian integers, ULEB128 lengths and enum tags, fixed arrays,
//! length-prefixed byte vectors, strings, sequences and options.

use crate::error::{ErrorCode, PtbError};

/// Error types for BCS decoding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BcsError {
    #[error("Unexpected end of input: needed {needed} bytes at offset {offset}")]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("Invalid ULEB128 value at offset {0}")]
    InvalidUleb128(usize),

    #[error("Unknown {type_name} variant: {tag}")]
    UnknownVariant { type_name: &'static str, tag: u64 },

    #[error("Unsupported {type_name} variant: {tag}")]
    UnsupportedVariant { type_name: &'static str, tag: u64 },

    #[error("Expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid boolean byte: {0}")]
    InvalidBool(u8),

    #[error("Invalid UTF-8 string")]
    InvalidUtf8,

    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    #[error("Nesting deeper than {0} levels")]
    DepthExceeded(usize),
}

impl From<BcsError> for PtbError {
    fn from(e: BcsError) -> Self {
        PtbError::new(ErrorCode::EncodingError, format!("BCS error: {}", e))
    }
}

/// Values with a canonical BCS encoding
pub trait BcsEncode {
    fn encode(&self, writer: &mut BcsWriter);

    fn to_bcs(&self) -> Vec<u8> {
        let mut writer = BcsWriter::new();
        self.encode(&mut writer);
        writer.into_bytes()
    }
}

/// Values that can be read back from BCS
pub trait BcsDecode: Sized {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, BcsError>;

    /// Decode a complete buffer, rejecting trailing bytes
    fn from_bcs(bytes: &[u8]) -> Result<Self, BcsError> {
        let mut reader = BcsReader::new(bytes);
        let value = Self::decode(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

#[derive(Debug, Default)]
pub struct BcsWriter {
    buf: Vec<u8>,
}

impl BcsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn write_uleb128(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    /// Fixed-size array, no length prefix
    pub fn write_fixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// `vector<u8>`: ULEB128 length then raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_uleb128(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_str(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    pub fn write_seq<T: BcsEncode>(&mut self, items: &[T]) {
        self.write_uleb128(items.len() as u64);
        for item in items {
            item.encode(self);
        }
    }

    pub fn write_option<T: BcsEncode>(&mut self, value: Option<&T>) {
        match value {
            Some(v) => {
                self.write_u8(1);
                v.encode(self);
            }
            None => self.write_u8(0),
        }
    }
}

pub struct BcsReader<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> BcsReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
        }
    }

    /// Enter one level of a recursive value, failing past `limit`
    pub fn enter(&mut self, limit: usize) -> Result<(), BcsError> {
        if self.depth >= limit {
            return Err(BcsError::DepthExceeded(limit));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn finish(&self) -> Result<(), BcsError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(BcsError::TrailingBytes(n)),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], BcsError> {
        if self.remaining() < n {
            return Err(BcsError::UnexpectedEof {
                offset: self.pos,
                needed: n,
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, BcsError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, BcsError> {
        let mut arr = [0u8; 2];
        arr.copy_from_slice(self.take(2)?);
        Ok(u16::from_le_bytes(arr))
    }

    pub fn read_u64(&mut self) -> Result<u64, BcsError> {
        let mut arr = [0u8; 8];
        arr.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(arr))
    }

    pub fn read_bool(&mut self) -> Result<bool, BcsError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(BcsError::InvalidBool(other)),
        }
    }

    pub fn read_uleb128(&mut self) -> Result<u64, BcsError> {
        let start = self.pos;
        let mut value: u64 = 0;
        for shift in (0..64).step_by(7) {
            let byte = self.read_u8()?;
            let digit = (byte & 0x7f) as u64;
            if shift == 63 && digit > 1 {
                return Err(BcsError::InvalidUleb128(start));
            }
            value |= digit << shift;
            if byte & 0x80 == 0 {
                // canonical form forbids trailing zero groups
                if shift > 0 && digit == 0 {
                    return Err(BcsError::InvalidUleb128(start));
                }
                return Ok(value);
            }
        }
        Err(BcsError::InvalidUleb128(start))
    }

    /// Sequence length; never larger than the bytes left
    pub fn read_len(&mut self) -> Result<usize, BcsError> {
        let offset = self.pos;
        let len = self.read_uleb128()?;
        if len > self.remaining() as u64 {
            return Err(BcsError::UnexpectedEof {
                offset,
                needed: len as usize,
            });
        }
        Ok(len as usize)
    }

    pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], BcsError> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.take(N)?);
        Ok(arr)
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, BcsError> {
        let len = self.read_len()?;
        Ok(self.take(len)?.to_vec())
    }

    pub fn read_string(&mut self) -> Result<String, BcsError> {
        String::from_utf8(self.read_bytes()?).map_err(|_| BcsError::InvalidUtf8)
    }

    pub fn read_seq<T: BcsDecode>(&mut self) -> Result<Vec<T>, BcsError> {
        let len = self.read_len()?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }

    pub fn read_option<T: BcsDecode>(&mut self) -> Result<Option<T>, BcsError> {
        match self.read_u8()? {
            0 => Ok(None),
            1 => Ok(Some(T::decode(self)?)),
            other => Err(BcsError::InvalidBool(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uleb128_encoding() {
        let cases: [(u64, &[u8]); 5] = [
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7f]),
            (128, &[0x80, 0x01]),
            (16384, &[0x80, 0x80, 0x01]),
        ];
        for (value, expected) in cases {
            let mut w = BcsWriter::new();
            w.write_uleb128(value);
            let bytes = w.into_bytes();
            assert_eq!(bytes, expected, "encoding {}", value);
            assert_eq!(BcsReader::new(&bytes).read_uleb128().unwrap(), value);
        }
    }

    #[test]
    fn test_non_canonical_uleb128_rejected() {
        assert_eq!(
            BcsReader::new(&[0x80, 0x00]).read_uleb128(),
            Err(BcsError::InvalidUleb128(0))
        );
    }

    #[test]
    fn test_bytes_are_length_prefixed() {
        let mut w = BcsWriter::new();
        w.write_bytes(&[0xaa; 3]);
        w.write_u64(1);
        assert_eq!(w.into_bytes(), vec![3, 0xaa, 0xaa, 0xaa, 1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_reader_eof_and_trailing() {
        let mut r = BcsReader::new(&[1, 2]);
        assert!(r.read_u64().is_err());

        let mut r = BcsReader::new(&[1, 2]);
        r.read_u8().unwrap();
        assert_eq!(r.finish(), Err(BcsError::TrailingBytes(1)));
    }

    #[test]
    fn test_oversized_length_rejected() {
        // claims 100 bytes but only 1 follows
        let mut r = BcsReader::new(&[100, 0]);
        assert!(r.read_bytes().is_err());
    }

    #[test]
    fn test_depth_guard() {
        let mut reader = BcsReader::new(&[]);
        reader.enter(2).unwrap();
        reader.enter(2).unwrap();
        assert_eq!(reader.enter(2), Err(BcsError::DepthExceeded(2)));
        reader.leave();
        assert!(reader.enter(2).is_ok());
    }
}
