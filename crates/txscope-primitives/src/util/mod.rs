//! Utility types for binary serialization.
//!
//! Provides VarInt encoding/decoding, the positional `ByteReader`, the
//! growable `ByteWriter`, and the `ByteRange` provenance marker used to
//! point back into a decoded source buffer.

use serde::{Deserialize, Serialize};

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A variable-length integer as used in transaction data.
///
/// VarInt is used to indicate the number of upcoming fields or the length
/// of an upcoming field. The encoding uses 1, 3, 5, or 9 bytes depending on
/// the magnitude of the value. Encoding is always canonical (smallest form);
/// decoding accepts any of the four forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Decode a VarInt from the start of a byte slice.
    ///
    /// # Arguments
    /// * `data` - Byte slice starting with a VarInt encoding.
    ///
    /// # Returns
    /// A tuple of `(VarInt, bytes_consumed)`, or `TruncatedInput` if the
    /// slice ends inside the encoding.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let mut reader = ByteReader::new(data);
        let value = reader.read_varint()?;
        Ok((value, reader.position()))
    }

    /// Return the wire-format byte length of this VarInt.
    ///
    /// # Returns
    /// 1, 3, 5, or 9 depending on the value.
    pub fn length(&self) -> usize {
        if self.0 < 0xfd {
            1
        } else if self.0 <= 0xffff {
            3
        } else if self.0 <= 0xffff_ffff {
            5
        } else {
            9
        }
    }

    /// Encode the VarInt into a new byte vector.
    ///
    /// # Returns
    /// A `Vec<u8>` of 1, 3, 5, or 9 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let v = self.0;
        let mut buf = Vec::with_capacity(self.length());
        if v < 0xfd {
            buf.push(v as u8);
        } else if v <= 0xffff {
            buf.push(0xfd);
            buf.extend_from_slice(&(v as u16).to_le_bytes());
        } else if v <= 0xffff_ffff {
            buf.push(0xfe);
            buf.extend_from_slice(&(v as u32).to_le_bytes());
        } else {
            buf.push(0xff);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

    /// Return the underlying u64 value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Convert to a platform `usize` for use as a count or length.
    ///
    /// # Returns
    /// The value, or `IntegerOverflow` when it does not fit.
    pub fn to_usize(&self) -> Result<usize, PrimitivesError> {
        usize::try_from(self.0).map_err(|_| PrimitivesError::IntegerOverflow(self.0))
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// ByteRange
// ---------------------------------------------------------------------------

/// Half-open `[start, end)` offsets into an immutable source buffer.
///
/// Attached to decoded structures so callers can show the exact bytes a
/// structure was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ByteRange {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl ByteRange {
    /// Create a range from two offsets.
    pub fn new(start: usize, end: usize) -> Self {
        ByteRange { start, end }
    }

    /// Number of bytes covered by the range.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slice the source buffer the range was recorded against.
    ///
    /// # Arguments
    /// * `source` - The buffer the range points into.
    ///
    /// # Returns
    /// The covered bytes, or `None` if the range lies outside `source`.
    pub fn slice<'a>(&self, source: &'a [u8]) -> Option<&'a [u8]> {
        source.get(self.start..self.end)
    }
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A cursor-based reader over a byte slice.
///
/// Maintains a read position and provides fixed-width integer reads in
/// either byte order plus VarInt and length-prefixed reads. Every read fails
/// with `TruncatedInput` when it would run past the end of the data.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A byte slice of length `n`, or `TruncatedInput` if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if n > self.remaining() {
            return Err(PrimitivesError::TruncatedInput {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a fixed-size array and advance the position.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a big-endian u16.
    pub fn read_u16_be(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a big-endian u32.
    pub fn read_u32_be(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a VarInt in any of its four prefix forms.
    ///
    /// Non-minimal encodings are accepted.
    ///
    /// # Returns
    /// The decoded `VarInt`, or `TruncatedInput` if the data ends early.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let first = self.read_u8()?;
        let value = match first {
            0xff => self.read_u64_le()?,
            0xfe => self.read_u32_le()? as u64,
            0xfd => self.read_u16_le()? as u64,
            b => b as u64,
        };
        Ok(VarInt(value))
    }

    /// Read a VarInt length prefix followed by that many bytes.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], PrimitivesError> {
        let len = self.read_varint()?.to_usize()?;
        self.read_bytes(len)
    }

    /// Return the number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Check whether every byte has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Current offset from the start of the data.
    ///
    /// Capture it before a nested read and pass it to `range_from`
    /// afterwards to record the consumed range.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Build the range covering everything read since `start`.
    pub fn range_from(&self, start: usize) -> ByteRange {
        ByteRange::new(start, self.pos)
    }

    /// The unread tail of the data, without advancing.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// The full underlying buffer.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// A growable little-endian writer.
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    /// Create a new writer with a pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter { buf: Vec::with_capacity(capacity) }
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Append a little-endian u16.
    pub fn write_u16_le(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u32.
    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u64.
    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a VarInt in canonical form.
    pub fn write_varint(&mut self, varint: VarInt) {
        self.buf.extend_from_slice(&varint.to_bytes());
    }

    /// Append a VarInt length prefix followed by the bytes.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_varint(VarInt::from(bytes.len()));
        self.write_bytes(bytes);
    }

    /// Number of bytes written so far.
    ///
    /// Useful for measuring a nested write before emitting its prefix.
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Return a reference to the current buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- VarInt decode tests --

    #[test]
    fn test_decode_varint_prefix_forms() {
        let (vi, sz) = VarInt::from_bytes(&[0xff, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!((vi.0, sz), (0, 9));

        let (vi, sz) = VarInt::from_bytes(&[0xfe, 0, 0, 0, 0]).unwrap();
        assert_eq!((vi.0, sz), (0, 5));

        let (vi, sz) = VarInt::from_bytes(&[0xfd, 0, 0]).unwrap();
        assert_eq!((vi.0, sz), (0, 3));

        let (vi, sz) = VarInt::from_bytes(&[0x01]).unwrap();
        assert_eq!((vi.0, sz), (1, 1));
    }

    #[test]
    fn test_decode_varint_accepts_non_minimal() {
        // 5 written in the 3-byte form is still 5.
        let (vi, sz) = VarInt::from_bytes(&[0xfd, 0x05, 0x00]).unwrap();
        assert_eq!(vi, VarInt(5));
        assert_eq!(sz, 3);
        // ... and re-encodes canonically.
        assert_eq!(vi.to_bytes(), vec![0x05]);
    }

    #[test]
    fn test_decode_varint_truncated() {
        assert_eq!(
            VarInt::from_bytes(&[0xfe, 0x01, 0x02]),
            Err(PrimitivesError::TruncatedInput { needed: 4, remaining: 2 })
        );
        assert!(VarInt::from_bytes(&[]).is_err());
    }

    // -- VarInt encode tests --

    #[test]
    fn test_varint_to_bytes_boundaries() {
        let cases: Vec<(u64, Vec<u8>)> = vec![
            (0, vec![0x00]),
            (1, vec![0x01]),
            (252, vec![0xfc]),
            (253, vec![0xfd, 0xfd, 0x00]),
            (65535, vec![0xfd, 0xff, 0xff]),
            (65536, vec![0xfe, 0x00, 0x00, 0x01, 0x00]),
            (4294967295, vec![0xfe, 0xff, 0xff, 0xff, 0xff]),
            (4294967296, vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]),
            (u64::MAX, vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        ];

        for (value, expected) in cases {
            let vi = VarInt(value);
            assert_eq!(vi.to_bytes(), expected, "encoding mismatch for {}", value);
            assert_eq!(vi.length(), expected.len(), "length mismatch for {}", value);
        }
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_varint_to_usize_overflow() {
        assert_eq!(
            VarInt(u64::MAX).to_usize(),
            Err(PrimitivesError::IntegerOverflow(u64::MAX))
        );
    }

    #[test]
    fn test_varint_to_usize() {
        assert_eq!(VarInt(300).to_usize().unwrap(), 300);
    }

    // -- ByteReader / ByteWriter --

    #[test]
    fn test_reader_writer_roundtrip() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0x42);
        writer.write_u16_le(0x1234);
        writer.write_u32_le(0xDEADBEEF);
        writer.write_u64_le(0x0102030405060708);
        writer.write_varint(VarInt(300));
        writer.write_var_bytes(b"hello");
        assert_eq!(writer.size(), 1 + 2 + 4 + 8 + 3 + 6);

        let data = writer.into_bytes();
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_u64_le().unwrap(), 0x0102030405060708);
        assert_eq!(reader.read_varint().unwrap(), VarInt(300));
        assert_eq!(reader.read_var_bytes().unwrap(), b"hello");
        assert!(reader.at_end());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reader_big_endian() {
        let mut reader = ByteReader::new(&[0x01, 0x02, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(reader.read_u16_be().unwrap(), 0x0102);
        assert_eq!(reader.read_u32_be().unwrap(), 0x0100);
    }

    #[test]
    fn test_reader_truncated() {
        let mut reader = ByteReader::new(&[0x01, 0x02]);
        assert!(reader.read_u8().is_ok());
        assert_eq!(
            reader.read_u32_le(),
            Err(PrimitivesError::TruncatedInput { needed: 4, remaining: 1 })
        );
        // A failed read leaves the position untouched.
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn test_reader_range_tracking() {
        let data = [0xaa, 0xbb, 0xcc, 0xdd];
        let mut reader = ByteReader::new(&data);
        reader.read_u8().unwrap();
        let start = reader.position();
        reader.read_bytes(2).unwrap();
        let range = reader.range_from(start);
        assert_eq!(range, ByteRange::new(1, 3));
        assert_eq!(range.len(), 2);
        assert_eq!(range.slice(&data), Some(&[0xbb, 0xcc][..]));
        assert_eq!(reader.rest(), &[0xdd]);
    }

    #[test]
    fn test_byte_range_out_of_bounds() {
        assert_eq!(ByteRange::new(2, 10).slice(&[0u8; 4]), None);
        assert!(ByteRange::default().is_empty());
    }
}
