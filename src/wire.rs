// File: src/wire.rs
//! Bounds-checked byte cursor for handshake codecs
//!
//! [`Reader`] walks an attacker-controlled buffer and fails cleanly with
//! [`Error::BadMessage`] on underflow instead of reading past the end.
//! Returned slices borrow from the input, so point octets can be inspected
//! and validated without copying. [`Writer`] is an append-only big-endian
//! writer; all size-correctness checks happen in the codecs, which size
//! their writes from the curve registry.

use crate::error::{Error, Result};

const UNDERFLOW: Error = Error::BadMessage("unexpected end of buffer");

/// Cursor over a received byte buffer. All integer reads are big-endian.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Current read offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Consume `len` bytes, returning them as a borrowed view into the
    /// underlying buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(UNDERFLOW);
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Consume and discard `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Re-borrow the span consumed since `mark` (an earlier [`position`]).
    ///
    /// [`position`]: Reader::position
    pub fn consumed_since(&self, mark: usize) -> &'a [u8] {
        &self.buf[mark..self.pos]
    }
}

/// Append-only writer producing big-endian wire bytes.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Writer::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_big_endian() {
        let mut reader = Reader::new(&[0x01, 0x02, 0x03]);
        assert_eq!(reader.read_u16().unwrap(), 0x0102);
        assert_eq!(reader.read_u8().unwrap(), 0x03);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn underflow_fails_cleanly() {
        let mut reader = Reader::new(&[0xaa]);
        assert!(reader.read_u16().is_err());
        // A failed read consumes nothing.
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.read_u8().unwrap(), 0xaa);
        assert!(matches!(reader.read_u8(), Err(Error::BadMessage(_))));
    }

    #[test]
    fn consumed_since_reborrows_the_read_window() {
        let mut reader = Reader::new(&[1, 2, 3, 4, 5]);
        reader.skip(1).unwrap();
        let mark = reader.position();
        reader.read_u16().unwrap();
        reader.read_u8().unwrap();
        assert_eq!(reader.consumed_since(mark), &[2, 3, 4]);
    }

    #[test]
    fn writer_round_trips() {
        let mut writer = Writer::new();
        writer.write_u16(0x0102);
        writer.write_u8(0x03);
        writer.write_bytes(&[0x04, 0x05]);
        assert_eq!(writer.as_bytes(), &[1, 2, 3, 4, 5]);
        assert_eq!(writer.len(), 5);
    }
}
