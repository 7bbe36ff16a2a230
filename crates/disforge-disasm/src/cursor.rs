//! Bounds-checked forward cursor over an instruction stream.
//!
//! Every multi-byte read decodes explicitly as little-endian. A read that
//! would pass the end of the buffer fails with [`OutOfBytes`] and leaves the
//! position unchanged.

/// A read needed more bytes than remain in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBytes {
    /// Bytes the read required.
    pub needed: usize,
    /// Bytes that were left.
    pub available: usize,
}

/// Read-only view over the input with a monotonically advancing position.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    origin: u64,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor whose first byte is at offset 0.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_origin(bytes, 0)
    }

    /// Creates a cursor whose first byte is at offset `origin`.
    pub fn with_origin(bytes: &'a [u8], origin: u64) -> Self {
        Self {
            bytes,
            pos: 0,
            origin,
        }
    }

    /// Position relative to the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Offset of the next byte in the rebased address space. Wraps at
    /// `u64::MAX`.
    pub fn offset(&self) -> u64 {
        self.origin.wrapping_add(self.pos as u64)
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next `n` bytes without advancing, if that many remain.
    pub fn peek(&self, n: usize) -> Option<&'a [u8]> {
        self.bytes.get(self.pos..self.pos.checked_add(n)?)
    }

    /// Bytes consumed since `start` (a value previously returned by
    /// [`position`](Self::position)).
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.bytes[start.min(self.pos)..self.pos]
    }

    /// Consumes exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], OutOfBytes> {
        let slice = self.peek(n).ok_or(OutOfBytes {
            needed: n,
            available: self.remaining(),
        })?;
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], OutOfBytes> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, OutOfBytes> {
        let [byte] = self.take_array::<1>()?;
        Ok(byte)
    }

    /// Reads one byte as a two's-complement signed value.
    pub fn read_i8(&mut self) -> Result<i8, OutOfBytes> {
        self.read_u8().map(|b| b as i8)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, OutOfBytes> {
        self.take_array::<4>().map(u32::from_le_bytes)
    }

    pub fn read_i32_le(&mut self) -> Result<i32, OutOfBytes> {
        self.take_array::<4>().map(i32::from_le_bytes)
    }
}
