//! Bounds-checked little-endian cursor over a byte buffer.
//!
//! Every read either returns the requested bytes or an [`OutOfBounds`]
//! describing the failed range; the cursor never indexes past the slice.

/// A read that would cross the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub offset: usize,
    pub needed: usize,
    pub len: usize,
}

#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Cursor positioned at `offset`. Positions past the end are allowed;
    /// the next read fails.
    pub fn at(buf: &'a [u8], offset: usize) -> Self {
        Self { buf, pos: offset }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn seek(&mut self, offset: usize) {
        self.pos = offset;
    }

    /// Advance by `n` bytes. Fails without moving if that passes the end.
    pub fn skip(&mut self, n: usize) -> Result<(), OutOfBounds> {
        match self.pos.checked_add(n) {
            Some(end) if end <= self.buf.len() => {
                self.pos = end;
                Ok(())
            }
            _ => Err(self.out_of_bounds(n)),
        }
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], OutOfBounds> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| self.out_of_bounds(n))?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], OutOfBounds> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.read_bytes(N)?);
        Ok(arr)
    }

    /// Four-character chunk tag.
    pub fn read_tag(&mut self) -> Result<[u8; 4], OutOfBounds> {
        self.read_array()
    }

    pub fn read_u8(&mut self) -> Result<u8, OutOfBounds> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, OutOfBounds> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, OutOfBounds> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i16_le(&mut self) -> Result<i16, OutOfBounds> {
        self.read_array().map(i16::from_le_bytes)
    }

    /// Three little-endian bytes as a sign-extended two's-complement value.
    pub fn read_i24_le(&mut self) -> Result<i32, OutOfBounds> {
        let [b0, b1, b2] = self.read_array::<3>()?;
        // Place the 24 bits at the top of an i32 and shift back to extend bit 23.
        Ok(i32::from_le_bytes([0, b0, b1, b2]) >> 8)
    }

    pub fn read_i32_le(&mut self) -> Result<i32, OutOfBounds> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// IEEE-754 single reinterpreted from its little-endian bit pattern.
    pub fn read_f32_le(&mut self) -> Result<f32, OutOfBounds> {
        self.read_array().map(f32::from_le_bytes)
    }

    fn out_of_bounds(&self, needed: usize) -> OutOfBounds {
        OutOfBounds {
            offset: self.pos,
            needed,
            len: self.buf.len(),
        }
    }
}
