use crate::err::{DeserializationError, DeserializationResult};
use crate::utils::bytes;

/// A lightweight cursor over an immutable byte slice.
///
/// Positions are always absolute offsets into the event buffer, so a cursor narrowed with
/// [`ByteCursor::bounded`] still reports offsets the caller can patch or dump later.
///
/// All reads are big-endian and advance the cursor on success.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    #[inline]
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub(crate) fn with_pos(buf: &'a [u8], pos: usize) -> DeserializationResult<Self> {
        // Allow pos == len (EOF), reject pos > len.
        let _ = bytes::slice_r(buf, pos, 0, "cursor.position")?;
        Ok(Self { buf, pos })
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn position(&self) -> u64 {
        self.pos as u64
    }

    /// Number of bytes between the cursor and the end of its window.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    pub(crate) fn set_pos(&mut self, pos: usize, what: &'static str) -> DeserializationResult<()> {
        let _ = bytes::slice_r(self.buf, pos, 0, what)?;
        self.pos = pos;
        Ok(())
    }

    #[inline]
    pub(crate) fn advance(&mut self, n: usize, what: &'static str) -> DeserializationResult<()> {
        let new_pos = self
            .pos
            .checked_add(n)
            .ok_or_else(|| bytes::truncated(what, self.pos, n, self.buf.len()))?;
        self.set_pos(new_pos, what).map_err(|_| {
            bytes::truncated(what, self.pos, n, self.buf.len())
        })
    }

    /// A cursor over the next `len` bytes only, starting at the current position.
    ///
    /// Reads through the returned cursor can never cross into the following section.
    pub(crate) fn bounded(&self, len: usize, what: &'static str) -> DeserializationResult<Self> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or_else(|| bytes::truncated(what, self.pos, len, self.buf.len()))?;
        let window = self
            .buf
            .get(..end)
            .ok_or_else(|| bytes::truncated(what, self.pos, len, self.buf.len()))?;
        Ok(Self {
            buf: window,
            pos: self.pos,
        })
    }

    #[inline]
    pub(crate) fn take_bytes(
        &mut self,
        len: usize,
        what: &'static str,
    ) -> DeserializationResult<&'a [u8]> {
        let out = bytes::slice_r(self.buf, self.pos, len, what)?;
        self.pos += len;
        Ok(out)
    }

    /// Copy the next `len` bytes into an owned buffer.
    pub(crate) fn take_vec(
        &mut self,
        len: usize,
        what: &'static str,
    ) -> DeserializationResult<Vec<u8>> {
        let out = bytes::to_vec_r(self.buf, self.pos, len, what)?;
        self.pos += len;
        Ok(out)
    }

    #[inline]
    pub(crate) fn array<const N: usize>(
        &mut self,
        what: &'static str,
    ) -> DeserializationResult<[u8; N]> {
        let v = bytes::read_array_r::<N>(self.buf, self.pos, what)?;
        self.pos += N;
        Ok(v)
    }

    /// Look at the next `N` bytes without consuming them.
    #[inline]
    pub(crate) fn peek_array<const N: usize>(
        &self,
        what: &'static str,
    ) -> DeserializationResult<[u8; N]> {
        bytes::read_array_r::<N>(self.buf, self.pos, what)
    }

    #[inline]
    pub(crate) fn u8_named(&mut self, what: &'static str) -> DeserializationResult<u8> {
        let b = bytes::read_u8_r(self.buf, self.pos, what)?;
        self.pos += 1;
        Ok(b)
    }

    #[inline]
    pub(crate) fn u16_named(&mut self, what: &'static str) -> DeserializationResult<u16> {
        let v = bytes::read_u16_be_r(self.buf, self.pos, what)?;
        self.pos += 2;
        Ok(v)
    }

    #[inline]
    pub(crate) fn u32_named(&mut self, what: &'static str) -> DeserializationResult<u32> {
        let v = bytes::read_u32_be_r(self.buf, self.pos, what)?;
        self.pos += 4;
        Ok(v)
    }

    /// Read a fixed-width, NUL-padded ASCII field.
    ///
    /// The text stops at the first NUL; non-UTF-8 bytes are replaced rather than rejected since
    /// firmware occasionally leaves garbage in unused fields.
    pub(crate) fn fixed_str(
        &mut self,
        len: usize,
        what: &'static str,
    ) -> DeserializationResult<String> {
        let raw = self.take_bytes(len, what)?;
        Ok(nul_terminated(raw))
    }

    #[inline]
    pub(crate) fn char_named(&mut self, what: &'static str) -> DeserializationResult<char> {
        Ok(char::from(self.u8_named(what)?))
    }

    /// Fail with `LengthMismatch` unless the cursor has consumed its whole window.
    pub(crate) fn expect_exhausted(
        &self,
        what: &'static str,
        start: usize,
    ) -> DeserializationResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        Err(DeserializationError::LengthMismatch {
            what,
            offset: start as u64,
            declared: self.buf.len().saturating_sub(start),
            actual: self.pos.saturating_sub(start),
        })
    }
}

pub(crate) fn nul_terminated(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
