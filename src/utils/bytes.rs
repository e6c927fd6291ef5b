//! Byte-slice utilities for bounds-oriented parsing.
//!
//! Two layers, same as everywhere else in the crate:
//! - **Option layer** (`read_*`): return `Option<T>`, `None` when the range is out of bounds.
//! - **Result layer** (`*_r`): wrappers that map `None` to `DeserializationError::Truncated`.
//!
//! All numeric reads are **big-endian**, RTAS events are always written in network byte order
//! regardless of the host.

use byteorder::{BigEndian, ByteOrder};

use crate::err::DeserializationError;

/// Read `N` raw bytes at `offset`.
pub(crate) fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    let bytes: [u8; N] = buf.get(offset..end)?.try_into().ok()?;
    Some(bytes)
}

pub(crate) fn read_u8(buf: &[u8], offset: usize) -> Option<u8> {
    buf.get(offset).copied()
}

/// Read a `u16` (big-endian) at `offset`.
pub(crate) fn read_u16_be(buf: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    buf.get(offset..end).map(BigEndian::read_u16)
}

/// Read a `u32` (big-endian) at `offset`.
pub(crate) fn read_u32_be(buf: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    buf.get(offset..end).map(BigEndian::read_u32)
}

#[inline]
pub(crate) fn truncated(
    what: &'static str,
    offset: usize,
    need: usize,
    len: usize,
) -> DeserializationError {
    DeserializationError::Truncated {
        what,
        offset: offset as u64,
        need,
        have: len.saturating_sub(offset),
    }
}

pub(crate) fn slice_r<'a>(
    buf: &'a [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8], DeserializationError> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| truncated(what, offset, len, buf.len()))?;
    buf.get(offset..end)
        .ok_or_else(|| truncated(what, offset, len, buf.len()))
}

/// Read `N` raw bytes at `offset`, or return `DeserializationError::Truncated`.
pub(crate) fn read_array_r<const N: usize>(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<[u8; N], DeserializationError> {
    read_array::<N>(buf, offset).ok_or_else(|| truncated(what, offset, N, buf.len()))
}

pub(crate) fn read_u8_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u8, DeserializationError> {
    read_u8(buf, offset).ok_or_else(|| truncated(what, offset, 1, buf.len()))
}

/// Read a `u16` (big-endian) at `offset`, or return `DeserializationError::Truncated`.
pub(crate) fn read_u16_be_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u16, DeserializationError> {
    read_u16_be(buf, offset).ok_or_else(|| truncated(what, offset, 2, buf.len()))
}

/// Read a `u32` (big-endian) at `offset`, or return `DeserializationError::Truncated`.
pub(crate) fn read_u32_be_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u32, DeserializationError> {
    read_u32_be(buf, offset).ok_or_else(|| truncated(what, offset, 4, buf.len()))
}

/// Copy `len` bytes at `offset` into a fresh `Vec`, reporting allocation failure instead of aborting.
pub(crate) fn to_vec_r(
    buf: &[u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<Vec<u8>, DeserializationError> {
    let src = slice_r(buf, offset, len, what)?;
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| DeserializationError::OutOfMemory { what, size: len })?;
    out.extend_from_slice(src);
    Ok(out)
}
