use bitflags::bitflags;

use crate::err::DeserializationResult;
use crate::section_header::V6Header;
use crate::utils::{ByteCursor, nul_terminated};

pub const DUMP_SECTION_SIZE: usize = 64;
pub const DUMP_OS_ID_MAX: usize = 40;

/// Offset of the id length byte from the start of the section.
pub(crate) const DUMP_ID_LEN_OFFSET: usize = 15;
/// Offset of the OS assigned id from the start of the section.
pub(crate) const DUMP_OS_ID_OFFSET: usize = 24;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DumpFlags: u8 {
        /// Set when the dump lives on the HMC, clear when it lives in the partition.
        const LOCATION = 0x80;
        /// The OS id is a hex file name rather than ASCII.
        const HEX_FILENAME = 0x40;
        const SIZE_VALID = 0x20;
    }
}

/// Dump locator section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSection {
    pub header: V6Header,
    pub id: u32,
    pub flags: DumpFlags,
    pub id_len: u8,
    pub size_hi: u32,
    pub size_lo: u32,
    pub os_id: [u8; DUMP_OS_ID_MAX],
}

impl DumpSection {
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: V6Header,
    ) -> DeserializationResult<Self> {
        let id = cursor.u32_named("dump.id")?;
        let flags = DumpFlags::from_bits_retain(cursor.u8_named("dump.flags")?);
        cursor.advance(2, "dump.reserved")?;
        let id_len = cursor.u8_named("dump.id_len")?;
        let size_hi = cursor.u32_named("dump.size_hi")?;
        let size_lo = cursor.u32_named("dump.size_lo")?;
        let os_id = cursor.array::<DUMP_OS_ID_MAX>("dump.os_id")?;

        Ok(DumpSection {
            header,
            id,
            flags,
            id_len,
            size_hi,
            size_lo,
            os_id,
        })
    }

    pub fn on_hmc(&self) -> bool {
        self.flags.contains(DumpFlags::LOCATION)
    }

    pub fn size(&self) -> u64 {
        (u64::from(self.size_hi) << 32) | u64::from(self.size_lo)
    }

    /// The OS assigned id as text, trimmed at the first NUL.
    pub fn os_id_str(&self) -> String {
        nul_terminated(&self.os_id)
    }

    /// The bytes covered by `id_len`.
    pub fn os_id_bytes(&self) -> &[u8] {
        &self.os_id[..usize::from(self.id_len).min(DUMP_OS_ID_MAX)]
    }

    /// Replaces the typed copy of the OS id, mirroring what was written into the raw buffer.
    pub(crate) fn apply_os_id(&mut self, id: &[u8], padded_len: u8) {
        self.os_id = [0; DUMP_OS_ID_MAX];
        self.os_id[..id.len()].copy_from_slice(id);
        self.id_len = padded_len;
    }
}

/// Length written to the `id_len` field, rounded up to a multiple of 4.
pub(crate) fn padded_id_len(len: usize) -> usize {
    len.div_ceil(4) * 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_dump_locator() {
        let mut raw = [0u8; DUMP_SECTION_SIZE - 8];
        raw[0..4].copy_from_slice(&0x1234u32.to_be_bytes());
        raw[4] = 0xa0;
        raw[7] = 8;
        raw[8..12].copy_from_slice(&1u32.to_be_bytes());
        raw[12..16].copy_from_slice(&2u32.to_be_bytes());
        raw[16..24].copy_from_slice(b"dump.001");

        let header = V6Header {
            id: *b"DH",
            length: DUMP_SECTION_SIZE as u16,
            version: 1,
            subtype: 0,
            creator_comp_id: 0,
        };
        let mut cursor = ByteCursor::new(&raw);
        let dump = DumpSection::from_cursor(&mut cursor, header).unwrap();
        assert_eq!(dump.id, 0x1234);
        assert!(dump.on_hmc());
        assert!(dump.flags.contains(DumpFlags::SIZE_VALID));
        assert_eq!(dump.size(), 0x1_0000_0002);
        assert_eq!(dump.os_id_str(), "dump.001");
        assert_eq!(dump.os_id_bytes(), b"dump.001");
        assert!(cursor.is_empty());
    }

    #[test]
    fn pads_to_multiple_of_four() {
        assert_eq!(padded_id_len(0), 0);
        assert_eq!(padded_id_len(3), 4);
        assert_eq!(padded_id_len(4), 4);
        assert_eq!(padded_id_len(37), 40);
    }
}
