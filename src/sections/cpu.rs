use bitflags::bitflags;

use crate::err::DeserializationResult;
use crate::utils::{ByteCursor, bit_set};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CpuErrors: u8 {
        const INTERNAL = 0x80;
        const INTCACHE = 0x40;
        const EXTCACHE_PARITY = 0x20;
        const EXTCACHE_ECC = 0x10;
        const SYSBUS_TIMEOUT = 0x08;
        const IO_TIMEOUT = 0x04;
        const SYSBUS_PARITY = 0x02;
        const SYSBUS_PROTOCOL = 0x01;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuSection {
    pub event_version: u8,
    pub errors: CpuErrors,
    pub id: u8,
    pub element: u16,
    pub failing_address_hi: u32,
    pub failing_address_lo: u32,
    /// Only reported by version 4 and later events.
    pub try_reboot: bool,
}

impl CpuSection {
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        event_version: u8,
    ) -> DeserializationResult<Self> {
        let errors = CpuErrors::from_bits_retain(cursor.u8_named("cpu.errors")?);
        let id = cursor.u8_named("cpu.id")?;
        let element = cursor.u16_named("cpu.element")?;
        let failing_address_hi = cursor.u32_named("cpu.failing_address_hi")?;
        let failing_address_lo = cursor.u32_named("cpu.failing_address_lo")?;
        let try_reboot = bit_set(cursor.u8_named("cpu.data2")?, 7);
        cursor.advance(15, "cpu.reserved")?;

        Ok(CpuSection {
            event_version,
            errors,
            id,
            element,
            failing_address_hi,
            failing_address_lo,
            try_reboot,
        })
    }

    pub fn failing_address(&self) -> u64 {
        (u64::from(self.failing_address_hi) << 32) | u64::from(self.failing_address_lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_cpu_body() {
        let mut raw = [0u8; 28];
        raw[0] = 0x41;
        raw[1] = 2;
        raw[2..4].copy_from_slice(&0x0102u16.to_be_bytes());
        raw[4..8].copy_from_slice(&0xdeadu32.to_be_bytes());
        raw[8..12].copy_from_slice(&0xbeefu32.to_be_bytes());
        raw[12] = 0x80;

        let mut cursor = ByteCursor::new(&raw);
        let cpu = CpuSection::from_cursor(&mut cursor, 4).unwrap();
        assert_eq!(cpu.errors, CpuErrors::INTCACHE | CpuErrors::SYSBUS_PROTOCOL);
        assert_eq!(cpu.id, 2);
        assert_eq!(cpu.element, 0x0102);
        assert_eq!(cpu.failing_address(), 0x0000_dead_0000_beef);
        assert!(cpu.try_reboot);
        assert_eq!(cursor.pos(), 28);
    }
}
