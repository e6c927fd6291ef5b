use bitflags::bitflags;

use crate::err::DeserializationResult;
use crate::utils::ByteCursor;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemoryErrors: u8 {
        const UNCORRECTABLE = 0x80;
        const ECC = 0x40;
        const THRESHOLD_EXCEEDED = 0x20;
        const CONTROL_INTERNAL = 0x10;
        const BAD_ADDRESS = 0x08;
        const BAD_DATA = 0x04;
        const BUS = 0x02;
        const TIMEOUT = 0x01;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemoryBusErrors: u8 {
        const SYSBUS_PARITY = 0x80;
        const SYSBUS_TIMEOUT = 0x40;
        const SYSBUS_PROTOCOL = 0x20;
        const HOSTBRIDGE_TIMEOUT = 0x10;
        const HOSTBRIDGE_PARITY = 0x08;
        /// Reported by version 3 and later.
        const SUPPORT = 0x02;
        /// Reported by version 3 and later.
        const SYSBUS_INTERNAL = 0x01;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySection {
    pub event_version: u8,
    pub errors: MemoryErrors,
    pub bus_errors: MemoryBusErrors,
    pub controller_detected: u8,
    pub controller_faulted: u8,
    pub failing_address_hi: u32,
    pub failing_address_lo: u32,
    pub ecc_syndrome: u16,
    pub memory_card: u8,
    pub sub_elements: u32,
    pub element: u16,
}

impl MemorySection {
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        event_version: u8,
    ) -> DeserializationResult<Self> {
        let errors = MemoryErrors::from_bits_retain(cursor.u8_named("memory.errors")?);
        let bus_errors = MemoryBusErrors::from_bits_retain(cursor.u8_named("memory.bus")?);
        let controller_detected = cursor.u8_named("memory.controller_detected")?;
        let controller_faulted = cursor.u8_named("memory.controller_faulted")?;
        let failing_address_hi = cursor.u32_named("memory.failing_address_hi")?;
        let failing_address_lo = cursor.u32_named("memory.failing_address_lo")?;
        let ecc_syndrome = cursor.u16_named("memory.ecc_syndrome")?;
        let memory_card = cursor.u8_named("memory.memory_card")?;
        cursor.advance(1, "memory.reserved")?;
        let sub_elements = cursor.u32_named("memory.sub_elements")?;
        let element = cursor.u16_named("memory.element")?;
        cursor.advance(6, "memory.reserved")?;

        Ok(MemorySection {
            event_version,
            errors,
            bus_errors,
            controller_detected,
            controller_faulted,
            failing_address_hi,
            failing_address_lo,
            ecc_syndrome,
            memory_card,
            sub_elements,
            element,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_memory_body() {
        let mut raw = [0u8; 28];
        raw[0] = 0xc0;
        raw[1] = 0x03;
        raw[2] = 1;
        raw[3] = 2;
        raw[12..14].copy_from_slice(&0x00ffu16.to_be_bytes());
        raw[14] = 9;
        raw[16..20].copy_from_slice(&0x0000_0f00u32.to_be_bytes());
        raw[20..22].copy_from_slice(&0x0042u16.to_be_bytes());

        let mut cursor = ByteCursor::new(&raw);
        let mem = MemorySection::from_cursor(&mut cursor, 3).unwrap();
        assert_eq!(mem.errors, MemoryErrors::UNCORRECTABLE | MemoryErrors::ECC);
        assert_eq!(
            mem.bus_errors,
            MemoryBusErrors::SUPPORT | MemoryBusErrors::SYSBUS_INTERNAL
        );
        assert_eq!(mem.controller_faulted, 2);
        assert_eq!(mem.ecc_syndrome, 0xff);
        assert_eq!(mem.memory_card, 9);
        assert_eq!(mem.sub_elements, 0xf00);
        assert_eq!(mem.element, 0x42);
        assert_eq!(cursor.pos(), 28);
    }
}
