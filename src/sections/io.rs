use bitflags::bitflags;

use crate::err::{DeserializationError, DeserializationResult};
use crate::section_header::V6Header;
use crate::utils::ByteCursor;

pub const IO_V6_FIXED_SIZE: usize = 16;
pub const IO_RPC_DATA_MAX: usize = 216;

pub const IO_EVENT_DETECTED: u8 = 0x01;
pub const IO_EVENT_RECOVERED: u8 = 0x02;
pub const IO_EVENT_EVENT: u8 = 0x03;
pub const IO_EVENT_RPC_PASS_THROUGH: u8 = 0x04;

bitflags! {
    /// Byte 0 of the legacy I/O body.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IoBusErrors: u8 {
        const BUS_ADDR_PARITY = 0x80;
        const BUS_DATA_PARITY = 0x40;
        const BUS_TIMEOUT = 0x20;
        const BRIDGE_INTERNAL = 0x10;
        const NON_PCI = 0x08;
        const MEZZANINE_ADDR_PARITY = 0x04;
        const MEZZANINE_DATA_PARITY = 0x02;
        const MEZZANINE_TIMEOUT = 0x01;
    }
}

bitflags! {
    /// Byte 1 of the legacy I/O body.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IoBridgeErrors: u8 {
        const BRIDGE_VIA_SYSBUS = 0x80;
        const BRIDGE_VIA_MEZZANINE = 0x40;
        const BRIDGE_VIA_EXPBUS = 0x20;
        const DETECTED_BY_EXPBUS = 0x10;
        const EXPBUS_DATA_PARITY = 0x08;
        const EXPBUS_TIMEOUT = 0x04;
        const EXPBUS_CONNECTION_FAILURE = 0x02;
        const EXPBUS_NOT_OPERATING = 0x01;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoSection {
    Legacy(LegacyIo),
    V6(V6Io),
}

/// A PCI adapter as identified in the legacy I/O body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PciIoa {
    pub bus_id: u8,
    pub busno: u8,
    pub devfn: u8,
    pub device_id: u16,
    pub vendor_id: u16,
    pub revision_id: u8,
    pub slot: u8,
}

impl PciIoa {
    fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        Ok(PciIoa {
            bus_id: cursor.u8_named("io.ioa.bus_id")?,
            busno: cursor.u8_named("io.ioa.busno")?,
            devfn: cursor.u8_named("io.ioa.devfn")?,
            device_id: cursor.u16_named("io.ioa.device_id")?,
            vendor_id: cursor.u16_named("io.ioa.vendor_id")?,
            revision_id: cursor.u8_named("io.ioa.revision_id")?,
            slot: cursor.u8_named("io.ioa.slot")?,
        })
    }

    pub fn device(&self) -> u8 {
        self.devfn >> 3
    }

    pub fn function(&self) -> u8 {
        self.devfn & 0x7
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyIo {
    pub event_version: u8,
    pub bus_errors: IoBusErrors,
    pub bridge_errors: IoBridgeErrors,
    pub signalling: PciIoa,
    pub sending: PciIoa,
}

impl LegacyIo {
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        event_version: u8,
    ) -> DeserializationResult<Self> {
        let bus_errors = IoBusErrors::from_bits_retain(cursor.u8_named("io.data1")?);
        let bridge_errors = IoBridgeErrors::from_bits_retain(cursor.u8_named("io.data2")?);
        let signalling = PciIoa::from_cursor(cursor)?;
        let sending = PciIoa::from_cursor(cursor)?;
        cursor.advance(8, "io.reserved")?;

        Ok(LegacyIo {
            event_version,
            bus_errors,
            bridge_errors,
            signalling,
            sending,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V6Io {
    pub header: V6Header,
    pub event_type: u8,
    pub rpc_length: u8,
    pub scope: u8,
    pub subtype: u8,
    pub drc_index: u32,
    /// Only populated for RPC pass-through events.
    pub rpc_data: Vec<u8>,
}

impl V6Io {
    /// Decodes the section; the cursor must be bounded to the declared section length.
    ///
    /// Whatever follows the fixed fields (and the RPC data, when present) is skipped, firmware
    /// pads this section to its declared length.
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: V6Header,
    ) -> DeserializationResult<Self> {
        let event_type = cursor.u8_named("io.event_type")?;
        let rpc_length = cursor.u8_named("io.rpc_length")?;
        let scope = cursor.u8_named("io.scope")?;
        let subtype = cursor.u8_named("io.subtype")?;
        let drc_index = cursor.u32_named("io.drc_index")?;

        let rpc_data = if event_type == IO_EVENT_RPC_PASS_THROUGH {
            let len = usize::from(rpc_length);
            if len > IO_RPC_DATA_MAX {
                return Err(DeserializationError::LengthMismatch {
                    what: "io.rpc_data",
                    offset: cursor.position(),
                    declared: len,
                    actual: IO_RPC_DATA_MAX,
                });
            }
            if len > cursor.remaining() {
                return Err(DeserializationError::LengthMismatch {
                    what: "io.rpc_data",
                    offset: cursor.position(),
                    declared: len,
                    actual: cursor.remaining(),
                });
            }
            cursor.take_vec(len, "io.rpc_data")?
        } else {
            Vec::new()
        };

        let rest = cursor.remaining();
        cursor.advance(rest, "io.padding")?;

        Ok(V6Io {
            header,
            event_type,
            rpc_length,
            scope,
            subtype,
            drc_index,
            rpc_data,
        })
    }

    pub fn has_rpc_data(&self) -> bool {
        self.event_type == IO_EVENT_RPC_PASS_THROUGH
    }

    pub fn event_type_name(&self) -> &'static str {
        match self.event_type {
            IO_EVENT_DETECTED => "Error Detected",
            IO_EVENT_RECOVERED => "Error Recovered",
            IO_EVENT_EVENT => "Event",
            IO_EVENT_RPC_PASS_THROUGH => "RPC Pass Through",
            _ => "Unknown event type",
        }
    }

    pub fn scope_name(&self) -> &'static str {
        match self.scope {
            0x00 => "N/A",
            0x36 => "RIO-hub",
            0x37 => "RIO-bridge",
            0x38 => "PHB",
            0x39 => "EADS Global",
            0x3a => "EADS Slot",
            _ => "Unknown error/event scope",
        }
    }

    pub fn subtype_name(&self) -> &'static str {
        match self.subtype {
            0x00 => "N/A",
            0x01 => "Rebalance Request",
            0x03 => "Node online",
            0x04 => "Node off-line",
            0x05 => "Platform Dump maximum size change",
            _ => "Unknown subtype",
        }
    }
}
