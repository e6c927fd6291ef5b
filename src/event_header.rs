use bitflags::bitflags;

use crate::err::DeserializationResult;
use crate::utils::{BitField, ByteCursor, RtasDate, RtasTime, to_civil_datetime};

pub const EVENT_HEADER_SIZE: usize = 8;
pub const EXTENDED_HEADER_SIZE: usize = 12;

const SEVERITY: BitField = BitField::new(5, 3);
const DISPOSITION: BitField = BitField::new(3, 2);
const EXTENDED: BitField = BitField::bit(2);
const INITIATOR: BitField = BitField::new(4, 4);
const TARGET: BitField = BitField::new(0, 4);

const PLATFORM_SPECIFIC: BitField = BitField::bit(7);
const PLATFORM_VALUE: BitField = BitField::new(0, 4);
const POWER_PC: BitField = BitField::bit(7);
const ADDR_INVALID: BitField = BitField::bit(4);
const FORMAT_TYPE: BitField = BitField::new(0, 4);

static SEVERITY_NAMES: [&str; 8] = [
    "No Error",
    "Event",
    "Warning",
    "Error Sync",
    "Error",
    "Fatal",
    "Already Reported",
    "(7)",
];

static DISPOSITION_NAMES: [&str; 4] = [
    "Fully Recovered",
    "Limited Recovery",
    "Not Recovered",
    "(4)",
];

static ENTITY_NAMES: [&str; 7] = [
    "Unknown",
    "CPU",
    "PCI",
    "ISA",
    "Memory",
    "Power Management",
    "Hot Plug",
];

static ERROR_TYPE_NAMES: [&str; 11] = [
    "Unknown",
    "Retry",
    "TCE Error",
    "Internal Device Failure",
    "Timeout",
    "Data Parity",
    "Address Parity",
    "Cache Parity",
    "Address Invalid",
    "ECC Uncorrected",
    "ECC Corrected",
];

/// The fixed 8 byte lead-in present on every RTAS event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventHeader {
    pub version: u8,
    pub severity: u8,
    pub disposition: u8,
    pub extended: bool,
    pub initiator: u8,
    pub target: u8,
    pub event_type: u8,
    pub ext_log_length: u32,
}

impl EventHeader {
    pub(crate) fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        let version = cursor.u8_named("event_header.version")?;
        let data1 = cursor.u8_named("event_header.data1")?;
        let data2 = cursor.u8_named("event_header.data2")?;
        let event_type = cursor.u8_named("event_header.type")?;
        let ext_log_length = cursor.u32_named("event_header.ext_log_length")?;

        Ok(EventHeader {
            version,
            severity: SEVERITY.extract_u8(data1),
            disposition: DISPOSITION.extract_u8(data1),
            extended: EXTENDED.is_set(u32::from(data1)),
            initiator: INITIATOR.extract_u8(data2),
            target: TARGET.extract_u8(data2),
            event_type,
            ext_log_length,
        })
    }

    /// Total declared size of the event, including this header.
    pub fn event_length(&self) -> u64 {
        u64::from(self.ext_log_length) + EVENT_HEADER_SIZE as u64
    }

    pub fn severity_name(&self) -> &'static str {
        SEVERITY_NAMES[usize::from(self.severity & 0x07)]
    }

    pub fn disposition_name(&self) -> &'static str {
        DISPOSITION_NAMES[usize::from(self.disposition & 0x03)]
    }

    pub fn initiator_name(&self) -> &'static str {
        entity_name(self.initiator)
    }

    pub fn target_name(&self) -> &'static str {
        entity_name(self.target)
    }

    pub fn event_type_name(&self) -> &'static str {
        if let Some(name) = ERROR_TYPE_NAMES.get(usize::from(self.event_type)) {
            return name;
        }

        match self.event_type {
            64 => "EPOW",
            160 => "Platform Resource Reassignment",
            224 => "Platform Error",
            225 => "I/O Event",
            226 => "Platform Information Event",
            227 => "Resource Deallocation Event",
            228 => "Dump Notification Event",
            229 => "Hotplug Event",
            _ => ERROR_TYPE_NAMES[0],
        }
    }
}

fn entity_name(value: u8) -> &'static str {
    ENTITY_NAMES
        .get(usize::from(value))
        .copied()
        .unwrap_or("Unknown")
}

bitflags! {
    /// Byte 0 of the extended header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExtendedStatus: u8 {
        const VALID = 0x80;
        const UNRECOVERABLE = 0x40;
        const RECOVERABLE = 0x20;
        const UNRECOVERABLE_BYPASSED = 0x10;
        const PREDICTIVE = 0x08;
        const NEW_LOG = 0x04;
        const BIG_ENDIAN = 0x02;
    }
}

bitflags! {
    /// Byte 3 of the extended header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExtendedContext: u8 {
        const NON_HARDWARE = 0x80;
        const HOT_PLUG = 0x40;
        const GROUP_FAILURE = 0x20;
        const RESIDUAL = 0x08;
        const BOOT = 0x04;
        const CONFIG_CHANGE = 0x02;
        const POST = 0x01;
    }
}

/// Body layout selector of pre-version 6 events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    Cpu,
    Memory,
    Io,
    Post,
    Epow,
    IbmDiagnostic,
    IbmServiceProcessor,
    VendorSpecific1,
    VendorSpecific2,
}

impl FormatType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(FormatType::Cpu),
            2 => Some(FormatType::Memory),
            3 => Some(FormatType::Io),
            4 => Some(FormatType::Post),
            5 => Some(FormatType::Epow),
            12 => Some(FormatType::IbmDiagnostic),
            13 => Some(FormatType::IbmServiceProcessor),
            14 => Some(FormatType::VendorSpecific1),
            15 => Some(FormatType::VendorSpecific2),
            _ => None,
        }
    }
}

/// The 12 byte extended header following the fixed header when `extended` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedHeader {
    pub status: ExtendedStatus,
    pub platform_specific: bool,
    pub platform_value: u8,
    pub power_pc: bool,
    pub addr_invalid: bool,
    pub format_type: u8,
    pub context: ExtendedContext,
    pub time: RtasTime,
    pub date: RtasDate,
}

impl ExtendedHeader {
    pub(crate) fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        let data1 = cursor.u8_named("extended_header.data1")?;
        let data2 = cursor.u8_named("extended_header.data2")?;
        let data3 = cursor.u8_named("extended_header.data3")?;
        let data4 = cursor.u8_named("extended_header.data4")?;
        // Time precedes date here, unlike the version 6 private header.
        let time = RtasTime::from_cursor(cursor)?;
        let date = RtasDate::from_cursor(cursor)?;

        Ok(ExtendedHeader {
            status: ExtendedStatus::from_bits_retain(data1),
            platform_specific: PLATFORM_SPECIFIC.is_set(u32::from(data2)),
            platform_value: PLATFORM_VALUE.extract_u8(data2),
            power_pc: POWER_PC.is_set(u32::from(data3)),
            addr_invalid: ADDR_INVALID.is_set(u32::from(data3)),
            format_type: FORMAT_TYPE.extract_u8(data3),
            context: ExtendedContext::from_bits_retain(data4),
            time,
            date,
        })
    }

    pub fn format(&self) -> Option<FormatType> {
        FormatType::from_u8(self.format_type)
    }

    pub fn is_valid(&self) -> bool {
        self.status.contains(ExtendedStatus::VALID)
    }

    pub fn timestamp(&self) -> Option<jiff::civil::DateTime> {
        to_civil_datetime(&self.date, &self.time)
    }
}
