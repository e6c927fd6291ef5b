use bitflags::bitflags;

use crate::err::DeserializationResult;
use crate::section_header::V6Header;
use crate::utils::ByteCursor;

pub const USER_HEADER_SIZE: usize = 24;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UserHeaderAction: u16 {
        const SERVICE = 0x8000;
        const HIDDEN = 0x4000;
        const REPORT_EXTERNALLY = 0x2000;
        const HMC_ONLY = 0x1000;
        const CALL_HOME = 0x0800;
        const ISO_INCOMPLETE = 0x0400;
    }
}

/// The second mandatory section of a version 6 event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserHeader {
    pub header: V6Header,
    pub subsystem_id: u8,
    pub event_data: u8,
    pub event_severity: u8,
    pub event_type: u8,
    pub action: UserHeaderAction,
}

impl UserHeader {
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: V6Header,
    ) -> DeserializationResult<Self> {
        let subsystem_id = cursor.u8_named("user_header.subsystem_id")?;
        let event_data = cursor.u8_named("user_header.event_data")?;
        let event_severity = cursor.u8_named("user_header.event_severity")?;
        let event_type = cursor.u8_named("user_header.event_type")?;
        cursor.advance(6, "user_header.reserved")?;
        let action = UserHeaderAction::from_bits_retain(cursor.u16_named("user_header.action")?);
        cursor.advance(4, "user_header.reserved")?;

        Ok(UserHeader {
            header,
            subsystem_id,
            event_data,
            event_severity,
            event_type,
            action,
        })
    }

    pub fn subsystem_name(&self) -> Option<&'static str> {
        let name = match self.subsystem_id {
            0x10..=0x1f => "Processor, including internal cache",
            0x20..=0x2f => "Memory, including external cache",
            0x30..=0x3f => "I/O (hub, bridge, bus)",
            0x40..=0x4f => "I/O adapter, device and peripheral",
            0x50..=0x5f => "CEC Hardware",
            0x60..=0x6f => "Power/Cooling System",
            0x70..=0x79 => "Other Subsystems",
            0x7a..=0x7f => "Surveillance Error",
            0x80..=0x8f => "Platform Firmware",
            0x90..=0x9f => "Software",
            0xa0..=0xaf => "External Environment",
            _ => return None,
        };
        Some(name)
    }

    pub fn event_type_description(&self) -> Option<&'static str> {
        let desc = match self.event_type {
            0x01 => "Miscellaneous, informational only.",
            0x08 => "Dump notification.",
            0x10 => "Previously reported error has been corrected by system.",
            0x20 => "System resources manually deconfigured by user.",
            0x21 => "System resources deconfigured by system due to prior error event.",
            0x22 => "Resource deallocation event notification.",
            0x30 => "Customer environmental problem has returned to normal.",
            0x40 => "Concurrent maintenance event.",
            0x60 => "Capacity upgrade event.",
            0x70 => "Resource sparing event.",
            0x80 => "Dynamic reconfiguration event.",
            0xd0 => "Normal system/platform shutdown or powered off.",
            0xe0 => "Platform powered off by user without normal shutdown.",
            _ => return None,
        };
        Some(desc)
    }

    pub fn severity_description(&self) -> Option<&'static str> {
        let desc = match self.event_severity {
            0x00 => "Informational or non-error event.",
            0x10 => "Recovered error, general.",
            0x20 => "Predictive error, general.",
            0x21 => "Predictive error, degraded performance.",
            0x22 => "Predictive error, fault may be corrected after platform re-IPL.",
            0x23 => "Predictive error, fault may be corrected after IPL, degraded performance.",
            0x24 => "Predictive error, loss of redundancy.",
            0x40 => "Unrecoverable error, general.",
            0x41 => "Unrecoverable error, bypassed with degraded performance.",
            0x44 => "Unrecoverable error, bypassed with loss of redundancy.",
            0x45 => "Unrecoverable error, bypassed with loss of redundancy and performance.",
            0x48 => "Unrecoverable error, bypassed with loss of function.",
            0x60 => "Error on diagnostic test, general.",
            0x61 => "Error on diagnostic test, resource may produce incorrect results.",
            _ => return None,
        };
        Some(desc)
    }

    /// A one line description of the action flags, `None` when no action is requested.
    pub fn action_description(&self) -> Option<String> {
        let action = self.action;
        if action.is_empty() {
            return None;
        }

        if action.contains(UserHeaderAction::SERVICE) {
            let mut out = String::from("Service Action ");
            if action.contains(UserHeaderAction::HIDDEN) {
                out.push_str("(hidden error) ");
            }
            if action.contains(UserHeaderAction::CALL_HOME) {
                out.push_str("(call home) ");
            }
            out.push_str("Required.");
            return Some(out);
        }

        if action.contains(UserHeaderAction::REPORT_EXTERNALLY) {
            return Some(if action.contains(UserHeaderAction::HMC_ONLY) {
                "Report Externally, (HMC only).".to_string()
            } else {
                "Report Externally, (HMC and Hypervisor).".to_string()
            });
        }

        if action.contains(UserHeaderAction::ISO_INCOMPLETE) {
            return Some("Error isolation incomplete, further analysis required.".to_string());
        }

        Some(format!("Unknown action flag (0x{:04x}).", action.bits()))
    }
}
