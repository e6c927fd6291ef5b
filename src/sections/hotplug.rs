use crate::err::{DeserializationError, DeserializationResult};
use crate::section_header::V6Header;
use crate::utils::ByteCursor;

pub const HOTPLUG_SECTION_SIZE: usize = 16;

pub const HOTPLUG_ID_DRC_NAME: u8 = 1;
pub const HOTPLUG_ID_DRC_INDEX: u8 = 2;
pub const HOTPLUG_ID_DRC_COUNT: u8 = 3;

/// The resource a hotplug event refers to, discriminated by the identifier byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotplugTarget {
    DrcName(String),
    DrcIndex(u32),
    Count(u32),
    /// An identifier this decoder does not understand; the raw word is kept.
    Unknown { identifier: u8, raw: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotplugSection {
    pub header: V6Header,
    pub hotplug_type: u8,
    pub action: u8,
    pub identifier: u8,
    pub target: HotplugTarget,
}

impl HotplugSection {
    /// The cursor must be bounded to the declared section length, a DRC name fills all of it.
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: V6Header,
    ) -> DeserializationResult<Self> {
        let hotplug_type = cursor.u8_named("hotplug.type")?;
        let action = cursor.u8_named("hotplug.action")?;
        let identifier = cursor.u8_named("hotplug.identifier")?;
        cursor.advance(1, "hotplug.reserved")?;

        let target = match identifier {
            HOTPLUG_ID_DRC_NAME => {
                let len = cursor.remaining();
                if len == 0 {
                    return Err(DeserializationError::LengthMismatch {
                        what: "hotplug.drc_name",
                        offset: cursor.position(),
                        declared: usize::from(header.length),
                        actual: HOTPLUG_SECTION_SIZE,
                    });
                }
                HotplugTarget::DrcName(cursor.fixed_str(len, "hotplug.drc_name")?)
            }
            HOTPLUG_ID_DRC_INDEX => HotplugTarget::DrcIndex(cursor.u32_named("hotplug.drc_index")?),
            HOTPLUG_ID_DRC_COUNT => HotplugTarget::Count(cursor.u32_named("hotplug.count")?),
            other => HotplugTarget::Unknown {
                identifier: other,
                raw: cursor.u32_named("hotplug.u1")?,
            },
        };

        Ok(HotplugSection {
            header,
            hotplug_type,
            action,
            identifier,
            target,
        })
    }

    pub fn drc_name(&self) -> Option<&str> {
        match &self.target {
            HotplugTarget::DrcName(name) => Some(name),
            _ => None,
        }
    }

    pub fn drc_index(&self) -> Option<u32> {
        match self.target {
            HotplugTarget::DrcIndex(index) => Some(index),
            _ => None,
        }
    }

    pub fn count(&self) -> Option<u32> {
        match self.target {
            HotplugTarget::Count(count) => Some(count),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.hotplug_type {
            1 => "CPU",
            2 => "Memory",
            3 => "Slot",
            4 => "PHB",
            5 => "PCI",
            _ => "Unknown",
        }
    }

    pub fn action_name(&self) -> &'static str {
        match self.action {
            1 => "Add",
            2 => "Remove",
            _ => "Unknown",
        }
    }
}
