use bitflags::bitflags;

use crate::err::DeserializationResult;
use crate::section_header::V6Header;
use crate::utils::{BitField, ByteCursor};

pub const EPOW_V6_SECTION_SIZE: usize = 20;

const SENSOR_VALUE_V6: BitField = BitField::new(4, 4);
const ACTION_CODE_V6: BitField = BitField::new(0, 4);
const SENSOR_VALUE_LEGACY: BitField = BitField::new(4, 28);
const ACTION_CODE_LEGACY: BitField = BitField::new(0, 4);

pub const EPOW_ACTION_RESET: u8 = 0;
pub const EPOW_ACTION_WARN_COOLING: u8 = 1;
pub const EPOW_ACTION_WARN_POWER: u8 = 2;
pub const EPOW_ACTION_SYSTEM_SHUTDOWN: u8 = 3;
pub const EPOW_ACTION_SYSTEM_HALT: u8 = 4;
pub const EPOW_ACTION_MAIN_ENCLOSURE: u8 = 5;
pub const EPOW_ACTION_POWER_OFF: u8 = 7;

bitflags! {
    /// Byte 4 of the legacy EPOW body.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EpowCauses: u8 {
        const SENSOR = 0x80;
        const POWER_FAULT = 0x40;
        const FAN = 0x20;
        const TEMP = 0x10;
        const REDUNDANCY = 0x08;
        const CUOD = 0x04;
    }
}

bitflags! {
    /// Byte 5 of the legacy EPOW body.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EpowPowerFaults: u8 {
        const GENERAL = 0x80;
        const POWER_LOSS = 0x40;
        const POWER_SUPPLY = 0x20;
        const POWER_SWITCH = 0x10;
        const BATTERY = 0x08;
    }
}

/// Environmental and power warning.
///
/// The layout depends on the event version, not on the section header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpowSection {
    Legacy(LegacyEpow),
    V6(V6Epow),
}

impl EpowSection {
    pub fn action_code(&self) -> u8 {
        match self {
            EpowSection::Legacy(epow) => epow.action_code,
            EpowSection::V6(epow) => epow.action_code,
        }
    }

    pub fn sensor_value(&self) -> u32 {
        match self {
            EpowSection::Legacy(epow) => epow.sensor_value,
            EpowSection::V6(epow) => u32::from(epow.sensor_value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyEpow {
    /// Version of the enclosing event, several flags are only meaningful for later versions.
    pub event_version: u8,
    pub sensor_value: u32,
    pub action_code: u8,
    pub causes: EpowCauses,
    pub power_faults: EpowPowerFaults,
    pub sensor_token: u32,
    pub sensor_index: u32,
    pub sensor_value2: u32,
    pub sensor_status: u32,
}

impl LegacyEpow {
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        event_version: u8,
    ) -> DeserializationResult<Self> {
        let word = cursor.u32_named("epow.sensor_value")?;
        let causes = EpowCauses::from_bits_retain(cursor.u8_named("epow.causes")?);
        let power_faults = EpowPowerFaults::from_bits_retain(cursor.u8_named("epow.power")?);
        cursor.advance(2, "epow.reserved")?;
        let sensor_token = cursor.u32_named("epow.sensor_token")?;
        let sensor_index = cursor.u32_named("epow.sensor_index")?;
        let sensor_value2 = cursor.u32_named("epow.sensor_value2")?;
        let sensor_status = cursor.u32_named("epow.sensor_status")?;
        cursor.advance(4, "epow.reserved")?;

        Ok(LegacyEpow {
            event_version,
            sensor_value: SENSOR_VALUE_LEGACY.extract(word),
            action_code: ACTION_CODE_LEGACY.extract(word) as u8,
            causes,
            power_faults,
            sensor_token,
            sensor_index,
            sensor_value2,
            sensor_status,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V6Epow {
    pub header: V6Header,
    pub sensor_value: u8,
    pub action_code: u8,
    pub event_modifier: u8,
    pub reason_code: [u8; 8],
}

impl V6Epow {
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: V6Header,
    ) -> DeserializationResult<Self> {
        let data1 = cursor.u8_named("epow.data1")?;
        let event_modifier = cursor.u8_named("epow.event_modifier")?;
        let reason_code = cursor.array::<8>("epow.reason_code")?;
        cursor.advance(2, "epow.reserved")?;

        Ok(V6Epow {
            header,
            sensor_value: SENSOR_VALUE_V6.extract_u8(data1),
            action_code: ACTION_CODE_V6.extract_u8(data1),
            event_modifier,
            reason_code,
        })
    }

    pub fn event_modifier_description(&self) -> Option<&'static str> {
        match self.event_modifier {
            0 => None,
            1 => Some("Normal System Shutdown with no additional delay."),
            2 => Some("Loss of utility power, system is running on UPS/battery."),
            3 => Some("Loss of system critical functions, system should be shutdown."),
            4 => Some("Ambient temperature too high, system should be shutdown."),
            _ => Some("Unknown action code."),
        }
    }
}

pub fn action_code_name(code: u8) -> &'static str {
    match code {
        EPOW_ACTION_RESET => "reset",
        EPOW_ACTION_WARN_COOLING => "warn cooling",
        EPOW_ACTION_WARN_POWER => "warn power",
        EPOW_ACTION_SYSTEM_SHUTDOWN => "system shutdown",
        EPOW_ACTION_SYSTEM_HALT => "system halt",
        EPOW_ACTION_MAIN_ENCLOSURE => "main enclosure",
        EPOW_ACTION_POWER_OFF => "power off",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn legacy_sensor_and_action_share_a_word() {
        let mut raw = [0u8; 28];
        raw[0..4].copy_from_slice(&0x0000_1234u32.to_be_bytes());
        raw[4] = 0x90;
        raw[5] = 0x08;
        raw[8..12].copy_from_slice(&7u32.to_be_bytes());

        let mut cursor = ByteCursor::new(&raw);
        let epow = LegacyEpow::from_cursor(&mut cursor, 4).unwrap();
        assert_eq!(epow.sensor_value, 0x123);
        assert_eq!(epow.action_code, 4);
        assert_eq!(epow.causes, EpowCauses::SENSOR | EpowCauses::TEMP);
        assert_eq!(epow.power_faults, EpowPowerFaults::BATTERY);
        assert_eq!(epow.sensor_token, 7);
        assert_eq!(cursor.pos(), 28);
    }

    #[test]
    fn v6_nibbles() {
        let raw = [0x53, 0x02, b'R', b'E', b'A', b'S', b'O', b'N', 0, 0, 0, 0];
        let header = V6Header {
            id: *b"EP",
            length: 20,
            version: 1,
            subtype: 0,
            creator_comp_id: 0,
        };
        let mut cursor = ByteCursor::new(&raw);
        let epow = V6Epow::from_cursor(&mut cursor, header).unwrap();
        assert_eq!(epow.sensor_value, 5);
        assert_eq!(epow.action_code, EPOW_ACTION_SYSTEM_SHUTDOWN);
        assert_eq!(&epow.reason_code[..6], b"REASON");
        assert_eq!(action_code_name(epow.action_code), "system shutdown");
        assert!(
            epow.event_modifier_description()
                .unwrap()
                .starts_with("Loss of utility power")
        );
    }
}
