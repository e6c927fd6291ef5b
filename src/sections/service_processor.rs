use bitflags::bitflags;
use log::debug;

use crate::err::DeserializationResult;
use crate::utils::ByteCursor;

const IBM_SIGNATURE: [u8; 4] = *b"IBM\0";

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpGeneralErrors: u8 {
        const TIMEOUT = 0x80;
        const I2C_BUS = 0x40;
        const I2C_SECONDARY_BUS = 0x20;
        const MEMORY = 0x10;
        const REGISTERS = 0x08;
        const COMMUNICATION = 0x04;
        const FIRMWARE = 0x02;
        const HARDWARE = 0x01;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpDeviceErrors: u8 {
        const VPD_EEPROM = 0x80;
        const OP_PANEL = 0x40;
        const POWER_CONTROLLER = 0x20;
        const FAN_SENSOR = 0x10;
        const THERMAL_SENSOR = 0x08;
        const VOLTAGE_SENSOR = 0x04;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpPortErrors: u8 {
        const SERIAL_PORT = 0x80;
        const NVRAM = 0x40;
        const RTC = 0x20;
        const JTAG = 0x10;
        const TOD_BATTERY = 0x08;
        const HEARTBEAT = 0x02;
        const SURVEILLANCE = 0x01;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpPcnErrors: u8 {
        const PCN_CONNECTION = 0x80;
        const PCN_NODE = 0x40;
        const PCN_ACCESS = 0x08;
    }
}

/// IBM service processor error log body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceProcessorSection {
    pub ibm: [u8; 4],
    pub general: SpGeneralErrors,
    pub devices: SpDeviceErrors,
    pub ports: SpPortErrors,
    pub pcn: SpPcnErrors,
    pub sensor_token: u32,
    pub sensor_index: u32,
}

impl ServiceProcessorSection {
    pub(crate) fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        let ibm = cursor.array::<4>("sp.ibm")?;
        let general = SpGeneralErrors::from_bits_retain(cursor.u8_named("sp.data1")?);
        let devices = SpDeviceErrors::from_bits_retain(cursor.u8_named("sp.data2")?);
        let ports = SpPortErrors::from_bits_retain(cursor.u8_named("sp.data3")?);
        let pcn = SpPcnErrors::from_bits_retain(cursor.u8_named("sp.data4")?);
        let sensor_token = cursor.u32_named("sp.sensor_token")?;
        let sensor_index = cursor.u32_named("sp.sensor_index")?;
        cursor.advance(12, "sp.reserved")?;

        if ibm[..3] != IBM_SIGNATURE[..3] {
            debug!("service processor section carries signature {ibm:02x?}");
        }

        Ok(ServiceProcessorSection {
            ibm,
            general,
            devices,
            ports,
            pcn,
            sensor_token,
            sensor_index,
        })
    }

    /// `false` when the "IBM" signature is malformed, the log entry may be corrupt.
    pub fn signature_ok(&self) -> bool {
        self.ibm[..3] == IBM_SIGNATURE[..3]
    }
}
