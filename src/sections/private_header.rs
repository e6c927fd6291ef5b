use crate::err::DeserializationResult;
use crate::section_header::V6Header;
use crate::utils::{ByteCursor, RtasDate, RtasTime, nul_terminated, to_civil_datetime};

pub const PRIVATE_HEADER_SIZE: usize = 48;

pub const CREATOR_HMC: u8 = b'C';
pub const CREATOR_SERVICE_PROCESSOR: u8 = b'E';
pub const CREATOR_HYPERVISOR: u8 = b'H';
pub const CREATOR_POWER_CONTROL: u8 = b'W';
pub const CREATOR_PARTITION_FIRMWARE: u8 = b'L';
pub const CREATOR_SLIC: u8 = b'S';

/// The first mandatory section of a version 6 event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateHeader {
    pub header: V6Header,
    pub date: RtasDate,
    pub time: RtasTime,
    pub creator_id: u8,
    pub scn_count: u8,
    pub creator_subid_hi: u32,
    pub creator_subid_lo: u32,
    /// Set when the creator is the service processor, which stores an ASCII name in the sub id.
    pub creator_subid_name: Option<String>,
    pub plid: u32,
    pub log_entry_id: u32,
}

impl PrivateHeader {
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: V6Header,
    ) -> DeserializationResult<Self> {
        let date = RtasDate::from_cursor(cursor)?;
        let time = RtasTime::from_cursor(cursor)?;
        cursor.advance(8, "private_header.reserved")?;
        let creator_id = cursor.u8_named("private_header.creator_id")?;
        cursor.advance(2, "private_header.reserved")?;
        let scn_count = cursor.u8_named("private_header.scn_count")?;
        cursor.advance(4, "private_header.reserved")?;

        let subid_raw = cursor.peek_array::<8>("private_header.creator_subid")?;
        let creator_subid_hi = cursor.u32_named("private_header.creator_subid_hi")?;
        let creator_subid_lo = cursor.u32_named("private_header.creator_subid_lo")?;
        let plid = cursor.u32_named("private_header.plid")?;
        let log_entry_id = cursor.u32_named("private_header.log_entry_id")?;

        let creator_subid_name =
            (creator_id == CREATOR_SERVICE_PROCESSOR).then(|| nul_terminated(&subid_raw));

        Ok(PrivateHeader {
            header,
            date,
            time,
            creator_id,
            scn_count,
            creator_subid_hi,
            creator_subid_lo,
            creator_subid_name,
            plid,
            log_entry_id,
        })
    }

    pub fn creator_name(&self) -> &'static str {
        match self.creator_id {
            CREATOR_HMC => "Hardware Management Console",
            CREATOR_SERVICE_PROCESSOR => "Service Processor",
            CREATOR_HYPERVISOR => "PHyp",
            CREATOR_POWER_CONTROL => "Power Control",
            CREATOR_PARTITION_FIRMWARE => "Partition Firmware",
            CREATOR_SLIC => "SLIC",
            _ => "Unknown",
        }
    }

    pub fn timestamp(&self) -> Option<jiff::civil::DateTime> {
        to_civil_datetime(&self.date, &self.time)
    }
}
