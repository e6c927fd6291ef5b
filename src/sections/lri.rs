use crate::err::DeserializationResult;
use crate::section_header::V6Header;
use crate::utils::ByteCursor;

pub const LRI_SECTION_SIZE: usize = 20;

pub const LRI_RESOURCE_PROCESSOR: u8 = 0x10;
pub const LRI_RESOURCE_SHARED_PROCESSOR: u8 = 0x11;
pub const LRI_RESOURCE_MEMORY_PAGE: u8 = 0x40;
pub const LRI_RESOURCE_MEMORY_LMB: u8 = 0x41;

/// Logical resource identification section.
///
/// Bytes 12-15 hold a cpu id, a DRC index or the low word of a memory address depending on
/// `resource`; the accessors below pick the right interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LriSection {
    pub header: V6Header,
    pub resource: u8,
    pub capacity: u16,
    pub resource_word: u32,
    pub mem_addr_hi: u32,
}

impl LriSection {
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: V6Header,
    ) -> DeserializationResult<Self> {
        let resource = cursor.u8_named("lri.resource")?;
        cursor.advance(1, "lri.reserved")?;
        let capacity = cursor.u16_named("lri.capacity")?;
        let resource_word = cursor.u32_named("lri.resource_word")?;
        let mem_addr_hi = cursor.u32_named("lri.mem_addr_hi")?;

        Ok(LriSection {
            header,
            resource,
            capacity,
            resource_word,
            mem_addr_hi,
        })
    }

    pub fn resource_name(&self) -> &'static str {
        match self.resource {
            LRI_RESOURCE_PROCESSOR => "Processor",
            LRI_RESOURCE_SHARED_PROCESSOR => "Shared Processor",
            LRI_RESOURCE_MEMORY_PAGE => "Memory Page",
            LRI_RESOURCE_MEMORY_LMB => "Memory LMB",
            _ => "Unknown Resource",
        }
    }

    pub fn entitled_capacity(&self) -> Option<u16> {
        (self.resource == LRI_RESOURCE_SHARED_PROCESSOR).then_some(self.capacity)
    }

    pub fn cpu_id(&self) -> Option<u32> {
        (self.resource == LRI_RESOURCE_PROCESSOR).then_some(self.resource_word)
    }

    pub fn drc_index(&self) -> Option<u32> {
        (self.resource == LRI_RESOURCE_MEMORY_LMB).then_some(self.resource_word)
    }

    pub fn mem_addr_lo(&self) -> Option<u32> {
        (self.resource == LRI_RESOURCE_MEMORY_PAGE).then_some(self.resource_word)
    }
}
