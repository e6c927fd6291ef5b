use crate::err::DeserializationResult;
use crate::section_header::V6Header;
use crate::utils::ByteCursor;

/// A version 6 section whose id has no dedicated decoder; the payload is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericSection {
    pub header: V6Header,
    pub data: Vec<u8>,
}

impl GenericSection {
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: V6Header,
    ) -> DeserializationResult<Self> {
        let len = cursor.remaining();
        let data = cursor.take_vec(len, "generic.data")?;
        Ok(GenericSection { header, data })
    }
}
