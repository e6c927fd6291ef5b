use crate::err::DeserializationResult;
use crate::utils::ByteCursor;

/// IBM diagnostic body, a single event id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IbmDiagnosticSection {
    pub event_id: u32,
}

impl IbmDiagnosticSection {
    pub(crate) fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        Ok(IbmDiagnosticSection {
            event_id: cursor.u32_named("ibm_diag.event_id")?,
        })
    }
}

/// Vendor specific error log: a vendor id followed by every remaining byte of the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorErrorLog {
    pub vendor_id: [u8; 4],
    pub vendor_data: Vec<u8>,
}

impl VendorErrorLog {
    /// The cursor must be bounded to the declared end of the event.
    pub(crate) fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        let vendor_id = cursor.array::<4>("vendor.id")?;
        let len = cursor.remaining();
        let vendor_data = cursor.take_vec(len, "vendor.data")?;
        Ok(VendorErrorLog {
            vendor_id,
            vendor_data,
        })
    }

    pub fn vendor_id_str(&self) -> String {
        self.vendor_id
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect()
    }
}
