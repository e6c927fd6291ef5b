use crate::err::DeserializationResult;
use crate::section_header::V6Header;
use crate::utils::ByteCursor;

pub const MTMS_SIZE: usize = 20;
pub const MTMS_SECTION_SIZE: usize = 8 + MTMS_SIZE;

/// Machine type/model and serial number pair, also embedded in FRU power enclosure records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mtms {
    pub model: String,
    pub serial_no: String,
}

impl Mtms {
    pub(crate) fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        Ok(Mtms {
            model: cursor.fixed_str(8, "mtms.model")?,
            serial_no: cursor.fixed_str(12, "mtms.serial_no")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtmsSection {
    pub header: V6Header,
    pub mtms: Mtms,
}

impl MtmsSection {
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: V6Header,
    ) -> DeserializationResult<Self> {
        Ok(MtmsSection {
            header,
            mtms: Mtms::from_cursor(cursor)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_model_and_serial() {
        let raw = *b"9117-570100A1B2C\0\0\0\0";
        let mut cursor = ByteCursor::new(&raw);
        let mtms = Mtms::from_cursor(&mut cursor).unwrap();
        assert_eq!(mtms.model, "9117-570");
        assert_eq!(mtms.serial_no, "100A1B2C");
        assert!(cursor.is_empty());
    }
}
