use log::debug;

use crate::err::{DeserializationError, DeserializationResult};
use crate::section_header::V6Header;
use crate::sections::mtms::Mtms;
use crate::utils::{BitField, ByteCursor};

/// Size of the fixed part of an SRC section, common header included.
pub const SRC_SECTION_SIZE: usize = 80;
pub const SRC_SUBSECTION_HEADER_SIZE: usize = 4;
pub const FRU_CALLOUT_HEADER_SIZE: usize = 4;
pub const FRU_SUBSTRUCTURE_HEADER_SIZE: usize = 4;

pub const SRC_PRIMARY_REFCODE_LEN: usize = 32;
pub const FRU_PE_NAME_MAX: usize = 32;

const SRC_SUBSECTIONS_INCLUDED: u8 = 0x01;

const FRU_TYPE: BitField = BitField::new(4, 4);
const FRU_ID_INCLUDED: BitField = BitField::new(3, 1);
const FRU_SUBSCN_INCLUDED: BitField = BitField::new(0, 3);

pub const FRU_ID_HAS_PART_NO: u8 = 0x08;
pub const FRU_ID_HAS_CCIN: u8 = 0x04;
pub const FRU_ID_HAS_PROC_ID: u8 = 0x02;
pub const FRU_ID_HAS_SERIAL_NO: u8 = 0x01;
pub const FRU_ID_COMPONENT_MASK: u8 = 0xf0;

pub const FRU_MR_COUNT_MASK: u8 = 0x0f;

/// A primary or secondary System Reference Code section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcSection {
    pub header: V6Header,
    pub version: u8,
    pub platform_data: [u8; 7],
    /// Extended reference code words 2 through 9.
    pub ext_refcodes: [u32; 8],
    pub primary_refcode: String,
    pub subsection: Option<SrcSubsection>,
}

/// The optional FRU call-out area that follows the fixed SRC body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcSubsection {
    pub id: u8,
    pub platform_data: u8,
    /// Declared length in 4-byte words, this header included.
    pub length: u16,
    pub fru_callouts: Vec<FruCallout>,
}

impl SrcSubsection {
    pub fn length_in_bytes(&self) -> usize {
        usize::from(self.length) * 4
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruCallout {
    pub length: u8,
    pub callout_type: u8,
    pub fru_id_included: bool,
    pub subscn_included: u8,
    pub priority: char,
    pub loc_code_length: u8,
    pub loc_code: String,
    pub substructures: Vec<FruSubstructure>,
}

/// Header shared by the tagged records nested inside a FRU call-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FruSubstructureHeader {
    pub id: [u8; 2],
    pub length: u8,
    pub flags: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FruSubstructure {
    Id(FruId),
    Pe(FruPe),
    Mr(FruMr),
}

/// FRU identity. Each field is only present when its flag bit is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruId {
    pub header: FruSubstructureHeader,
    pub part_no: Option<String>,
    pub procedure_id: Option<String>,
    pub ccin: Option<String>,
    pub serial_no: Option<String>,
}

/// FRU power enclosure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruPe {
    pub header: FruSubstructureHeader,
    pub mtms: Mtms,
    pub name: String,
}

/// FRU manufacturing replaceable units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruMr {
    pub header: FruSubstructureHeader,
    pub entries: Vec<MruEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MruEntry {
    pub priority: char,
    pub id: u32,
}

impl SrcSection {
    /// Decode an SRC body and its FRU call-outs.
    ///
    /// `cursor` must be bounded to the declared section length, nothing nested may cross it.
    pub(crate) fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: V6Header,
    ) -> DeserializationResult<Self> {
        let version = cursor.u8_named("src.version")?;
        let platform_data = cursor.array::<7>("src.platform_data")?;

        let mut ext_refcodes = [0u32; 8];
        for word in ext_refcodes.iter_mut() {
            *word = cursor.u32_named("src.ext_refcode")?;
        }

        let primary_refcode = cursor.fixed_str(SRC_PRIMARY_REFCODE_LEN, "src.primary_refcode")?;

        let subsection = if platform_data[0] & SRC_SUBSECTIONS_INCLUDED != 0 {
            Some(SrcSubsection::from_cursor(cursor)?)
        } else {
            None
        };

        Ok(SrcSection {
            header,
            version,
            platform_data,
            ext_refcodes,
            primary_refcode,
            subsection,
        })
    }

    pub fn is_primary(&self) -> bool {
        &self.header.id == b"PS"
    }

    pub fn subsections_included(&self) -> bool {
        self.platform_data[0] & SRC_SUBSECTIONS_INCLUDED != 0
    }

    pub fn fru_callouts(&self) -> &[FruCallout] {
        match &self.subsection {
            Some(sub) => &sub.fru_callouts,
            None => &[],
        }
    }
}

impl SrcSubsection {
    fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        let start = cursor.pos();
        let id = cursor.u8_named("src.subsection.id")?;
        let platform_data = cursor.u8_named("src.subsection.platform_data")?;
        let length = cursor.u16_named("src.subsection.length")?;

        let total_bytes = usize::from(length) * 4;
        // The length counts the sub-section header itself.
        if total_bytes < SRC_SUBSECTION_HEADER_SIZE {
            return Err(DeserializationError::LengthMismatch {
                what: "src.subsection.length",
                offset: start as u64,
                declared: total_bytes,
                actual: SRC_SUBSECTION_HEADER_SIZE,
            });
        }
        let body_len = total_bytes - SRC_SUBSECTION_HEADER_SIZE;
        if body_len > cursor.remaining() {
            return Err(DeserializationError::LengthMismatch {
                what: "src.subsection",
                offset: start as u64,
                declared: total_bytes,
                actual: cursor.remaining() + SRC_SUBSECTION_HEADER_SIZE,
            });
        }

        let mut window = cursor.bounded(body_len, "src.subsection")?;
        let mut fru_callouts = Vec::new();
        let mut total = SRC_SUBSECTION_HEADER_SIZE;

        while total < total_bytes {
            let fru = FruCallout::from_cursor(&mut window)?;
            total += usize::from(fru.length);
            fru_callouts.push(fru);
        }

        cursor.set_pos(window.pos(), "src.subsection")?;

        Ok(SrcSubsection {
            id,
            platform_data,
            length,
            fru_callouts,
        })
    }
}

impl FruCallout {
    fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        let start = cursor.pos();
        let length = cursor.u8_named("fru.length")?;
        let data1 = cursor.u8_named("fru.flags")?;
        let priority = cursor.char_named("fru.priority")?;
        let loc_code_length = cursor.u8_named("fru.loc_code_length")?;

        let declared = usize::from(length);
        let fixed = FRU_CALLOUT_HEADER_SIZE + usize::from(loc_code_length);
        if declared < fixed {
            return Err(DeserializationError::LengthMismatch {
                what: "fru.length",
                offset: start as u64,
                declared,
                actual: fixed,
            });
        }
        if declared - FRU_CALLOUT_HEADER_SIZE > cursor.remaining() {
            return Err(DeserializationError::LengthMismatch {
                what: "fru.length",
                offset: start as u64,
                declared,
                actual: cursor.remaining() + FRU_CALLOUT_HEADER_SIZE,
            });
        }

        let loc_code = cursor.fixed_str(usize::from(loc_code_length), "fru.loc_code")?;

        let mut window = cursor.bounded(declared - fixed, "fru.substructures")?;
        let mut substructures = Vec::new();

        while !window.is_empty() {
            let tag = if window.remaining() >= 2 {
                Some(window.peek_array::<2>("fru.substructure.id")?)
            } else {
                None
            };

            match tag.as_ref() {
                Some(b"ID") | Some(b"PE") | Some(b"MR") => {
                    substructures.push(FruSubstructure::from_cursor(&mut window)?);
                }
                _ => {
                    debug!(
                        "skipping padding byte at offset {} inside FRU call-out",
                        window.pos()
                    );
                    window.advance(1, "fru.padding")?;
                }
            }
        }

        cursor.set_pos(window.pos(), "fru.end")?;

        Ok(FruCallout {
            length,
            callout_type: FRU_TYPE.extract_u8(data1),
            fru_id_included: FRU_ID_INCLUDED.is_set(u32::from(data1)),
            subscn_included: FRU_SUBSCN_INCLUDED.extract_u8(data1),
            priority,
            loc_code_length,
            loc_code,
            substructures,
        })
    }

    pub fn priority_description(&self) -> Option<&'static str> {
        priority_description(self.priority)
    }

    pub fn fru_ids(&self) -> impl Iterator<Item = &FruId> {
        self.substructures.iter().filter_map(|s| match s {
            FruSubstructure::Id(id) => Some(id),
            _ => None,
        })
    }
}

impl FruSubstructure {
    fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        let start = cursor.pos();
        let header = FruSubstructureHeader {
            id: cursor.array::<2>("fru.substructure.id")?,
            length: cursor.u8_named("fru.substructure.length")?,
            flags: cursor.u8_named("fru.substructure.flags")?,
        };

        let declared = usize::from(header.length);
        if declared < FRU_SUBSTRUCTURE_HEADER_SIZE
            || declared - FRU_SUBSTRUCTURE_HEADER_SIZE > cursor.remaining()
        {
            return Err(DeserializationError::LengthMismatch {
                what: "fru.substructure.length",
                offset: start as u64,
                declared,
                actual: cursor.remaining() + FRU_SUBSTRUCTURE_HEADER_SIZE,
            });
        }

        let mut body = cursor.bounded(declared - FRU_SUBSTRUCTURE_HEADER_SIZE, "fru.substructure")?;
        let decoded = match &header.id {
            b"ID" => FruSubstructure::Id(FruId::from_cursor(&mut body, header)?),
            b"PE" => FruSubstructure::Pe(FruPe::from_cursor(&mut body, header)?),
            _ => FruSubstructure::Mr(FruMr::from_cursor(&mut body, header, start)?),
        };

        cursor.set_pos(start + declared, "fru.substructure.end")?;
        Ok(decoded)
    }

    pub fn header(&self) -> &FruSubstructureHeader {
        match self {
            FruSubstructure::Id(s) => &s.header,
            FruSubstructure::Pe(s) => &s.header,
            FruSubstructure::Mr(s) => &s.header,
        }
    }
}

impl FruId {
    fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: FruSubstructureHeader,
    ) -> DeserializationResult<Self> {
        let flags = header.flags;
        let mut field = |mask: u8, len: usize, what: &'static str| {
            if flags & mask != 0 {
                cursor.fixed_str(len, what).map(Some)
            } else {
                Ok(None)
            }
        };

        let part_no = field(FRU_ID_HAS_PART_NO, 8, "fru_id.part_no")?;
        let procedure_id = field(FRU_ID_HAS_PROC_ID, 8, "fru_id.procedure_id")?;
        let ccin = field(FRU_ID_HAS_CCIN, 4, "fru_id.ccin")?;
        let serial_no = field(FRU_ID_HAS_SERIAL_NO, 12, "fru_id.serial_no")?;

        Ok(FruId {
            header,
            part_no,
            procedure_id,
            ccin,
            serial_no,
        })
    }

    /// The failing component type, zero when none is given.
    pub fn component(&self) -> u8 {
        self.header.flags & FRU_ID_COMPONENT_MASK
    }

    pub fn component_description(&self) -> Option<&'static str> {
        let desc = match self.component() {
            0x10 => "\"normal\" hardware FRU",
            0x20 => "Code FRU",
            0x30 => "Configuration error",
            0x40 => "Maintenance procedure required",
            0x90 => "External FRU",
            0xa0 => "External Code FRU",
            0xb0 => "Tool FRU",
            0xc0 => "Symbolic FRU",
            _ => return None,
        };
        Some(desc)
    }
}

impl FruPe {
    fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: FruSubstructureHeader,
    ) -> DeserializationResult<Self> {
        let mtms = Mtms::from_cursor(cursor)?;
        let name_len = cursor.remaining().min(FRU_PE_NAME_MAX);
        let name = cursor.fixed_str(name_len, "fru_pe.name")?;
        Ok(FruPe { header, mtms, name })
    }
}

impl FruMr {
    fn from_cursor(
        cursor: &mut ByteCursor<'_>,
        header: FruSubstructureHeader,
        start: usize,
    ) -> DeserializationResult<Self> {
        let count = usize::from(header.flags & FRU_MR_COUNT_MASK);
        let needed = FRU_SUBSTRUCTURE_HEADER_SIZE + 4 + count * 8;
        if needed > usize::from(header.length) {
            return Err(DeserializationError::LengthMismatch {
                what: "fru_mr.entries",
                offset: start as u64,
                declared: usize::from(header.length),
                actual: needed,
            });
        }

        cursor.advance(4, "fru_mr.reserved")?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            cursor.advance(3, "fru_mr.entry.reserved")?;
            entries.push(MruEntry {
                priority: cursor.char_named("fru_mr.entry.priority")?,
                id: cursor.u32_named("fru_mr.entry.id")?,
            });
        }

        Ok(FruMr { header, entries })
    }
}

pub fn priority_description(priority: char) -> Option<&'static str> {
    let desc = match priority {
        'H' => "High priority and mandatory call-out.",
        'M' => "Medium priority.",
        'A' => "Medium priority group A (1st group).",
        'B' => "Medium priority group B (2nd group).",
        'C' => "Medium priority group C (3rd group).",
        'L' => "Low Priority.",
        _ => return None,
    };
    Some(desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn src_header(length: usize) -> V6Header {
        V6Header {
            id: *b"PS",
            length: length as u16,
            version: 1,
            subtype: 0,
            creator_comp_id: 0,
        }
    }

    fn src_body(platform0: u8) -> Vec<u8> {
        let mut body = vec![0x02, platform0, 0, 0, 0, 0, 0, 0];
        for word in 2u32..=9 {
            body.extend_from_slice(&word.to_be_bytes());
        }
        let mut refcode = [0u8; SRC_PRIMARY_REFCODE_LEN];
        refcode[..8].copy_from_slice(b"B1818601");
        body.extend_from_slice(&refcode);
        body
    }

    fn decode(body: &[u8]) -> DeserializationResult<SrcSection> {
        let mut cursor = ByteCursor::new(body);
        let src = SrcSection::from_cursor(&mut cursor, src_header(body.len() + 8))?;
        assert!(cursor.is_empty());
        Ok(src)
    }

    #[test]
    fn decodes_fixed_body_without_callouts() {
        let src = decode(&src_body(0)).unwrap();
        assert_eq!(src.ext_refcodes, [2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(src.primary_refcode, "B1818601");
        assert!(src.subsection.is_none());
        assert!(src.fru_callouts().is_empty());
        assert!(src.is_primary());
    }

    #[test]
    fn fru_id_with_only_ccin() {
        let mut body = src_body(SRC_SUBSECTIONS_INCLUDED);
        // callout 1: 4 + 4 loc + 8 ID(ccin) = 16, callout 2: 4 + 4 loc = 8
        body.extend_from_slice(&[0xc0, 0x00, 0x00, 7]);
        body.extend_from_slice(&[16, 0x2c, b'H', 4]);
        body.extend_from_slice(b"P1\0\0");
        body.extend_from_slice(&[b'I', b'D', 8, 0x10 | FRU_ID_HAS_CCIN]);
        body.extend_from_slice(b"2B4A");
        body.extend_from_slice(&[8, 0x20, b'L', 4]);
        body.extend_from_slice(b"P2-C");

        let src = decode(&body).unwrap();
        let frus = src.fru_callouts();
        assert_eq!(frus.len(), 2);
        assert_eq!(src.subsection.as_ref().map(|sub| sub.length_in_bytes()), Some(28));

        let first = &frus[0];
        assert_eq!(first.callout_type, 2);
        assert!(first.fru_id_included);
        assert_eq!(first.subscn_included, 4);
        assert_eq!(first.loc_code, "P1");
        assert_eq!(
            first.priority_description(),
            Some("High priority and mandatory call-out.")
        );
        assert_eq!(first.substructures.len(), 1);

        let ids: Vec<_> = first.fru_ids().collect();
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].ccin.as_deref(), Some("2B4A"));
        assert_eq!(ids[0].part_no, None);
        assert_eq!(ids[0].procedure_id, None);
        assert_eq!(ids[0].serial_no, None);
        assert_eq!(ids[0].component_description(), Some("\"normal\" hardware FRU"));

        assert_eq!(frus[1].loc_code, "P2-C");
        assert!(frus[1].substructures.is_empty());
    }

    #[test]
    fn pe_and_mr_substructures_with_padding() {
        let mut body = src_body(SRC_SUBSECTIONS_INCLUDED);
        // callout: 4 + 1 pad + 32 PE + 24 MR + 3 pad = 64, subsection 4 + 64 = 17 words
        body.extend_from_slice(&[0xc0, 0x00, 0x00, 17]);
        body.extend_from_slice(&[64, 0x03, b'M', 0]);
        body.push(0);
        body.extend_from_slice(&[b'P', b'E', 32, 0]);
        body.extend_from_slice(b"9117-570100A1B2C\0\0\0\0");
        body.extend_from_slice(b"PSU1\0\0\0\0");
        body.extend_from_slice(&[b'M', b'R', 24, 0x02, 0, 0, 0, 0]);
        body.extend_from_slice(&[0, 0, 0, b'H', 0, 0, 0, 1]);
        body.extend_from_slice(&[0, 0, 0, b'L', 0, 0, 0, 2]);
        body.extend_from_slice(&[0, 0, 0]);

        let src = decode(&body).unwrap();
        assert_eq!(src.fru_callouts().len(), 1);
        let fru = &src.fru_callouts()[0];
        assert_eq!(fru.substructures.len(), 2);

        match &fru.substructures[0] {
            FruSubstructure::Pe(pe) => {
                assert_eq!(pe.mtms.model, "9117-570");
                assert_eq!(pe.name, "PSU1");
            }
            other => panic!("expected PE, got {other:?}"),
        }
        match &fru.substructures[1] {
            FruSubstructure::Mr(mr) => assert_eq!(
                mr.entries,
                vec![
                    MruEntry { priority: 'H', id: 1 },
                    MruEntry { priority: 'L', id: 2 }
                ]
            ),
            other => panic!("expected MR, got {other:?}"),
        }
    }

    #[test]
    fn subsection_shorter_than_its_header_is_rejected() {
        let mut body = src_body(SRC_SUBSECTIONS_INCLUDED);
        body.extend_from_slice(&[0xc0, 0x00, 0x00, 0]);

        match decode(&body) {
            Err(DeserializationError::LengthMismatch {
                what,
                declared,
                actual,
                ..
            }) => {
                assert_eq!(what, "src.subsection.length");
                assert_eq!(declared, 0);
                assert_eq!(actual, SRC_SUBSECTION_HEADER_SIZE);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn substructure_past_callout_is_rejected() {
        let mut body = src_body(SRC_SUBSECTIONS_INCLUDED);
        body.extend_from_slice(&[0xc0, 0x00, 0x00, 4]);
        body.extend_from_slice(&[12, 0x08, b'H', 0]);
        body.extend_from_slice(&[b'I', b'D', 16, FRU_ID_HAS_CCIN]);
        body.extend_from_slice(b"2B4A");

        assert!(matches!(
            decode(&body),
            Err(DeserializationError::LengthMismatch {
                what: "fru.substructure.length",
                ..
            })
        ));
    }

    #[test]
    fn callout_shorter_than_location_code_is_rejected() {
        let mut body = src_body(SRC_SUBSECTIONS_INCLUDED);
        body.extend_from_slice(&[0xc0, 0x00, 0x00, 3]);
        body.extend_from_slice(&[6, 0x00, b'H', 4]);
        body.extend_from_slice(b"P1\0\0");

        assert!(matches!(
            decode(&body),
            Err(DeserializationError::LengthMismatch {
                what: "fru.length",
                ..
            })
        ));
    }

    #[test]
    fn mr_count_beyond_length_is_rejected() {
        let mut body = src_body(SRC_SUBSECTIONS_INCLUDED);
        body.extend_from_slice(&[0xc0, 0x00, 0x00, 5]);
        body.extend_from_slice(&[16, 0x01, b'H', 0]);
        body.extend_from_slice(&[b'M', b'R', 12, 0x03, 0, 0, 0, 0]);
        body.extend_from_slice(&[0, 0, 0, b'H']);

        assert!(matches!(
            decode(&body),
            Err(DeserializationError::LengthMismatch {
                what: "fru_mr.entries",
                ..
            })
        ));
    }
}
