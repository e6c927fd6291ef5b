use crate::err::DeserializationResult;
use crate::utils::ByteCursor;

/// Size of the common header carried by every version 6 section.
pub const V6_HEADER_SIZE: usize = 8;

/// The common header of a version 6 section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V6Header {
    pub id: [u8; 2],
    pub length: u16,
    pub version: u8,
    pub subtype: u8,
    pub creator_comp_id: u16,
}

impl V6Header {
    pub(crate) fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        Ok(V6Header {
            id: cursor.array::<2>("v6_header.id")?,
            length: cursor.u16_named("v6_header.length")?,
            version: cursor.u8_named("v6_header.version")?,
            subtype: cursor.u8_named("v6_header.subtype")?,
            creator_comp_id: cursor.u16_named("v6_header.creator_comp_id")?,
        })
    }

    pub fn section_id(&self) -> SectionId {
        SectionId::from_tag(self.id)
    }

    /// The two character id, with non printable bytes replaced by `.`.
    pub fn id_str(&self) -> String {
        self.id
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect()
    }
}

/// The section id tags the dispatcher knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    PrivateHeader,
    UserHeader,
    Dump,
    Epow,
    Io,
    LogicalResource,
    MachineType,
    PrimarySrc,
    SecondarySrc,
    Hotplug,
    Other([u8; 2]),
}

impl SectionId {
    pub fn from_tag(tag: [u8; 2]) -> Self {
        match &tag {
            b"PH" => SectionId::PrivateHeader,
            b"UH" => SectionId::UserHeader,
            b"DH" => SectionId::Dump,
            b"EP" => SectionId::Epow,
            b"IE" => SectionId::Io,
            b"LR" => SectionId::LogicalResource,
            b"MT" => SectionId::MachineType,
            b"PS" => SectionId::PrimarySrc,
            b"SS" => SectionId::SecondarySrc,
            b"HP" => SectionId::Hotplug,
            _ => SectionId::Other(tag),
        }
    }

    pub fn tag(&self) -> [u8; 2] {
        match self {
            SectionId::PrivateHeader => *b"PH",
            SectionId::UserHeader => *b"UH",
            SectionId::Dump => *b"DH",
            SectionId::Epow => *b"EP",
            SectionId::Io => *b"IE",
            SectionId::LogicalResource => *b"LR",
            SectionId::MachineType => *b"MT",
            SectionId::PrimarySrc => *b"PS",
            SectionId::SecondarySrc => *b"SS",
            SectionId::Hotplug => *b"HP",
            SectionId::Other(tag) => *tag,
        }
    }
}
