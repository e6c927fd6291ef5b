use log::{debug, trace};

use crate::err::{Result, RtasEventError};
use crate::event_header::{EventHeader, ExtendedHeader};
use crate::event_parser::{ParserSettings, parse_buffer};
use crate::sections::{
    DUMP_ID_LEN_OFFSET, DUMP_OS_ID_MAX, DUMP_OS_ID_OFFSET, DumpSection, EpowSection,
    HotplugSection, IoSection, LriSection, MtmsSection, PrivateHeader, Section, SectionBody,
    SectionKind, SrcSection, UserHeader, padded_id_len,
};

/// A decoded RTAS event.
///
/// The event owns a copy of its bytes, sections record where in that buffer they were decoded
/// from, and [`RtasEvent::set_dump_os_id`] patches both the buffer and the decoded dump section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtasEvent {
    buf: Vec<u8>,
    event_length: usize,
    body_offset: usize,
    event_number: Option<u32>,
    header: EventHeader,
    extended_header: Option<ExtendedHeader>,
    sections: Vec<Section>,
}

/// Generates a typed getter returning the body of the first section of a kind.
macro_rules! section_getter {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> Option<&$ty> {
            self.sections.iter().find_map(|s| match s.body() {
                SectionBody::$variant(inner) => Some(inner),
                _ => None,
            })
        }
    };
}

impl RtasEvent {
    pub fn from_buffer(buf: Vec<u8>) -> Result<Self> {
        Self::from_buffer_with_settings(buf, &ParserSettings::default())
    }

    pub fn from_buffer_with_settings(buf: Vec<u8>, settings: &ParserSettings) -> Result<Self> {
        let parsed = parse_buffer(&buf, settings)?;
        trace!(
            "parsed version {} event, {} bytes, {} sections",
            parsed.header.version,
            parsed.event_length,
            parsed.sections.len()
        );

        Ok(RtasEvent {
            buf,
            event_length: parsed.event_length,
            body_offset: parsed.body_offset,
            event_number: None,
            header: parsed.header,
            extended_header: parsed.extended_header,
            sections: parsed.sections,
        })
    }

    /// Attach a sequence number, shown in the render banner only.
    pub fn with_event_number(mut self, number: u32) -> Self {
        self.event_number = Some(number);
        self
    }

    pub fn event_number(&self) -> Option<u32> {
        self.event_number
    }

    pub fn version(&self) -> u8 {
        self.header.version
    }

    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    pub fn extended_header(&self) -> Option<&ExtendedHeader> {
        self.extended_header.as_ref()
    }

    /// Declared size of the event, including the fixed header.
    pub fn event_length(&self) -> usize {
        self.event_length
    }

    /// Offset of the first section, past the headers (and the signature of version 6 events).
    pub fn body_offset(&self) -> usize {
        self.body_offset
    }

    /// Decoded sections in buffer order. The fixed and extended headers are not part of the list.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The first section of the given kind.
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind() == kind)
    }

    /// The declared bytes of the event, including any patch applied by `set_dump_os_id`.
    pub fn raw(&self) -> &[u8] {
        &self.buf[..self.event_length]
    }

    section_getter!(private_header, PrivateHeader, PrivateHeader);
    section_getter!(user_header, UserHeader, UserHeader);
    section_getter!(epow, Epow, EpowSection);
    section_getter!(io, Io, IoSection);
    section_getter!(dump, Dump, DumpSection);
    section_getter!(logical_resource, LogicalResource, LriSection);
    section_getter!(machine_type, MachineType, MtmsSection);
    section_getter!(primary_src, PrimarySrc, SrcSection);
    section_getter!(secondary_src, SecondarySrc, SrcSection);
    section_getter!(hotplug, Hotplug, HotplugSection);

    /// Rewrites the OS assigned id of the dump locator section in place.
    ///
    /// The id field is zeroed before `id` is written and the id length is rounded up to a
    /// multiple of 4. On error neither the buffer nor the decoded section is touched.
    pub fn set_dump_os_id(&mut self, id: &str) -> Result<()> {
        let bytes = id.as_bytes();
        if bytes.len() > DUMP_OS_ID_MAX {
            return Err(RtasEventError::InvalidArgument {
                message: format!(
                    "dump id is {} bytes long, at most {} are allowed",
                    bytes.len(),
                    DUMP_OS_ID_MAX
                ),
            });
        }

        let section = self
            .sections
            .iter_mut()
            .find(|s| s.kind() == SectionKind::Dump)
            .ok_or(RtasEventError::MissingSection {
                kind: SectionKind::Dump.name(),
            })?;

        let base = section.raw_offset();
        // `padded_id_len` of at most 40 always fits the one byte field.
        let padded = padded_id_len(bytes.len()) as u8;

        let id_start = base + DUMP_OS_ID_OFFSET;
        let field = &mut self.buf[id_start..id_start + DUMP_OS_ID_MAX];
        field.fill(0);
        field[..bytes.len()].copy_from_slice(bytes);
        self.buf[base + DUMP_ID_LEN_OFFSET] = padded;

        if let SectionBody::Dump(dump) = section.body_mut() {
            dump.apply_os_id(bytes, padded);
        }

        debug!(
            "dump section at offset {} now carries os id {:?} (id length {})",
            base, id, padded
        );
        Ok(())
    }
}

/// Free function form of [`RtasEvent::set_dump_os_id`].
pub fn set_dump_os_id(event: &mut RtasEvent, id: &str) -> Result<()> {
    event.set_dump_os_id(id)
}
