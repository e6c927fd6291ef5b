use log::{debug, trace};

use crate::err::{DeserializationError, DeserializationResult};
use crate::event_header::{
    EVENT_HEADER_SIZE, EXTENDED_HEADER_SIZE, EventHeader, ExtendedHeader, FormatType,
};
use crate::section_header::{SectionId, V6_HEADER_SIZE, V6Header};
use crate::sections::{
    CpuSection, DumpSection, EpowSection, GenericSection, HotplugSection, IbmDiagnosticSection,
    IoSection, LegacyEpow, LegacyIo, LriSection, MemorySection, MtmsSection, PostSection,
    PrivateHeader, Section, SectionBody, ServiceProcessorSection, SrcSection, UserHeader, V6Epow,
    V6Io, VendorErrorLog,
};
use crate::utils::{ByteCursor, dump_window};

/// Size of the "IBM\0" signature that precedes the private header of a version 6 event.
pub const V6_MAGIC_SIZE: usize = 4;
pub const V6_MAGIC: [u8; 4] = *b"IBM\0";

/// Offset of the first section of a version 6 event.
pub const V6_BODY_OFFSET: usize = EVENT_HEADER_SIZE + EXTENDED_HEADER_SIZE + V6_MAGIC_SIZE;
/// Offset of the single body section of a pre-version 6 event.
pub const LEGACY_BODY_OFFSET: usize = EVENT_HEADER_SIZE + EXTENDED_HEADER_SIZE;

const FAILURE_WINDOW_RADIUS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParserSettings {
    /// Skip, rather than reject, bytes a version 6 section declares but its decoder does not use.
    lenient_section_lengths: bool,
}

impl ParserSettings {
    pub fn new() -> Self {
        ParserSettings::default()
    }

    pub fn lenient_section_lengths(mut self, lenient: bool) -> Self {
        self.lenient_section_lengths = lenient;
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient_section_lengths
    }
}

/// Everything decoded from one event buffer.
#[derive(Debug)]
pub(crate) struct ParsedEvent {
    pub header: EventHeader,
    pub extended_header: Option<ExtendedHeader>,
    pub event_length: usize,
    pub body_offset: usize,
    pub sections: Vec<Section>,
}

/// Decodes an event, logging a window of the offending bytes on failure.
pub(crate) fn parse_buffer(
    buf: &[u8],
    settings: &ParserSettings,
) -> DeserializationResult<ParsedEvent> {
    EventParser::new(buf, settings).parse().inspect_err(|e| {
        debug!("failed to parse RTAS event: {}", e);
        if let Some(offset) = e.offset() {
            debug!(
                "bytes around offset {}:\n{}",
                offset,
                dump_window(buf, offset as usize, FAILURE_WINDOW_RADIUS)
            );
        }
    })
}

struct EventParser<'a> {
    buf: &'a [u8],
    settings: &'a ParserSettings,
}

impl<'a> EventParser<'a> {
    fn new(buf: &'a [u8], settings: &'a ParserSettings) -> Self {
        EventParser { buf, settings }
    }

    fn parse(&self) -> DeserializationResult<ParsedEvent> {
        let mut cursor = ByteCursor::new(self.buf);
        let header = EventHeader::from_cursor(&mut cursor)?;

        let event_length = usize::try_from(header.event_length())
            .ok()
            .filter(|&len| len <= self.buf.len())
            .ok_or(DeserializationError::Truncated {
                what: "event",
                offset: 0,
                need: usize::try_from(header.event_length()).unwrap_or(usize::MAX),
                have: self.buf.len(),
            })?;

        // Nothing past the declared end belongs to this event.
        let mut cursor = ByteCursor::with_pos(&self.buf[..event_length], EVENT_HEADER_SIZE)?;

        if !header.extended {
            trace!("event version {} carries no extended log", header.version);
            return Ok(ParsedEvent {
                header,
                extended_header: None,
                event_length,
                body_offset: EVENT_HEADER_SIZE,
                sections: Vec::new(),
            });
        }

        let extended_length = event_length - EVENT_HEADER_SIZE;
        let extended_header = ExtendedHeader::from_cursor(&mut cursor)
            .map_err(|e| within_declared(e, EVENT_HEADER_SIZE, extended_length))?;

        let (body_offset, sections) = if header.version >= 6 {
            let sections = self
                .parse_v6_sections(&mut cursor)
                .map_err(|e| within_declared(e, EVENT_HEADER_SIZE, extended_length))?;
            (V6_BODY_OFFSET, sections)
        } else {
            let sections =
                self.parse_legacy_sections(&mut cursor, header.version, &extended_header)?;
            (LEGACY_BODY_OFFSET, sections)
        };

        Ok(ParsedEvent {
            header,
            extended_header: Some(extended_header),
            event_length,
            body_offset,
            sections,
        })
    }

    fn parse_v6_sections(
        &self,
        cursor: &mut ByteCursor<'a>,
    ) -> DeserializationResult<Vec<Section>> {
        let magic_offset = cursor.pos();
        let magic = cursor.array::<V6_MAGIC_SIZE>("v6.magic")?;
        // Only the text is significant, firmware does not always NUL terminate it.
        if magic[..3] != V6_MAGIC[..3] {
            return Err(DeserializationError::BadMagic {
                what: "v6.magic",
                offset: magic_offset as u64,
                expected: V6_MAGIC,
                found: magic,
            });
        }

        let mut sections = Vec::new();
        sections.push(self.parse_required(cursor, SectionId::PrivateHeader)?);
        sections.push(self.parse_required(cursor, SectionId::UserHeader)?);

        while !cursor.is_empty() {
            sections.push(self.parse_v6_section(cursor)?);
        }

        Ok(sections)
    }

    /// Parses the next section, which must carry the tag of `expected`.
    fn parse_required(
        &self,
        cursor: &mut ByteCursor<'a>,
        expected: SectionId,
    ) -> DeserializationResult<Section> {
        let id = cursor
            .peek_array::<2>("v6_header.id")
            .map_err(|e| within_declared(e, cursor.pos(), cursor.remaining()))?;
        if SectionId::from_tag(id) != expected {
            let tag = expected.tag();
            return Err(DeserializationError::BadMagic {
                what: "v6.required_section",
                offset: cursor.position(),
                expected: [tag[0], tag[1], 0, 0],
                found: [id[0], id[1], 0, 0],
            });
        }
        self.parse_v6_section(cursor)
    }

    fn parse_v6_section(&self, cursor: &mut ByteCursor<'a>) -> DeserializationResult<Section> {
        let start = cursor.pos();
        let mut probe = *cursor;
        let header = V6Header::from_cursor(&mut probe)
            .map_err(|e| within_declared(e, start, cursor.remaining()))?;

        let declared = usize::from(header.length);
        if declared < V6_HEADER_SIZE || declared > cursor.remaining() {
            return Err(DeserializationError::LengthMismatch {
                what: "v6_header.length",
                offset: start as u64,
                declared,
                actual: cursor.remaining(),
            });
        }

        let mut window = cursor.bounded(declared, "v6.section")?;
        window.advance(V6_HEADER_SIZE, "v6_header")?;

        let body = decode_v6_body(&mut window, header)
            .map_err(|e| within_declared(e, start, declared))?;

        if !window.is_empty() {
            if self.settings.is_lenient() {
                debug!(
                    "skipping {} undecoded bytes at the end of section {} at offset {}",
                    window.remaining(),
                    header.id_str(),
                    start
                );
            } else {
                window.expect_exhausted("v6.section", start)?;
            }
        }

        cursor.advance(declared, "v6.section")?;
        trace!(
            "decoded {} section ({}) at offset {}, {} bytes",
            body.kind(),
            header.id_str(),
            start,
            declared
        );
        Ok(Section::new(start, declared, body))
    }

    fn parse_legacy_sections(
        &self,
        cursor: &mut ByteCursor<'a>,
        version: u8,
        extended_header: &ExtendedHeader,
    ) -> DeserializationResult<Vec<Section>> {
        let start = cursor.pos();
        let format = extended_header.format().ok_or(DeserializationError::UnknownFormat {
            what: "extended_header.format_type",
            offset: (EVENT_HEADER_SIZE + 2) as u64,
            value: u32::from(extended_header.format_type),
        })?;

        let declared = cursor.remaining();
        let body = decode_legacy_body(cursor, format, version)
            .map_err(|e| within_declared(e, start, declared))?;

        let mut sections = vec![Section::new(start, cursor.pos() - start, body)];
        trace!(
            "decoded {} section at offset {}, {} bytes",
            sections[0].kind(),
            start,
            sections[0].raw_len()
        );

        if !cursor.is_empty() {
            let vendor_start = cursor.pos();
            let remaining = cursor.remaining();
            if remaining < 4 && self.settings.is_lenient() {
                debug!(
                    "skipping {} trailing bytes at offset {}, too short for a vendor log",
                    remaining, vendor_start
                );
                cursor.advance(remaining, "legacy.trailing")?;
            } else {
                let vendor = VendorErrorLog::from_cursor(cursor)
                    .map_err(|e| within_declared(e, vendor_start, remaining))?;
                trace!(
                    "decoded trailing vendor error log at offset {}, {} bytes",
                    vendor_start, remaining
                );
                sections.push(Section::new(
                    vendor_start,
                    remaining,
                    SectionBody::VendorErrorLog(vendor),
                ));
            }
        }

        Ok(sections)
    }
}

fn decode_legacy_body(
    cursor: &mut ByteCursor<'_>,
    format: FormatType,
    version: u8,
) -> DeserializationResult<SectionBody> {
    let body = match format {
        FormatType::Cpu => SectionBody::Cpu(CpuSection::from_cursor(cursor, version)?),
        FormatType::Memory => SectionBody::Memory(MemorySection::from_cursor(cursor, version)?),
        FormatType::Io => {
            SectionBody::Io(IoSection::Legacy(LegacyIo::from_cursor(cursor, version)?))
        }
        FormatType::Post => SectionBody::Post(PostSection::from_cursor(cursor)?),
        FormatType::Epow => {
            SectionBody::Epow(EpowSection::Legacy(LegacyEpow::from_cursor(cursor, version)?))
        }
        FormatType::IbmDiagnostic => {
            SectionBody::IbmDiagnostic(IbmDiagnosticSection::from_cursor(cursor)?)
        }
        FormatType::IbmServiceProcessor => {
            SectionBody::ServiceProcessor(ServiceProcessorSection::from_cursor(cursor)?)
        }
        FormatType::VendorSpecific1 | FormatType::VendorSpecific2 => {
            SectionBody::VendorErrorLog(VendorErrorLog::from_cursor(cursor)?)
        }
    };
    Ok(body)
}

fn decode_v6_body(
    window: &mut ByteCursor<'_>,
    header: V6Header,
) -> DeserializationResult<SectionBody> {
    let body = match header.section_id() {
        SectionId::PrivateHeader => {
            SectionBody::PrivateHeader(PrivateHeader::from_cursor(window, header)?)
        }
        SectionId::UserHeader => SectionBody::UserHeader(UserHeader::from_cursor(window, header)?),
        SectionId::Dump => SectionBody::Dump(DumpSection::from_cursor(window, header)?),
        SectionId::Epow => {
            SectionBody::Epow(EpowSection::V6(V6Epow::from_cursor(window, header)?))
        }
        SectionId::Io => SectionBody::Io(IoSection::V6(V6Io::from_cursor(window, header)?)),
        SectionId::LogicalResource => {
            SectionBody::LogicalResource(LriSection::from_cursor(window, header)?)
        }
        SectionId::MachineType => {
            SectionBody::MachineType(MtmsSection::from_cursor(window, header)?)
        }
        SectionId::PrimarySrc => SectionBody::PrimarySrc(SrcSection::from_cursor(window, header)?),
        SectionId::SecondarySrc => {
            SectionBody::SecondarySrc(SrcSection::from_cursor(window, header)?)
        }
        SectionId::Hotplug => SectionBody::Hotplug(HotplugSection::from_cursor(window, header)?),
        SectionId::Other(_) => SectionBody::Generic(GenericSection::from_cursor(window, header)?),
    };
    Ok(body)
}

/// The event buffer is known to hold every declared byte, so running out of bytes inside a
/// declared region means the declared length is too small for the layout.
fn within_declared(
    err: DeserializationError,
    start: usize,
    declared: usize,
) -> DeserializationError {
    match err {
        DeserializationError::Truncated {
            what, offset, need, ..
        } => DeserializationError::LengthMismatch {
            what,
            offset: start as u64,
            declared,
            actual: (offset as usize + need).saturating_sub(start),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensure_env_logger_initialized;
    use pretty_assertions::assert_eq;

    #[test]
    fn settings_default_to_strict() {
        assert!(!ParserSettings::new().is_lenient());
        assert!(ParserSettings::new().lenient_section_lengths(true).is_lenient());
    }

    #[test]
    fn truncation_inside_declared_region_is_a_length_mismatch() {
        let err = DeserializationError::Truncated {
            what: "dump.os_id",
            offset: 40,
            need: 40,
            have: 4,
        };
        match within_declared(err, 24, 28) {
            DeserializationError::LengthMismatch {
                what,
                offset,
                declared,
                actual,
            } => {
                assert_eq!(what, "dump.os_id");
                assert_eq!(offset, 24);
                assert_eq!(declared, 28);
                assert_eq!(actual, 56);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn other_errors_pass_through() {
        let err = DeserializationError::UnknownFormat {
            what: "extended_header.format_type",
            offset: 10,
            value: 9,
        };
        assert!(matches!(
            within_declared(err, 20, 28),
            DeserializationError::UnknownFormat { value: 9, .. }
        ));
    }

    #[test]
    fn header_only_event() {
        ensure_env_logger_initialized();
        let buf = [2u8, 0x00, 0x00, 0x00, 0, 0, 0, 0];
        let parsed = parse_buffer(&buf, &ParserSettings::default()).unwrap();
        assert_eq!(parsed.event_length, 8);
        assert_eq!(parsed.body_offset, EVENT_HEADER_SIZE);
        assert!(parsed.extended_header.is_none());
        assert!(parsed.sections.is_empty());
    }

    #[test]
    fn declared_length_beyond_buffer_is_truncated() {
        ensure_env_logger_initialized();
        let buf = [6u8, 0x04, 0x00, 0xe0, 0, 0, 0, 12];
        match parse_buffer(&buf, &ParserSettings::default()) {
            Err(DeserializationError::Truncated {
                what, need, have, ..
            }) => {
                assert_eq!(what, "event");
                assert_eq!(need, 20);
                assert_eq!(have, 8);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn short_extended_log_is_a_length_mismatch() {
        ensure_env_logger_initialized();
        // The buffer holds every declared byte, but six bytes cannot carry an extended header.
        let buf = [4u8, 0x04, 0x00, 0x01, 0, 0, 0, 6, 0xa2, 0, 0x01, 0, 0x12, 0x34];
        match parse_buffer(&buf, &ParserSettings::default()) {
            Err(DeserializationError::LengthMismatch {
                offset, declared, ..
            }) => {
                assert_eq!(offset, EVENT_HEADER_SIZE as u64);
                assert_eq!(declared, 6);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn missing_v6_signature_is_a_length_mismatch() {
        ensure_env_logger_initialized();
        let mut buf = vec![6u8, 0x04, 0x00, 0xe0, 0, 0, 0, 14];
        buf.extend_from_slice(&[0xa2, 0, 0x80, 0, 0x12, 0x34, 0x56, 0x78, 0x20, 0x24, 0x03, 0x15]);
        buf.extend_from_slice(b"IB");
        match parse_buffer(&buf, &ParserSettings::default()) {
            Err(DeserializationError::LengthMismatch {
                what,
                offset,
                declared,
                ..
            }) => {
                assert_eq!(what, "v6.magic");
                assert_eq!(offset, EVENT_HEADER_SIZE as u64);
                assert_eq!(declared, 14);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
