
use fixtures::*;
use pretty_assertions::assert_eq;
use rtasevent::err::{DeserializationError, RtasEventError};
use rtasevent::sections::{EpowSection, FruSubstructure, HotplugTarget};
use rtasevent::{
    ParserSettings, RtasEvent, SectionBody, SectionKind, V6_BODY_OFFSET, parse_event, parse_events,
};

fn deserialization_error(result: rtasevent::err::Result<RtasEvent>) -> DeserializationError {
    match result {
        Err(RtasEventError::DeserializationError(e)) => e,
        other => panic!("expected a deserialization error, got {:?}", other),
    }
}

#[test]
fn test_parses_minimal_v6_event() {
    ensure_env_logger_initialized();
    let buf = simple_v6_event();
    let event = parse_event(&buf).unwrap();

    assert_eq!(event.version(), 6);
    assert_eq!(event.event_length(), buf.len());
    assert_eq!(event.body_offset(), V6_BODY_OFFSET);

    let kinds: Vec<SectionKind> = event.sections().iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::PrivateHeader,
            SectionKind::UserHeader,
            SectionKind::Epow
        ]
    );

    let ext = event.extended_header().unwrap();
    assert!(ext.is_valid());
    assert!(ext.power_pc);

    let ph = event.private_header().unwrap();
    assert_eq!(ph.scn_count, 3);
    assert_eq!(ph.creator_name(), "PHyp");
    assert_eq!(ph.plid, 0x9000_0001);
    assert_eq!(ph.log_entry_id, 0x2a);
    assert_eq!(ph.creator_subid_name, None);

    let uh = event.user_header().unwrap();
    assert_eq!(uh.subsystem_id, 0x10);
    assert_eq!(uh.event_severity, 0x20);

    assert_eq!(event.epow().unwrap().sensor_value(), 2);
    match event.epow().unwrap() {
        EpowSection::V6(epow) => {
            assert_eq!(epow.sensor_value, 2);
            assert_eq!(epow.action_code, 3);
            assert_eq!(epow.event_modifier, 1);
            assert_eq!(&epow.reason_code, b"REASON01");
        }
        other => panic!("expected a version 6 EPOW section, got {:?}", other),
    }
}

#[test]
fn test_sections_tile_the_event() {
    ensure_env_logger_initialized();
    let buf = v6_event(&[
        private_header(6),
        user_header(),
        machine_type(b"9119-MME", b"10ABCDE\0\0\0\0\0"),
        hotplug_drc_index(0x2100_0004),
        dump_locator(0, b""),
        epow(1, 1, 0),
    ]);
    let event = parse_event(&buf).unwrap();

    let mut offset = event.body_offset();
    for section in event.sections() {
        assert_eq!(section.raw_offset(), offset);
        offset += section.raw_len();
    }
    assert_eq!(offset, event.event_length());
}

#[test]
fn test_unknown_section_tag_is_kept_as_generic() {
    ensure_env_logger_initialized();
    let buf = v6_event(&[
        private_header(3),
        user_header(),
        v6_section(b"ZZ", b"\x01\x02\x03\x04"),
    ]);
    let event = parse_event(&buf).unwrap();

    let section = event.section(SectionKind::Generic).unwrap();
    match section.body() {
        SectionBody::Generic(generic) => {
            assert_eq!(generic.header.id_str(), "ZZ");
            assert_eq!(generic.data, vec![1, 2, 3, 4]);
        }
        other => panic!("expected a generic section, got {:?}", other),
    }
}

#[test]
fn test_hotplug_and_machine_type() {
    ensure_env_logger_initialized();
    let buf = v6_event(&[
        private_header(4),
        user_header(),
        hotplug_drc_index(0x2100_0004),
        machine_type(b"9119-MME", b"10ABCDE\0\0\0\0\0"),
    ]);
    let event = parse_event(&buf).unwrap();

    let hotplug = event.hotplug().unwrap();
    assert_eq!(hotplug.target, HotplugTarget::DrcIndex(0x2100_0004));
    assert_eq!(hotplug.drc_index(), Some(0x2100_0004));
    assert_eq!(hotplug.type_name(), "Slot");
    assert_eq!(hotplug.action_name(), "Add");

    let mtms = event.machine_type().unwrap();
    assert_eq!(mtms.mtms.model, "9119-MME");
    assert_eq!(mtms.mtms.serial_no, "10ABCDE");
}

#[test]
fn test_src_with_fru_callouts() {
    ensure_env_logger_initialized();
    let frus = vec![
        fru_callout(b'H', b"U78A9.01", b"00E1234\0"),
        fru_callout(b'M', b"U78A9.02", b"00E5678\0"),
    ];
    let buf = v6_event(&[
        private_header(3),
        user_header(),
        primary_src(b"B7001111", &frus),
    ]);
    let event = parse_event(&buf).unwrap();

    let src = event.primary_src().unwrap();
    assert!(src.is_primary());
    assert!(src.subsections_included());
    assert_eq!(src.primary_refcode, "B7001111");
    assert_eq!(src.ext_refcodes[0], 2);
    assert_eq!(src.ext_refcodes[7], 9);

    let callouts = src.fru_callouts();
    assert_eq!(callouts.len(), 2);
    assert_eq!(callouts[0].priority, 'H');
    assert_eq!(callouts[0].callout_type, 2);
    assert!(callouts[0].fru_id_included);
    assert_eq!(callouts[0].loc_code, "U78A9.01");
    assert_eq!(callouts[1].loc_code, "U78A9.02");

    match &callouts[1].substructures[..] {
        [FruSubstructure::Id(id)] => {
            assert_eq!(id.part_no.as_deref(), Some("00E5678"));
            assert_eq!(id.ccin, None);
            assert_eq!(id.component(), 0x10);
        }
        other => panic!("expected one FRU ID sub-structure, got {:?}", other),
    }

    assert!(event.secondary_src().is_none());
}

#[test]
fn test_rejects_bad_signature() {
    ensure_env_logger_initialized();
    let mut buf = simple_v6_event();
    buf[V6_BODY_OFFSET - 4..V6_BODY_OFFSET].copy_from_slice(b"XYZ\0");

    match deserialization_error(parse_event(&buf)) {
        DeserializationError::BadMagic { what, offset, .. } => {
            assert_eq!(what, "v6.magic");
            assert_eq!(offset, 20);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_signature_need_not_be_nul_terminated() {
    ensure_env_logger_initialized();
    let mut buf = simple_v6_event();
    buf[V6_BODY_OFFSET - 1] = b'!';
    assert!(parse_event(&buf).is_ok());
}

#[test]
fn test_private_header_must_come_first() {
    ensure_env_logger_initialized();
    let buf = v6_event(&[user_header(), private_header(2)]);

    match deserialization_error(parse_event(&buf)) {
        DeserializationError::BadMagic {
            what,
            offset,
            expected,
            found,
        } => {
            assert_eq!(what, "v6.required_section");
            assert_eq!(offset, V6_BODY_OFFSET as u64);
            assert_eq!(&expected[..2], b"PH");
            assert_eq!(&found[..2], b"UH");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_section_length_past_event_end() {
    ensure_env_logger_initialized();
    let mut buf = simple_v6_event();
    // The EPOW section is last, claim four more bytes than the event holds.
    let epow_start = buf.len() - 20;
    buf[epow_start + 3] = 24;

    match deserialization_error(parse_event(&buf)) {
        DeserializationError::LengthMismatch {
            what,
            offset,
            declared,
            actual,
        } => {
            assert_eq!(what, "v6_header.length");
            assert_eq!(offset, epow_start as u64);
            assert_eq!(declared, 24);
            assert_eq!(actual, 20);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_section_too_short_for_its_layout() {
    ensure_env_logger_initialized();
    // A dump section that stops before its OS id field.
    let buf = v6_event(&[
        private_header(3),
        user_header(),
        v6_section(b"DH", &[0; 20]),
    ]);

    match deserialization_error(parse_event(&buf)) {
        DeserializationError::LengthMismatch { declared, .. } => assert_eq!(declared, 28),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_trailing_section_bytes_strict_and_lenient() {
    ensure_env_logger_initialized();
    let mut epow_body = vec![0x23, 0x01];
    epow_body.extend_from_slice(b"REASON01");
    epow_body.extend_from_slice(&[0; 2]);
    epow_body.extend_from_slice(&[0xee; 4]);
    let buf = v6_event(&[private_header(3), user_header(), v6_section(b"EP", &epow_body)]);

    match deserialization_error(parse_event(&buf)) {
        DeserializationError::LengthMismatch { what, .. } => assert_eq!(what, "v6.section"),
        other => panic!("unexpected error {:?}", other),
    }

    let lenient = ParserSettings::new().lenient_section_lengths(true);
    let event = RtasEvent::from_buffer_with_settings(buf.clone(), &lenient).unwrap();
    let epow = event.section(SectionKind::Epow).unwrap();
    assert_eq!(epow.raw_len(), 24);
    assert_eq!(epow.raw_range().end, buf.len());
}

#[test]
fn test_truncated_buffers_are_rejected() {
    ensure_env_logger_initialized();
    let busy = v6_event(&[
        private_header(7),
        user_header(),
        primary_src(b"B7001111", &[fru_callout(b'H', b"U78A9.01", b"00E1234\0")]),
        machine_type(b"9119-MME", b"10ABCDE\0\0\0\0\0"),
        hotplug_drc_index(1),
        dump_locator(4, b"abc"),
        epow(2, 3, 1),
    ]);

    for buf in [simple_v6_event(), busy] {
        for len in 0..buf.len() {
            match deserialization_error(parse_event(&buf[..len])) {
                DeserializationError::Truncated { .. } => {}
                other => panic!("length {}: unexpected error {:?}", len, other),
            }
        }
    }
}

#[test]
fn test_bytes_past_declared_length_are_ignored() {
    ensure_env_logger_initialized();
    let mut buf = simple_v6_event();
    let declared = buf.len();
    buf.extend_from_slice(&[0xff; 16]);

    let event = parse_event(&buf).unwrap();
    assert_eq!(event.event_length(), declared);
    assert_eq!(event.raw().len(), declared);
    assert_eq!(event.sections().len(), 3);
}

#[test]
fn test_parse_events_keeps_input_order() {
    ensure_env_logger_initialized();
    let good = simple_v6_event();
    let bad = vec![6, 0x84, 0, 0];
    let inputs: Vec<&[u8]> = vec![&good, &bad, &good];

    let results = parse_events(&inputs);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert_eq!(
        results[2].as_ref().unwrap(),
        results[0].as_ref().unwrap()
    );
}

#[test]
fn test_later_versions_use_the_section_list_layout() {
    ensure_env_logger_initialized();
    let mut buf = simple_v6_event();
    buf[0] = 7;
    let event = parse_event(&buf).unwrap();

    assert_eq!(event.version(), 7);
    assert_eq!(event.body_offset(), V6_BODY_OFFSET);
    assert_eq!(event.sections().len(), 3);
    assert!(matches!(event.epow(), Some(EpowSection::V6(_))));
}
