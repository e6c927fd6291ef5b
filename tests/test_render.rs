
use fixtures::*;
use pretty_assertions::assert_eq;
use rtasevent::{
    RenderSettings, Verbosity, dump_raw, parse_event, render_event, render_event_with_settings,
    render_raw_event, render_section,
};

fn src_event() -> Vec<u8> {
    let frus = vec![
        fru_callout(b'H', b"U78A9.01", b"00E1234\0"),
        fru_callout(b'M', b"U78A9.02", b"00E5678\0"),
    ];
    v6_event(&[
        private_header(5),
        user_header(),
        primary_src(b"B7001111", &frus),
        hotplug_drc_index(0x2100_0004),
        dump_locator(4, b"abc"),
    ])
}

#[test]
fn test_event_banners_and_headers() {
    ensure_env_logger_initialized();
    let event = parse_event(&simple_v6_event()).unwrap();
    let out = render_event(&event, Verbosity::Terse);
    let lines: Vec<&str> = out.lines().collect();

    assert!(lines[0].starts_with("==== RTAS Event Dump Begin ="));
    assert!(lines[lines.len() - 1].starts_with("==== RTAS Event Dump End ="));
    assert_eq!(
        lines[1],
        "Version:            00000006    Severity:           00000004 (Error)"
    );
    assert!(out.contains("Initiator           00000001 (CPU)\n"));
    assert!(out.contains("Target              00000004 (Memory)\n"));
    assert!(out.contains("Type                000000e0 (Platform Error)\n"));
    assert!(out.contains("Status:             recoverable\n"));

    assert!(out.contains("==== Private Header ="));
    assert!(out.contains("Date:               15 March 2024\n"));
    assert!(out.contains("Time:               12:34:56:78\n"));
    assert!(out.contains("Creator ID:         PHyp (H).\n"));
    assert!(out.contains("==== User Header ="));
    assert!(out.contains("==== EPOW Warning ="));
    assert!(out.contains("Sensor Value:       00000002    Action Code:        00000003\n"));
    assert!(out.contains("EPOW Event:         00000001"));

    assert!(!out.contains("Section ID:"));
    assert!(!out.contains("Section Count:"));
}

#[test]
fn test_detailed_rendering_adds_bookkeeping() {
    ensure_env_logger_initialized();
    let event = parse_event(&simple_v6_event()).unwrap();
    let out = render_event(&event, Verbosity::Detailed);

    assert!(out.contains("Disposition:        00000000 (Fully Recovered)\n"));
    assert!(out.contains("Extended:           00000001    Log Length:         0000006c\n"));
    assert!(out.contains("Section ID:               PH    Section Length:     00000030\n"));
    assert!(out.contains("Section ID:               UH    Section Length:     00000018\n"));
    assert!(out.contains("Section Count:      00000003\n"));
}

#[test]
fn test_event_number_in_banner() {
    ensure_env_logger_initialized();
    let event = parse_event(&simple_v6_event())
        .unwrap()
        .with_event_number(7);
    let out = render_event(&event, Verbosity::Terse);

    assert!(out.starts_with("==== RTAS Event Dump (7) Begin ="));
    assert!(out.contains("==== RTAS Event Dump (7) End ="));
}

#[test]
fn test_src_and_fru_rendering() {
    ensure_env_logger_initialized();
    let event = parse_event(&src_event()).unwrap();
    let out = render_event(&event, Verbosity::Detailed);

    assert!(out.contains("==== Primary SRC Section ="));
    assert!(out.contains("Primary Reference Code: \"B7001111\"\n"));
    assert!(out.contains("2: 00000002  3: 00000003  4: 00000004  5: 00000005\n"));
    assert!(out.contains("==== FRU Section (1) ="));
    assert!(out.contains("==== FRU Section (2) ="));
    assert!(out.contains("Location Code:      U78A9.01\n"));
    assert!(out.contains("Location Code:      U78A9.02\n"));
    assert!(out.contains("==== FRU ID Section ="));
    assert!(out.contains("FRU Stocking Part:"));
    assert!(out.contains("00E5678"));
    assert!(out.contains("==== Hotplug section ="));
    assert!(out.contains("Dump ID:abc\n"));
}

#[test]
fn test_sections_render_in_buffer_order() {
    ensure_env_logger_initialized();
    let event = parse_event(&src_event()).unwrap();
    let out = render_event(&event, Verbosity::Terse);

    let titles = [
        "==== Private Header",
        "==== User Header",
        "==== Primary SRC Section",
        "==== Hotplug section",
        "==== Dump Locator section",
    ];
    let positions: Vec<usize> = titles.iter().map(|t| out.find(t).unwrap()).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn test_render_section_matches_event_rendering() {
    ensure_env_logger_initialized();
    let event = parse_event(&src_event()).unwrap();
    let whole = render_event(&event, Verbosity::Terse);

    for section in event.sections() {
        let single = render_section(section, Verbosity::Terse);
        assert!(whole.contains(&single), "{}", single);
    }
}

#[test]
fn test_no_line_exceeds_configured_width() {
    ensure_env_logger_initialized();
    let event = parse_event(&src_event()).unwrap();

    for width in [20, 33, 40, 64, 80, 120] {
        let settings = RenderSettings::new()
            .width(width)
            .verbosity(Verbosity::Detailed);
        let out = render_event_with_settings(&event, &settings);
        for line in out.lines() {
            assert!(
                line.chars().count() <= width,
                "width {}: {:?}",
                width,
                line
            );
        }
    }
}

#[test]
fn test_titles_fill_to_width() {
    ensure_env_logger_initialized();
    let event = parse_event(&simple_v6_event()).unwrap();
    let out = render_event_with_settings(&event, &RenderSettings::new().width(60));

    let title = out.lines().next().unwrap();
    // Lead-in, title and the trailing fill leave eleven columns of slack.
    assert_eq!(title.chars().count(), 60 - 11);
    assert!(title.ends_with('='));
}

#[test]
fn test_legacy_cpu_rendering() {
    ensure_env_logger_initialized();
    let event = parse_event(&legacy_event(4, FORMAT_CPU, &cpu_body())).unwrap();
    let out = render_event(&event, Verbosity::Terse);

    assert!(out.contains("==== CPU Section ="));
    assert!(out.contains("Internal cache.\n"));
    assert!(out.contains("CPU id:             00000002    Failing Element:    00000010\n"));
    assert!(out.contains("Failing address:    0000000120000000\n"));
    assert!(out.contains("A reboot of the system may correct the problem.\n"));
    assert!(out.contains("Date:               2024/3/15  "));
}

#[test]
fn test_raw_event_dump() {
    ensure_env_logger_initialized();
    let buf = simple_v6_event();
    let event = parse_event(&buf).unwrap();
    let out = render_raw_event(&event);
    let lines: Vec<&str> = out.lines().collect();

    assert!(lines[0].starts_with("==== Raw RTAS Event Begin ="));
    assert!(lines[lines.len() - 1].starts_with("==== Raw RTAS Event End ="));
    assert_eq!(lines.len(), 2 + buf.len().div_ceil(16));
    assert!(lines[1].starts_with("0x0000:  068414e0 0000006c a2008000 12345678"));
}

#[test]
fn test_dump_raw_of_one_section() {
    ensure_env_logger_initialized();
    let buf = simple_v6_event();
    let event = parse_event(&buf).unwrap();
    let uh = &event.sections()[1];

    let out = dump_raw(event.raw(), uh.raw_range());
    assert!(out.starts_with(&format!("0x{:04x}:  5548", uh.raw_offset())));
    assert_eq!(out.lines().count(), uh.raw_len().div_ceil(16));
}
