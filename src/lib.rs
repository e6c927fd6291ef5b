#![deny(unused_must_use)]
#![forbid(unsafe_code)]
// Don't allow dbg! prints in release.
#![cfg_attr(not(debug_assertions), deny(clippy::dbg_macro))]

//! Decoder, renderer and dump-id rewriter for RTAS event logs, the binary error and event
//! records reported by firmware on POWER platforms.
//!
//! ```no_run
//! use rtasevent::{Verbosity, parse_event, render_event};
//!
//! # let buf: Vec<u8> = vec![];
//! let event = parse_event(&buf)?;
//! println!("{}", render_event(&event, Verbosity::Detailed));
//! # Ok::<(), rtasevent::err::RtasEventError>(())
//! ```

pub use event::{RtasEvent, set_dump_os_id};
pub use event_header::{
    EVENT_HEADER_SIZE, EXTENDED_HEADER_SIZE, EventHeader, ExtendedContext, ExtendedHeader,
    ExtendedStatus, FormatType,
};
pub use event_parser::{LEGACY_BODY_OFFSET, ParserSettings, V6_BODY_OFFSET, V6_MAGIC};
pub use render::{
    RenderSettings, TextWriter, Verbosity, dump_raw, render_event, render_event_with_settings,
    render_raw_event, render_raw_event_with_settings, render_section,
    render_section_with_settings,
};
pub use section_header::{SectionId, V6_HEADER_SIZE, V6Header};
pub use sections::{Section, SectionBody, SectionKind};
pub use utils::{RtasDate, RtasTime, dump_hex};

pub mod err;
pub mod sections;

mod event;
mod event_header;
mod event_parser;
mod render;
mod section_header;
mod utils;

#[cfg(feature = "multithreading")]
use rayon::prelude::*;

/// Decodes one event, copying `buf` into the returned event.
pub fn parse_event(buf: &[u8]) -> err::Result<RtasEvent> {
    RtasEvent::from_buffer(buf.to_vec())
}

/// Decodes independent event buffers, in parallel when the `multithreading` feature is on.
///
/// Results are returned in input order, each buffer failing or succeeding on its own.
pub fn parse_events(bufs: &[&[u8]]) -> Vec<err::Result<RtasEvent>> {
    #[cfg(feature = "multithreading")]
    let iter = bufs.par_iter();
    #[cfg(not(feature = "multithreading"))]
    let iter = bufs.iter();

    iter.map(|buf| parse_event(buf)).collect()
}

// Rust runs the tests concurrently, so unless we synchronize logging access
// it will crash when attempting to run `cargo test` with some logging facilities.
#[cfg(test)]
pub fn ensure_env_logger_initialized() {
    use std::io::Write;
    use std::sync::Once;

    static LOGGER_INIT: Once = Once::new();

    LOGGER_INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();
        builder
            .format(|buf, record| writeln!(buf, "[{}] - {}", record.level(), record.args()))
            .is_test(true)
            .init();
    });
}
