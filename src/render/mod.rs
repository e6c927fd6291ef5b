//! Text rendering of decoded events.
//!
//! Every render call builds its own [`TextWriter`], so rendering holds no shared state and
//! events can be rendered from any number of threads at once.

mod sections;
mod writer;

use std::fmt;
use std::ops::Range;

use log::warn;

use crate::event::RtasEvent;
use crate::sections::Section;
use crate::utils::dump_hex;

pub use self::writer::{DEFAULT_WIDTH, MAX_WIDTH, TextWriter};

/// How much of each section is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Decoded fields only.
    #[default]
    Terse,
    /// Adds section headers, lengths and other bookkeeping fields.
    Detailed,
}

impl Verbosity {
    pub fn is_detailed(self) -> bool {
        self == Verbosity::Detailed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    width: usize,
    verbosity: Verbosity,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            width: DEFAULT_WIDTH,
            verbosity: Verbosity::default(),
        }
    }
}

impl RenderSettings {
    pub fn new() -> Self {
        RenderSettings::default()
    }

    /// Sets the wrap column. Values outside `1..1024` are ignored.
    pub fn width(mut self, width: usize) -> Self {
        if width == 0 || width >= MAX_WIDTH {
            warn!(
                "ignoring print width {}, it must be between 1 and {}",
                width,
                MAX_WIDTH - 1
            );
            return self;
        }
        self.width = width;
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn get_width(&self) -> usize {
        self.width
    }

    pub fn get_verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn writer(&self) -> TextWriter {
        TextWriter::new(self.width)
    }
}

// Writing into a `TextWriter` never fails, so the `fmt::Result`s below are only there to
// allow `?` inside the section writers.

pub fn render_event(event: &RtasEvent, verbosity: Verbosity) -> String {
    render_event_with_settings(event, &RenderSettings::default().verbosity(verbosity))
}

/// Renders the banner, both headers and every section of `event`.
pub fn render_event_with_settings(event: &RtasEvent, settings: &RenderSettings) -> String {
    let mut w = settings.writer();
    let _ = write_event(&mut w, event, settings.verbosity.is_detailed());
    w.finish()
}

fn write_event(w: &mut TextWriter, event: &RtasEvent, detailed: bool) -> fmt::Result {
    let banner = match event.event_number() {
        Some(n) => format!("RTAS Event Dump ({})", n),
        None => "RTAS Event Dump".to_string(),
    };

    w.title(&format!("{} Begin", banner))?;
    sections::write_event_header(w, event.header(), detailed)?;
    if let Some(ext) = event.extended_header() {
        sections::write_extended_header(w, ext, event.version())?;
    }
    for section in event.sections() {
        sections::write_section(w, section.body(), detailed)?;
    }
    w.title(&format!("{} End", banner))
}

pub fn render_section(section: &Section, verbosity: Verbosity) -> String {
    render_section_with_settings(section, &RenderSettings::default().verbosity(verbosity))
}

pub fn render_section_with_settings(section: &Section, settings: &RenderSettings) -> String {
    let mut w = settings.writer();
    let _ = sections::write_section(&mut w, section.body(), settings.verbosity.is_detailed());
    w.finish()
}

/// The declared bytes of `event` as a hex dump between begin and end banners.
pub fn render_raw_event(event: &RtasEvent) -> String {
    render_raw_event_with_settings(event, &RenderSettings::default())
}

pub fn render_raw_event_with_settings(event: &RtasEvent, settings: &RenderSettings) -> String {
    let mut w = settings.writer();
    let _ = write_raw_event(&mut w, event);
    w.finish()
}

fn write_raw_event(w: &mut TextWriter, event: &RtasEvent) -> fmt::Result {
    w.title("Raw RTAS Event Begin")?;
    w.raw_data(event.raw())?;
    w.title("Raw RTAS Event End")
}

/// Hex dump of `range` within `buf`, addressed by absolute offset.
///
/// The range is clamped to the buffer, so this works on input that failed to parse.
pub fn dump_raw(buf: &[u8], range: Range<usize>) -> String {
    let end = range.end.min(buf.len());
    let start = range.start.min(end);
    dump_hex(&buf[start..end], start)
}
