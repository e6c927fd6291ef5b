use std::fmt::{self, Write};

use crate::utils::dump_hex;

pub const DEFAULT_WIDTH: usize = 80;
pub const MAX_WIDTH: usize = 1024;

/// Width of the `"==== "` lead-in, the space after the title and the slack kept at line end.
const TITLE_OVERHEAD: usize = 11;

/// A text sink that wraps output at a fixed column.
///
/// Text is buffered one line at a time. When a line reaches `width` characters it is broken
/// after the last space or hyphen it contains, or at the column itself when it has neither.
/// Embedded newlines always end the current line.
#[derive(Debug, Clone)]
pub struct TextWriter {
    out: String,
    line: String,
    column: usize,
    width: usize,
}

impl TextWriter {
    pub fn new(width: usize) -> Self {
        TextWriter {
            out: String::new(),
            line: String::new(),
            column: 0,
            width: width.clamp(1, MAX_WIDTH - 1),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of characters on the line being written.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn finish(mut self) -> String {
        self.out.push_str(&self.line);
        self.out
    }

    fn push_char(&mut self, c: char) {
        if c == '\n' {
            self.end_line();
            return;
        }

        if self.column >= self.width {
            if c == ' ' {
                self.end_line();
                return;
            }
            self.wrap();
        }

        self.line.push(c);
        self.column += 1;
    }

    fn end_line(&mut self) {
        self.out.push_str(&self.line);
        self.out.push('\n');
        self.line.clear();
        self.column = 0;
    }

    fn wrap(&mut self) {
        let Some(idx) = self.line.rfind([' ', '-']) else {
            self.end_line();
            return;
        };

        let carry_from = idx + 1;
        let keep_to = if self.line.as_bytes()[idx] == b'-' {
            carry_from
        } else {
            idx
        };

        let carried = self.line.split_off(carry_from);
        self.line.truncate(keep_to);
        self.end_line();
        self.column = carried.chars().count();
        self.line = carried;
    }

    /// `"==== title ====...=\n"`, padded with `=` to fit the configured width.
    pub fn title(&mut self, title: &str) -> fmt::Result {
        let head = format!("==== {} ", title);
        let fill = self
            .width
            .saturating_sub(head.chars().count() + TITLE_OVERHEAD);
        self.write_str(&head)?;
        for _ in 0..fill {
            self.push_char('=');
        }
        self.write_char('\n')
    }

    /// Hex dump of `data` starting on a fresh line, addresses relative to the first byte.
    pub fn raw_data(&mut self, data: &[u8]) -> fmt::Result {
        if self.column != 0 {
            self.write_char('\n')?;
        }
        self.write_str(&dump_hex(data, 0))
    }

    /// `label` padded to 20 columns followed by `value` as 8 hex digits and `tail`.
    pub fn hex_field(&mut self, label: &str, value: u32, tail: &str) -> fmt::Result {
        write!(self, "{:<20}{:08x}{}", label, value, tail)
    }

    /// Two hex fields sharing one line.
    pub fn hex_pair(&mut self, left: (&str, u32), right: (&str, u32)) -> fmt::Result {
        self.hex_field(left.0, left.1, "    ")?;
        self.hex_field(right.0, right.1, "\n")
    }

    /// A 64 bit value printed as two 8 digit words.
    pub fn addr_field(&mut self, label: &str, hi: u32, lo: u32) -> fmt::Result {
        writeln!(self, "{:<20}{:08x}{:08x}", label, hi, lo)
    }

    pub fn text_field(&mut self, label: &str, value: &str) -> fmt::Result {
        writeln!(self, "{:<20}{}", label, value)
    }

    pub fn line(&mut self, text: &str) -> fmt::Result {
        self.write_str(text)?;
        self.write_char('\n')
    }
}

impl Default for TextWriter {
    fn default() -> Self {
        TextWriter::new(DEFAULT_WIDTH)
    }
}

impl Write for TextWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.push_char(c);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn written(width: usize, text: &str) -> String {
        let mut w = TextWriter::new(width);
        w.write_str(text).unwrap();
        w.finish()
    }

    #[test]
    fn short_text_passes_through() {
        assert_eq!(written(80, "hello world\n"), "hello world\n");
    }

    #[test]
    fn breaks_at_last_space() {
        assert_eq!(written(10, "aaaa bbbb cccc"), "aaaa bbbb\ncccc");
    }

    #[test]
    fn breaks_after_hyphen() {
        assert_eq!(written(8, "abc-defghij"), "abc-\ndefghij");
    }

    #[test]
    fn breaks_mid_word_without_break_points() {
        assert_eq!(written(4, "abcdefghij"), "abcd\nefgh\nij");
    }

    #[test]
    fn newline_resets_column() {
        let mut w = TextWriter::new(6);
        w.write_str("abcde\nfgh").unwrap();
        assert_eq!(w.column(), 3);
        assert_eq!(w.finish(), "abcde\nfgh");
    }

    #[test]
    fn no_line_exceeds_width() {
        let text = "The quick brown fox jumps over the lazy dog, twice over-and-over again.\n";
        for width in 5..40 {
            let out = written(width, text);
            for line in out.lines() {
                assert!(line.chars().count() <= width, "{:?} at width {}", line, width);
            }
        }
    }

    #[test]
    fn title_fills_to_width() {
        let mut w = TextWriter::new(40);
        w.title("CPU Section").unwrap();
        let out = w.finish();
        assert_eq!(out, "==== CPU Section ============\n");
        assert_eq!(out.trim_end().len(), 40 - 2 - 9);
    }

    #[test]
    fn title_longer_than_width_has_no_fill() {
        let mut w = TextWriter::new(12);
        w.title("Long").unwrap();
        assert!(w.finish().starts_with("==== Long"));
    }

    #[test]
    fn raw_data_starts_on_new_line() {
        let mut w = TextWriter::new(80);
        w.write_str("Data:").unwrap();
        w.raw_data(b"AB").unwrap();
        let out = w.finish();
        assert!(out.starts_with("Data:\n0x0000:  4142"));
    }

    #[test]
    fn hex_fields_are_padded() {
        let mut w = TextWriter::new(80);
        w.hex_pair(("Version:", 6), ("Sub_type:", 1)).unwrap();
        assert_eq!(
            w.finish(),
            "Version:            00000006    Sub_type:           00000001\n"
        );
    }
}
