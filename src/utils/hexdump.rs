use std::cmp;
use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;
const GROUP: usize = 4;

/// Formats `data` as a hex dump, 16 bytes per line.
///
/// Each line looks like
/// `0x0010:  00112233 44556677 8899aabb ccddeeff     [................]`
/// where the leading address is `base` plus the line's offset into `data`. Bytes missing on the
/// final line are padded with spaces in both the hex and the ASCII columns.
pub fn dump_hex(data: &[u8], base: usize) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(BYTES_PER_LINE) * 72);

    for (line_no, line) in data.chunks(BYTES_PER_LINE).enumerate() {
        let address = base + line_no * BYTES_PER_LINE;
        // Writing into a String cannot fail.
        let _ = write!(out, "0x{:04x}:  ", address);

        for i in 0..BYTES_PER_LINE {
            match line.get(i) {
                Some(b) => {
                    let _ = write!(out, "{:02x}", b);
                }
                None => out.push_str("  "),
            }
            if (i + 1) % GROUP == 0 {
                out.push(' ');
            }
        }

        out.push_str("    [");
        for i in 0..BYTES_PER_LINE {
            match line.get(i) {
                Some(&b) if b.is_ascii_graphic() || b == b' ' => out.push(b as char),
                Some(_) => out.push('.'),
                None => out.push(' '),
            }
        }
        out.push_str("]\n");
    }

    out
}

/// Dumps a small window of bytes around `offset`, for debug logging of parse failures.
pub(crate) fn dump_window(data: &[u8], offset: usize, radius: usize) -> String {
    let start = offset.saturating_sub(radius) / BYTES_PER_LINE * BYTES_PER_LINE;
    let end = cmp::min(offset.saturating_add(radius), data.len());
    if start >= end {
        return String::new();
    }
    dump_hex(&data[start..end], start)
}
