mod bits;
mod byte_cursor;
pub(crate) mod bytes;
mod hexdump;
mod time;

pub use self::bits::{BitField, bit_set};
pub(crate) use self::byte_cursor::{ByteCursor, nul_terminated};
pub use self::hexdump::dump_hex;
pub(crate) use self::hexdump::dump_window;
pub use self::time::{RtasDate, RtasTime, to_civil_datetime};
