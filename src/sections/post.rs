use bitflags::bitflags;

use crate::err::DeserializationResult;
use crate::utils::ByteCursor;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PostErrors: u8 {
        const FIRMWARE = 0x80;
        const CONFIG = 0x40;
        const CPU = 0x20;
        const MEMORY = 0x10;
        const IO = 0x08;
        const KEYBOARD = 0x04;
        const MOUSE = 0x02;
        const DISPLAY = 0x01;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PostIplErrors: u8 {
        const IPL_FLOPPY = 0x80;
        const IPL_CONTROLLER = 0x40;
        const IPL_CDROM = 0x20;
        const IPL_DISK = 0x10;
        const IPL_NET = 0x08;
        const IPL_OTHER = 0x04;
        const FIRMWARE_SELFTEST = 0x01;
    }
}

/// Power-on self test results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSection {
    pub errors: PostErrors,
    pub ipl_errors: PostIplErrors,
    pub devname: String,
    pub err_code: [u8; 4],
    pub firmware_rev: [u8; 2],
    pub loc_code: String,
}

impl PostSection {
    pub(crate) fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        Ok(PostSection {
            errors: PostErrors::from_bits_retain(cursor.u8_named("post.errors")?),
            ipl_errors: PostIplErrors::from_bits_retain(cursor.u8_named("post.ipl")?),
            devname: cursor.fixed_str(12, "post.devname")?,
            err_code: cursor.array::<4>("post.err_code")?,
            firmware_rev: cursor.array::<2>("post.firmware_rev")?,
            loc_code: cursor.fixed_str(8, "post.loc_code")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_post_body() {
        let mut raw = [0u8; 28];
        raw[0] = 0x10;
        raw[1] = 0x81;
        raw[2..7].copy_from_slice(b"hdisk");
        raw[14..18].copy_from_slice(&[0x20, 0xee, 0x00, 0x0b]);
        raw[18..20].copy_from_slice(&[0x01, 0x02]);
        raw[20..28].copy_from_slice(b"U0.1-P1 ");

        let mut cursor = ByteCursor::new(&raw);
        let post = PostSection::from_cursor(&mut cursor).unwrap();
        assert_eq!(post.errors, PostErrors::MEMORY);
        assert_eq!(
            post.ipl_errors,
            PostIplErrors::IPL_FLOPPY | PostIplErrors::FIRMWARE_SELFTEST
        );
        assert_eq!(post.devname, "hdisk");
        assert_eq!(post.err_code, [0x20, 0xee, 0x00, 0x0b]);
        assert_eq!(post.loc_code, "U0.1-P1 ");
        assert_eq!(cursor.pos(), 28);
    }
}
