/// A packed sub-field of a byte or word, described by its lowest bit and its width.
///
/// Bit 0 is the least significant bit, so a field "in bits 7-5" of a byte is
/// `BitField::new(5, 3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub low: u8,
    pub width: u8,
}

impl BitField {
    pub const fn new(low: u8, width: u8) -> Self {
        BitField { low, width }
    }

    /// A single-bit flag at `bit`.
    pub const fn bit(bit: u8) -> Self {
        BitField { low: bit, width: 1 }
    }

    #[inline]
    pub const fn mask(self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    #[inline]
    pub const fn extract(self, value: u32) -> u32 {
        (value >> self.low) & self.mask()
    }

    #[inline]
    pub const fn extract_u8(self, value: u8) -> u8 {
        self.extract(value as u32) as u8
    }

    #[inline]
    pub const fn is_set(self, value: u32) -> bool {
        self.extract(value) != 0
    }
}

/// Shorthand for testing bit `bit` of a byte.
#[inline]
pub const fn bit_set(value: u8, bit: u8) -> bool {
    BitField::bit(bit).is_set(value as u32)
}
