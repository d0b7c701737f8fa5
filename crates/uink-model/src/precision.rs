// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Packed per-channel-family decimal precisions.

/// Decimal precision per attribute family, packed into one 32-bit word.
///
/// Five 6-bit subfields at fixed shifts select the power-of-10 scale used
/// when stroke channels are encoded as integers on the wire: position
/// (X/Y/Z), size, rotation, scale (X/Y/Z), offset (X/Y/Z). A missing scheme
/// is equivalent to all-zero precisions (no scaling), and the encoder emits
/// the word only when some subfield is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrecisionScheme {
    value: u32,
}

impl PrecisionScheme {
    const POSITION_SHIFT: u32 = 0;
    const SIZE_SHIFT: u32 = 6;
    const ROTATION_SHIFT: u32 = 12;
    const SCALE_SHIFT: u32 = 18;
    const OFFSET_SHIFT: u32 = 24;
    const FIELD_MASK: u32 = 0x3f;

    /// Rebuilds a scheme from its packed wire value.
    #[must_use]
    pub fn from_value(value: u32) -> Self {
        Self { value }
    }

    /// Builds a scheme from the five subfield values (each clamped to 6 bits).
    #[must_use]
    pub fn new(position: u32, size: u32, rotation: u32, scale: u32, offset: u32) -> Self {
        let field = |v: u32, shift: u32| (v & Self::FIELD_MASK) << shift;
        Self {
            value: field(position, Self::POSITION_SHIFT)
                | field(size, Self::SIZE_SHIFT)
                | field(rotation, Self::ROTATION_SHIFT)
                | field(scale, Self::SCALE_SHIFT)
                | field(offset, Self::OFFSET_SHIFT),
        }
    }

    /// The packed 32-bit wire value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.value
    }

    /// True when every subfield is zero; such a scheme is not written.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.value == 0
    }

    fn field(self, shift: u32) -> u32 {
        (self.value >> shift) & Self::FIELD_MASK
    }

    /// Decimal digits for the position (X, Y, Z) channels.
    #[must_use]
    pub fn position(self) -> u32 {
        self.field(Self::POSITION_SHIFT)
    }

    /// Decimal digits for the size channel.
    #[must_use]
    pub fn size(self) -> u32 {
        self.field(Self::SIZE_SHIFT)
    }

    /// Decimal digits for the rotation channel.
    #[must_use]
    pub fn rotation(self) -> u32 {
        self.field(Self::ROTATION_SHIFT)
    }

    /// Decimal digits for the scale (X, Y, Z) channels.
    #[must_use]
    pub fn scale(self) -> u32 {
        self.field(Self::SCALE_SHIFT)
    }

    /// Decimal digits for the offset (X, Y, Z) channels.
    #[must_use]
    pub fn offset(self) -> u32 {
        self.field(Self::OFFSET_SHIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subfields_pack_at_documented_shifts() {
        let scheme = PrecisionScheme::new(2, 1, 0, 3, 63);
        assert_eq!(scheme.position(), 2);
        assert_eq!(scheme.size(), 1);
        assert_eq!(scheme.rotation(), 0);
        assert_eq!(scheme.scale(), 3);
        assert_eq!(scheme.offset(), 63);
        assert_eq!(scheme.value(), 2 | (1 << 6) | (3 << 18) | (63 << 24));
    }

    #[test]
    fn packed_value_round_trips() {
        let scheme = PrecisionScheme::new(5, 4, 3, 2, 1);
        assert_eq!(PrecisionScheme::from_value(scheme.value()), scheme);
    }

    #[test]
    fn default_is_empty() {
        assert!(PrecisionScheme::default().is_empty());
        assert!(!PrecisionScheme::new(0, 0, 1, 0, 0).is_empty());
    }
}
