//! Mask and shift arithmetic for register bits and bit-fields
//!
//! A bit-field is the run of `length` bits starting at bit `start`, where
//! `start` is the least significant bit of the field:
//!
//! ```text
//!  bit:   7 6 5 4 3 2 1 0
//!             [ field ]        start = 2, length = 4, mask = 0b0011_1100
//! ```
//!
//! All helpers operate on `u16` so the same code serves byte (`width = 8`)
//! and word (`width = 16`) registers. Ranges are validated against the
//! register width before any mask is built.

/// Width of a byte register in bits
pub const BYTE_WIDTH: u8 = 8;

/// Width of a word register in bits
pub const WORD_WIDTH: u8 = 16;

/// A bit range that does not fit inside the register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitRangeError {
    /// First bit of the rejected range
    pub start: u8,
    /// Length of the rejected range
    pub length: u8,
    /// Register width the range was checked against
    pub width: u8,
}

impl BitRangeError {
    /// Convert into the driver error for any bus error type
    ///
    /// A blanket `From` is not possible here since `Error<E>: From<E>`
    /// already covers `E = BitRangeError`.
    pub const fn into_error<E>(self) -> crate::Error<E> {
        crate::Error::InvalidBitRange {
            start: self.start,
            length: self.length,
            width: self.width,
        }
    }
}

/// Build the mask for `length` bits starting at `start`
///
/// # Errors
///
/// Returns [`BitRangeError`] if `length` is zero or the field extends past
/// bit `width - 1`.
pub const fn field_mask(start: u8, length: u8, width: u8) -> Result<u16, BitRangeError> {
    // u16 arithmetic: start + length cannot overflow for u8 inputs
    if length == 0 || start as u16 + length as u16 > width as u16 || width > WORD_WIDTH {
        return Err(BitRangeError {
            start,
            length,
            width,
        });
    }
    let ones = if length == WORD_WIDTH {
        u16::MAX
    } else {
        (1u16 << length) - 1
    };
    Ok(ones << start)
}

/// Build the single-bit mask for bit `bit`
///
/// # Errors
///
/// Returns [`BitRangeError`] if `bit >= width`.
pub const fn bit_mask(bit: u8, width: u8) -> Result<u16, BitRangeError> {
    field_mask(bit, 1, width)
}

/// Extract a field from `value`, shifted down to bit 0
///
/// # Errors
///
/// Returns [`BitRangeError`] if the field does not fit in `width` bits.
pub const fn extract(value: u16, start: u8, length: u8, width: u8) -> Result<u16, BitRangeError> {
    match field_mask(start, length, width) {
        Ok(mask) => Ok((value & mask) >> start),
        Err(e) => Err(e),
    }
}

/// Replace a field of `value` with `field`
///
/// Bits of `field` above `length` are discarded; bits of `value` outside the
/// field are preserved.
///
/// # Errors
///
/// Returns [`BitRangeError`] if the field does not fit in `width` bits.
pub const fn insert(
    value: u16,
    start: u8,
    length: u8,
    width: u8,
    field: u16,
) -> Result<u16, BitRangeError> {
    match field_mask(start, length, width) {
        Ok(mask) => Ok((value & !mask) | ((field << start) & mask)),
        Err(e) => Err(e),
    }
}

/// Set or clear bit `bit` of `value`
///
/// # Errors
///
/// Returns [`BitRangeError`] if `bit >= width`.
pub const fn with_bit(value: u16, bit: u8, width: u8, set: bool) -> Result<u16, BitRangeError> {
    match bit_mask(bit, width) {
        Ok(mask) if set => Ok(value | mask),
        Ok(mask) => Ok(value & !mask),
        Err(e) => Err(e),
    }
}
