#![cfg_attr(not(feature = "linux"), no_std)]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod bits;
pub mod bus;
pub mod interface;
pub mod registers;

// Linux i2c-dev backend (feature-gated, requires std)
#[cfg(feature = "linux")]
pub mod linux;

// Re-export main types
pub use bus::I2cBus;
pub use interface::I2cInterface;
pub use registers::Registers;

#[cfg(feature = "linux")]
pub use linux::LinuxI2c;

/// Maximum number of data bytes moved by a single transfer
///
/// A write frame is the register pointer followed by the data, so one
/// 128-byte frame carries at most 127 data bytes. Reads are held to the
/// same limit.
pub const MAX_BYTE_TRANSFER: usize = 127;

/// Maximum number of 16-bit words moved by a single transfer
pub const MAX_WORD_TRANSFER: usize = 63;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Bit position or bit-field does not fit in the register width
    InvalidBitRange {
        /// First (least significant) bit of the requested range
        start: u8,
        /// Number of bits requested
        length: u8,
        /// Width of the register in bits (8 or 16)
        width: u8,
    },
    /// Transfer is empty or longer than the bus buffer allows
    InvalidLength {
        /// Number of bytes or words requested
        requested: usize,
        /// Largest accepted count
        max: usize,
    },
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus error: {e:?}"),
            Self::InvalidBitRange {
                start,
                length,
                width,
            } => write!(
                f,
                "bit range {start}+{length} does not fit a {width}-bit register"
            ),
            Self::InvalidLength { requested, max } => {
                write!(f, "transfer of {requested} not in 1..={max}")
            }
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for Error<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Bus(e) => Some(e),
            _ => None,
        }
    }
}
