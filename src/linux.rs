//! Linux i2c-dev bus backend
//!
//! [`LinuxI2c`] exposes a `/dev/i2c-N` character device as an
//! `embedded_hal::i2c::I2c` bus. The device node is opened at the start of
//! every transaction and closed when it ends; the target address is selected
//! on the fresh handle each time. No handle is kept between transactions.
//!
//! # Example
//!
//! ```ignore
//! use i2c_regbits::{I2cInterface, LinuxI2c, Registers};
//!
//! let mut regs = Registers::new(I2cInterface::new(LinuxI2c::default(), 0x68));
//! let who_am_i = regs.read_byte(0x75)?;
//! ```

use std::path::{Path, PathBuf};

use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
use linux_embedded_hal::{I2CError, I2cdev};

/// Bus opened when no path is given
pub const DEFAULT_BUS_PATH: &str = "/dev/i2c-1";

/// Linux I2C bus opened per transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxI2c {
    path: PathBuf,
}

impl LinuxI2c {
    /// Use the character device at `path`
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Use `/dev/i2c-<bus>`
    #[must_use]
    pub fn bus(bus: u8) -> Self {
        Self {
            path: PathBuf::from(format!("/dev/i2c-{bus}")),
        }
    }

    /// Path of the character device
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<I2cdev, I2CError> {
        I2cdev::new(&self.path).map_err(|err| {
            tracing::warn!(path = %self.path.display(), error = ?err, "failed to open i2c device");
            I2CError::from(err)
        })
    }
}

impl Default for LinuxI2c {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_PATH)
    }
}

impl ErrorType for LinuxI2c {
    type Error = I2CError;
}

impl I2c<SevenBitAddress> for LinuxI2c {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        // closed again when `dev` drops at the end of the call
        let mut dev = self.open()?;
        tracing::trace!(
            path = %self.path.display(),
            address,
            operations = operations.len(),
            "i2c transaction"
        );

        dev.transaction(address, operations).inspect_err(|err| {
            tracing::warn!(
                path = %self.path.display(),
                address,
                error = ?err,
                "i2c transfer failed"
            );
        })
    }
}
