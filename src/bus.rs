//! Shared bus with per-call device selection
//!
//! [`I2cBus`] owns an I2C bus and lends out a [`Registers`] accessor for any
//! device address. This is the shape to use when one program talks to several
//! peripherals on the same bus, or picks the target address at runtime.

use crate::interface::I2cInterface;
use crate::registers::Registers;

/// An I2C bus that can address any device on it
#[derive(Debug)]
pub struct I2cBus<I2C> {
    i2c: I2C,
}

impl<I2C> I2cBus<I2C> {
    /// Wrap an I2C bus
    #[must_use]
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Register accessor for the device at `address`
    ///
    /// The accessor borrows the bus, so only one device is selected at a time.
    ///
    /// # Example
    /// ```ignore
    /// let mut bus = I2cBus::new(i2c);
    /// let id = bus.device(0x68).read_byte(0x75)?;
    /// bus.device(0x1E).write_bits(0x00, 2, 3, 0b100)?;
    /// ```
    pub fn device(&mut self, address: u8) -> Registers<I2cInterface<&mut I2C>> {
        Registers::new(I2cInterface::new(&mut self.i2c, address))
    }

    /// Consume the wrapper and return the I2C bus
    #[must_use]
    pub fn release(self) -> I2C {
        self.i2c
    }
}
