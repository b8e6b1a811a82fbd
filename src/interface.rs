//! Register interface over an I2C bus
//!
//! This module implements the `device-driver` register traits for a single
//! I2C target. Each register access is one bus transaction:
//!
//! - read: write the register pointer, then read with a repeated start
//! - write: one frame of the register pointer followed by the data bytes

use crate::MAX_BYTE_TRANSFER;
use device_driver::RegisterInterface;

/// I2C interface bound to one device address
#[derive(Debug)]
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface for the device at `address`
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus
    /// * `address` - 7-bit I2C device address
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::new(i2c, 0x68);
    /// let mut regs = Registers::new(interface);
    /// ```
    #[must_use]
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The device address this interface talks to
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C bus
    #[must_use]
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Frame the register pointer and data into one write buffer
///
/// Returns `None` when the data does not fit the buffer; such writes go out
/// as a pointer write followed by a data write in the same transaction.
fn write_frame(buffer: &mut [u8; MAX_BYTE_TRANSFER + 1], address: u8, data: &[u8]) -> Option<usize> {
    if data.len() > MAX_BYTE_TRANSFER {
        return None;
    }
    buffer[0] = address;
    buffer[1..=data.len()].copy_from_slice(data);
    Some(data.len() + 1)
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    // I2C transfers carry their own length, so the bit count goes unused
    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_BYTE_TRANSFER + 1];
        match write_frame(&mut buffer, address, write_data) {
            Some(len) => self.i2c.write(self.address, &buffer[..len]),
            // adjacent writes are sent without a restart between them
            None => self.i2c.transaction(
                self.address,
                &mut [
                    embedded_hal::i2c::Operation::Write(&[address]),
                    embedded_hal::i2c::Operation::Write(write_data),
                ],
            ),
        }
    }
}

#[cfg(feature = "async")]
impl<I2C, E> device_driver::AsyncRegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c
            .write_read(self.address, &[address], read_data)
            .await
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_BYTE_TRANSFER + 1];
        match write_frame(&mut buffer, address, write_data) {
            Some(len) => self.i2c.write(self.address, &buffer[..len]).await,
            None => {
                self.i2c
                    .transaction(
                        self.address,
                        &mut [
                            embedded_hal_async::i2c::Operation::Write(&[address]),
                            embedded_hal_async::i2c::Operation::Write(write_data),
                        ],
                    )
                    .await
            }
        }
    }
}
