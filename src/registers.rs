//! Byte, word, bit and bit-field register operations
//!
//! [`Registers`] wraps any `device-driver` register interface and provides
//! the masked accessors a peripheral driver is usually built from. The
//! register map itself belongs to the caller; this module only knows about
//! register addresses and widths.
//!
//! Words are transferred big-endian (high byte at the lower register address).
//!
//! Bit and bit-field writes are read-modify-write sequences of two separate
//! bus transactions. Nothing prevents another bus user from touching the
//! register in between.
//!
//! # Example
//!
//! ```ignore
//! # use i2c_regbits::{I2cInterface, Registers};
//! # let i2c: linux_embedded_hal::I2cdev = todo!();
//! let mut regs = Registers::new(I2cInterface::new(i2c, 0x68));
//!
//! // PWR_MGMT_1.SLEEP
//! regs.write_bit(0x6B, 6, false)?;
//! // GYRO_CONFIG.FS_SEL, bits 4:3
//! regs.write_bits(0x1B, 3, 2, 0b11)?;
//! let accel_x = regs.read_word(0x3B)?;
//! # Ok::<(), i2c_regbits::Error<()>>(())
//! ```

use crate::bits::{self, BYTE_WIDTH, BitRangeError, WORD_WIDTH};
use crate::{Error, MAX_BYTE_TRANSFER, MAX_WORD_TRANSFER};

#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;

/// Register accessor for one device
#[derive(Debug)]
pub struct Registers<I> {
    interface: I,
}

impl<I> Registers<I> {
    /// Create a register accessor over `interface`
    #[must_use]
    pub const fn new(interface: I) -> Self {
        Self { interface }
    }

    /// Borrow the underlying register interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Consume the accessor and return the register interface
    #[must_use]
    pub fn release(self) -> I {
        self.interface
    }
}

/// Reject empty transfers and transfers over `max`
fn check_len<E>(requested: usize, max: usize) -> Result<(), Error<E>> {
    if requested == 0 || requested > max {
        #[cfg(feature = "defmt")]
        defmt::warn!("Rejected transfer of {} (max {})", requested, max);

        return Err(Error::InvalidLength { requested, max });
    }
    Ok(())
}

fn check_range<E>(mask: Result<u16, BitRangeError>) -> Result<u16, Error<E>> {
    mask.map_err(|e| {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "Rejected bit range {}+{} on {}-bit register",
            e.start,
            e.length,
            e.width
        );

        e.into_error()
    })
}

/// Transfer size in bits as reported to the register interface
#[allow(clippy::cast_possible_truncation)]
const fn size_bits(bytes: usize) -> u32 {
    // bytes never exceeds 2 * MAX_WORD_TRANSFER here
    (bytes * 8) as u32
}

/// Low byte of a value computed against [`BYTE_WIDTH`]
const fn low_byte(value: u16) -> u8 {
    value.to_le_bytes()[0]
}

fn decode_words(bytes: &[u8], words: &mut [u16]) {
    for (word, pair) in words.iter_mut().zip(bytes.chunks_exact(2)) {
        *word = u16::from_be_bytes([pair[0], pair[1]]);
    }
}

fn encode_words(words: &[u16], bytes: &mut [u8]) {
    for (pair, word) in bytes.chunks_exact_mut(2).zip(words) {
        pair.copy_from_slice(&word.to_be_bytes());
    }
}

#[cfg(not(feature = "async"))]
impl<I> Registers<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Read `buf.len()` consecutive bytes starting at `register`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `buf` is empty or longer than
    /// [`MAX_BYTE_TRANSFER`], or [`Error::Bus`] if the transfer fails.
    pub fn read_bytes(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<I::Error>> {
        check_len(buf.len(), MAX_BYTE_TRANSFER)?;
        self.interface
            .read_register(register, size_bits(buf.len()), buf)?;
        Ok(())
    }

    /// Read a single byte register
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn read_byte(&mut self, register: u8) -> Result<u8, Error<I::Error>> {
        let mut data = [0u8];
        self.read_bytes(register, &mut data)?;
        Ok(data[0])
    }

    /// Read `buf.len()` consecutive big-endian words starting at `register`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `buf` is empty or longer than
    /// [`MAX_WORD_TRANSFER`], or [`Error::Bus`] if the transfer fails.
    pub fn read_words(&mut self, register: u8, buf: &mut [u16]) -> Result<(), Error<I::Error>> {
        check_len(buf.len(), MAX_WORD_TRANSFER)?;
        let mut bytes = [0u8; MAX_WORD_TRANSFER * 2];
        let bytes = &mut bytes[..buf.len() * 2];
        self.interface
            .read_register(register, size_bits(bytes.len()), bytes)?;
        decode_words(bytes, buf);
        Ok(())
    }

    /// Read a single big-endian word register
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn read_word(&mut self, register: u8) -> Result<u16, Error<I::Error>> {
        let mut data = [0u16];
        self.read_words(register, &mut data)?;
        Ok(data[0])
    }

    /// Read bit `bit` (0-7) of a byte register
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if `bit > 7`, or [`Error::Bus`] if
    /// the transfer fails.
    pub fn read_bit(&mut self, register: u8, bit: u8) -> Result<bool, Error<I::Error>> {
        // range errors must not cost a bus transaction
        check_range(bits::bit_mask(bit, BYTE_WIDTH))?;
        let current = u16::from(self.read_byte(register)?);
        Ok(check_range(bits::extract(current, bit, 1, BYTE_WIDTH))? != 0)
    }

    /// Read bit `bit` (0-15) of a word register
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if `bit > 15`, or [`Error::Bus`] if
    /// the transfer fails.
    pub fn read_bit_word(&mut self, register: u8, bit: u8) -> Result<bool, Error<I::Error>> {
        check_range(bits::bit_mask(bit, WORD_WIDTH))?;
        let current = self.read_word(register)?;
        Ok(check_range(bits::extract(current, bit, 1, WORD_WIDTH))? != 0)
    }

    /// Read the `length`-bit field starting at bit `start` of a byte register
    ///
    /// The field is returned shifted down to bit 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if the field does not fit in 8 bits,
    /// or [`Error::Bus`] if the transfer fails.
    pub fn read_bits(&mut self, register: u8, start: u8, length: u8) -> Result<u8, Error<I::Error>> {
        check_range(bits::field_mask(start, length, BYTE_WIDTH))?;
        let current = u16::from(self.read_byte(register)?);
        let field = check_range(bits::extract(current, start, length, BYTE_WIDTH))?;
        Ok(low_byte(field))
    }

    /// Read the `length`-bit field starting at bit `start` of a word register
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if the field does not fit in 16
    /// bits, or [`Error::Bus`] if the transfer fails.
    pub fn read_bits_word(
        &mut self,
        register: u8,
        start: u8,
        length: u8,
    ) -> Result<u16, Error<I::Error>> {
        check_range(bits::field_mask(start, length, WORD_WIDTH))?;
        let current = self.read_word(register)?;
        check_range(bits::extract(current, start, length, WORD_WIDTH))
    }

    /// Write `data` to consecutive registers starting at `register`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `data` is empty or longer than
    /// [`MAX_BYTE_TRANSFER`], or [`Error::Bus`] if the transfer fails.
    pub fn write_bytes(&mut self, register: u8, data: &[u8]) -> Result<(), Error<I::Error>> {
        check_len(data.len(), MAX_BYTE_TRANSFER)?;
        self.interface
            .write_register(register, size_bits(data.len()), data)?;
        Ok(())
    }

    /// Write a single byte register
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.write_bytes(register, &[value])
    }

    /// Write `data` as consecutive big-endian words starting at `register`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `data` is empty or longer than
    /// [`MAX_WORD_TRANSFER`], or [`Error::Bus`] if the transfer fails.
    pub fn write_words(&mut self, register: u8, data: &[u16]) -> Result<(), Error<I::Error>> {
        check_len(data.len(), MAX_WORD_TRANSFER)?;
        let mut bytes = [0u8; MAX_WORD_TRANSFER * 2];
        let bytes = &mut bytes[..data.len() * 2];
        encode_words(data, bytes);
        self.interface
            .write_register(register, size_bits(bytes.len()), bytes)?;
        Ok(())
    }

    /// Write a single big-endian word register
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn write_word(&mut self, register: u8, value: u16) -> Result<(), Error<I::Error>> {
        self.write_words(register, &[value])
    }

    /// Read a byte register, transform it with `f`, and write the result back
    ///
    /// Nothing is written if the read fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if either transfer fails.
    pub fn modify_byte<F>(&mut self, register: u8, f: F) -> Result<(), Error<I::Error>>
    where
        F: FnOnce(u8) -> u8,
    {
        let current = self.read_byte(register)?;
        self.write_byte(register, f(current))
    }

    /// Read a word register, transform it with `f`, and write the result back
    ///
    /// Nothing is written if the read fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if either transfer fails.
    pub fn modify_word<F>(&mut self, register: u8, f: F) -> Result<(), Error<I::Error>>
    where
        F: FnOnce(u16) -> u16,
    {
        let current = self.read_word(register)?;
        self.write_word(register, f(current))
    }

    /// Set or clear bit `bit` (0-7) of a byte register
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if `bit > 7`, or [`Error::Bus`] if
    /// either transfer fails.
    pub fn write_bit(&mut self, register: u8, bit: u8, value: bool) -> Result<(), Error<I::Error>> {
        check_range(bits::bit_mask(bit, BYTE_WIDTH))?;
        let current = u16::from(self.read_byte(register)?);
        let updated = check_range(bits::with_bit(current, bit, BYTE_WIDTH, value))?;
        self.write_byte(register, low_byte(updated))
    }

    /// Set or clear bit `bit` (0-15) of a word register
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if `bit > 15`, or [`Error::Bus`] if
    /// either transfer fails.
    pub fn write_bit_word(
        &mut self,
        register: u8,
        bit: u8,
        value: bool,
    ) -> Result<(), Error<I::Error>> {
        check_range(bits::bit_mask(bit, WORD_WIDTH))?;
        let current = self.read_word(register)?;
        let updated = check_range(bits::with_bit(current, bit, WORD_WIDTH, value))?;
        self.write_word(register, updated)
    }

    /// Replace the `length`-bit field starting at bit `start` of a byte
    /// register with the low `length` bits of `value`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if the field does not fit in 8 bits,
    /// or [`Error::Bus`] if either transfer fails.
    pub fn write_bits(
        &mut self,
        register: u8,
        start: u8,
        length: u8,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        check_range(bits::field_mask(start, length, BYTE_WIDTH))?;
        let current = u16::from(self.read_byte(register)?);
        let field = u16::from(value);
        let updated = check_range(bits::insert(current, start, length, BYTE_WIDTH, field))?;
        self.write_byte(register, low_byte(updated))
    }

    /// Replace the `length`-bit field starting at bit `start` of a word
    /// register with the low `length` bits of `value`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if the field does not fit in 16
    /// bits, or [`Error::Bus`] if either transfer fails.
    pub fn write_bits_word(
        &mut self,
        register: u8,
        start: u8,
        length: u8,
        value: u16,
    ) -> Result<(), Error<I::Error>> {
        check_range(bits::field_mask(start, length, WORD_WIDTH))?;
        let current = self.read_word(register)?;
        let updated = check_range(bits::insert(current, start, length, WORD_WIDTH, value))?;
        self.write_word(register, updated)
    }
}

#[cfg(feature = "async")]
impl<I> Registers<I>
where
    I: AsyncRegisterInterface<AddressType = u8>,
{
    /// Read `buf.len()` consecutive bytes starting at `register` (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `buf` is empty or longer than
    /// [`MAX_BYTE_TRANSFER`], or [`Error::Bus`] if the transfer fails.
    pub async fn read_bytes(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<I::Error>> {
        check_len(buf.len(), MAX_BYTE_TRANSFER)?;
        self.interface
            .read_register(register, size_bits(buf.len()), buf)
            .await?;
        Ok(())
    }

    /// Read a single byte register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn read_byte(&mut self, register: u8) -> Result<u8, Error<I::Error>> {
        let mut data = [0u8];
        self.read_bytes(register, &mut data).await?;
        Ok(data[0])
    }

    /// Read `buf.len()` consecutive big-endian words starting at `register` (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `buf` is empty or longer than
    /// [`MAX_WORD_TRANSFER`], or [`Error::Bus`] if the transfer fails.
    pub async fn read_words(
        &mut self,
        register: u8,
        buf: &mut [u16],
    ) -> Result<(), Error<I::Error>> {
        check_len(buf.len(), MAX_WORD_TRANSFER)?;
        let mut bytes = [0u8; MAX_WORD_TRANSFER * 2];
        let bytes = &mut bytes[..buf.len() * 2];
        self.interface
            .read_register(register, size_bits(bytes.len()), bytes)
            .await?;
        decode_words(bytes, buf);
        Ok(())
    }

    /// Read a single big-endian word register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn read_word(&mut self, register: u8) -> Result<u16, Error<I::Error>> {
        let mut data = [0u16];
        self.read_words(register, &mut data).await?;
        Ok(data[0])
    }

    /// Read bit `bit` (0-7) of a byte register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if `bit > 7`, or [`Error::Bus`] if
    /// the transfer fails.
    pub async fn read_bit(&mut self, register: u8, bit: u8) -> Result<bool, Error<I::Error>> {
        check_range(bits::bit_mask(bit, BYTE_WIDTH))?;
        let current = u16::from(self.read_byte(register).await?);
        Ok(check_range(bits::extract(current, bit, 1, BYTE_WIDTH))? != 0)
    }

    /// Read bit `bit` (0-15) of a word register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if `bit > 15`, or [`Error::Bus`] if
    /// the transfer fails.
    pub async fn read_bit_word(&mut self, register: u8, bit: u8) -> Result<bool, Error<I::Error>> {
        check_range(bits::bit_mask(bit, WORD_WIDTH))?;
        let current = self.read_word(register).await?;
        Ok(check_range(bits::extract(current, bit, 1, WORD_WIDTH))? != 0)
    }

    /// Read the `length`-bit field starting at bit `start` of a byte register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if the field does not fit in 8 bits,
    /// or [`Error::Bus`] if the transfer fails.
    pub async fn read_bits(
        &mut self,
        register: u8,
        start: u8,
        length: u8,
    ) -> Result<u8, Error<I::Error>> {
        check_range(bits::field_mask(start, length, BYTE_WIDTH))?;
        let current = u16::from(self.read_byte(register).await?);
        let field = check_range(bits::extract(current, start, length, BYTE_WIDTH))?;
        Ok(low_byte(field))
    }

    /// Read the `length`-bit field starting at bit `start` of a word register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if the field does not fit in 16
    /// bits, or [`Error::Bus`] if the transfer fails.
    pub async fn read_bits_word(
        &mut self,
        register: u8,
        start: u8,
        length: u8,
    ) -> Result<u16, Error<I::Error>> {
        check_range(bits::field_mask(start, length, WORD_WIDTH))?;
        let current = self.read_word(register).await?;
        check_range(bits::extract(current, start, length, WORD_WIDTH))
    }

    /// Write `data` to consecutive registers starting at `register` (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `data` is empty or longer than
    /// [`MAX_BYTE_TRANSFER`], or [`Error::Bus`] if the transfer fails.
    pub async fn write_bytes(&mut self, register: u8, data: &[u8]) -> Result<(), Error<I::Error>> {
        check_len(data.len(), MAX_BYTE_TRANSFER)?;
        self.interface
            .write_register(register, size_bits(data.len()), data)
            .await?;
        Ok(())
    }

    /// Write a single byte register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.write_bytes(register, &[value]).await
    }

    /// Write `data` as consecutive big-endian words starting at `register` (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `data` is empty or longer than
    /// [`MAX_WORD_TRANSFER`], or [`Error::Bus`] if the transfer fails.
    pub async fn write_words(&mut self, register: u8, data: &[u16]) -> Result<(), Error<I::Error>> {
        check_len(data.len(), MAX_WORD_TRANSFER)?;
        let mut bytes = [0u8; MAX_WORD_TRANSFER * 2];
        let bytes = &mut bytes[..data.len() * 2];
        encode_words(data, bytes);
        self.interface
            .write_register(register, size_bits(bytes.len()), bytes)
            .await?;
        Ok(())
    }

    /// Write a single big-endian word register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn write_word(&mut self, register: u8, value: u16) -> Result<(), Error<I::Error>> {
        self.write_words(register, &[value]).await
    }

    /// Read a byte register, transform it with `f`, and write the result back (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if either transfer fails.
    pub async fn modify_byte<F>(&mut self, register: u8, f: F) -> Result<(), Error<I::Error>>
    where
        F: FnOnce(u8) -> u8,
    {
        let current = self.read_byte(register).await?;
        self.write_byte(register, f(current)).await
    }

    /// Read a word register, transform it with `f`, and write the result back (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if either transfer fails.
    pub async fn modify_word<F>(&mut self, register: u8, f: F) -> Result<(), Error<I::Error>>
    where
        F: FnOnce(u16) -> u16,
    {
        let current = self.read_word(register).await?;
        self.write_word(register, f(current)).await
    }

    /// Set or clear bit `bit` (0-7) of a byte register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if `bit > 7`, or [`Error::Bus`] if
    /// either transfer fails.
    pub async fn write_bit(
        &mut self,
        register: u8,
        bit: u8,
        value: bool,
    ) -> Result<(), Error<I::Error>> {
        check_range(bits::bit_mask(bit, BYTE_WIDTH))?;
        let current = u16::from(self.read_byte(register).await?);
        let updated = check_range(bits::with_bit(current, bit, BYTE_WIDTH, value))?;
        self.write_byte(register, low_byte(updated)).await
    }

    /// Set or clear bit `bit` (0-15) of a word register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if `bit > 15`, or [`Error::Bus`] if
    /// either transfer fails.
    pub async fn write_bit_word(
        &mut self,
        register: u8,
        bit: u8,
        value: bool,
    ) -> Result<(), Error<I::Error>> {
        check_range(bits::bit_mask(bit, WORD_WIDTH))?;
        let current = self.read_word(register).await?;
        let updated = check_range(bits::with_bit(current, bit, WORD_WIDTH, value))?;
        self.write_word(register, updated).await
    }

    /// Replace a bit-field of a byte register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if the field does not fit in 8 bits,
    /// or [`Error::Bus`] if either transfer fails.
    pub async fn write_bits(
        &mut self,
        register: u8,
        start: u8,
        length: u8,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        check_range(bits::field_mask(start, length, BYTE_WIDTH))?;
        let current = u16::from(self.read_byte(register).await?);
        let field = u16::from(value);
        let updated = check_range(bits::insert(current, start, length, BYTE_WIDTH, field))?;
        self.write_byte(register, low_byte(updated)).await
    }

    /// Replace a bit-field of a word register (async)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitRange`] if the field does not fit in 16
    /// bits, or [`Error::Bus`] if either transfer fails.
    pub async fn write_bits_word(
        &mut self,
        register: u8,
        start: u8,
        length: u8,
        value: u16,
    ) -> Result<(), Error<I::Error>> {
        check_range(bits::field_mask(start, length, WORD_WIDTH))?;
        let current = self.read_word(register).await?;
        let updated = check_range(bits::insert(current, start, length, WORD_WIDTH, value))?;
        self.write_word(register, updated).await
    }
}
