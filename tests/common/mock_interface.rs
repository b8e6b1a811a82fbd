//! Mock register interface for testing the register operations

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
use device_driver::RegisterInterface;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Records operations performed on the mock interface
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Read starting at a register
    Read {
        /// First register address
        address: u8,
        /// Bytes returned
        data: Vec<u8>,
    },
    /// Write starting at a register
    Write {
        /// First register address
        address: u8,
        /// Bytes written
        data: Vec<u8>,
    },
}

/// Shared state for mock interface (uses interior mutability)
#[derive(Debug, Default)]
struct MockState {
    /// Simulated register values
    registers: HashMap<u8, u8>,

    /// Operations log for verification
    operations: Vec<Operation>,

    /// Failure injection flags
    fail_next_read: bool,
    fail_next_write: bool,
}

/// Mock interface for testing
#[derive(Clone, Default)]
pub struct MockInterface {
    state: Rc<RefCell<MockState>>,
}

impl MockInterface {
    /// Create a new mock interface with every register reading 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a register value
    pub fn set_register(&self, address: u8, value: u8) {
        self.state.borrow_mut().registers.insert(address, value);
    }

    /// Set a big-endian word at `address` and `address + 1`
    pub fn set_word(&self, address: u8, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.set_register(address, high);
        self.set_register(address.wrapping_add(1), low);
    }

    /// Get a register value
    pub fn get_register(&self, address: u8) -> u8 {
        self.state
            .borrow()
            .registers
            .get(&address)
            .copied()
            .unwrap_or(0)
    }

    /// Get the big-endian word at `address` and `address + 1`
    pub fn get_word(&self, address: u8) -> u16 {
        u16::from_be_bytes([
            self.get_register(address),
            self.get_register(address.wrapping_add(1)),
        ])
    }

    /// Inject a read failure on the next read operation
    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_next_read = true;
    }

    /// Inject a write failure on the next write operation
    pub fn fail_next_write(&self) {
        self.state.borrow_mut().fail_next_write = true;
    }

    /// Get the operations log
    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().operations.clone()
    }

    /// Clear the operations log
    #[allow(dead_code)]
    pub fn clear_operations(&self) {
        self.state.borrow_mut().operations.clear();
    }

    /// Count write operations
    pub fn write_count(&self) -> usize {
        self.state
            .borrow()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::Write { .. }))
            .count()
    }
}

/// Mock error type
#[derive(Debug, Clone, PartialEq)]
pub enum MockError {
    /// Simulated communication error
    Communication,
}

impl RegisterInterface for MockInterface {
    type Error = MockError;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if state.fail_next_read {
            state.fail_next_read = false;
            return Err(MockError::Communication);
        }

        assert_eq!(size_bits as usize, read_data.len() * 8);

        for (i, byte) in read_data.iter_mut().enumerate() {
            let reg_addr = address.wrapping_add(i as u8);
            *byte = state.registers.get(&reg_addr).copied().unwrap_or(0);
        }

        state.operations.push(Operation::Read {
            address,
            data: read_data.to_vec(),
        });

        Ok(())
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(MockError::Communication);
        }

        assert_eq!(size_bits as usize, write_data.len() * 8);

        for (i, &byte) in write_data.iter().enumerate() {
            let reg_addr = address.wrapping_add(i as u8);
            state.registers.insert(reg_addr, byte);
        }

        state.operations.push(Operation::Write {
            address,
            data: write_data.to_vec(),
        });

        Ok(())
    }
}

#[cfg(feature = "async")]
impl AsyncRegisterInterface for MockInterface {
    type Error = MockError;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        // Delegate to synchronous implementation
        RegisterInterface::read_register(self, address, size_bits, read_data)
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        // Delegate to synchronous implementation
        RegisterInterface::write_register(self, address, size_bits, write_data)
    }
}
