//! Unit tests for single-bit access

use crate::common::{Operation, create_mock_registers};

#[test]
fn test_read_bit_set_and_clear() {
    let (mut regs, interface) = create_mock_registers();
    interface.set_register(0x6B, 0b0100_0001);

    assert!(regs.read_bit(0x6B, 0).unwrap());
    assert!(!regs.read_bit(0x6B, 1).unwrap());
    assert!(regs.read_bit(0x6B, 6).unwrap());
    assert!(!regs.read_bit(0x6B, 7).unwrap());
}

#[test]
fn test_read_bit_word_high_byte() {
    let (mut regs, interface) = create_mock_registers();
    interface.set_word(0x10, 0x8002);

    assert!(regs.read_bit_word(0x10, 15).unwrap());
    assert!(regs.read_bit_word(0x10, 1).unwrap());
    assert!(!regs.read_bit_word(0x10, 8).unwrap());
    assert!(!regs.read_bit_word(0x10, 0).unwrap());
}

#[test]
fn test_write_bit_sets_only_target() {
    let (mut regs, interface) = create_mock_registers();
    interface.set_register(0x6B, 0b0000_0001);

    regs.write_bit(0x6B, 7, true).unwrap();
    assert_eq!(interface.get_register(0x6B), 0b1000_0001);
}

#[test]
fn test_write_bit_clears_only_target() {
    let (mut regs, interface) = create_mock_registers();
    interface.set_register(0x6B, 0b0100_0001);

    regs.write_bit(0x6B, 6, false).unwrap();
    assert_eq!(interface.get_register(0x6B), 0b0000_0001);
}

#[test]
fn test_write_bit_is_read_modify_write() {
    let (mut regs, interface) = create_mock_registers();
    interface.set_register(0x37, 0x20);

    regs.write_bit(0x37, 1, true).unwrap();
    assert_eq!(
        interface.operations(),
        vec![
            Operation::Read {
                address: 0x37,
                data: vec![0x20]
            },
            Operation::Write {
                address: 0x37,
                data: vec![0x22]
            },
        ]
    );
}

#[test]
fn test_write_bit_idempotent_value() {
    let (mut regs, interface) = create_mock_registers();
    interface.set_register(0x6A, 0x44);

    regs.write_bit(0x6A, 2, true).unwrap();
    assert_eq!(interface.get_register(0x6A), 0x44);
}

#[test]
fn test_write_bit_word() {
    let (mut regs, interface) = create_mock_registers();
    interface.set_word(0x30, 0x00FF);

    regs.write_bit_word(0x30, 12, true).unwrap();
    assert_eq!(interface.get_word(0x30), 0x10FF);

    regs.write_bit_word(0x30, 0, false).unwrap();
    assert_eq!(interface.get_word(0x30), 0x10FE);
}
