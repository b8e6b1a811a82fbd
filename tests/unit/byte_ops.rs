//! Unit tests for byte register reads and writes

use crate::common::{Operation, create_mock_registers};

#[test]
fn test_read_byte() {
    let (mut regs, interface) = create_mock_registers();
    interface.set_register(0x75, 0x68);

    assert_eq!(regs.read_byte(0x75).unwrap(), 0x68);
    assert_eq!(
        interface.operations(),
        vec![Operation::Read {
            address: 0x75,
            data: vec![0x68]
        }]
    );
}

#[test]
fn test_read_bytes_consecutive() {
    let (mut regs, interface) = create_mock_registers();
    for (i, value) in [0x11, 0x22, 0x33, 0x44].into_iter().enumerate() {
        interface.set_register(0x3B + i as u8, value);
    }

    let mut buf = [0u8; 4];
    regs.read_bytes(0x3B, &mut buf).unwrap();
    assert_eq!(buf, [0x11, 0x22, 0x33, 0x44]);

    // one transfer, not four
    assert_eq!(interface.operations().len(), 1);
}

#[test]
fn test_write_byte() {
    let (mut regs, interface) = create_mock_registers();

    regs.write_byte(0x6B, 0x80).unwrap();
    assert_eq!(interface.get_register(0x6B), 0x80);
    assert_eq!(
        interface.operations(),
        vec![Operation::Write {
            address: 0x6B,
            data: vec![0x80]
        }]
    );
}

#[test]
fn test_write_bytes_consecutive() {
    let (mut regs, interface) = create_mock_registers();

    regs.write_bytes(0x13, &[0x00, 0x10, 0x00, 0x20]).unwrap();
    assert_eq!(interface.get_register(0x13), 0x00);
    assert_eq!(interface.get_register(0x14), 0x10);
    assert_eq!(interface.get_register(0x15), 0x00);
    assert_eq!(interface.get_register(0x16), 0x20);
    assert_eq!(interface.write_count(), 1);
}

#[test]
fn test_write_then_read_back() {
    let (mut regs, _interface) = create_mock_registers();

    regs.write_byte(0x1A, 0x03).unwrap();
    assert_eq!(regs.read_byte(0x1A).unwrap(), 0x03);
}

#[test]
fn test_modify_byte() {
    let (mut regs, interface) = create_mock_registers();
    interface.set_register(0x37, 0x03);

    regs.modify_byte(0x37, |b| b << 4).unwrap();
    assert_eq!(interface.get_register(0x37), 0x30);
    assert_eq!(interface.operations().len(), 2);
}

#[test]
fn test_release_returns_interface() {
    let (regs, interface) = create_mock_registers();
    interface.set_register(0x00, 0xEA);

    let mut released = regs.release();
    let mut data = [0u8];
    device_driver::RegisterInterface::read_register(&mut released, 0x00, 8, &mut data).unwrap();
    assert_eq!(data[0], 0xEA);
}
