#![allow(dead_code)]

// https://wiki.osdev.org/Serial_Ports
use crate::io_port::IoPort;
use core::{cell::LazyCell, fmt};
use spin::Mutex;

pub struct SerialPort(u16);

// 0x3F8 is the default addr for COM1
pub static SERIAL_PORT: Mutex<LazyCell<SerialPort>> = Mutex::new(LazyCell::new(|| SerialPort::init(0x3F8)));

impl SerialPort {
    #[allow(clippy::identity_op)]
    /// This `needs` to be called at least once before any data being sent but should be fine if it is called multiple times.
    fn init(port: u16) -> SerialPort {
        IoPort::write_u8(port + 1, 0x00); // disable all interrupts
        IoPort::write_u8(port + 3, 0x80); // enable DLAB (set baud rate divisor)
        IoPort::write_u8(port + 0, 0x01); // set divisor to 1 (lo byte) -> 115200 baud
        IoPort::write_u8(port + 1, 0x00); //                  (hi byte)
        IoPort::write_u8(port + 3, 0x03); // 8 bits, no parity, one stop bit
        IoPort::write_u8(port + 2, 0xC7); // enable FIFO, clear them, with 14-byte threshold
        IoPort::write_u8(port + 4, 0x0B); // IRQs enabled, RTS/DSR set

        Self(port)
    }

    pub fn can_send(&self) -> bool {
        IoPort::read_u8(self.0 + 5) & 0x20 != 0
    }

    pub fn send_raw(&self, value: u8) {
        while !self.can_send() {}
        IoPort::write_u8(self.0, value);
    }

    fn send(&self, value: u8) {
        self.send_raw(value);
    }

    fn receive(&self) -> u8 {
        while IoPort::read_u8(self.0 + 5) & 1 == 0 {}
        IoPort::read_u8(self.0)
    }
}

impl fmt::Write for SerialPort {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.send(byte);
        }
        Ok(())
    }
}

/// Forces COM1 initialization; safe to call more than once.
pub fn init() {
    let mut guard = SERIAL_PORT.lock();
    let _ = &**guard;
}

/// Mirrors a single byte to COM1, bypassing the `fmt::Write`/macro path.
pub fn put_byte(byte: u8) {
    SERIAL_PORT.lock().send_raw(byte);
}
