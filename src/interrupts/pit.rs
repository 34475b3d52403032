//! PIT channel 0, mode 3 (square wave), driving the scheduler tick.

use crate::io_port::IoPort;
use core::sync::atomic::{AtomicU64, Ordering};

const PIT_CHANNEL0: u16 = 0x40;
const PIT_COMMAND: u16 = 0x43;
const PIT_BASE_FREQUENCY: u32 = 1_193_182;

static TICKS: AtomicU64 = AtomicU64::new(0);

/// Programs channel 0 for the given tick rate in Hz.
pub fn init(hz: u32) {
    let divisor = (PIT_BASE_FREQUENCY / hz).clamp(1, u16::MAX as u32) as u16;

    IoPort::write_u8(PIT_COMMAND, 0x36); // channel 0, lobyte/hibyte, mode 3
    IoPort::write_u8(PIT_CHANNEL0, (divisor & 0xFF) as u8);
    IoPort::write_u8(PIT_CHANNEL0, (divisor >> 8) as u8);
}

pub fn on_tick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

pub fn ticks() -> u64 {
    TICKS.load(Ordering::Relaxed)
}
