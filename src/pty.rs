//! Pseudo-terminal pairs: a fixed pool of master/slave byte-queue pairs.

use crate::data_structures::ring::Ring;
use lazy_static::lazy_static;
use spin::Mutex;

const PTY_MAX: usize = 8;
const PTY_QUEUE_SIZE: usize = 2048;

struct PtySlot {
    allocated: bool,
    m2s: Ring<u8, PTY_QUEUE_SIZE>,
    s2m: Ring<u8, PTY_QUEUE_SIZE>,
}

impl PtySlot {
    fn empty() -> Self {
        PtySlot {
            allocated: false,
            m2s: Ring::new_with(0),
            s2m: Ring::new_with(0),
        }
    }
}

struct PtyTable {
    slots: [PtySlot; PTY_MAX],
    dropped_bytes: u64,
    invalid_ops: u64,
}

lazy_static! {
    static ref PTYS: Mutex<PtyTable> = Mutex::new(PtyTable {
        slots: [
            PtySlot::empty(), PtySlot::empty(), PtySlot::empty(), PtySlot::empty(),
            PtySlot::empty(), PtySlot::empty(), PtySlot::empty(), PtySlot::empty(),
        ],
        dropped_bytes: 0,
        invalid_ops: 0,
    });
}

fn queue_write(queue: &mut Ring<u8, PTY_QUEUE_SIZE>, buf: &[u8], dropped: &mut u64) -> usize {
    let mut written = 0;
    for &byte in buf {
        if !queue.push(byte) {
            *dropped += (buf.len() - written) as u64;
            break;
        }
        written += 1;
    }
    written
}

fn queue_read(queue: &mut Ring<u8, PTY_QUEUE_SIZE>, buf: &mut [u8]) -> usize {
    let mut read = 0;
    while read < buf.len() {
        match queue.pop() {
            Some(byte) => {
                buf[read] = byte;
                read += 1;
            }
            None => break,
        }
    }
    read
}

pub fn init() {
    let mut table = PTYS.lock();
    for slot in table.slots.iter_mut() {
        slot.allocated = false;
        slot.m2s.clear();
        slot.s2m.clear();
    }
    table.dropped_bytes = 0;
    table.invalid_ops = 0;
}

pub fn is_valid(pty_id: i32) -> bool {
    if pty_id < 0 || pty_id as usize >= PTY_MAX {
        return false;
    }
    PTYS.lock().slots[pty_id as usize].allocated
}

pub fn alloc() -> i32 {
    let mut table = PTYS.lock();
    for (i, slot) in table.slots.iter_mut().enumerate() {
        if !slot.allocated {
            slot.allocated = true;
            slot.m2s.clear();
            slot.s2m.clear();
            return i as i32;
        }
    }
    -1
}

pub fn master_write(pty_id: i32, buf: &[u8]) -> usize {
    if !is_valid(pty_id) {
        PTYS.lock().invalid_ops += 1;
        return 0;
    }
    let mut table = PTYS.lock();
    let mut dropped = table.dropped_bytes;
    let written = queue_write(&mut table.slots[pty_id as usize].m2s, buf, &mut dropped);
    table.dropped_bytes = dropped;
    written
}

pub fn master_read(pty_id: i32, buf: &mut [u8]) -> usize {
    if !is_valid(pty_id) {
        PTYS.lock().invalid_ops += 1;
        return 0;
    }
    queue_read(&mut PTYS.lock().slots[pty_id as usize].s2m, buf)
}

pub fn slave_write(pty_id: i32, buf: &[u8]) -> usize {
    if !is_valid(pty_id) {
        PTYS.lock().invalid_ops += 1;
        return 0;
    }
    let mut table = PTYS.lock();
    let mut dropped = table.dropped_bytes;
    let written = queue_write(&mut table.slots[pty_id as usize].s2m, buf, &mut dropped);
    table.dropped_bytes = dropped;
    written
}

pub fn slave_read(pty_id: i32, buf: &mut [u8]) -> usize {
    if !is_valid(pty_id) {
        PTYS.lock().invalid_ops += 1;
        return 0;
    }
    queue_read(&mut PTYS.lock().slots[pty_id as usize].m2s, buf)
}

pub fn dropped_bytes() -> u64 {
    PTYS.lock().dropped_bytes
}

pub fn invalid_ops() -> u64 {
    PTYS.lock().invalid_ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_roundtrips_master_to_slave() {
        init();
        let id = alloc();
        assert!(id >= 0);
        assert_eq!(master_write(id, b"hi"), 2);
        let mut buf = [0u8; 2];
        assert_eq!(slave_read(id, &mut buf), 2);
        assert_eq!(&buf, b"hi");
    }
}
