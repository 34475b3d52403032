//! Boot banner string plus a small ring of recently submitted command
//! lines. Independent of any particular shell: this module only records
//! and recalls byte slices, it never interprets them.

use lazy_static::lazy_static;
use spin::Mutex;

const CAPACITY: usize = 16;
const ENTRY_CAP: usize = 128;

const BOOT_BANNER: &str = "walu_core kernel ready";

#[derive(Clone, Copy)]
struct HistoryEntry {
    bytes: [u8; ENTRY_CAP],
    len: usize,
}

impl HistoryEntry {
    const fn empty() -> Self {
        HistoryEntry { bytes: [0; ENTRY_CAP], len: 0 }
    }
}

struct History {
    entries: [HistoryEntry; CAPACITY],
    head: usize,
    filled: usize,
    count: u64,
}

lazy_static! {
    static ref HISTORY: Mutex<History> = Mutex::new(History {
        entries: [HistoryEntry::empty(); CAPACITY],
        head: 0,
        filled: 0,
        count: 0,
    });
}

pub fn boot_banner() -> &'static str {
    BOOT_BANNER
}

pub fn history_push(bytes: &[u8]) {
    let mut history = HISTORY.lock();
    let n = bytes.len().min(ENTRY_CAP);
    let slot = history.head;

    history.entries[slot] = HistoryEntry::empty();
    history.entries[slot].bytes[..n].copy_from_slice(&bytes[..n]);
    history.entries[slot].len = n;

    history.head = (history.head + 1) % CAPACITY;
    history.filled = (history.filled + 1).min(CAPACITY);
    history.count += 1;
}

pub fn history_count() -> u64 {
    HISTORY.lock().count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_wraps_and_counts_independently_of_retention() {
        let before = history_count();
        let pushes = CAPACITY as u64 + 3;
        for i in 0..pushes {
            history_push(&[i as u8]);
        }
        assert_eq!(history_count(), before + pushes);
    }
}
