//! Line discipline: turns raw keyboard bytes into either a canonical
//! (line-buffered, echoing) read queue or a raw passthrough queue, and
//! redirects input transparently into a controlling PTY once attached.

use crate::data_structures::ring::Ring;
use crate::{console, keyboard, pty};
use lazy_static::lazy_static;
use spin::Mutex;

const READ_QUEUE_SIZE: usize = 2048;
const LINE_BUFFER_SIZE: usize = 512;

struct TtyState {
    read_queue: Ring<u8, READ_QUEUE_SIZE>,
    line_buffer: [u8; LINE_BUFFER_SIZE],
    line_len: usize,
    canonical: bool,
    echo: bool,
    escape_state: u8,
    rx_count: u64,
    drop_count: u64,
    line_overflow_count: u64,
    escape_discard_count: u64,
    line_truncated: bool,
    session_id: i32,
    session_pty: i32,
}

lazy_static! {
    static ref TTY: Mutex<TtyState> = Mutex::new(TtyState {
        read_queue: Ring::new_with(0),
        line_buffer: [0; LINE_BUFFER_SIZE],
        line_len: 0,
        canonical: true,
        echo: true,
        escape_state: 0,
        rx_count: 0,
        drop_count: 0,
        line_overflow_count: 0,
        escape_discard_count: 0,
        line_truncated: false,
        session_id: -1,
        session_pty: -1,
    });
}

fn is_printable(byte: u8) -> bool {
    byte >= 0x20 || byte == b'\t'
}

impl TtyState {
    fn enqueue_read(&mut self, byte: u8) -> bool {
        if self.session_pty >= 0 && pty::is_valid(self.session_pty) {
            if pty::master_write(self.session_pty, &[byte]) == 1 {
                return true;
            }
            self.drop_count += 1;
            return false;
        }

        if self.read_queue.push(byte) {
            true
        } else {
            self.drop_count += 1;
            false
        }
    }

    fn flush_line_buffer(&mut self) {
        for i in 0..self.line_len {
            let byte = self.line_buffer[i];
            self.enqueue_read(byte);
        }
        self.line_len = 0;
    }

    /// Returns true if the byte was swallowed as part of an escape sequence.
    fn filter_escape(&mut self, byte: u8) -> bool {
        if self.escape_state == 0 {
            if byte == 0x1B {
                self.escape_state = 1;
                self.escape_discard_count += 1;
                return true;
            }
            return false;
        }

        self.escape_discard_count += 1;

        if self.escape_state == 1 {
            self.escape_state = if byte == b'[' || byte == b'O' { 2 } else { 0 };
            return true;
        }

        if self.escape_state == 2 && (b'@'..=b'~').contains(&byte) {
            self.escape_state = 0;
        }
        true
    }

    fn handle_canonical(&mut self, byte: u8) {
        if self.filter_escape(byte) {
            return;
        }

        match byte {
            0x03 => {
                self.line_len = 0;
                self.enqueue_read(byte);
                if self.echo {
                    console::write_str("^C\n");
                }
            }
            0x0C => {
                self.enqueue_read(byte);
            }
            b'\x08' | 0x7F => {
                if self.line_len > 0 {
                    self.line_len -= 1;
                    if self.echo {
                        console::backspace();
                    }
                }
            }
            b'\n' => {
                if self.line_len + 1 < LINE_BUFFER_SIZE {
                    self.line_buffer[self.line_len] = b'\n';
                    self.line_len += 1;
                } else {
                    self.drop_count += 1;
                    self.line_overflow_count += 1;
                    self.line_truncated = true;
                }

                if self.echo {
                    console::putc(b'\n');
                }

                self.flush_line_buffer();
                self.line_truncated = false;
            }
            0x04 => {
                if self.line_len == 0 {
                    self.enqueue_read(byte);
                } else {
                    self.flush_line_buffer();
                }
            }
            _ => {
                if !is_printable(byte) {
                    return;
                }

                if self.line_len + 1 >= LINE_BUFFER_SIZE {
                    self.drop_count += 1;
                    self.line_overflow_count += 1;
                    if !self.line_truncated && self.echo {
                        console::putc(0x07);
                    }
                    self.line_truncated = true;
                    return;
                }

                self.line_buffer[self.line_len] = byte;
                self.line_len += 1;
                if self.echo {
                    console::putc(byte);
                }
            }
        }
    }

    fn handle_noncanonical(&mut self, byte: u8) {
        self.enqueue_read(byte);
        if self.echo {
            console::putc(byte);
        }
    }
}

pub fn init() {
    let mut state = TTY.lock();
    state.read_queue.clear();
    state.line_len = 0;
    state.canonical = true;
    state.echo = true;
    state.escape_state = 0;
    state.rx_count = 0;
    state.drop_count = 0;
    state.line_overflow_count = 0;
    state.escape_discard_count = 0;
    state.line_truncated = false;
    state.session_id = -1;
    state.session_pty = -1;
}

/// Drains every byte the keyboard driver has buffered through the line
/// discipline. Call once per main-loop iteration.
pub fn poll_input() {
    while let Some(byte) = keyboard::pop_byte() {
        let mut state = TTY.lock();
        state.rx_count += 1;
        if state.canonical {
            state.handle_canonical(byte);
        } else {
            state.handle_noncanonical(byte);
        }
    }
}

pub fn pop_char() -> Option<u8> {
    TTY.lock().read_queue.pop()
}

pub fn set_canonical(enabled: bool) {
    TTY.lock().canonical = enabled;
}

pub fn set_echo(enabled: bool) {
    TTY.lock().echo = enabled;
}

pub fn rx_bytes() -> u64 {
    TTY.lock().rx_count
}

pub fn dropped_bytes() -> u64 {
    TTY.lock().drop_count
}

pub fn line_overflows() -> u64 {
    TTY.lock().line_overflow_count
}

pub fn escape_discards() -> u64 {
    TTY.lock().escape_discard_count
}

pub fn attach_session(session_id: i32, pty_id: i32) {
    let mut state = TTY.lock();
    state.session_id = session_id;
    state.session_pty = pty_id;
}

pub fn attached_session() -> i32 {
    TTY.lock().session_id
}

pub fn attached_pty() -> i32 {
    TTY.lock().session_pty
}

/// Feeds raw bytes through the line discipline as if the keyboard had
/// produced them. Used by tests.
pub fn test_inject_bytes(bytes: &[u8]) {
    let mut state = TTY.lock();
    for &byte in bytes {
        state.rx_count += 1;
        if state.canonical {
            state.handle_canonical(byte);
        } else {
            state.handle_noncanonical(byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_line_flushes_on_newline() {
        init();
        set_echo(false);
        test_inject_bytes(b"hi\n");
        assert_eq!(pop_char(), Some(b'h'));
        assert_eq!(pop_char(), Some(b'i'));
        assert_eq!(pop_char(), Some(b'\n'));
        assert_eq!(pop_char(), None);
    }

    #[test]
    fn backspace_trims_pending_line() {
        init();
        set_echo(false);
        test_inject_bytes(b"hiX\x7F\n");
        assert_eq!(pop_char(), Some(b'h'));
        assert_eq!(pop_char(), Some(b'i'));
        assert_eq!(pop_char(), Some(b'\n'));
    }
}
