//! PS/2 keyboard driver: scancode decoding, modifier/lock tracking, and
//! translation into a byte stream the TTY layer reads as raw input.

pub mod keymap;
pub mod scancode;

use crate::data_structures::ring::Ring;
use crate::io_port::IoPort;
use lazy_static::lazy_static;
use scancode::Keycode;
use spin::Mutex;

const KEYBOARD_DATA_PORT: u16 = 0x60;
const BYTE_QUEUE_SIZE: usize = 1024;
const EVENT_QUEUE_SIZE: usize = 256;
const KEY_SLOTS: usize = 128;

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEvent {
    pub keycode: u8,
    pub unicode: u32,
    pub modifiers: u8,
    pub locks: u8,
    pub pressed: bool,
    pub repeat: bool,
}

struct KeyboardState {
    bytes: Ring<u8, BYTE_QUEUE_SIZE>,
    events: Ring<KeyEvent, EVENT_QUEUE_SIZE>,
    key_down: [bool; KEY_SLOTS],
    extended: bool,
    e1_skip: u8,
    modifiers: u8,
    locks: u8,
    rx_scancodes: u64,
    dropped_bytes: u64,
    dropped_events: u64,
}

lazy_static! {
    static ref STATE: Mutex<KeyboardState> = Mutex::new(KeyboardState {
        bytes: Ring::new_with(0),
        events: Ring::new_with(KeyEvent {
            keycode: 0,
            unicode: 0,
            modifiers: 0,
            locks: 0,
            pressed: false,
            repeat: false,
        }),
        key_down: [false; KEY_SLOTS],
        extended: false,
        e1_skip: 0,
        modifiers: 0,
        locks: 0,
        rx_scancodes: 0,
        dropped_bytes: 0,
        dropped_events: 0,
    });
}

impl KeyboardState {
    fn push_byte(&mut self, byte: u8) {
        if !self.bytes.push(byte) {
            self.dropped_bytes += 1;
        }
    }

    fn push_event(&mut self, event: KeyEvent) {
        if !self.events.push(event) {
            self.dropped_events += 1;
        }
    }

    fn emit_utf8(&mut self, codepoint: u32) {
        if codepoint <= 0x7F {
            self.push_byte(codepoint as u8);
        } else if codepoint <= 0x7FF {
            self.push_byte(0xC0 | (codepoint >> 6) as u8);
            self.push_byte(0x80 | (codepoint & 0x3F) as u8);
        } else if codepoint <= 0xFFFF {
            if (0xD800..=0xDFFF).contains(&codepoint) {
                return;
            }
            self.push_byte(0xE0 | (codepoint >> 12) as u8);
            self.push_byte(0x80 | ((codepoint >> 6) & 0x3F) as u8);
            self.push_byte(0x80 | (codepoint & 0x3F) as u8);
        } else if codepoint <= 0x10FFFF {
            self.push_byte(0xF0 | (codepoint >> 18) as u8);
            self.push_byte(0x80 | ((codepoint >> 12) & 0x3F) as u8);
            self.push_byte(0x80 | ((codepoint >> 6) & 0x3F) as u8);
            self.push_byte(0x80 | (codepoint & 0x3F) as u8);
        }
    }

    fn emit_sequence(&mut self, seq: &str) {
        for byte in seq.bytes() {
            self.push_byte(byte);
        }
    }

    fn set_modifier_bit(&mut self, bit: u8, pressed: bool) {
        if pressed {
            self.modifiers |= bit;
        } else {
            self.modifiers &= !bit;
        }
    }

    fn update_locks_and_modifiers(&mut self, keycode: Keycode, pressed: bool) {
        use keymap::*;
        match keycode {
            Keycode::LeftShift | Keycode::RightShift => self.set_modifier_bit(MOD_SHIFT, pressed),
            Keycode::LeftCtrl | Keycode::RightCtrl => self.set_modifier_bit(MOD_CTRL, pressed),
            Keycode::LeftAlt => self.set_modifier_bit(MOD_ALT, pressed),
            Keycode::RightAlt => self.set_modifier_bit(MOD_ALTGR, pressed),
            Keycode::LeftMeta | Keycode::RightMeta => self.set_modifier_bit(MOD_META, pressed),
            Keycode::CapsLock if pressed => self.locks ^= LOCK_CAPS,
            Keycode::NumLock if pressed => self.locks ^= LOCK_NUM,
            Keycode::ScrollLock if pressed => self.locks ^= LOCK_SCROLL,
            _ => {}
        }
    }

    fn emit_input_bytes(&mut self, event: &KeyEvent, keycode: Keycode) {
        if !event.pressed {
            return;
        }

        if event.unicode != 0 {
            if event.modifiers & (keymap::MOD_ALT | keymap::MOD_ALTGR) != 0 {
                self.push_byte(0x1B);
            }
            self.emit_utf8(event.unicode);
            return;
        }

        if let Some(seq) = keymap::special_sequence(keycode) {
            self.emit_sequence(seq);
        }
    }
}

pub fn init() {
    let mut state = STATE.lock();
    state.bytes.clear();
    state.events.clear();
    state.key_down = [false; KEY_SLOTS];
    state.extended = false;
    state.e1_skip = 0;
    state.modifiers = 0;
    state.locks = 0;
    state.rx_scancodes = 0;
    state.dropped_bytes = 0;
    state.dropped_events = 0;
}

/// Called from the IRQ1 handler. Reads one scancode byte from the
/// controller and drives the E0/E1 prefix and key-state machine.
pub fn on_irq() {
    let scancode = IoPort::read_u8(KEYBOARD_DATA_PORT);
    let mut state = STATE.lock();
    state.rx_scancodes += 1;

    if scancode == 0xE0 {
        state.extended = true;
        return;
    }

    if scancode == 0xE1 {
        state.e1_skip = 5;
        return;
    }

    if state.e1_skip > 0 {
        state.e1_skip -= 1;
        return;
    }

    let released = scancode & 0x80 != 0;
    let code = scancode & 0x7F;

    let keycode = if state.extended {
        state.extended = false;
        scancode::decode_set1_e0(code)
    } else {
        scancode::decode_set1(code)
    };

    if keycode == Keycode::None {
        return;
    }

    let slot = keycode as usize;
    if slot >= KEY_SLOTS {
        return;
    }

    let repeat = if !released {
        let was_down = state.key_down[slot];
        state.key_down[slot] = true;
        was_down
    } else {
        state.key_down[slot] = false;
        false
    };

    state.update_locks_and_modifiers(keycode, !released);

    let event = KeyEvent {
        keycode: slot as u8,
        unicode: if !released {
            keymap::keycode_to_unicode(keycode, state.modifiers, state.locks)
        } else {
            0
        },
        modifiers: state.modifiers,
        locks: state.locks,
        pressed: !released,
        repeat,
    };

    state.push_event(event);
    state.emit_input_bytes(&event, keycode);
}

pub fn pop_byte() -> Option<u8> {
    STATE.lock().bytes.pop()
}

pub fn pop_event() -> Option<KeyEvent> {
    STATE.lock().events.pop()
}

pub fn modifiers() -> u8 {
    STATE.lock().modifiers
}

pub fn locks() -> u8 {
    STATE.lock().locks
}

pub fn rx_scancodes() -> u64 {
    STATE.lock().rx_scancodes
}

pub fn dropped_bytes() -> u64 {
    STATE.lock().dropped_bytes
}

pub fn dropped_events() -> u64 {
    STATE.lock().dropped_events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_letter_a_with_shift() {
        let unicode = keymap::keycode_to_unicode(Keycode::A, keymap::MOD_SHIFT, 0);
        assert_eq!(unicode, 'A' as u32);
    }

    #[test]
    fn ctrl_c_maps_to_etx() {
        let unicode = keymap::keycode_to_unicode(Keycode::C, keymap::MOD_CTRL, 0);
        assert_eq!(unicode, 0x03);
    }
}
