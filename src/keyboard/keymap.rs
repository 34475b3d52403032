//! Translates a decoded keycode plus modifier/lock state into the bytes a
//! terminal would expect to read: printable unicode for ordinary keys,
//! ANSI escape sequences for cursor/function keys.

use super::scancode::Keycode;

pub const MOD_SHIFT: u8 = 1 << 0;
pub const MOD_CTRL: u8 = 1 << 1;
pub const MOD_ALT: u8 = 1 << 2;
pub const MOD_ALTGR: u8 = 1 << 3;
pub const MOD_META: u8 = 1 << 4;

pub const LOCK_CAPS: u8 = 1 << 0;
pub const LOCK_NUM: u8 = 1 << 1;
pub const LOCK_SCROLL: u8 = 1 << 2;

fn apply_alpha(lower: u32, modifiers: u8, locks: u8) -> u32 {
    let shift = modifiers & MOD_SHIFT != 0;
    let caps = locks & LOCK_CAPS != 0;

    let mut ch = lower;
    if shift ^ caps {
        ch -= b'a' as u32 - b'A' as u32;
    }
    if modifiers & MOD_CTRL != 0 {
        ch &= 0x1F;
    }
    ch
}

/// Returns the unicode codepoint a pressed key produces, or `0` if it has
/// none (function keys, cursor keys, unmapped keys).
pub fn keycode_to_unicode(keycode: Keycode, modifiers: u8, locks: u8) -> u32 {
    use Keycode::*;

    let shift = modifiers & MOD_SHIFT != 0;
    let ctrl = modifiers & MOD_CTRL != 0;
    let numlock = locks & LOCK_NUM != 0;

    match keycode {
        A => apply_alpha('a' as u32, modifiers, locks),
        B => apply_alpha('b' as u32, modifiers, locks),
        C => apply_alpha('c' as u32, modifiers, locks),
        D => apply_alpha('d' as u32, modifiers, locks),
        E => apply_alpha('e' as u32, modifiers, locks),
        F => apply_alpha('f' as u32, modifiers, locks),
        G => apply_alpha('g' as u32, modifiers, locks),
        H => apply_alpha('h' as u32, modifiers, locks),
        I => apply_alpha('i' as u32, modifiers, locks),
        J => apply_alpha('j' as u32, modifiers, locks),
        K => apply_alpha('k' as u32, modifiers, locks),
        L => apply_alpha('l' as u32, modifiers, locks),
        M => apply_alpha('m' as u32, modifiers, locks),
        N => apply_alpha('n' as u32, modifiers, locks),
        O => apply_alpha('o' as u32, modifiers, locks),
        P => apply_alpha('p' as u32, modifiers, locks),
        Q => apply_alpha('q' as u32, modifiers, locks),
        R => apply_alpha('r' as u32, modifiers, locks),
        S => apply_alpha('s' as u32, modifiers, locks),
        T => apply_alpha('t' as u32, modifiers, locks),
        U => apply_alpha('u' as u32, modifiers, locks),
        V => apply_alpha('v' as u32, modifiers, locks),
        W => apply_alpha('w' as u32, modifiers, locks),
        X => apply_alpha('x' as u32, modifiers, locks),
        Y => apply_alpha('y' as u32, modifiers, locks),
        Z => apply_alpha('z' as u32, modifiers, locks),
        N1 => if shift { '!' as u32 } else { '1' as u32 },
        N2 => if ctrl { 0 } else if shift { '@' as u32 } else { '2' as u32 },
        N3 => if shift { '#' as u32 } else { '3' as u32 },
        N4 => if shift { '$' as u32 } else { '4' as u32 },
        N5 => if shift { '%' as u32 } else { '5' as u32 },
        N6 => if ctrl { 0x1E } else if shift { '^' as u32 } else { '6' as u32 },
        N7 => if shift { '&' as u32 } else { '7' as u32 },
        N8 => if shift { '*' as u32 } else { '8' as u32 },
        N9 => if shift { '(' as u32 } else { '9' as u32 },
        N0 => if shift { ')' as u32 } else { '0' as u32 },
        Minus => if ctrl { 0x1F } else if shift { '_' as u32 } else { '-' as u32 },
        Equal => if shift { '+' as u32 } else { '=' as u32 },
        LeftBrace => if ctrl { 0x1B } else if shift { '{' as u32 } else { '[' as u32 },
        RightBrace => if ctrl { 0x1D } else if shift { '}' as u32 } else { ']' as u32 },
        Backslash => if ctrl { 0x1C } else if shift { '|' as u32 } else { '\\' as u32 },
        Semicolon => if shift { ':' as u32 } else { ';' as u32 },
        Apostrophe => if shift { '"' as u32 } else { '\'' as u32 },
        Grave => if shift { '~' as u32 } else { '`' as u32 },
        Comma => if shift { '<' as u32 } else { ',' as u32 },
        Dot => if shift { '>' as u32 } else { '.' as u32 },
        Slash => if shift { '?' as u32 } else { '/' as u32 },
        Space => ' ' as u32,
        Tab => '\t' as u32,
        Enter | KpEnter => '\n' as u32,
        Backspace => 0x08,
        Esc => 0x1B,
        Kp0 => if numlock { '0' as u32 } else { 0 },
        Kp1 => if numlock { '1' as u32 } else { 0 },
        Kp2 => if numlock { '2' as u32 } else { 0 },
        Kp3 => if numlock { '3' as u32 } else { 0 },
        Kp4 => if numlock { '4' as u32 } else { 0 },
        Kp5 => if numlock { '5' as u32 } else { 0 },
        Kp6 => if numlock { '6' as u32 } else { 0 },
        Kp7 => if numlock { '7' as u32 } else { 0 },
        Kp8 => if numlock { '8' as u32 } else { 0 },
        Kp9 => if numlock { '9' as u32 } else { 0 },
        KpDot => if numlock { '.' as u32 } else { 0 },
        KpMinus => '-' as u32,
        KpPlus => '+' as u32,
        KpAsterisk => '*' as u32,
        KpSlash => '/' as u32,
        _ => 0,
    }
}

/// Returns the escape sequence a non-printable key (cursor/function keys)
/// emits, if any.
pub fn special_sequence(keycode: Keycode) -> Option<&'static str> {
    use Keycode::*;
    Some(match keycode {
        Up => "\x1B[A",
        Down => "\x1B[B",
        Right => "\x1B[C",
        Left => "\x1B[D",
        Home => "\x1B[H",
        End => "\x1B[F",
        Insert => "\x1B[2~",
        Delete => "\x1B[3~",
        PageUp => "\x1B[5~",
        PageDown => "\x1B[6~",
        F1 => "\x1BOP",
        F2 => "\x1BOQ",
        F3 => "\x1BOR",
        F4 => "\x1BOS",
        F5 => "\x1B[15~",
        F6 => "\x1B[17~",
        F7 => "\x1B[18~",
        F8 => "\x1B[19~",
        F9 => "\x1B[20~",
        F10 => "\x1B[21~",
        F11 => "\x1B[23~",
        F12 => "\x1B[24~",
        _ => return None,
    })
}
