//! PS/2 scancode set 1 decoding, tables lifted from the original driver.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Keycode {
    None,
    Esc,
    N1,
    N2,
    N3,
    N4,
    N5,
    N6,
    N7,
    N8,
    N9,
    N0,
    Minus,
    Equal,
    Backspace,
    Tab,
    Q,
    W,
    E,
    R,
    T,
    Y,
    U,
    I,
    O,
    P,
    LeftBrace,
    RightBrace,
    Enter,
    LeftCtrl,
    A,
    S,
    D,
    F,
    G,
    H,
    J,
    K,
    L,
    Semicolon,
    Apostrophe,
    Grave,
    LeftShift,
    Backslash,
    Z,
    X,
    C,
    V,
    B,
    N,
    M,
    Comma,
    Dot,
    Slash,
    RightShift,
    KpAsterisk,
    LeftAlt,
    Space,
    CapsLock,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    NumLock,
    ScrollLock,
    Kp7,
    Kp8,
    Kp9,
    KpMinus,
    Kp4,
    Kp5,
    Kp6,
    KpPlus,
    Kp1,
    Kp2,
    Kp3,
    Kp0,
    KpDot,
    F11,
    F12,
    RightCtrl,
    RightAlt,
    Home,
    Up,
    PageUp,
    Left,
    Right,
    End,
    Down,
    PageDown,
    Insert,
    Delete,
    LeftMeta,
    RightMeta,
    KpEnter,
    KpSlash,
}

/// Decodes a scancode set-1 "make"/"break" byte (extended bit already
/// stripped) that did not follow an `0xE0` prefix byte.
pub fn decode_set1(code: u8) -> Keycode {
    use Keycode::*;
    match code {
        0x01 => Esc,
        0x02 => N1,
        0x03 => N2,
        0x04 => N3,
        0x05 => N4,
        0x06 => N5,
        0x07 => N6,
        0x08 => N7,
        0x09 => N8,
        0x0A => N9,
        0x0B => N0,
        0x0C => Minus,
        0x0D => Equal,
        0x0E => Backspace,
        0x0F => Tab,
        0x10 => Q,
        0x11 => W,
        0x12 => E,
        0x13 => R,
        0x14 => T,
        0x15 => Y,
        0x16 => U,
        0x17 => I,
        0x18 => O,
        0x19 => P,
        0x1A => LeftBrace,
        0x1B => RightBrace,
        0x1C => Enter,
        0x1D => LeftCtrl,
        0x1E => A,
        0x1F => S,
        0x20 => D,
        0x21 => F,
        0x22 => G,
        0x23 => H,
        0x24 => J,
        0x25 => K,
        0x26 => L,
        0x27 => Semicolon,
        0x28 => Apostrophe,
        0x29 => Grave,
        0x2A => LeftShift,
        0x2B => Backslash,
        0x2C => Z,
        0x2D => X,
        0x2E => C,
        0x2F => V,
        0x30 => B,
        0x31 => N,
        0x32 => M,
        0x33 => Comma,
        0x34 => Dot,
        0x35 => Slash,
        0x36 => RightShift,
        0x37 => KpAsterisk,
        0x38 => LeftAlt,
        0x39 => Space,
        0x3A => CapsLock,
        0x3B => F1,
        0x3C => F2,
        0x3D => F3,
        0x3E => F4,
        0x3F => F5,
        0x40 => F6,
        0x41 => F7,
        0x42 => F8,
        0x43 => F9,
        0x44 => F10,
        0x45 => NumLock,
        0x46 => ScrollLock,
        0x47 => Kp7,
        0x48 => Kp8,
        0x49 => Kp9,
        0x4A => KpMinus,
        0x4B => Kp4,
        0x4C => Kp5,
        0x4D => Kp6,
        0x4E => KpPlus,
        0x4F => Kp1,
        0x50 => Kp2,
        0x51 => Kp3,
        0x52 => Kp0,
        0x53 => KpDot,
        0x57 => F11,
        0x58 => F12,
        _ => None,
    }
}

/// Decodes a scancode set-1 byte that followed an `0xE0` prefix byte.
pub fn decode_set1_e0(code: u8) -> Keycode {
    use Keycode::*;
    match code {
        0x1C => KpEnter,
        0x1D => RightCtrl,
        0x35 => KpSlash,
        0x38 => RightAlt,
        0x47 => Home,
        0x48 => Up,
        0x49 => PageUp,
        0x4B => Left,
        0x4D => Right,
        0x4F => End,
        0x50 => Down,
        0x51 => PageDown,
        0x52 => Insert,
        0x53 => Delete,
        0x5B => LeftMeta,
        0x5C => RightMeta,
        _ => None,
    }
}
