//! Level-tagged boot diagnostics. Every bring-up step logs through `log!`,
//! which mirrors to serial (via the console's own mirroring) and to the
//! active VGA/framebuffer backend with the tag colorized through SGR.
use core::fmt;

use crate::console;

pub struct Logger;

impl Logger {
    fn tag(label: &str, sgr: &str) {
        console::write_str("[\x1B[1m\x1B[");
        console::write_str(sgr);
        console::write_str("m");
        console::write_str(label);
        console::write_str("\x1B[0m] ");
    }

    pub fn ok(args: fmt::Arguments) {
        Self::tag(" OK ", "32");
        print_args(args);
        console::write_str("\n");
    }

    pub fn warn(args: fmt::Arguments) {
        Self::tag("WARN", "33");
        print_args(args);
        console::write_str("\n");
    }

    pub fn failed(args: fmt::Arguments) {
        Self::tag("FAIL", "31");
        print_args(args);
        console::write_str("\n");
    }
}

fn print_args(args: fmt::Arguments) {
    use fmt::Write;
    let _ = crate::macros::print::ConsoleWriter.write_fmt(args);
}

#[macro_export]
macro_rules! log {
    ( $method:ident, $($arg:tt)* ) => {{
        use $crate::logger::Logger;
        Logger::$method(format_args!($($arg)*));
    }};
}
