pub struct ConsoleWriter;

impl core::fmt::Write for ConsoleWriter {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        crate::console::write_str(s);
        Ok(())
    }
}

#[macro_export]
macro_rules! println {
    ( $fmt:expr, $($arg:tt)* ) => {{ use $crate::print; print!(concat!($fmt, "\n"), $($arg)*) }};
    ( $fmt:expr ) => {{ use $crate::print; print!(concat!($fmt, "\n")) }};
    () => {{ use $crate::print; print!("\n") }};
}

#[macro_export]
macro_rules! print {
    ( $fmt:expr, $($arg:tt)* ) => {{
        use core::fmt::Write;
        let _ = write!($crate::macros::print::ConsoleWriter, $fmt, $($arg)*);
    }};

    ( $fmt:expr ) => {{
        $crate::console::write_str($fmt);
    }};
}
