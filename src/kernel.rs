//! Fatal-path halt used by bring-up when a step fails before interrupts
//! are enabled.

use crate::io_port::{cli, hlt};

pub fn halt_forever() -> ! {
    cli();
    loop {
        hlt();
    }
}
