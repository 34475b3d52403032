//! Machine-control paths: halt, reboot, poweroff. Reboot and poweroff
//! each try the usual virtualized-hardware tricks before falling back to
//! spinning with interrupts off.

use crate::console;
use crate::io_port::{cli, hlt, io_wait, lidt_null, IoPort};

fn machine_spin() -> ! {
    cli();
    loop {
        hlt();
    }
}

pub fn halt() -> ! {
    machine_spin()
}

pub fn reboot() -> ! {
    cli();

    // 8042 keyboard-controller reset pulse.
    IoPort::write_u8(0x64, 0xFE);
    io_wait();

    // PCI reset control register fallback, common on virtualized platforms.
    IoPort::write_u8(0xCF9, 0x02);
    io_wait();
    IoPort::write_u8(0xCF9, 0x06);
    io_wait();

    // Triple-fault fallback if neither hardware path took.
    unsafe {
        lidt_null();
        core::arch::asm!("int3");
    }

    machine_spin()
}

pub fn poweroff() -> ! {
    cli();

    // Virtualized ACPI power-off ports: QEMU/Bochs, then VirtualBox.
    IoPort::write_u16(0x604, 0x2000);
    io_wait();
    IoPort::write_u16(0xB004, 0x2000);
    io_wait();
    IoPort::write_u16(0x4004, 0x3400);
    io_wait();

    console::write_str("poweroff: firmware did not power off, halting\n");
    machine_spin()
}
