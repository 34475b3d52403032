#![no_std]
#![no_main]
#![feature(custom_test_frameworks)]
#![test_runner(crate::test_runner)]
#![reexport_test_harness_main = "test_main"]

pub mod data_structures;
pub mod multiboot2;
pub mod memory;
pub mod io_port;
pub mod serial;
pub mod console;
pub mod keyboard;
pub mod tty;
pub mod pty;
pub mod session;
pub mod interrupts;
#[macro_use]
pub mod macros;
pub mod logger;
pub mod fs;
pub mod storage;
pub mod editor;
pub mod history;
pub mod machine;
pub mod kernel;

use core::panic::PanicInfo;
use multiboot2::{MbBootInfo, MULTIBOOT2_BOOTLOADER_MAGIC};

use crate::{log, serial_println};

#[cfg(not(test))]
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    log!(failed, "Kernel panic: {}", info);
    kernel::halt_forever();
}

#[cfg(test)]
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    test_panic_handler(info)
}

/// Custom test-framework runner: every `#[test_case]` fn is invoked in
/// sequence and reported over serial, since there is no host process to
/// collect a normal test harness' exit status from.
pub fn test_runner(tests: &[&dyn Fn()]) {
    serial_println!("running {} tests", tests.len());
    for test in tests {
        test();
    }
    serial_println!("test result: ok. {} passed", tests.len());
    machine::poweroff();
}

/// Panic handler installed only for `#[cfg(test)]` builds: reports the
/// failure over serial and halts instead of propagating, since a panic
/// inside the test binary has nowhere else to go.
pub fn test_panic_handler(info: &PanicInfo) -> ! {
    serial_println!("test result: FAILED");
    serial_println!("{}", info);
    machine::halt()
}

fn bring_up_session() {
    session::init();
    let sid = session::create(1);
    let pty_id = pty::alloc();
    if sid >= 0
        && pty_id >= 0
        && session::set_controlling_pty(sid, pty_id)
        && session::set_active(sid)
    {
        tty::attach_session(sid, pty_id);
        log!(ok, "Session initialized");
    } else {
        log!(warn, "Session initialization degraded");
    }
}

fn bring_up_framebuffer(mb_info: &MbBootInfo) {
    if let Some(fb) = mb_info.framebuffer() {
        if fb.is_rgb32() {
            let bytes = (fb.pitch as u64) * (fb.height as u64);
            let mut mapped = 0u64;
            while mapped < bytes {
                let _ = memory::vmm::map_2m(fb.addr + mapped, fb.addr + mapped, memory::vmm::MapFlags::WRITABLE);
                mapped += 0x20_0000;
            }
            if console::enable_framebuffer(fb.addr, fb.width, fb.height, fb.pitch) {
                log!(ok, "Framebuffer console enabled");
                return;
            }
        }
    }
    log!(warn, "Framebuffer console unavailable, using VGA text mode");
}

/// Multiboot2 entry point. `multiboot_magic`/`multiboot_info_addr` are the
/// values the bootloader leaves in `eax`/`ebx` at handoff.
#[no_mangle]
pub extern "C" fn kernel_main(multiboot_magic: u32, multiboot_info_addr: u32) -> ! {
    console::init();
    log!(ok, "walu_core booting...");

    if multiboot_magic != MULTIBOOT2_BOOTLOADER_MAGIC {
        log!(failed, "Invalid multiboot2 magic: {:#x}", multiboot_magic);
        kernel::halt_forever();
    }

    let mb_info = unsafe { MbBootInfo::new(multiboot_info_addr as usize) };
    log!(ok, "Multiboot2 handoff OK");

    unsafe { memory::pmm::init(multiboot_info_addr as usize) };
    log!(ok, "PMM initialized");

    memory::vmm::init();
    log!(ok, "VMM initialized");

    bring_up_framebuffer(&mb_info);

    interrupts::init();
    interrupts::pic::remap(0x20, 0x28);
    for irq in 0..16u8 {
        interrupts::pic::set_mask(irq);
    }
    interrupts::pic::clear_mask(0);
    interrupts::pic::clear_mask(1);
    interrupts::pic::clear_mask(2);

    interrupts::pit::init(100);
    keyboard::init();
    tty::init();
    pty::init();
    storage::init();
    fs::init();

    bring_up_session();

    log!(ok, "Interrupts initialized");
    console::write_str(history::boot_banner());
    console::putc(b'\n');

    io_port::sti();

    log!(ok, "Kernel ready.");

    #[cfg(test)]
    test_main();

    loop {
        tty::poll_input();
        io_port::hlt();
    }
}
