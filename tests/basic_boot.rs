#![no_std]
#![no_main]
#![feature(custom_test_frameworks)]
#![test_runner(walu_core::test_runner)]
#![reexport_test_harness_main = "test_main"]

use core::panic::PanicInfo;

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    walu_core::test_panic_handler(info)
}

#[unsafe(no_mangle)]
pub extern "C" fn kernel_main(_multiboot_magic: u32, _multiboot_info_addr: u32) -> ! {
    test_main();
    loop {}
}

#[test_case]
fn basic_assert() {
    assert_eq!(1, 1);
}
