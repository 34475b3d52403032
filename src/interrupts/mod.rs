// https://wiki.osdev.org/Interrupt_Descriptor_Table

pub mod pic;
pub mod pit;

use crate::io_port::{cli, hlt, read_cr2};
use crate::serial_println;
use bitflags::bitflags;
use core::arch::asm;

bitflags! {
    #[derive(Clone, Copy)]
    struct Ist: u8 {
        const IST_OFFSET = 0b111;
    }
}

bitflags! {
    #[derive(Clone, Copy)]
    struct TypeAttributes: u8 {
        const GATE_TYPE = 0b0000_1111;
        const DPL       = 0b0110_0000;
        const PRESENT   = 0b1000_0000;
    }
}

const KERNEL_CODE_SELECTOR: u16 = 0x08;
const INTERRUPT_GATE: u8 = 0x8E; // present, dpl 0, 64-bit interrupt gate

/// Vectors that push a hardware error code onto the stack before entry.
const VECTORS_WITH_ERROR_CODE: [u8; 10] = [8, 10, 11, 12, 13, 14, 17, 21, 29, 30];

#[repr(C)]
#[derive(Clone, Copy)]
struct InterruptDescriptor {
    offset_1: u16,
    selector: u16,
    ist: Ist,
    type_attrs: TypeAttributes,
    offset_2: u16,
    offset_3: u32,
    zero: u32,
}

impl InterruptDescriptor {
    const fn missing() -> Self {
        InterruptDescriptor {
            offset_1: 0,
            selector: 0,
            ist: Ist::empty(),
            type_attrs: TypeAttributes::empty(),
            offset_2: 0,
            offset_3: 0,
            zero: 0,
        }
    }

    fn set(&mut self, handler: u64) {
        self.offset_1 = (handler & 0xFFFF) as u16;
        self.offset_2 = ((handler >> 16) & 0xFFFF) as u16;
        self.offset_3 = (handler >> 32) as u32;
        self.selector = KERNEL_CODE_SELECTOR;
        self.ist = Ist::empty();
        self.type_attrs = TypeAttributes::from_bits_truncate(INTERRUPT_GATE);
    }
}

#[repr(C, align(16))]
struct InterruptDescriptorTable {
    entries: [InterruptDescriptor; 256],
}

static mut IDT: InterruptDescriptorTable = InterruptDescriptorTable {
    entries: [InterruptDescriptor::missing(); 256],
};

#[repr(C, packed)]
struct Idtr {
    limit: u16,
    base: u64,
}

fn has_error_code(vector: u8) -> bool {
    VECTORS_WITH_ERROR_CODE.contains(&vector)
}

fn panic_exception(vector: u8, error_code: u64) -> ! {
    cli();
    serial_println!("panic: exception vector {}", vector);
    if has_error_code(vector) {
        serial_println!("panic: error code {:#x}", error_code);
    }
    if vector == 14 {
        serial_println!("panic: cr2 {:#x}", read_cr2());
    }
    loop {
        hlt();
    }
}

macro_rules! exception_no_err {
    ($vector:literal, $name:ident) => {
        extern "x86-interrupt" fn $name(_stack_frame: InterruptStackFrame) {
            panic_exception($vector, 0);
        }
    };
}

macro_rules! exception_err {
    ($vector:literal, $name:ident) => {
        extern "x86-interrupt" fn $name(_stack_frame: InterruptStackFrame, error_code: u64) {
            panic_exception($vector, error_code);
        }
    };
}

#[repr(C)]
struct InterruptStackFrame {
    instruction_pointer: u64,
    code_segment: u64,
    cpu_flags: u64,
    stack_pointer: u64,
    stack_segment: u64,
}

exception_no_err!(0, divide_error);
exception_no_err!(1, debug_exception);
exception_no_err!(2, non_maskable_interrupt);
exception_no_err!(3, breakpoint);
exception_no_err!(4, overflow);
exception_no_err!(5, bound_range_exceeded);
exception_no_err!(6, invalid_opcode);
exception_no_err!(7, device_not_available);
exception_err!(8, double_fault);
exception_no_err!(9, coprocessor_segment_overrun);
exception_err!(10, invalid_tss);
exception_err!(11, segment_not_present);
exception_err!(12, stack_segment_fault);
exception_err!(13, general_protection);
exception_err!(14, page_fault);
exception_no_err!(15, reserved_15);
exception_no_err!(16, x87_fp_error);
exception_err!(17, alignment_check);
exception_no_err!(18, machine_check);
exception_no_err!(19, simd_fp_exception);
exception_no_err!(20, virtualization_exception);
exception_err!(21, control_protection_exception);
exception_no_err!(22, reserved_22);
exception_no_err!(23, reserved_23);
exception_no_err!(24, reserved_24);
exception_no_err!(25, reserved_25);
exception_no_err!(26, reserved_26);
exception_no_err!(27, reserved_27);
exception_no_err!(28, hypervisor_injection_exception);
exception_err!(29, vmm_communication_exception);
exception_err!(30, security_exception);
exception_no_err!(31, reserved_31);

extern "x86-interrupt" fn irq_timer(_stack_frame: InterruptStackFrame) {
    pit::on_tick();
    pic::send_eoi(0);
}

extern "x86-interrupt" fn irq_keyboard(_stack_frame: InterruptStackFrame) {
    crate::keyboard::on_irq();
    pic::send_eoi(1);
}

extern "x86-interrupt" fn irq_default(_stack_frame: InterruptStackFrame) {
    pic::send_eoi(7);
}

unsafe fn set_gate(vector: usize, handler: u64) {
    unsafe {
        IDT.entries[vector].set(handler);
    }
}

/// Populates all 256 vectors (benign default for the unused ones) and loads
/// the IDT register.
pub fn init() {
    unsafe {
        for vector in 0..256usize {
            set_gate(vector, irq_default as u64);
        }

        set_gate(0, divide_error as u64);
        set_gate(1, debug_exception as u64);
        set_gate(2, non_maskable_interrupt as u64);
        set_gate(3, breakpoint as u64);
        set_gate(4, overflow as u64);
        set_gate(5, bound_range_exceeded as u64);
        set_gate(6, invalid_opcode as u64);
        set_gate(7, device_not_available as u64);
        set_gate(8, double_fault as u64);
        set_gate(9, coprocessor_segment_overrun as u64);
        set_gate(10, invalid_tss as u64);
        set_gate(11, segment_not_present as u64);
        set_gate(12, stack_segment_fault as u64);
        set_gate(13, general_protection as u64);
        set_gate(14, page_fault as u64);
        set_gate(15, reserved_15 as u64);
        set_gate(16, x87_fp_error as u64);
        set_gate(17, alignment_check as u64);
        set_gate(18, machine_check as u64);
        set_gate(19, simd_fp_exception as u64);
        set_gate(20, virtualization_exception as u64);
        set_gate(21, control_protection_exception as u64);
        set_gate(22, reserved_22 as u64);
        set_gate(23, reserved_23 as u64);
        set_gate(24, reserved_24 as u64);
        set_gate(25, reserved_25 as u64);
        set_gate(26, reserved_26 as u64);
        set_gate(27, reserved_27 as u64);
        set_gate(28, hypervisor_injection_exception as u64);
        set_gate(29, vmm_communication_exception as u64);
        set_gate(30, security_exception as u64);
        set_gate(31, reserved_31 as u64);

        set_gate(32, irq_timer as u64);
        set_gate(33, irq_keyboard as u64);

        #[allow(static_mut_refs)]
        let idtr = Idtr {
            limit: (core::mem::size_of::<InterruptDescriptorTable>() - 1) as u16,
            base: core::ptr::addr_of!(IDT) as u64,
        };
        asm!("lidt [{}]", in(reg) &idtr, options(readonly, nostack, preserves_flags));
    }
}
