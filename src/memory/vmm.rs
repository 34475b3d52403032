//! 2-MiB huge-page virtual mapper.
//!
//! Grounded on the original kernel's `vmm.c`: walks the boot page tables
//! directly (no recursive mapping trick), allocating intermediate tables
//! from frames inside the identity-mapped low-1-GiB window so that
//! `phys == virt` holds for table pointers.

use crate::io_port::invlpg;
use crate::memory::pmm;
use bitflags::bitflags;

const PAGE_PRESENT: u64 = 1 << 0;
const PAGE_WRITABLE: u64 = 1 << 1;
const PAGE_USER: u64 = 1 << 2;
const PAGE_HUGE: u64 = 1 << 7;
const PAGE_NX: u64 = 1 << 63;

const IDENTITY_WINDOW_LIMIT: u64 = 1024 * 1024 * 1024;
const PHYS_ADDR_MASK_2M: u64 = 0x000F_FFFF_FFE0_0000;
const PHYS_ADDR_MASK_TABLE: u64 = 0x000F_FFFF_FFFF_F000;

unsafe extern "C" {
    static mut pml4_table: [u64; 512];
}

bitflags! {
    #[derive(Clone, Copy)]
    pub struct MapFlags: u64 {
        const WRITABLE = 1 << 0;
        const USER     = 1 << 1;
        const NX       = 1 << 2;
    }
}

fn phys_to_virt(phys_addr: u64) -> *mut u64 {
    phys_addr as usize as *mut u64
}

unsafe fn ensure_table(parent: *mut u64, index: u16) -> Option<*mut u64> {
    unsafe {
        let entry = *parent.add(index as usize);
        if entry & PAGE_PRESENT == 0 {
            let frame = pmm::alloc_frame_low(IDENTITY_WINDOW_LIMIT);
            if frame == 0 {
                return None;
            }
            core::ptr::write_bytes(frame as usize as *mut u8, 0, 4096);
            *parent.add(index as usize) = frame | PAGE_PRESENT | PAGE_WRITABLE;
        }

        let child_phys = (*parent.add(index as usize)) & PHYS_ADDR_MASK_TABLE;
        Some(phys_to_virt(child_phys))
    }
}

/// Brings the mapper up and stress-tests the path by mapping one extra
/// 2-MiB chunk at `0x4000_0000`, matching the original kernel's own
/// bring-up step.
pub fn init() {
    let _ = map_2m(0x4000_0000, 0x4000_0000, MapFlags::WRITABLE);
}

pub fn map_2m(virt_addr: u64, phys_addr: u64, flags: MapFlags) -> bool {
    if virt_addr & 0x1F_FFFF != 0 || phys_addr & 0x1F_FFFF != 0 {
        return false;
    }

    let pml4_i = ((virt_addr >> 39) & 0x1FF) as u16;
    let pdpt_i = ((virt_addr >> 30) & 0x1FF) as u16;
    let pd_i = ((virt_addr >> 21) & 0x1FF) as u16;

    unsafe {
        let pml4: *mut u64 = core::ptr::addr_of_mut!(pml4_table) as *mut u64;
        let Some(pdpt) = ensure_table(pml4, pml4_i) else {
            return false;
        };
        let Some(pd) = ensure_table(pdpt, pdpt_i) else {
            return false;
        };

        let mut entry_flags = PAGE_PRESENT | PAGE_HUGE;
        if flags.contains(MapFlags::WRITABLE) {
            entry_flags |= PAGE_WRITABLE;
        }
        if flags.contains(MapFlags::USER) {
            entry_flags |= PAGE_USER;
        }
        if flags.contains(MapFlags::NX) {
            entry_flags |= PAGE_NX;
        }

        *pd.add(pd_i as usize) = (phys_addr & PHYS_ADDR_MASK_2M) | entry_flags;
        invlpg(virt_addr);
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_misaligned_addresses() {
        assert!(!map_2m(0x1000, 0x0, MapFlags::WRITABLE));
        assert!(!map_2m(0x0, 0x1000, MapFlags::WRITABLE));
    }
}
