//! Bitmap physical frame allocator.
//!
//! Grounded on the original kernel's `pmm.c`: a bit per 4-KiB frame up to a
//! 1-GiB ceiling, two-pass init over the Multiboot2 memory map, first-fit
//! allocation, frame 0 permanently reserved.

use crate::data_structures::bitmap::Bitmap;
use crate::multiboot2::MbBootInfo;
use lazy_static::lazy_static;
use spin::Mutex;

const FRAME_SIZE: u64 = 4096;
const PMM_MAX_MEMORY: u64 = 1024 * 1024 * 1024;
const PMM_MAX_FRAMES: u64 = PMM_MAX_MEMORY / FRAME_SIZE;
const BITMAP_BLOCKS: usize = (PMM_MAX_FRAMES / 8) as usize;

unsafe extern "C" {
    static _kernel_start: u8;
    static _kernel_end: u8;
}

struct PmmInner {
    bitmap: Bitmap<BITMAP_BLOCKS>,
    total_frames: u64,
    used_frames: u64,
}

lazy_static! {
    static ref PMM: Mutex<PmmInner> = Mutex::new(PmmInner {
        bitmap: Bitmap::new(Some(PMM_MAX_FRAMES as usize)),
        total_frames: PMM_MAX_FRAMES,
        used_frames: PMM_MAX_FRAMES,
    });
}

impl PmmInner {
    fn bitmap_test(&self, frame: u64) -> bool {
        if frame >= self.total_frames {
            return true;
        }
        self.bitmap.get(frame as usize).unwrap_or(true)
    }

    fn bitmap_set(&mut self, frame: u64) {
        if frame >= self.total_frames {
            return;
        }
        if !self.bitmap.get(frame as usize).unwrap_or(false) {
            self.bitmap.set(frame as usize, true);
            self.used_frames += 1;
        }
    }

    fn bitmap_clear(&mut self, frame: u64) {
        if frame >= self.total_frames {
            return;
        }
        if self.bitmap.get(frame as usize).unwrap_or(false) {
            self.bitmap.set(frame as usize, false);
            if self.used_frames > 0 {
                self.used_frames -= 1;
            }
        }
    }

    fn mark_region(&mut self, addr: u64, len: u64, available: bool) {
        if len == 0 || addr >= PMM_MAX_MEMORY {
            return;
        }

        let mut end = addr + len;
        if end > PMM_MAX_MEMORY {
            end = PMM_MAX_MEMORY;
        }

        let first = addr / FRAME_SIZE;
        let last = (end + FRAME_SIZE - 1) / FRAME_SIZE;

        for frame in first..last {
            if available {
                self.bitmap_clear(frame);
            } else {
                self.bitmap_set(frame);
            }
        }
    }

    fn alloc_frame_below(&mut self, max_frame: u64) -> u64 {
        let ceiling = max_frame.min(self.total_frames);
        for frame in 0..ceiling {
            if !self.bitmap_test(frame) {
                self.bitmap_set(frame);
                return frame * FRAME_SIZE;
            }
        }
        0
    }
}

/// Walks the Multiboot2 memory map and initializes the frame bitmap.
///
/// # Safety
/// `mb_info_addr` must be the physical address handed to `kernel_main` by
/// the boot shim, and the identity-mapped low 1 GiB must still be mapped.
pub unsafe fn init(mb_info_addr: usize) {
    let mb_info = unsafe { MbBootInfo::new(mb_info_addr) };

    let mut highest_available_end: u64 = 16 * 1024 * 1024;
    if let Some(mmap) = mb_info.memory_map() {
        for entry in mmap.entries() {
            if entry.is_available() {
                let candidate_end = entry.addr + entry.len;
                if candidate_end > highest_available_end {
                    highest_available_end = candidate_end;
                }
            }
        }
    }

    if highest_available_end > PMM_MAX_MEMORY {
        highest_available_end = PMM_MAX_MEMORY;
    }

    let mut total_frames = highest_available_end / FRAME_SIZE;
    if total_frames == 0 {
        total_frames = 1;
    }

    let mut inner = PMM.lock();
    inner.total_frames = total_frames;
    inner.bitmap = Bitmap::new(Some(PMM_MAX_FRAMES as usize));
    for frame in 0..PMM_MAX_FRAMES {
        inner.bitmap.set(frame as usize, true);
    }
    inner.used_frames = total_frames;

    if let Some(mmap) = mb_info.memory_map() {
        for entry in mmap.entries() {
            if entry.is_available() {
                inner.mark_region(entry.addr, entry.len, true);
            }
        }
    }

    inner.mark_region(0, 1024 * 1024, false);

    let kstart = unsafe { &_kernel_start as *const u8 as u64 };
    let kend = unsafe { &_kernel_end as *const u8 as u64 };
    inner.mark_region(kstart, kend.saturating_sub(kstart), false);
}

pub fn alloc_frame() -> u64 {
    PMM.lock().alloc_frame_below(PMM_MAX_FRAMES)
}

pub fn alloc_frame_low(max_phys_addr: u64) -> u64 {
    PMM.lock().alloc_frame_below(max_phys_addr / FRAME_SIZE)
}

pub fn free_frame(phys_addr: u64) {
    PMM.lock().bitmap_clear(phys_addr / FRAME_SIZE);
}

pub fn total_kib() -> u64 {
    (PMM.lock().total_frames * FRAME_SIZE) / 1024
}

pub fn used_kib() -> u64 {
    (PMM.lock().used_frames * FRAME_SIZE) / 1024
}

pub fn free_kib() -> u64 {
    let inner = PMM.lock();
    if inner.used_frames > inner.total_frames {
        return 0;
    }
    ((inner.total_frames - inner.used_frames) * FRAME_SIZE) / 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_region_tracks_used_frames() {
        let mut inner = PmmInner {
            bitmap: Bitmap::new(Some(PMM_MAX_FRAMES as usize)),
            total_frames: 256,
            used_frames: 256,
        };
        for frame in 0..256u64 {
            inner.bitmap.set(frame as usize, true);
        }

        inner.mark_region(0, 256 * FRAME_SIZE, true);
        assert_eq!(inner.used_frames, 0);

        inner.mark_region(0, FRAME_SIZE, false);
        assert_eq!(inner.used_frames, 1);
        assert!(inner.bitmap_test(0));
    }

    #[test]
    fn alloc_below_respects_ceiling() {
        let mut inner = PmmInner {
            bitmap: Bitmap::new(Some(PMM_MAX_FRAMES as usize)),
            total_frames: 16,
            used_frames: 0,
        };

        let phys = inner.alloc_frame_below(4);
        assert_eq!(phys, 0);
        assert!(inner.bitmap_test(0));
        let phys2 = inner.alloc_frame_below(4);
        assert_eq!(phys2, FRAME_SIZE);
    }
}
