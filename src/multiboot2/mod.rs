//! A narrow Multiboot2 information-block reader.
//!
//! Only the two tags the core cares about are modeled: the memory map
//! (type 6) and the framebuffer (type 8). Tags are walked with a plain
//! cursor over the boot-info block rather than a typed DST per tag.

pub mod framebuffer_info;
pub mod memory_map;

use framebuffer_info::FramebufferTag;
use memory_map::MemoryMapTag;

pub const MULTIBOOT2_BOOTLOADER_MAGIC: u32 = 0x36D7_6289;

const TAG_TYPE_END: u32 = 0;
const TAG_TYPE_MMAP: u32 = 6;
const TAG_TYPE_FRAMEBUFFER: u32 = 8;

#[repr(C, packed)]
struct RawTagHeader {
    tag_type: u32,
    size: u32,
}

/// A handle over the Multiboot2 boot information block.
///
/// `addr` is the physical address the 32-bit shim was handed; in this
/// kernel phys == virt for everything below the 1 GiB identity window,
/// which always holds for Multiboot2 data.
#[derive(Clone, Copy)]
pub struct MbBootInfo {
    addr: usize,
    total_size: u32,
}

impl MbBootInfo {
    /// # Safety
    /// `addr` must point at a valid Multiboot2 information block.
    pub unsafe fn new(addr: usize) -> Self {
        let total_size = unsafe { core::ptr::read_unaligned(addr as *const u32) };
        MbBootInfo { addr, total_size }
    }

    pub fn addr(&self) -> usize {
        self.addr
    }

    pub fn size(&self) -> u32 {
        self.total_size
    }

    fn tags(&self) -> TagIter {
        TagIter {
            cursor: self.addr + 8,
            end: self.addr + self.total_size as usize,
        }
    }

    pub fn memory_map(&self) -> Option<MemoryMapTag> {
        self.tags()
            .find(|t| t.tag_type == TAG_TYPE_MMAP)
            .map(|t| unsafe { MemoryMapTag::from_tag(t.addr, t.size) })
    }

    pub fn framebuffer(&self) -> Option<FramebufferTag> {
        self.tags()
            .find(|t| t.tag_type == TAG_TYPE_FRAMEBUFFER)
            .map(|t| unsafe { FramebufferTag::from_tag(t.addr, t.size) })
    }
}

struct RawTag {
    tag_type: u32,
    addr: usize,
    size: u32,
}

struct TagIter {
    cursor: usize,
    end: usize,
}

impl Iterator for TagIter {
    type Item = RawTag;

    fn next(&mut self) -> Option<RawTag> {
        if self.cursor + 8 > self.end {
            return None;
        }

        let header = unsafe { core::ptr::read_unaligned(self.cursor as *const RawTagHeader) };
        if header.tag_type == TAG_TYPE_END {
            return None;
        }

        let tag = RawTag {
            tag_type: header.tag_type,
            addr: self.cursor,
            size: header.size,
        };

        let advance = (header.size as usize + 7) & !7usize;
        self.cursor += advance;
        Some(tag)
    }
}
