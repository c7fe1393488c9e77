//! An `AddressSpace` wraps a page-directory physical frame together
//! with the bookkeeping `fork`/`exec`/`destroy_as` need: which user
//! frames it owns, so a plain copy-AS fork can walk and duplicate them
//! and `destroy_as` can release them.

use super::paging::{self, PageFlags};
use crate::lib::error::KResult;
use alloc::vec::Vec;

pub struct AddressSpace {
    pub page_directory: u32,
    /// (virtual address, physical frame, flags) for every user-region
    /// leaf mapping this AS owns exclusively. The kernel's shared
    /// upper-half mappings are not tracked here; they're never touched
    /// by fork or destroy.
    user_frames: Vec<(u32, u32, PageFlags)>,
    refcount: u32,
}

impl AddressSpace {
    /// # Safety
    /// `kernel_dir_phys` must be a live, fully initialized kernel page
    /// directory.
    pub unsafe fn new(kernel_dir_phys: u32) -> KResult<Self> {
        let page_directory = paging::create_as(kernel_dir_phys)?;
        Ok(Self { page_directory, user_frames: Vec::new(), refcount: 1 })
    }

    pub unsafe fn map_user(&mut self, va: u32, pa: u32, flags: PageFlags) -> KResult<()> {
        paging::map_in(self.page_directory, va, pa, flags)?;
        self.user_frames.push((va, pa, flags));
        Ok(())
    }

    pub unsafe fn translate(&self, va: u32) -> KResult<u32> {
        paging::translate(self.page_directory, va)
    }

    /// Plain copy-AS fork (not COW; see the project's grounding notes):
    /// duplicates every user frame byte-for-byte into a fresh AS. On
    /// any allocation failure partway through, everything allocated so
    /// far for the child is released and the error is propagated.
    pub unsafe fn fork(&self, kernel_dir_phys: u32) -> KResult<Self> {
        let mut child = Self::new(kernel_dir_phys)?;
        for &(va, _pa, flags) in self.user_frames.iter() {
            match Self::copy_one_frame(&mut child, va, flags) {
                Ok(()) => {}
                Err(e) => {
                    child.destroy();
                    return Err(e);
                }
            }
        }
        // Byte-copy the payloads now that every slot is mapped, reading
        // through the parent's own mapping (we're still running in the
        // parent's AS at this point).
        for &(va, _pa, _flags) in self.user_frames.iter() {
            let child_pa = child.translate(va).expect("just mapped");
            unsafe {
                core::ptr::copy_nonoverlapping(
                    va as *const u8,
                    child_pa as *mut u8,
                    crate::config::FRAME_SIZE as usize,
                );
            }
        }
        Ok(child)
    }

    unsafe fn copy_one_frame(child: &mut Self, va: u32, flags: PageFlags) -> KResult<()> {
        let new_frame = super::frame::alloc()?;
        child.map_user(va, new_frame, flags)
    }

    /// Unmaps and frees every user frame this AS currently owns, without
    /// touching the directory itself or the kernel's shared half. Used
    /// by `exec` to tear down a task's previous image before loading a
    /// new one into the same, still-live address space.
    pub unsafe fn reset_user_region(&mut self) {
        for &(va, pa, _flags) in self.user_frames.iter() {
            paging::unmap(self.page_directory, va);
            super::frame::free(pa);
        }
        self.user_frames.clear();
    }

    pub fn user_frame_count(&self) -> usize {
        self.user_frames.len()
    }

    pub fn incref(&mut self) {
        self.refcount += 1;
    }

    pub fn decref(&mut self) -> u32 {
        self.refcount -= 1;
        self.refcount
    }

    /// Frees every user frame this AS owns exclusively, its page
    /// tables, and its directory. Must not be called while this AS is
    /// the one active in CR3.
    pub unsafe fn destroy(&mut self) {
        for &(_va, pa, _flags) in self.user_frames.iter() {
            super::frame::free(pa);
        }
        paging::destroy_as(self.page_directory);
        self.user_frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_address_space_has_refcount_one() {
        // Constructed manually rather than via `new`, since `new` pokes
        // real page-directory memory through the identity mapping.
        let as_ = AddressSpace {
            page_directory: 0,
            user_frames: Vec::new(),
            refcount: 1,
        };
        assert_eq!(as_.refcount, 1);
        assert_eq!(as_.user_frame_count(), 0);
    }
}
