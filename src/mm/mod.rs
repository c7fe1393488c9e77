//! Memory management: Component D (physical frames), Component E
//! (paging/VMM), Component F (kernel heap).

pub mod address_space;
pub mod fault;
pub mod frame;
pub mod heap;
pub mod paging;

use crate::arch::x86::cpu;
use spin::Mutex;

/// The currently active address space's page-directory physical
/// frame. Updated by the scheduler whenever it loads a new CR3; read
/// by the page-fault handler to know which directory to install a
/// lazily-faulted heap page into.
static CURRENT_DIRECTORY: Mutex<u32> = Mutex::new(0);

pub fn set_active_directory(dir_phys: u32) {
    *CURRENT_DIRECTORY.lock() = dir_phys;
}

pub fn active_directory() -> u32 {
    *CURRENT_DIRECTORY.lock()
}

/// Builds the boot address space: identity-maps the loaded kernel
/// image (and the low 1 MiB it depends on for legacy structures) 1:1,
/// then enables paging.
///
/// # Safety
/// Must run exactly once during boot, after the PFA is initialized and
/// before anything touches the heap window.
pub unsafe fn init_boot_address_space(kernel_start: u32, kernel_end: u32) -> u32 {
    let dir_phys = frame::alloc().expect("no frames for boot page directory");
    core::ptr::write_bytes(dir_phys as *mut u8, 0, 4096);

    let mut va = 0u32;
    while va < kernel_end.max(crate::config::LOW_MEMORY_RESERVED) {
        let flags = paging::PageFlags::PRESENT | paging::PageFlags::WRITABLE;
        paging::map_in(dir_phys, va, va, flags).expect("identity map failed");
        va += 4096;
    }
    let _ = kernel_start;

    cpu::write_cr3(dir_phys);
    let cr0 = cpu::read_cr0();
    cpu::write_cr0(cr0 | (1 << 31)); // CR0.PG
    set_active_directory(dir_phys);
    dir_phys
}
