//! Page-fault (#PF, vector 14) policy: lazy heap backing is the one
//! recoverable case; everything else is fatal.

use crate::arch::TrapFrame;
use crate::config::{HEAP_BASE, HEAP_LIMIT};
use crate::kerror;
use crate::mm::paging::PageFlags;
use crate::mm::{frame, paging};

/// Bit 0 of the #PF error code: set if the fault was caused by a
/// present page (protection violation) rather than a not-present one.
const ERR_PRESENT: u32 = 1 << 0;
/// Bit 2: set if the fault happened while running in ring 3.
const ERR_USER: u32 = 1 << 2;

pub fn handle_page_fault(frame_ctx: &mut TrapFrame, fault_addr: u32) {
    let from_user = frame_ctx.error_code & ERR_USER != 0;
    let was_present = frame_ctx.error_code & ERR_PRESENT != 0;

    if !from_user && !was_present && (HEAP_BASE..HEAP_LIMIT).contains(&fault_addr) {
        if let Err(e) = map_heap_page(fault_addr) {
            kerror!("heap page-fault at {:#x} unrecoverable: {:?}", fault_addr, e);
            crate::lib::panic::fatal(frame_ctx.vector, frame_ctx.error_code, frame_ctx);
        }
        return;
    }

    kerror!(
        "fatal page fault: addr={:#x} user={} present={} eip={:#x}",
        fault_addr,
        from_user,
        was_present,
        { frame_ctx.eip }
    );
    crate::lib::panic::fatal(frame_ctx.vector, frame_ctx.error_code, frame_ctx);
}

fn map_heap_page(fault_addr: u32) -> crate::lib::error::KResult<()> {
    let page_va = fault_addr & !0xFFF;
    let phys = frame::alloc()?;
    let active_dir = super::active_directory();
    unsafe { paging::map(active_dir, page_va, phys, PageFlags::PRESENT | PageFlags::WRITABLE) }
}

#[cfg(test)]
mod tests {
    #[test]
    fn heap_window_bounds_are_well_ordered() {
        use crate::config::{HEAP_BASE, HEAP_LIMIT};
        assert!(HEAP_LIMIT > HEAP_BASE);
    }
}
