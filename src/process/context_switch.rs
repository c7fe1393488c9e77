//! Component H: the six-step context-switch contract, wired to the
//! architecture-level primitives in `arch::x86::context`.

use super::scheduler;
use super::table;
use super::task::{Pid, Ring, TaskState};
use crate::arch::x86::{context, tss};
use crate::arch::x86::cpu::InterruptGuard;
use crate::mm;

/// Switches from whatever task is currently running to `next`. Follows
/// the ordering guarantee: interrupts stay disabled from entry until
/// either the ring-3 IRET (step 5) or the restored callee's EFLAGS
/// (step 6) re-enables them.
pub fn switch_to(next: Pid) {
    let _guard = InterruptGuard::new();

    let prev = scheduler::current();
    if let Some(prev_pid) = prev {
        table::with_mut(prev_pid, |t| {
            if t.state == TaskState::Running {
                t.state = TaskState::Ready;
            }
        });
    }
    table::with_mut(next, |t| t.state = TaskState::Running);
    scheduler::set_current(next);

    let (next_dir, next_stack_top, first_run, ring, next_esp) = table::with(next, |t| {
        (t.page_directory, t.kernel_stack_top, t.first_run, t.ring, t.context.esp)
    })
    .expect("switch_to target must exist");

    if prev.and_then(|p| table::with(p, |t| t.page_directory)) != Some(next_dir) {
        unsafe { crate::arch::x86::cpu::write_cr3(next_dir) };
        mm::set_active_directory(next_dir);
    }

    tss::set_kernel_stack(next_stack_top);

    if ring == Ring::User && first_run {
        table::with_mut(next, |t| t.first_run = false);
        unsafe { context::switch_to_user_first_run(next_esp) };
        // never returns
    }

    let old_esp_cell: *mut u32 = match prev {
        Some(prev_pid) => {
            table::with_mut(prev_pid, |t| &mut t.context.esp as *mut u32).unwrap_or(core::ptr::null_mut())
        }
        None => core::ptr::null_mut(),
    };
    if old_esp_cell.is_null() {
        // Nothing to save into (e.g. switching away from kernel_main's
        // own boot stack, which never gets resumed). Build a throwaway
        // cell so the asm routine still has somewhere to write.
        let mut discard: u32 = 0;
        unsafe { context::switch_to_kernel(&mut discard as *mut u32, next_esp) };
    } else {
        unsafe { context::switch_to_kernel(old_esp_cell, next_esp) };
    }
}
