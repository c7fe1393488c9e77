//! The nine syscall implementations, pinned to the ABI numbers in
//! `mod.rs`'s dispatch table.

use super::uaccess;
use crate::arch::TrapFrame;
use crate::process::{scheduler, table, task::Pid, wait};

const MAX_WRITE_LEN: u32 = 4096;

pub fn sys_exit(caller: Pid, code: i32) -> isize {
    wait::exit(caller, code);
    scheduler::schedule();
    // Unreachable in practice: `exit` leaves the caller Zombie, which
    // `pick_next` never selects, so control never returns here.
    0
}

pub fn sys_write(ptr: u32) -> isize {
    match unsafe { uaccess::check_cstr(ptr, MAX_WRITE_LEN) } {
        Some(bytes) => {
            use core::fmt::Write;
            let mut writer = crate::console::writer();
            if let Ok(s) = core::str::from_utf8(bytes) {
                let _ = writer.write_str(s);
            }
            bytes.len() as isize
        }
        None => -1,
    }
}

pub fn sys_read(_buf: u32, _len: u32) -> isize {
    // No console input queue exists in this core (keyboard is an
    // external collaborator); there is simply nothing to copy yet.
    -1
}

pub fn sys_getpid(caller: Pid) -> isize {
    caller as isize
}

pub fn sys_yield() -> isize {
    scheduler::schedule();
    0
}

pub fn sys_sleep(caller: Pid, ms: u32) -> isize {
    let wake_at = scheduler::tick_count() + ms as u64;
    wait::sleep(caller, wake_at);
    scheduler::schedule();
    0
}

pub fn sys_fork(caller: Pid, frame: &TrapFrame) -> isize {
    match crate::process::fork(caller, frame.eip, frame.useresp) {
        Ok(child_pid) => child_pid as isize,
        Err(_) => -1,
    }
}

pub fn sys_exec(caller: Pid, path_ptr: u32, frame: &mut TrapFrame) -> isize {
    let path = match unsafe { uaccess::check_cstr(path_ptr, 256) } {
        Some(bytes) => match core::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => return -1,
        },
        None => return -1,
    };
    let bytes = match crate::vfs_stub::lookup(path) {
        Some(b) => b,
        None => return -1,
    };
    let loaded = table::with_mut(caller, |t| {
        let address_space = t.address_space.as_mut().ok_or(())?;
        unsafe { crate::process::exec::replace_image(address_space, bytes) }.map_err(|_| ())
    });
    match loaded {
        Some(Ok(entry)) => {
            // The trap-return path always IRETs using this frame, so
            // overwriting its EIP/ESP here is what makes the caller
            // resume in the new image instead of falling back into its
            // old call site.
            frame.eip = entry;
            frame.useresp = crate::config::USER_STACK_TOP;
            0
        }
        _ => -1,
    }
}

pub fn sys_wait(caller: Pid, status_out_ptr: u32) -> isize {
    if table::children_of(caller).is_empty() {
        return -1;
    }
    loop {
        if let Some((child_pid, code)) = wait::try_reap_one(caller) {
            if status_out_ptr != 0 && super::uaccess::check_range(status_out_ptr, 4) {
                unsafe { *(status_out_ptr as *mut i32) = code };
            }
            return child_pid as isize;
        }
        wait::block(caller);
        scheduler::schedule();
    }
}

/// Pulls the five argument registers out of a trap frame in ABI order.
pub fn args(frame: &TrapFrame) -> (u32, u32, u32, u32, u32) {
    (frame.regs.ebx, frame.regs.ecx, frame.regs.edx, frame.regs.esi, frame.regs.edi)
}
