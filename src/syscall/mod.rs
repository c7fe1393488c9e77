//! Component K: the INT 0x80 system call layer.
//!
//! ABI: EAX = number, EBX/ECX/EDX/ESI/EDI = up to five arguments,
//! return value written into the trap frame's EAX slot. Numbers are
//! pinned 0..8; this core never bumps `SYSCALL_MAX` past 8.

pub mod calls;
pub mod uaccess;

use crate::arch::TrapFrame;
use crate::kwarn;
use crate::process::scheduler;

pub const SYS_EXIT: u32 = 0;
pub const SYS_WRITE: u32 = 1;
pub const SYS_READ: u32 = 2;
pub const SYS_YIELD: u32 = 3;
pub const SYS_GETPID: u32 = 4;
pub const SYS_SLEEP: u32 = 5;
pub const SYS_FORK: u32 = 6;
pub const SYS_EXEC: u32 = 7;
pub const SYS_WAIT: u32 = 8;

pub const SYSCALL_MAX: u32 = 8;

/// Entry point called by `isr_stubs::trap_dispatch` for vector 0x80.
/// Writes the return value into `frame.regs.eax` so it ends up back in
/// EAX when the stub's `popa` runs.
pub fn handle(frame: &mut TrapFrame) {
    let number = frame.regs.eax;
    let (arg0, arg1, _arg2, _arg3, _arg4) = calls::args(frame);
    let caller = scheduler::current().unwrap_or(0);

    let result: isize = match number {
        SYS_EXIT => calls::sys_exit(caller, arg0 as i32),
        SYS_WRITE => calls::sys_write(arg0),
        SYS_READ => calls::sys_read(arg0, arg1),
        SYS_YIELD => calls::sys_yield(),
        SYS_GETPID => calls::sys_getpid(caller),
        SYS_SLEEP => calls::sys_sleep(caller, arg0),
        SYS_FORK => calls::sys_fork(caller, frame),
        SYS_EXEC => calls::sys_exec(caller, arg0, frame),
        SYS_WAIT => calls::sys_wait(caller, arg0),
        other => {
            kwarn!("unknown syscall number {}", other);
            -1
        }
    };

    frame.regs.eax = result as u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syscall_numbers_are_pinned_0_through_8() {
        let numbers =
            [SYS_EXIT, SYS_WRITE, SYS_READ, SYS_YIELD, SYS_GETPID, SYS_SLEEP, SYS_FORK, SYS_EXEC, SYS_WAIT];
        for (i, &n) in numbers.iter().enumerate() {
            assert_eq!(n, i as u32);
        }
        assert_eq!(SYSCALL_MAX, 8);
    }
}
