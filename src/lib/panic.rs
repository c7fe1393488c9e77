//! Panic handler and the fatal-trap halt path (the fatal error class).
//!
//! Two distinct banners reach the same halt loop: `panic!` denotes a
//! boot-time invariant violation (a bug), `fatal()` denotes a trap the
//! running task hit that the kernel has declared unrecoverable. Keeping
//! them separate means a line in the serial log tells a reader which of
//! the two happened without having to infer it from the message text.

use core::fmt::Write;
use core::panic::PanicInfo;
use core::sync::atomic::{AtomicBool, Ordering};

static PANICKING: AtomicBool = AtomicBool::new(false);

pub fn panic_handler(info: &PanicInfo) -> ! {
    crate::arch::x86::cpu::disable_interrupts();

    if PANICKING.swap(true, Ordering::SeqCst) {
        // Recursive panic inside the handler itself; don't try to format
        // again, just stop.
        halt();
    }

    let mut w = crate::console::writer();
    let _ = writeln!(w, "\n!!! KERNEL PANIC !!!");
    let _ = writeln!(w, "{info}");
    halt()
}

/// Called by the exception demuxer for the fatal error class: an
/// unrecoverable trap taken by the currently running task, as opposed to
/// a bug in the kernel's own bootstrap logic.
pub fn fatal(vector: u32, error_code: u32, trap_frame: &crate::arch::x86::trapframe::TrapFrame) -> ! {
    crate::arch::x86::cpu::disable_interrupts();

    let mut w = crate::console::writer();
    let _ = writeln!(w, "\n!!! FATAL TRAP !!!");
    let _ = writeln!(w, "vector={vector} error_code=0x{error_code:08x}");
    let _ = writeln!(
        w,
        "eip=0x{:08x} cs=0x{:04x} eflags=0x{:08x}",
        trap_frame.eip, trap_frame.cs, trap_frame.eflags
    );
    let _ = writeln!(
        w,
        "eax=0x{:08x} ebx=0x{:08x} ecx=0x{:08x} edx=0x{:08x}",
        trap_frame.regs.eax, trap_frame.regs.ebx, trap_frame.regs.ecx, trap_frame.regs.edx
    );
    let _ = writeln!(
        w,
        "esi=0x{:08x} edi=0x{:08x} ebp=0x{:08x}",
        trap_frame.regs.esi, trap_frame.regs.edi, trap_frame.regs.ebp
    );
    halt()
}

/// Used by boot steps before a `TrapFrame` or full panic machinery
/// exists — currently just the Multiboot magic check, step 1 of the
/// init orchestrator, which has "there is no console yet to report
/// anything more helpful than a fixed halt code" per its own contract,
/// but the console is in fact brought up one line earlier, so a short
/// message is printed anyway.
pub fn halt_with_message(msg: &str) -> ! {
    crate::arch::x86::cpu::disable_interrupts();
    let mut w = crate::console::writer();
    let _ = writeln!(w, "\n!!! BOOT FAILURE: {msg} !!!");
    halt()
}

fn halt() -> ! {
    loop {
        crate::arch::x86::cpu::disable_interrupts();
        crate::arch::x86::cpu::hlt();
    }
}
