//! Component C (part 2): the 49 assembly entry stubs (32 exceptions + 16
//! IRQs + 1 syscall gate) and the three shared tails that build the
//! uniform [`TrapFrame`](super::trapframe::TrapFrame) and demux into
//! Rust. Nothing outside this file and `cpu.rs` writes inline assembly;
//! everything downstream (exception/IRQ/syscall handling) is ordinary
//! Rust operating on a `&mut TrapFrame`.
//!
//! Push order (time order, earliest first) per stub:
//! hardware eip/cs/eflags[/useresp/ss] -> error code (real or
//! synthesized 0) -> vector number -> `pusha` -> `ds,es,fs,gs`. The
//! segment pushes land lowest on the stack, so the final ESP is exactly
//! a `*mut TrapFrame` with `gs` as its first field — see
//! `trapframe.rs` for the derivation.

use super::trapframe::TrapFrame;
use core::arch::global_asm;

// Vectors on which the CPU itself pushes a 32-bit error code (8, 10-14,
// 17) get `err_stub!`; every other vector synthesizes one with `push 0`
// via `no_err_stub!` so the tail sees a uniform frame either way.
global_asm!(
    r#"
.section .text
.code32

.global isr_common_tail
isr_common_tail:
    pusha
    push ds
    push es
    push fs
    push gs
    mov ax, 0x10
    mov ds, ax
    mov es, ax
    mov fs, ax
    mov gs, ax
    push esp
    call trap_dispatch
    add esp, 4
    pop gs
    pop fs
    pop es
    pop ds
    popa
    add esp, 8
    iretd
"#
);

macro_rules! no_err_stub {
    ($name:ident, $vec:literal) => {
        global_asm!(concat!(
            ".global ", stringify!($name), "\n",
            stringify!($name), ":\n",
            "push 0\n",
            "push ", stringify!($vec), "\n",
            "jmp isr_common_tail\n",
        ));
    };
}

macro_rules! err_stub {
    ($name:ident, $vec:literal) => {
        global_asm!(concat!(
            ".global ", stringify!($name), "\n",
            stringify!($name), ":\n",
            "push ", stringify!($vec), "\n",
            "jmp isr_common_tail\n",
        ));
    };
}

no_err_stub!(isr_exc_0, 0);
no_err_stub!(isr_exc_1, 1);
no_err_stub!(isr_exc_2, 2);
no_err_stub!(isr_exc_3, 3);
no_err_stub!(isr_exc_4, 4);
no_err_stub!(isr_exc_5, 5);
no_err_stub!(isr_exc_6, 6);
no_err_stub!(isr_exc_7, 7);
err_stub!(isr_exc_8, 8);
no_err_stub!(isr_exc_9, 9);
err_stub!(isr_exc_10, 10);
err_stub!(isr_exc_11, 11);
err_stub!(isr_exc_12, 12);
err_stub!(isr_exc_13, 13);
err_stub!(isr_exc_14, 14);
no_err_stub!(isr_exc_15, 15);
no_err_stub!(isr_exc_16, 16);
err_stub!(isr_exc_17, 17);
no_err_stub!(isr_exc_18, 18);
no_err_stub!(isr_exc_19, 19);
no_err_stub!(isr_exc_20, 20);
no_err_stub!(isr_exc_21, 21);
no_err_stub!(isr_exc_22, 22);
no_err_stub!(isr_exc_23, 23);
no_err_stub!(isr_exc_24, 24);
no_err_stub!(isr_exc_25, 25);
no_err_stub!(isr_exc_26, 26);
no_err_stub!(isr_exc_27, 27);
no_err_stub!(isr_exc_28, 28);
no_err_stub!(isr_exc_29, 29);
no_err_stub!(isr_exc_30, 30);
no_err_stub!(isr_exc_31, 31);

no_err_stub!(isr_irq_0, 32);
no_err_stub!(isr_irq_1, 33);
no_err_stub!(isr_irq_2, 34);
no_err_stub!(isr_irq_3, 35);
no_err_stub!(isr_irq_4, 36);
no_err_stub!(isr_irq_5, 37);
no_err_stub!(isr_irq_6, 38);
no_err_stub!(isr_irq_7, 39);
no_err_stub!(isr_irq_8, 40);
no_err_stub!(isr_irq_9, 41);
no_err_stub!(isr_irq_10, 42);
no_err_stub!(isr_irq_11, 43);
no_err_stub!(isr_irq_12, 44);
no_err_stub!(isr_irq_13, 45);
no_err_stub!(isr_irq_14, 46);
no_err_stub!(isr_irq_15, 47);

no_err_stub!(isr_syscall, 0x80);

extern "C" {
    fn isr_exc_0();
    fn isr_exc_1();
    fn isr_exc_2();
    fn isr_exc_3();
    fn isr_exc_4();
    fn isr_exc_5();
    fn isr_exc_6();
    fn isr_exc_7();
    fn isr_exc_8();
    fn isr_exc_9();
    fn isr_exc_10();
    fn isr_exc_11();
    fn isr_exc_12();
    fn isr_exc_13();
    fn isr_exc_14();
    fn isr_exc_15();
    fn isr_exc_16();
    fn isr_exc_17();
    fn isr_exc_18();
    fn isr_exc_19();
    fn isr_exc_20();
    fn isr_exc_21();
    fn isr_exc_22();
    fn isr_exc_23();
    fn isr_exc_24();
    fn isr_exc_25();
    fn isr_exc_26();
    fn isr_exc_27();
    fn isr_exc_28();
    fn isr_exc_29();
    fn isr_exc_30();
    fn isr_exc_31();

    fn isr_irq_0();
    fn isr_irq_1();
    fn isr_irq_2();
    fn isr_irq_3();
    fn isr_irq_4();
    fn isr_irq_5();
    fn isr_irq_6();
    fn isr_irq_7();
    fn isr_irq_8();
    fn isr_irq_9();
    fn isr_irq_10();
    fn isr_irq_11();
    fn isr_irq_12();
    fn isr_irq_13();
    fn isr_irq_14();
    fn isr_irq_15();

    fn isr_syscall();
}

pub fn exception_stub_addr(vector: u8) -> u32 {
    let f: unsafe extern "C" fn() = match vector {
        0 => isr_exc_0, 1 => isr_exc_1, 2 => isr_exc_2, 3 => isr_exc_3,
        4 => isr_exc_4, 5 => isr_exc_5, 6 => isr_exc_6, 7 => isr_exc_7,
        8 => isr_exc_8, 9 => isr_exc_9, 10 => isr_exc_10, 11 => isr_exc_11,
        12 => isr_exc_12, 13 => isr_exc_13, 14 => isr_exc_14, 15 => isr_exc_15,
        16 => isr_exc_16, 17 => isr_exc_17, 18 => isr_exc_18, 19 => isr_exc_19,
        20 => isr_exc_20, 21 => isr_exc_21, 22 => isr_exc_22, 23 => isr_exc_23,
        24 => isr_exc_24, 25 => isr_exc_25, 26 => isr_exc_26, 27 => isr_exc_27,
        28 => isr_exc_28, 29 => isr_exc_29, 30 => isr_exc_30, 31 => isr_exc_31,
        _ => unreachable!("exception vector out of range"),
    };
    f as usize as u32
}

pub fn irq_stub_addr(irq: u8) -> u32 {
    let f: unsafe extern "C" fn() = match irq {
        0 => isr_irq_0, 1 => isr_irq_1, 2 => isr_irq_2, 3 => isr_irq_3,
        4 => isr_irq_4, 5 => isr_irq_5, 6 => isr_irq_6, 7 => isr_irq_7,
        8 => isr_irq_8, 9 => isr_irq_9, 10 => isr_irq_10, 11 => isr_irq_11,
        12 => isr_irq_12, 13 => isr_irq_13, 14 => isr_irq_14, 15 => isr_irq_15,
        _ => unreachable!("IRQ line out of range"),
    };
    f as usize as u32
}

pub fn syscall_stub_addr() -> u32 {
    isr_syscall as usize as u32
}

/// Single entry point every stub tail calls. Fans out to the three
/// demuxers in `exception.rs`/`irq.rs`.
#[no_mangle]
extern "C" fn trap_dispatch(frame: *mut TrapFrame) {
    let frame = unsafe { &mut *frame };
    match frame.vector {
        0..=31 => crate::arch::x86::exception::handle(frame),
        32..=47 => crate::arch::x86::irq::handle(frame),
        v if v == super::idt::SYSCALL_VECTOR as u32 => crate::syscall::handle(frame),
        other => crate::kwarn!("trap_dispatch: spurious vector {other}"),
    }
}
