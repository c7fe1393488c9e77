//! Exception demux (Component C, vectors 0..31).

use super::trapframe::TrapFrame;

const NMI: u32 = 2;
const BREAKPOINT: u32 = 3;
const DEVICE_NOT_AVAILABLE: u32 = 7; // #NM
const PAGE_FAULT: u32 = 14;
const FPU_ERROR: u32 = 16; // #MF
const SIMD_FP_ERROR: u32 = 19; // #XF

fn name(vector: u32) -> &'static str {
    match vector {
        0 => "#DE divide error",
        1 => "#DB debug",
        2 => "NMI",
        3 => "#BP breakpoint",
        4 => "#OF overflow",
        5 => "#BR bound range exceeded",
        6 => "#UD invalid opcode",
        7 => "#NM device not available",
        8 => "#DF double fault",
        10 => "#TS invalid TSS",
        11 => "#NP segment not present",
        12 => "#SS stack fault",
        13 => "#GP general protection fault",
        14 => "#PF page fault",
        16 => "#MF x87 FPU error",
        17 => "#AC alignment check",
        18 => "#MC machine check",
        19 => "#XF SIMD FP exception",
        _ => "reserved/unhandled exception",
    }
}

/// Dispatches one of the 32 CPU exception vectors. Matches the
/// Fatal/Recoverable split exactly: #NM/#MF/#XF clear FPU state and
/// resume, #PF defers to the VMM's lazy-heap policy, everything else
/// prints a diagnostic and halts.
pub fn handle(frame: &mut TrapFrame) {
    match frame.vector {
        DEVICE_NOT_AVAILABLE => {
            clear_task_switched();
        }
        FPU_ERROR | SIMD_FP_ERROR => {
            clear_pending_fp_exceptions();
        }
        PAGE_FAULT => {
            let fault_addr = unsafe { super::cpu::read_cr2() };
            crate::mm::fault::handle_page_fault(frame, fault_addr);
        }
        BREAKPOINT => {
            crate::kwarn!("breakpoint at eip=0x{:08x}", frame.eip);
            crate::lib::panic::fatal(frame.vector, frame.error_code, frame);
        }
        NMI => {
            crate::kerror!("non-maskable interrupt");
            crate::lib::panic::fatal(frame.vector, frame.error_code, frame);
        }
        _ => {
            crate::kerror!(
                "{} (vector {}) at eip=0x{:08x}, error_code=0x{:08x}",
                name(frame.vector),
                frame.vector,
                frame.eip,
                frame.error_code
            );
            crate::lib::panic::fatal(frame.vector, frame.error_code, frame);
        }
    }
}

fn clear_task_switched() {
    unsafe {
        let cr0 = super::cpu::read_cr0();
        super::cpu::write_cr0(cr0 & !(1 << 3)); // clear TS
        core::arch::asm!("fninit", options(nostack));
    }
}

fn clear_pending_fp_exceptions() {
    unsafe {
        core::arch::asm!("fnclex", options(nostack));
    }
}
