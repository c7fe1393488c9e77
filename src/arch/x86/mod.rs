//! i686 architecture support: port I/O primitives, segmentation (GDT/TSS),
//! interrupt dispatch (IDT/trap frame/stubs), and the two legacy chips the
//! boot sequence programs directly (PIC, PIT).

pub mod boot;
pub mod cpu;
pub mod gdt;
pub mod tss;
pub mod idt;
pub mod trapframe;
pub mod isr_stubs;
pub mod exception;
pub mod irq;
pub mod pic;
pub mod pit;
pub mod context;

pub use trapframe::TrapFrame;
