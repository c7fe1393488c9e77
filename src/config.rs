//! Compile-time layout and timing constants, gathered in one place so
//! the init orchestrator and every consumer agree on the same values.

/// Start of the kernel heap window. Chosen well above the
/// identity-mapped kernel image and below the user region.
pub const HEAP_BASE: u32 = 0xD000_0000;

/// One-past-the-end of the kernel heap window: 16 MiB of virtual
/// address space, backed lazily.
pub const HEAP_LIMIT: u32 = HEAP_BASE + 16 * 1024 * 1024;

/// Scheduler quantum, in timer ticks.
pub const QUANTUM_TICKS: u32 = 10;

/// Pages reserved for each task's kernel-mode stack.
pub const KERNEL_STACK_PAGES: usize = 1;

/// Fixed top of every user task's stack (grows down from here).
pub const USER_STACK_TOP: u32 = 0xBFFF_F000;

/// PIT tick frequency.
pub const PIT_HZ: u32 = 1000;

pub const FRAME_SIZE: u32 = 4096;

/// The low 1 MiB plus the loaded kernel image are reserved and never
/// handed out by the PFA; see `init::boot_sequence` for the exact
/// range computation from the linker symbols.
pub const LOW_MEMORY_RESERVED: u32 = 1024 * 1024;
