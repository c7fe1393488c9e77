//! Component L: the fixed boot order. `kernel_main` delegates here
//! immediately after `_start` hands off.

use crate::arch::x86::{boot::BootInfo, context, gdt, idt, pic, pit, tss};
use crate::config::PIT_HZ;
use crate::{kinfo, process};

extern "C" {
    static __kernel_start: u8;
    static __kernel_end: u8;
}

/// Step 1-2 already happened in `boot.rs`/`_start` (Component A has no
/// state to initialize). Everything from step 3 onward lives here.
///
/// # Safety
/// Must run exactly once, very early, with interrupts disabled and no
/// other kernel code running concurrently.
pub unsafe fn run(multiboot_magic: u32, multiboot_info: u32) -> ! {
    crate::console::init();
    crate::lib::build_info::banner();

    let boot_info = match BootInfo::from_multiboot(multiboot_magic, multiboot_info) {
        Some(info) => info,
        None => crate::lib::panic::halt_with_message("bad multiboot handoff"),
    };

    // 3. B: GDT + TSS.
    tss::init();

    // 4. C: IDT + stub addresses.
    idt::init();

    // 5. Legacy chips: PIC remap, mask all but timer/keyboard, PIT to 1 kHz.
    pic::init();
    pit::init(PIT_HZ);

    // 6. D: parse the memory map, initialize the PFA, reserve the
    // kernel image and the low 1 MiB.
    let kernel_start = &__kernel_start as *const u8 as u32;
    let kernel_end = &__kernel_end as *const u8 as u32;
    init_frame_allocator(&boot_info, kernel_start, kernel_end);

    // 7. E: identity-map the kernel range, enable paging.
    let boot_dir = crate::mm::init_boot_address_space(kernel_start, kernel_end);
    let _ = boot_dir;

    // 8. F: the heap window is virtual-only until first touched; no
    // frames are reserved for it up front.
    kinfo!("kernel heap window ready (lazily backed)");

    // 9-10. G/H/I: task table starts empty; spawn the idle task and the
    // first real workload.
    let idle = process::spawn_kernel("idle", idle_task_entry, 0).expect("failed to spawn idle task");
    process::scheduler::set_idle_task(idle);
    let first = process::spawn_kernel("init", first_task_entry, 10).expect("failed to spawn init task");
    process::scheduler::set_current(first);

    // 11. K: the syscall vector was already installed in `idt::init`
    // (vector 0x80 points at `isr_stubs::syscall_stub_addr`); nothing
    // further to register since the dispatch table in `syscall::handle`
    // is a plain match, not a registered-callback table.

    // 12. Enable interrupts and fall into the first task; never returns.
    crate::arch::x86::cpu::enable_interrupts();
    let mut discard: u32 = 0;
    context::switch_to_kernel(&mut discard as *mut u32, {
        process::table::with(first, |t| t.context.esp).unwrap_or(0)
    });
    unreachable!("switch_to_kernel into the first task must not return")
}

unsafe fn init_frame_allocator(boot_info: &BootInfo, kernel_start: u32, kernel_end: u32) {
    let mut limit = crate::config::LOW_MEMORY_RESERVED;
    for region in boot_info.usable_regions() {
        let region_end = region.base.saturating_add(region.length);
        if region_end > limit as u64 {
            limit = region_end.min(u32::MAX as u64) as u32;
        }
    }
    crate::mm::frame::init(limit);
    for region in boot_info.usable_regions() {
        if region.base > u32::MAX as u64 {
            continue;
        }
        crate::mm::frame::mark_region_free(region.base as u32, region.length as u32);
    }
    crate::mm::frame::mark_region_used(0, crate::config::LOW_MEMORY_RESERVED);
    crate::mm::frame::mark_region_used(kernel_start, kernel_end - kernel_start);
}

extern "C" fn idle_task_entry() -> ! {
    loop {
        crate::arch::x86::cpu::enable_interrupts();
        crate::arch::x86::cpu::hlt();
    }
}

extern "C" fn first_task_entry() -> ! {
    loop {
        kinfo!("init task tick");
        process::scheduler::schedule();
    }
}
