//! Component B (part 2): the 32-bit Task State Segment.
//!
//! Only `ss0`/`esp0` are meaningful in this design — they supply the
//! ring-0 stack the CPU switches to automatically on a ring-3→ring-0
//! trap. Every other field is dead weight carried because the hardware
//! TSS format requires it to be present.

#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct TaskStateSegment {
    pub link: u16,
    _link_pad: u16,
    pub esp0: u32,
    pub ss0: u16,
    _ss0_pad: u16,
    pub esp1: u32,
    pub ss1: u16,
    _ss1_pad: u16,
    pub esp2: u32,
    pub ss2: u16,
    _ss2_pad: u16,
    pub cr3: u32,
    pub eip: u32,
    pub eflags: u32,
    pub eax: u32,
    pub ecx: u32,
    pub edx: u32,
    pub ebx: u32,
    pub esp: u32,
    pub ebp: u32,
    pub esi: u32,
    pub edi: u32,
    pub es: u16,
    _es_pad: u16,
    pub cs: u16,
    _cs_pad: u16,
    pub ss: u16,
    _ss_pad: u16,
    pub ds: u16,
    _ds_pad: u16,
    pub fs: u16,
    _fs_pad: u16,
    pub gs: u16,
    _gs_pad: u16,
    pub ldt: u16,
    _ldt_pad: u16,
    pub trap: u16,
    pub iomap_base: u16,
}

impl TaskStateSegment {
    pub const fn new() -> Self {
        Self {
            link: 0, _link_pad: 0,
            esp0: 0, ss0: 0, _ss0_pad: 0,
            esp1: 0, ss1: 0, _ss1_pad: 0,
            esp2: 0, ss2: 0, _ss2_pad: 0,
            cr3: 0, eip: 0, eflags: 0,
            eax: 0, ecx: 0, edx: 0, ebx: 0, esp: 0, ebp: 0, esi: 0, edi: 0,
            es: 0, _es_pad: 0, cs: 0, _cs_pad: 0, ss: 0, _ss_pad: 0,
            ds: 0, _ds_pad: 0, fs: 0, _fs_pad: 0, gs: 0, _gs_pad: 0,
            ldt: 0, _ldt_pad: 0, trap: 0,
            // No I/O permission bitmap; point past the segment limit so
            // every port access from ring 3 (there are none in this
            // kernel) would fault rather than silently succeed.
            iomap_base: core::mem::size_of::<TaskStateSegment>() as u16,
        }
    }
}

static mut TSS: TaskStateSegment = TaskStateSegment::new();

/// Installs the kernel-data selector and a placeholder esp0, then builds
/// the GDT's TSS descriptor against this static and loads TR.
///
/// # Safety
/// Must run once, after `gdt`'s descriptor table exists in memory but
/// this is the function that actually populates GDT entry 5 indirectly
/// via `gdt::init`, which takes a reference to this TSS.
pub unsafe fn init() {
    TSS.ss0 = super::gdt::KERNEL_DATA_SEL;
    TSS.esp0 = 0; // filled in per-task by set_kernel_stack before first use
    super::gdt::init(&*&raw const TSS);
}

/// Updates `esp0` to the top of the incoming task's kernel stack. Called
/// from `switch_to` on every context switch. Only ever
/// called with interrupts disabled (mid context switch), so the data
/// race this `static mut` would otherwise admit cannot occur.
pub fn set_kernel_stack(esp0: u32) {
    unsafe {
        (*&raw mut TSS).esp0 = esp0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tss_is_104_bytes() {
        assert_eq!(core::mem::size_of::<TaskStateSegment>(), 104);
    }
}
