//! The VFS collaborator, minimally resolved: a fixed, in-memory
//! table of named ELF images baked into the kernel image. A real
//! VFS/ATA/shell stack is explicitly out of this core's scope;
//! `exec` only ever needs "resolve a name to bytes."

struct Entry {
    name: &'static str,
    bytes: &'static [u8],
}

/// A hand-built ELF32/ET_EXEC/EM_386 image: one `PT_LOAD` segment at
/// `0x00400000` holding `mov eax, 0; mov ebx, 42; int 0x80; jmp $`,
/// i.e. a task that immediately calls `sys_exit(42)` and spins in the
/// unreachable case that a syscall ever returns. Small enough to list
/// byte-for-byte rather than reach for an assembler this core doesn't
/// have at build time.
#[rustfmt::skip]
static DEMO_INIT: &[u8] = &[
    // e_ident: magic, class=32, data=LSB, version=1, pad
    0x7F, 0x45, 0x4C, 0x46, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x02, 0x00, // e_type = ET_EXEC
    0x03, 0x00, // e_machine = EM_386
    0x01, 0x00, 0x00, 0x00, // e_version
    0x00, 0x00, 0x40, 0x00, // e_entry = 0x00400000
    0x34, 0x00, 0x00, 0x00, // e_phoff = 52
    0x00, 0x00, 0x00, 0x00, // e_shoff
    0x00, 0x00, 0x00, 0x00, // e_flags
    0x34, 0x00, // e_ehsize = 52
    0x20, 0x00, // e_phentsize = 32
    0x01, 0x00, // e_phnum = 1
    0x00, 0x00, // e_shentsize
    0x00, 0x00, // e_shnum
    0x00, 0x00, // e_shstrndx
    // program header
    0x01, 0x00, 0x00, 0x00, // p_type = PT_LOAD
    0x54, 0x00, 0x00, 0x00, // p_offset = 84
    0x00, 0x00, 0x40, 0x00, // p_vaddr = 0x00400000
    0x00, 0x00, 0x40, 0x00, // p_paddr
    0x0E, 0x00, 0x00, 0x00, // p_filesz = 14
    0x0E, 0x00, 0x00, 0x00, // p_memsz = 14
    0x05, 0x00, 0x00, 0x00, // p_flags = PF_R | PF_X
    0x00, 0x10, 0x00, 0x00, // p_align = 0x1000
    // code: mov eax, 0; mov ebx, 42; int 0x80; jmp $
    0xB8, 0x00, 0x00, 0x00, 0x00,
    0xBB, 0x2A, 0x00, 0x00, 0x00,
    0xCD, 0x80,
    0xEB, 0xFE,
];

static TABLE: &[Entry] = &[Entry { name: "/bin/init", bytes: DEMO_INIT }];

pub fn lookup(path: &str) -> Option<&'static [u8]> {
    TABLE.iter().find(|e| e.name == path).map(|e| e.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_on_unknown_path_misses() {
        assert!(lookup("/bin/nonexistent").is_none());
    }

    #[test]
    fn lookup_resolves_demo_init() {
        let bytes = lookup("/bin/init").expect("demo init must resolve");
        assert_eq!(&bytes[0..4], &[0x7F, 0x45, 0x4C, 0x46]);
    }
}
