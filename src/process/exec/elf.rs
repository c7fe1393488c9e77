//! Component J: ELF32 loader.

use crate::config::FRAME_SIZE;
use crate::lib::error::{KResult, KernelError};
use crate::mm::address_space::AddressSpace;
use crate::mm::frame;
use crate::mm::paging::PageFlags;

const EI_MAG0: usize = 0;
const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];
const ELFCLASS32: u8 = 1;
const ELFDATA2LSB: u8 = 1;
const ET_EXEC: u16 = 2;
const EM_386: u16 = 3;
const PT_LOAD: u32 = 1;
const PF_W: u32 = 0x2;

#[repr(C)]
#[derive(Clone, Copy)]
struct Elf32Header {
    ident: [u8; 16],
    e_type: u16,
    e_machine: u16,
    e_version: u32,
    e_entry: u32,
    e_phoff: u32,
    e_shoff: u32,
    e_flags: u32,
    e_ehsize: u16,
    e_phentsize: u16,
    e_phnum: u16,
    e_shentsize: u16,
    e_shnum: u16,
    e_shstrndx: u16,
}

#[repr(C)]
#[derive(Clone, Copy)]
struct Elf32ProgramHeader {
    p_type: u32,
    p_offset: u32,
    p_vaddr: u32,
    p_paddr: u32,
    p_filesz: u32,
    p_memsz: u32,
    p_flags: u32,
    p_align: u32,
}

fn read_header(bytes: &[u8]) -> KResult<Elf32Header> {
    if bytes.len() < core::mem::size_of::<Elf32Header>() {
        return Err(KernelError::Corrupt);
    }
    if bytes[EI_MAG0..EI_MAG0 + 4] != ELF_MAGIC {
        return Err(KernelError::Corrupt);
    }
    if bytes[4] != ELFCLASS32 || bytes[5] != ELFDATA2LSB {
        return Err(KernelError::NotSupported);
    }
    let header = unsafe { core::ptr::read_unaligned(bytes.as_ptr() as *const Elf32Header) };
    if header.e_type != ET_EXEC || header.e_machine != EM_386 {
        return Err(KernelError::NotSupported);
    }
    Ok(header)
}

fn program_header_at(bytes: &[u8], header: &Elf32Header, index: u16) -> KResult<Elf32ProgramHeader> {
    let offset = header.e_phoff as usize + index as usize * header.e_phentsize as usize;
    if offset + core::mem::size_of::<Elf32ProgramHeader>() > bytes.len() {
        return Err(KernelError::Corrupt);
    }
    Ok(unsafe { core::ptr::read_unaligned(bytes[offset..].as_ptr() as *const Elf32ProgramHeader) })
}

/// Loads every `PT_LOAD` segment of `bytes` into `address_space`,
/// returning the entry point on success. Every mapped frame is pushed
/// through `AddressSpace::map_user` (not a bare `paging::map_in`) so
/// `fork`/`destroy` see the same frames the loader allocated. Handles
/// segments whose `filesz`/`memsz` straddle page boundaries by copying
/// only the in-range slice of each page and zeroing the rest (covers
/// both BSS tails and partial first pages).
pub unsafe fn load(address_space: &mut AddressSpace, bytes: &[u8]) -> KResult<u32> {
    let header = read_header(bytes)?;

    for i in 0..header.e_phnum {
        let ph = program_header_at(bytes, &header, i)?;
        if ph.p_type != PT_LOAD {
            continue;
        }
        load_segment(address_space, bytes, &ph)?;
    }

    Ok(header.e_entry)
}

unsafe fn load_segment(address_space: &mut AddressSpace, bytes: &[u8], ph: &Elf32ProgramHeader) -> KResult<()> {
    let page_start = ph.p_vaddr & !(FRAME_SIZE - 1);
    let region_end = round_up(ph.p_vaddr + ph.p_memsz, FRAME_SIZE);
    let writable = ph.p_flags & PF_W != 0;
    let flags = PageFlags::PRESENT
        | PageFlags::USER
        | if writable { PageFlags::WRITABLE } else { PageFlags::empty() };

    let mut va = page_start;
    while va < region_end {
        let phys = frame::alloc()?;
        // Temporary scratch mapping: the frame is identity-mapped in
        // the kernel's own window, so it's directly writable at `phys`
        // without needing a dedicated scratch virtual address.
        core::ptr::write_bytes(phys as *mut u8, 0, FRAME_SIZE as usize);

        let page_file_start = va.max(ph.p_vaddr);
        let page_file_end = (va + FRAME_SIZE).min(ph.p_vaddr + ph.p_filesz);
        if page_file_end > page_file_start {
            let src_off = (ph.p_offset + (page_file_start - ph.p_vaddr)) as usize;
            let dst_off = (page_file_start - va) as usize;
            let len = (page_file_end - page_file_start) as usize;
            if src_off + len > bytes.len() {
                return Err(KernelError::Corrupt);
            }
            core::ptr::copy_nonoverlapping(
                bytes[src_off..src_off + len].as_ptr(),
                (phys as usize + dst_off) as *mut u8,
                len,
            );
        }

        address_space.map_user(va, phys, flags)?;
        va += FRAME_SIZE;
    }
    Ok(())
}

fn round_up(value: u32, align: u32) -> u32 {
    (value + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_header(phnum: u16, phoff: u32) -> [u8; 52] {
        let mut h = [0u8; 52];
        h[0..4].copy_from_slice(&ELF_MAGIC);
        h[4] = ELFCLASS32;
        h[5] = ELFDATA2LSB;
        h[16..18].copy_from_slice(&ET_EXEC.to_le_bytes());
        h[18..20].copy_from_slice(&EM_386.to_le_bytes());
        h[28..32].copy_from_slice(&0x1000u32.to_le_bytes()); // e_entry
        h[32..36].copy_from_slice(&phoff.to_le_bytes());
        h[42..44].copy_from_slice(&32u16.to_le_bytes()); // e_phentsize
        h[44..46].copy_from_slice(&phnum.to_le_bytes());
        h
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = minimal_header(0, 52).to_vec();
        bytes[0] = 0;
        assert!(matches!(read_header(&bytes), Err(KernelError::Corrupt)));
    }

    #[test]
    fn rejects_wrong_machine() {
        let mut h = minimal_header(0, 52);
        h[18..20].copy_from_slice(&0xF3u16.to_le_bytes()); // EM_RISCV, say
        assert!(matches!(read_header(&h), Err(KernelError::NotSupported)));
    }

    #[test]
    fn accepts_well_formed_header() {
        let h = minimal_header(0, 52);
        let parsed = read_header(&h).unwrap();
        assert_eq!(parsed.e_entry, 0x1000);
        assert_eq!(parsed.e_phnum, 0);
    }

    #[test]
    fn round_up_pads_to_page() {
        assert_eq!(round_up(0x1001, FRAME_SIZE), 0x2000);
        assert_eq!(round_up(0x1000, FRAME_SIZE), 0x1000);
    }
}
