pub mod elf;

use crate::config::USER_STACK_TOP;
use crate::lib::error::KResult;
use crate::mm::address_space::AddressSpace;

/// Maps a single fresh user stack page at the top of user space into
/// `address_space`. Shared by fresh spawns and in-place `exec`, both of
/// which need a clean stack under a newly loaded image.
unsafe fn map_user_stack(address_space: &mut AddressSpace) -> KResult<()> {
    let stack_frame = crate::mm::frame::alloc()?;
    let stack_page = USER_STACK_TOP - crate::config::FRAME_SIZE;
    address_space.map_user(
        stack_page,
        stack_frame,
        crate::mm::paging::PageFlags::PRESENT
            | crate::mm::paging::PageFlags::WRITABLE
            | crate::mm::paging::PageFlags::USER,
    )
}

/// Loads `bytes` into a freshly created address space and returns the
/// entry point plus the AS itself, ready for `spawn_user` to build an
/// IRET frame against.
pub unsafe fn load_into_new_as(kernel_dir_phys: u32, bytes: &[u8]) -> KResult<(AddressSpace, u32)> {
    let mut address_space = AddressSpace::new(kernel_dir_phys)?;
    let entry = elf::load(&mut address_space, bytes)?;
    map_user_stack(&mut address_space)?;
    Ok((address_space, entry))
}

/// Tears down `address_space`'s current user mappings and loads `bytes`
/// in their place, including a fresh user stack. Used by the `exec`
/// syscall to replace a running task's image in its existing address
/// space.
pub unsafe fn replace_image(address_space: &mut AddressSpace, bytes: &[u8]) -> KResult<u32> {
    address_space.reset_user_region();
    let entry = elf::load(address_space, bytes)?;
    map_user_stack(address_space)?;
    Ok(entry)
}
