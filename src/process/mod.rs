//! Components G/H/I/J: tasks, context switching, the scheduler, and
//! process spawning (kernel tasks and ring-3 ELF processes).

pub mod context_switch;
pub mod exec;
pub mod scheduler;
pub mod table;
pub mod task;
pub mod wait;

use crate::arch::x86::context;
use crate::config::{FRAME_SIZE, KERNEL_STACK_PAGES, USER_STACK_TOP};
use crate::lib::error::{KResult, KernelError};
use crate::mm::frame;
use alloc::string::String;
use task::{Pid, Ring, Task, TaskState};

fn alloc_kernel_stack() -> KResult<u32> {
    // One or more physically contiguous-enough frames is unnecessary
    // here: the kernel runs identity-mapped, so any allocated physical
    // frame is already usable as a virtual stack.
    let base = frame::alloc()?;
    let _ = KERNEL_STACK_PAGES; // single page per task in this teaching kernel
    Ok(base + FRAME_SIZE)
}

/// Spawns a kernel-mode task whose first scheduling will `ret` into
/// `entry` with a clean, freshly allocated stack.
pub fn spawn_kernel(name: &str, entry: extern "C" fn() -> !, priority: u8) -> KResult<Pid> {
    let pid = table::alloc_pid();
    let stack_top = alloc_kernel_stack()?;
    let esp = unsafe { context::build_kernel_entry_stack(stack_top, entry) };

    let current_dir = crate::mm::active_directory();
    let task = Task {
        pid,
        name: String::from(name),
        state: TaskState::Ready,
        priority,
        ring: Ring::Kernel,
        context: crate::arch::CpuContext { esp },
        page_directory: current_dir,
        address_space: None,
        kernel_stack_top: stack_top,
        user_stack_phys: None,
        user_esp: 0,
        entry_point: entry as usize as u32,
        time_slice: crate::config::QUANTUM_TICKS,
        total_time: 0,
        wake_time: 0,
        parent: scheduler::current(),
        first_child: None,
        next_sibling: None,
        next_in_ring: None,
        first_run: false,
        exit_code: 0,
        waited: false,
    };
    table::insert(task);
    scheduler::add(pid);
    Ok(pid)
}

/// Spawns a ring-3 task from an ELF image: builds a new address space,
/// loads the binary, and arranges the IRET frame the first context
/// switch into it will use.
pub fn spawn_user(name: &str, elf_bytes: &[u8], priority: u8) -> KResult<Pid> {
    let pid = table::alloc_pid();
    let kernel_dir = crate::mm::active_directory();
    let (address_space, entry) = unsafe { exec::load_into_new_as(kernel_dir, elf_bytes)? };
    let dir_phys = address_space.page_directory;
    let stack_top = alloc_kernel_stack()?;
    let user_esp = unsafe { context::build_user_first_run_stack(stack_top, entry, USER_STACK_TOP) };

    let task = Task {
        pid,
        name: String::from(name),
        state: TaskState::Ready,
        priority,
        ring: Ring::User,
        context: crate::arch::CpuContext { esp: user_esp },
        page_directory: dir_phys,
        address_space: Some(address_space),
        kernel_stack_top: stack_top,
        user_stack_phys: None,
        user_esp: USER_STACK_TOP,
        entry_point: entry,
        time_slice: crate::config::QUANTUM_TICKS,
        total_time: 0,
        wake_time: 0,
        parent: scheduler::current(),
        first_child: None,
        next_sibling: None,
        next_in_ring: None,
        first_run: true,
        exit_code: 0,
        waited: false,
    };
    table::insert(task);
    scheduler::add(pid);
    Ok(pid)
}

/// Plain copy-AS fork (not COW; see the project's grounding notes on
/// that open question). Only defined for ring-3 tasks, which are the
/// only ones that own an `AddressSpace` to duplicate.
///
/// `resume_eip`/`resume_esp` are the calling task's EIP and user ESP at
/// the moment it trapped into `sys_fork`, taken straight from its trap
/// frame: the child gets a synthetic first-run IRET stack that resumes
/// at that exact instruction, with EAX already zeroed by
/// `context::switch_to_user_first_run` so the child observes "I am the
/// child" the first time it runs.
pub fn fork(parent: Pid, resume_eip: u32, resume_esp: u32) -> KResult<Pid> {
    let kernel_dir = crate::mm::active_directory();
    let (child_as, name, priority) = table::with_mut(parent, |t| {
        let parent_as = t.address_space.as_ref().ok_or(KernelError::NotSupported)?;
        let cloned = unsafe { parent_as.fork(kernel_dir)? };
        Ok::<_, KernelError>((cloned, t.name.clone(), t.priority))
    })
    .ok_or(KernelError::NotFound)??;

    let pid = table::alloc_pid();
    let stack_top = alloc_kernel_stack()?;
    let esp = unsafe { context::build_user_first_run_stack(stack_top, resume_eip, resume_esp) };
    let dir_phys = child_as.page_directory;

    let task = Task {
        pid,
        name,
        state: TaskState::Ready,
        priority,
        ring: Ring::User,
        context: crate::arch::CpuContext { esp },
        page_directory: dir_phys,
        address_space: Some(child_as),
        kernel_stack_top: stack_top,
        user_stack_phys: None,
        user_esp: resume_esp,
        entry_point: resume_eip,
        time_slice: crate::config::QUANTUM_TICKS,
        total_time: 0,
        wake_time: 0,
        parent: Some(parent),
        first_child: None,
        next_sibling: None,
        next_in_ring: None,
        first_run: true,
        exit_code: 0,
        waited: false,
    };
    table::insert(task);
    scheduler::add(pid);
    Ok(pid)
}
