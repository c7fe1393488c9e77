//! Component G: the task control block.

use crate::arch::CpuContext;
use crate::mm::address_space::AddressSpace;
use alloc::string::String;

pub type Pid = u32;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TaskState {
    Ready,
    Running,
    Blocked,
    Sleeping,
    Zombie,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Ring {
    Kernel = 0,
    User = 3,
}

/// One task/process. Parent/child/sibling links form an intrusive
/// forest over the task table; `next_in_ring` is a separate intrusive
/// link owned by the scheduler's ring, kept apart so a task can be
/// unlinked from scheduling (Blocked) without disturbing its family
/// tree.
pub struct Task {
    pub pid: Pid,
    pub name: String,
    pub state: TaskState,
    pub priority: u8,
    pub ring: Ring,
    pub context: CpuContext,
    /// CR3 value for this task. Always valid, even for kernel tasks,
    /// which share the boot address space and therefore have no
    /// owning `AddressSpace` of their own.
    pub page_directory: u32,
    /// Present only for ring-3 tasks: owns the page-table frames and
    /// the user-data frames this task mapped, which `fork`/`exit`
    /// need to walk and release.
    pub address_space: Option<AddressSpace>,
    pub kernel_stack_top: u32,
    pub user_stack_phys: Option<u32>,
    pub user_esp: u32,
    pub entry_point: u32,
    pub time_slice: u32,
    pub total_time: u64,
    pub wake_time: u64,
    pub parent: Option<Pid>,
    pub first_child: Option<Pid>,
    pub next_sibling: Option<Pid>,
    pub next_in_ring: Option<Pid>,
    pub first_run: bool,
    pub exit_code: i32,
    pub waited: bool,
}

impl Task {
    pub fn is_schedulable(&self) -> bool {
        self.state == TaskState::Ready
    }

    pub fn is_zombie(&self) -> bool {
        self.state == TaskState::Zombie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(pid: Pid, state: TaskState) -> Task {
        Task {
            pid,
            name: String::new(),
            state,
            priority: 0,
            ring: Ring::Kernel,
            context: CpuContext::new(),
            page_directory: 0,
            address_space: None,
            kernel_stack_top: 0,
            user_stack_phys: None,
            user_esp: 0,
            entry_point: 0,
            time_slice: 0,
            total_time: 0,
            wake_time: 0,
            parent: None,
            first_child: None,
            next_sibling: None,
            next_in_ring: None,
            first_run: false,
            exit_code: 0,
            waited: false,
        }
    }

    #[test]
    fn only_ready_tasks_are_schedulable() {
        assert!(blank(1, TaskState::Ready).is_schedulable());
        assert!(!blank(1, TaskState::Running).is_schedulable());
        assert!(!blank(1, TaskState::Blocked).is_schedulable());
        assert!(!blank(1, TaskState::Sleeping).is_schedulable());
        assert!(!blank(1, TaskState::Zombie).is_schedulable());
    }

    #[test]
    fn zombie_check_is_exact() {
        assert!(blank(1, TaskState::Zombie).is_zombie());
        assert!(!blank(1, TaskState::Ready).is_zombie());
    }
}
