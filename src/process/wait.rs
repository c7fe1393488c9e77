//! exit / sleep / block / unblock / wait, the task-lifecycle half of the process components.

use super::scheduler;
use super::table;
use super::task::{Pid, TaskState};

/// Transitions `pid` to Zombie, records its exit code, and wakes its
/// parent if the parent is Blocked inside `wait`. Never returns to the
/// caller — the caller is expected to immediately `schedule()`.
pub fn exit(pid: Pid, code: i32) {
    let parent = table::with_mut(pid, |t| {
        t.state = TaskState::Zombie;
        t.exit_code = code;
        t.parent
    })
    .flatten();

    if let Some(parent_pid) = parent {
        unblock_if_waiting(parent_pid);
    }
}

pub fn sleep(pid: Pid, wake_time_ms: u64) {
    table::with_mut(pid, |t| {
        t.wake_time = wake_time_ms;
        t.state = TaskState::Sleeping;
    });
}

pub fn block(pid: Pid) {
    table::with_mut(pid, |t| t.state = TaskState::Blocked);
}

/// Only transitions a genuinely Blocked task back to Ready; a no-op
/// otherwise (the caller doesn't need to know whether the target was
/// actually waiting).
pub fn unblock_if_waiting(pid: Pid) {
    table::with_mut(pid, |t| {
        if t.state == TaskState::Blocked {
            t.state = TaskState::Ready;
        }
    });
}

/// Returns `Some((child_pid, exit_code))` for a reaped zombie child of
/// `pid`, or `None` if `pid` has no children at all (the syscall layer
/// turns that into -1). If children exist but none are Zombie yet, the
/// caller is expected to have already called `block` and yielded
/// before re-checking.
pub fn try_reap_one(pid: Pid) -> Option<(Pid, i32)> {
    let children = table::children_of(pid);
    if children.is_empty() {
        return None;
    }
    for child in children {
        let is_zombie = table::with(child, |t| t.is_zombie()).unwrap_or(false);
        if is_zombie {
            let code = table::with(child, |t| t.exit_code).unwrap_or(-1);
            scheduler::remove(child);
            if let Some(mut reaped) = table::remove(child) {
                if let Some(mut address_space) = reaped.address_space.take() {
                    unsafe { address_space.destroy() };
                }
            }
            return Some((child, code));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::CpuContext;
    use crate::process::task::{Ring, Task};
    use alloc::string::String;

    fn make_task(pid: Pid, parent: Option<Pid>) {
        table::insert(Task {
            pid,
            name: String::new(),
            state: TaskState::Running,
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
            parent,
            first_child: None,
            next_sibling: None,
            next_in_ring: None,
            first_run: false,
            exit_code: 0,
            waited: false,
        });
    }

    #[test]
    fn exit_wakes_blocked_parent() {
        make_task(201, None);
        make_task(202, Some(201));
        table::with_mut(201, |t| t.state = TaskState::Blocked);
        exit(202, 7);
        assert_eq!(table::with(201, |t| t.state), Some(TaskState::Ready));
        assert_eq!(table::with(202, |t| t.exit_code), Some(7));
    }

    #[test]
    fn reap_returns_none_without_children() {
        make_task(301, None);
        assert!(try_reap_one(301).is_none());
    }
}
