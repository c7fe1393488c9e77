//! The task table: every live `Task`, keyed by pid. Owning storage for
//! tasks lives here; the scheduler ring and the parent/child tree are
//! both just links between entries in this map.

use super::task::{Pid, Task};
use alloc::collections::BTreeMap;
use spin::Mutex;

static NEXT_PID: Mutex<Pid> = Mutex::new(1);
static TABLE: Mutex<BTreeMap<Pid, Task>> = Mutex::new(BTreeMap::new());

pub fn alloc_pid() -> Pid {
    let mut next = NEXT_PID.lock();
    let pid = *next;
    *next += 1;
    pid
}

pub fn insert(task: Task) -> Pid {
    let pid = task.pid;
    TABLE.lock().insert(pid, task);
    pid
}

pub fn remove(pid: Pid) -> Option<Task> {
    TABLE.lock().remove(&pid)
}

pub fn with<R>(pid: Pid, f: impl FnOnce(&Task) -> R) -> Option<R> {
    TABLE.lock().get(&pid).map(f)
}

pub fn with_mut<R>(pid: Pid, f: impl FnOnce(&mut Task) -> R) -> Option<R> {
    TABLE.lock().get_mut(&pid).map(f)
}

pub fn exists(pid: Pid) -> bool {
    TABLE.lock().contains_key(&pid)
}

/// Collects every pid whose `parent == Some(parent)`. Used by `wait` to
/// answer "does the caller have any living children" without needing
/// the intrusive first_child/next_sibling list: a table scan is simpler
/// and just as correct for a handful of tasks.
pub fn children_of(parent: Pid) -> alloc::vec::Vec<Pid> {
    TABLE.lock().iter().filter(|(_, t)| t.parent == Some(parent)).map(|(pid, _)| *pid).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_allocation_is_monotonic() {
        let a = alloc_pid();
        let b = alloc_pid();
        assert!(b > a);
    }
}
