//! Component I: round-robin scheduler over a circular ring of tasks.
//!
//! The ring is threaded through `Task::next_in_ring` rather than kept
//! as a separate container, so `add`/`remove` never have to touch the
//! task's storage in the table — only the links.

use super::task::{Pid, TaskState};
use super::{context_switch, table};
use crate::config::QUANTUM_TICKS;
use spin::Mutex;

struct Ring {
    head: Option<Pid>,
    /// The ring slot to resume scanning from on the next `pick_next`:
    /// "the slot after the currently running task", per the round-robin
    /// tie-break rule.
    cursor: Option<Pid>,
}

static RING: Mutex<Ring> = Mutex::new(Ring { head: None, cursor: None });
static CURRENT: Mutex<Option<Pid>> = Mutex::new(None);
static IDLE: Mutex<Option<Pid>> = Mutex::new(None);
static TICKS: Mutex<u64> = Mutex::new(0);

pub fn set_idle_task(pid: Pid) {
    *IDLE.lock() = Some(pid);
}

pub fn current() -> Option<Pid> {
    *CURRENT.lock()
}

pub fn set_current(pid: Pid) {
    *CURRENT.lock() = Some(pid);
}

/// Inserts `pid` at the tail of the ring.
pub fn add(pid: Pid) {
    let mut ring = RING.lock();
    match ring.head {
        None => {
            table::with_mut(pid, |t| t.next_in_ring = Some(pid));
            ring.head = Some(pid);
            ring.cursor = Some(pid);
        }
        Some(head) => {
            let mut tail = head;
            while let Some(next) = table::with(tail, |t| t.next_in_ring).flatten() {
                if next == head {
                    break;
                }
                tail = next;
            }
            table::with_mut(tail, |t| t.next_in_ring = Some(pid));
            table::with_mut(pid, |t| t.next_in_ring = Some(head));
        }
    }
}

/// Unlinks `pid` from the ring. Used when a task becomes Blocked (it
/// stays in the task table, just not schedulable) — actually Blocked
/// tasks in this design remain linked and are simply skipped by
/// `pick_next`; `remove` is reserved for tasks leaving the system
/// entirely (reaped zombies).
pub fn remove(pid: Pid) {
    let mut ring = RING.lock();
    let head = match ring.head {
        Some(h) => h,
        None => return,
    };
    if head == pid {
        let next = table::with(pid, |t| t.next_in_ring).flatten();
        ring.head = if next == Some(pid) { None } else { next };
        ring.cursor = ring.head;
    }
    let mut cur = head;
    loop {
        let next = table::with(cur, |t| t.next_in_ring).flatten();
        match next {
            Some(n) if n == pid => {
                let after = table::with(pid, |t| t.next_in_ring).flatten();
                table::with_mut(cur, |t| t.next_in_ring = after);
                break;
            }
            Some(n) => cur = n,
            None => break,
        }
    }
}

/// Scans forward from the cursor for the first Ready task; returns the
/// idle task if none is found.
pub fn pick_next() -> Option<Pid> {
    let ring = RING.lock();
    let start = ring.cursor.or(ring.head)?;
    let mut cur = start;
    loop {
        if table::with(cur, |t| t.state == TaskState::Ready).unwrap_or(false) {
            return Some(cur);
        }
        let next = table::with(cur, |t| t.next_in_ring).flatten()?;
        if next == start {
            break;
        }
        cur = next;
    }
    *IDLE.lock()
}

/// Called once per timer IRQ: advances the tick counter, wakes sleepers
/// whose `wake_time` has arrived, and decrements the running task's
/// time slice, triggering `schedule()` at zero.
pub fn tick(now_ms: u64) {
    *TICKS.lock() += 1;

    let ring_snapshot = {
        let ring = RING.lock();
        ring.head
    };
    if let Some(start) = ring_snapshot {
        let mut cur = start;
        loop {
            table::with_mut(cur, |t| {
                if t.state == TaskState::Sleeping && t.wake_time <= now_ms {
                    t.state = TaskState::Ready;
                }
            });
            match table::with(cur, |t| t.next_in_ring).flatten() {
                Some(next) if next != start => cur = next,
                _ => break,
            }
        }
    }

    if let Some(running) = current() {
        let expired = table::with_mut(running, |t| {
            if t.time_slice > 0 {
                t.time_slice -= 1;
            }
            t.time_slice == 0
        })
        .unwrap_or(true);
        if expired {
            schedule();
        }
    }
}

/// Picks the next Ready task, resets its quantum, and performs the
/// context switch.
pub fn schedule() {
    let next = match pick_next() {
        Some(p) => p,
        None => return,
    };
    table::with_mut(next, |t| t.time_slice = QUANTUM_TICKS);
    {
        let mut ring = RING.lock();
        ring.cursor = table::with(next, |t| t.next_in_ring).flatten();
    }
    context_switch::switch_to(next);
}

pub fn tick_count() -> u64 {
    *TICKS.lock()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::task::Ring as TaskRing;
    use alloc::string::String;

    fn make_task(pid: Pid, state: TaskState) {
        table::insert(crate::process::task::Task {
            pid,
            name: String::new(),
            state,
            priority: 0,
            ring: TaskRing::Kernel,
            context: crate::arch::CpuContext::new(),
            page_directory: 0,
            address_space: None,
            kernel_stack_top: 0,
            user_stack_phys: None,
            user_esp: 0,
            entry_point: 0,
            time_slice: QUANTUM_TICKS,
            total_time: 0,
            wake_time: 0,
            parent: None,
            first_child: None,
            next_sibling: None,
            next_in_ring: None,
            first_run: false,
            exit_code: 0,
            waited: false,
        });
    }

    #[test]
    fn pick_next_skips_non_ready_tasks() {
        make_task(101, TaskState::Running);
        make_task(102, TaskState::Blocked);
        make_task(103, TaskState::Ready);
        add(101);
        add(102);
        add(103);
        assert_eq!(pick_next(), Some(103));
    }
}
