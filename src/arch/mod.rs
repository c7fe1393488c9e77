pub mod x86;

pub use x86::context::CpuContext;
pub use x86::trapframe::TrapFrame;
