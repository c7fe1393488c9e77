//! Kernel-internal error type and the POSIX-flavoured errno it maps to at
//! the syscall boundary.

/// Errors produced by internal kernel operations (frame allocator, VMM,
/// heap, ELF loader). Never crosses the syscall boundary directly — see
/// [`Errno`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    OutOfMemory,
    InvalidArgument,
    NotFound,
    AlreadyMapped,
    Unmapped,
    BadAddress,
    NotSupported,
    Corrupt,
}

/// Subset of POSIX errno values this kernel's syscalls can produce.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    EPERM = 1,
    ENOENT = 2,
    ESRCH = 3,
    EINTR = 4,
    EIO = 5,
    EBADF = 9,
    ECHILD = 10,
    EAGAIN = 11,
    ENOMEM = 12,
    EFAULT = 14,
    EINVAL = 22,
    ENOSYS = 38,
}

impl From<KernelError> for Errno {
    fn from(e: KernelError) -> Self {
        match e {
            KernelError::OutOfMemory => Errno::ENOMEM,
            KernelError::InvalidArgument => Errno::EINVAL,
            KernelError::NotFound => Errno::ENOENT,
            KernelError::AlreadyMapped => Errno::EINVAL,
            KernelError::Unmapped => Errno::EFAULT,
            KernelError::BadAddress => Errno::EFAULT,
            KernelError::NotSupported => Errno::ENOSYS,
            KernelError::Corrupt => Errno::EIO,
        }
    }
}

impl Errno {
    /// The value a syscall handler writes back into the trap frame's EAX:
    /// a negated errno, matching the ABI's "-1 on error" convention
    /// generalized to a distinguishable negative code.
    pub fn as_isize(self) -> isize {
        -(self as i32 as isize)
    }
}

pub type KResult<T> = core::result::Result<T, KernelError>;
