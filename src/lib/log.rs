//! Minimal leveled logging over the console collaborator.
//!
//! There is no hosted executor to register a `log::Log` implementation
//! with this early in boot, so this is a small hand-rolled framework in
//! the same spirit: a runtime level, bracketed prefixes, and macros that
//! disappear entirely below the configured level.

use core::sync::atomic::{AtomicU8, Ordering};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn prefix(self) -> &'static str {
        match self {
            LogLevel::Error => "[ERROR] ",
            LogLevel::Warn => "[WARN ] ",
            LogLevel::Info => "[INFO ] ",
            LogLevel::Debug => "[DEBUG] ",
            LogLevel::Trace => "[TRACE] ",
        }
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

pub fn set_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn level_enabled(level: LogLevel) -> bool {
    (level as u8) <= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Internal: format and emit a line through the console collaborator.
/// Not part of the public API; use the level macros below.
#[doc(hidden)]
pub fn emit(level: LogLevel, args: core::fmt::Arguments) {
    use core::fmt::Write;
    let mut w = crate::console::writer();
    let _ = w.write_str(level.prefix());
    let _ = w.write_fmt(args);
    let _ = w.write_str("\n");
}

#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => {
        $crate::lib::log::emit($crate::lib::log::LogLevel::Error, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => {
        if $crate::lib::log::level_enabled($crate::lib::log::LogLevel::Warn) {
            $crate::lib::log::emit($crate::lib::log::LogLevel::Warn, format_args!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => {
        if $crate::lib::log::level_enabled($crate::lib::log::LogLevel::Info) {
            $crate::lib::log::emit($crate::lib::log::LogLevel::Info, format_args!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => {
        if $crate::lib::log::level_enabled($crate::lib::log::LogLevel::Debug) {
            $crate::lib::log::emit($crate::lib::log::LogLevel::Debug, format_args!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => {
        if $crate::lib::log::level_enabled($crate::lib::log::LogLevel::Trace) {
            $crate::lib::log::emit($crate::lib::log::LogLevel::Trace, format_args!($($arg)*))
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_info() {
        assert!(level_enabled(LogLevel::Info));
        assert!(level_enabled(LogLevel::Error));
    }

    #[test]
    fn raising_level_gates_debug() {
        set_level(LogLevel::Debug);
        assert!(level_enabled(LogLevel::Debug));
        set_level(LogLevel::Info);
        assert!(!level_enabled(LogLevel::Debug));
    }
}
