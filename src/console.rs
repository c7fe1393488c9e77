//! The console collaborator: a polled COM1 (0x3F8) serial port.
//! VGA text mode and the keyboard are out of scope; this is the only
//! place `kinfo!`/`panic!` output actually goes.

use crate::arch::x86::cpu::{inb, outb};
use core::fmt;
use spin::Mutex;

const COM1: u16 = 0x3F8;

static CONSOLE: Mutex<SerialConsole> = Mutex::new(SerialConsole::new(COM1));

struct SerialConsole {
    port: u16,
}

impl SerialConsole {
    const fn new(port: u16) -> Self {
        Self { port }
    }

    fn init(&self) {
        unsafe {
            outb(self.port + 1, 0x00); // disable interrupts
            outb(self.port + 3, 0x80); // enable DLAB
            outb(self.port + 0, 0x03); // divisor low: 38400 baud
            outb(self.port + 1, 0x00); // divisor high
            outb(self.port + 3, 0x03); // 8 bits, no parity, one stop bit
            outb(self.port + 2, 0xC7); // enable + clear FIFO, 14-byte threshold
            outb(self.port + 4, 0x0B); // RTS/DSR set, IRQs off (polled)
        }
    }

    fn transmit_empty(&self) -> bool {
        unsafe { inb(self.port + 5) & 0x20 != 0 }
    }

    fn write_byte(&self, byte: u8) {
        while !self.transmit_empty() {
            core::hint::spin_loop();
        }
        unsafe { outb(self.port, byte) };
    }
}

impl fmt::Write for SerialConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}

/// Must run once during boot, before the first log line.
pub fn init() {
    CONSOLE.lock().init();
}

/// Returns a guard implementing [`core::fmt::Write`], held for the
/// duration of one log line so concurrent writers can't interleave.
pub fn writer() -> impl fmt::Write {
    struct Writer;
    impl fmt::Write for Writer {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            CONSOLE.lock().write_str(s)
        }
    }
    Writer
}
