//! Legacy 8253/8254 PIT, channel 0, mode 3, programmed to the scheduler
//! tick frequency. Another "straightforward device poke" per scope, kept
//! minimal on purpose.

use super::cpu::outb;

const CHANNEL0_DATA: u16 = 0x40;
const COMMAND: u16 = 0x43;

const BASE_FREQUENCY_HZ: u32 = 1_193_182;

/// Programs channel 0 for square-wave mode (3) at `hz`: divisor is the
/// base frequency divided by the target tick rate (1,193,182 / 1000 for
/// a 1000 Hz tick).
///
/// # Safety
/// Must run once during boot, after the PIC has been remapped.
pub unsafe fn init(hz: u32) {
    let divisor = (BASE_FREQUENCY_HZ / hz) as u16;
    // channel 0, lobyte/hibyte access, mode 3 (square wave), binary
    outb(COMMAND, 0b00_11_011_0);
    outb(CHANNEL0_DATA, (divisor & 0xFF) as u8);
    outb(CHANNEL0_DATA, (divisor >> 8) as u8);
}

#[cfg(test)]
mod tests {
    #[test]
    fn divisor_for_1khz_matches_spec() {
        let divisor = super::BASE_FREQUENCY_HZ / 1000;
        assert_eq!(divisor, 1193);
    }
}
