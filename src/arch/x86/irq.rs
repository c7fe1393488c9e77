//! IRQ demux (Component C, vectors 32..47): a 16-slot registered-callback
//! table, always terminated by sending EOI (to both PICs when the IRQ
//! came from the slave).

use super::trapframe::TrapFrame;
use spin::Mutex;

pub type IrqHandler = fn(&mut TrapFrame);

static HANDLERS: Mutex<[Option<IrqHandler>; 16]> = Mutex::new([None; 16]);

pub fn register(irq: u8, handler: IrqHandler) {
    assert!(irq < 16, "IRQ line out of range");
    HANDLERS.lock()[irq as usize] = Some(handler);
}

pub fn handle(frame: &mut TrapFrame) {
    let irq = (frame.vector - 32) as u8;
    if let Some(handler) = HANDLERS.lock()[irq as usize] {
        handler(frame);
    }
    super::pic::send_eoi(irq);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy(_: &mut TrapFrame) {}

    #[test]
    fn register_and_lookup() {
        register(2, dummy);
        assert!(HANDLERS.lock()[2].is_some());
        assert!(HANDLERS.lock()[3].is_none());
    }
}
