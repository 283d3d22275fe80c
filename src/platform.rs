pub trait DelayOps {
    fn delay_us(&self, micros: u32);
}

/// Push-pull output that starts a ranging cycle.
pub trait TriggerOutput {
    fn set_high(&mut self);
    fn set_low(&mut self);
}

impl<T: TriggerOutput + ?Sized> TriggerOutput for &mut T {
    fn set_high(&mut self) {
        (**self).set_high();
    }

    fn set_low(&mut self) {
        (**self).set_low();
    }
}
