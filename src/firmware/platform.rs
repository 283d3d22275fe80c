use esp_hal::{
    gpio::Output,
    time::{Duration, Instant},
};
use sonar_link::platform::{DelayOps, TriggerOutput};

pub(crate) struct BusyDelay;

impl BusyDelay {
    pub(crate) const fn new() -> Self {
        Self
    }

    fn delay_duration(&self, duration: Duration) {
        let start = Instant::now();
        while start.elapsed() < duration {}
    }
}

impl DelayOps for BusyDelay {
    fn delay_us(&self, micros: u32) {
        self.delay_duration(Duration::from_micros(micros as u64));
    }
}

pub(crate) struct TriggerPin {
    pin: Output<'static>,
}

impl TriggerPin {
    pub(crate) fn new(pin: Output<'static>) -> Self {
        Self { pin }
    }
}

impl TriggerOutput for TriggerPin {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }
}
