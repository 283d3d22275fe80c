use esp_hal::{
    gpio::{Event, Input, Io},
    handler,
    time::Instant,
};
use sonar_link::{config::ECHO_GPIO, ranging::EdgeLevel};
use static_cell::StaticCell;

use super::config::ECHO_CAPTURE;

/// Echo pin bit in `GPIO.in` / `GPIO.status` (bank0).
const ECHO_MASK: u32 = 1 << ECHO_GPIO;

static ECHO_INPUT: StaticCell<Input<'static>> = StaticCell::new();

pub(crate) fn install(io: &mut Io<'static>, echo: Input<'static>) {
    io.set_interrupt_handler(echo_edge_handler);
    let echo = ECHO_INPUT.init(echo);
    echo.listen(Event::AnyEdge);
}

#[handler]
fn echo_edge_handler() {
    let now_us = Instant::now().duration_since_epoch().as_micros() as u32;

    // Register access only: no locks and no logging in here.
    let gpio = unsafe { &*esp32::GPIO::PTR };
    let pending = gpio.status().read().bits() & ECHO_MASK;
    if pending == 0 {
        return;
    }
    let high = gpio.in_().read().bits() & ECHO_MASK != 0;
    ECHO_CAPTURE.on_edge(EdgeLevel::from_level(high), now_us);
    gpio.status_w1tc().write(|w| unsafe { w.bits(pending) });
}
