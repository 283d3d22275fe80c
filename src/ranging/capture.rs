use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::{with_timeout, Duration};

use super::{
    sampler::EchoSource,
    types::{EchoTiming, EdgeLevel},
};

/// Echo pulse timestamps written from the GPIO interrupt and handed to one
/// waiting task.
///
/// The falling edge publishes the whole `EchoTiming` through a binary signal,
/// so a reader only ever sees a pair that was complete when it was released.
/// There is no getter for the raw timestamps. A second falling edge before the
/// consumer wakes overwrites the pending pair: last value wins.
pub struct PulseCapture {
    rising_us: AtomicU32,
    rising_seen: AtomicBool,
    echo: Signal<CriticalSectionRawMutex, EchoTiming>,
}

impl PulseCapture {
    pub const fn new() -> Self {
        Self {
            rising_us: AtomicU32::new(0),
            rising_seen: AtomicBool::new(false),
            echo: Signal::new(),
        }
    }

    /// Interrupt context only. Never blocks.
    pub fn on_edge(&self, level: EdgeLevel, now_us: u32) {
        match level {
            EdgeLevel::Rising => {
                self.rising_us.store(now_us, Ordering::Relaxed);
                self.rising_seen.store(true, Ordering::Release);
            }
            EdgeLevel::Falling => {
                // A falling edge without its rising edge has no start time;
                // publish a zero-width pulse so the reader rejects it.
                let rising_us = if self.rising_seen.swap(false, Ordering::Acquire) {
                    self.rising_us.load(Ordering::Relaxed)
                } else {
                    now_us
                };
                self.echo.signal(EchoTiming {
                    rising_us,
                    falling_us: now_us,
                });
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.echo.signaled()
    }

    /// Consumes the pending pulse without waiting.
    pub fn try_take(&self) -> Option<EchoTiming> {
        self.echo.try_take()
    }
}

impl Default for PulseCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoSource for PulseCapture {
    fn arm(&self) {
        self.echo.reset();
    }

    async fn wait_echo(&self, timeout: Duration) -> Option<EchoTiming> {
        with_timeout(timeout, self.echo.wait()).await.ok()
    }
}
