use super::event_bus::{Conditions, EventBus};

/// Radio side of a reconnect: ask the driver to associate again.
///
/// Must not block; the outcome arrives later as a link event.
pub trait LinkControl {
    fn request_connect(&self);
}

impl<L: LinkControl + ?Sized> LinkControl for &L {
    fn request_connect(&self) {
        (**self).request_connect();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryReport {
    /// Connect requests issued during this cycle.
    pub attempts: u32,
    /// Attempts that ended in `ATTEMPT_FAILED`.
    pub failures: u32,
}

impl RetryReport {
    pub fn skipped(&self) -> bool {
        self.attempts == 0
    }
}

/// Reconnects until the link holds an address again.
///
/// The caller guarantees a single cycle runs at a time. Returns with
/// `RETRY_IN_PROGRESS` cleared and `CONNECTED` observed after the clear.
pub async fn run_retry_cycle<L: LinkControl>(bus: &EventBus, link: L) -> RetryReport {
    let mut report = RetryReport::default();
    bus.set(Conditions::RETRY_IN_PROGRESS);

    loop {
        if bus.get().contains(Conditions::CONNECTED) {
            bus.clear(Conditions::RETRY_IN_PROGRESS);
            if bus.get().contains(Conditions::CONNECTED) {
                return report;
            }
            // Lost again between the two reads; keep the retry role.
            bus.set(Conditions::RETRY_IN_PROGRESS);
        }

        bus.clear(Conditions::ATTEMPT_FAILED);
        report.attempts = report.attempts.saturating_add(1);
        log::info!("wifi_retry: connect attempt={}", report.attempts);
        link.request_connect();

        let hit = bus
            .wait_any(Conditions::CONNECTED | Conditions::ATTEMPT_FAILED)
            .await;
        if hit.contains(Conditions::CONNECTED) {
            continue;
        }

        report.failures = report.failures.saturating_add(1);
        log::warn!(
            "wifi_retry: attempt failed attempt={} failures={}",
            report.attempts,
            report.failures
        );
    }
}
