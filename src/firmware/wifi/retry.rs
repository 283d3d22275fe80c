use sonar_link::{
    net::{run_retry_cycle, LinkControl, LinkEvent},
    telemetry,
};

use super::super::config::{CONNECT_REQUESTS, EVENT_BUS, LINK_EVENTS, RETRY_REQUESTS};

struct SignalLink;

impl LinkControl for SignalLink {
    fn request_connect(&self) {
        let event = LinkEvent::RetryAttempt;
        if LINK_EVENTS.try_send(event).is_err() {
            log::warn!("wifi_retry: link event dropped event={}", event.as_str());
        }
        CONNECT_REQUESTS.signal(());
    }
}

/// The one retry driver. Idle between disconnects, so a second cycle can never
/// start while one is running.
#[embassy_executor::task]
pub(crate) async fn retry_task() {
    loop {
        RETRY_REQUESTS.wait().await;
        telemetry::record_retry_cycle();
        log::info!("wifi_retry: cycle start");
        let report = run_retry_cycle(&EVENT_BUS, SignalLink).await;
        if report.skipped() {
            log::info!("wifi_retry: cycle skipped; already connected");
        } else {
            let totals = telemetry::snapshot();
            log::info!(
                "wifi_retry: cycle done attempts={} failures={} total_cycles={} total_disconnects={}",
                report.attempts,
                report.failures,
                totals.retry_cycles,
                totals.disconnects
            );
        }
    }
}
