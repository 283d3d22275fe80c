use sonar_link::{
    net::{disconnect_reason_label, ConnectionState, ConnectionSupervisor, LinkEvent},
    telemetry,
};

use super::super::config::{CONNECT_REQUESTS, EVENT_BUS, LINK_EVENTS, RETRY_REQUESTS};

#[embassy_executor::task]
pub(crate) async fn supervisor_task() {
    let mut supervisor = ConnectionSupervisor::new();
    telemetry::publish_state(supervisor.state());

    loop {
        let event = LINK_EVENTS.receive().await;
        match event {
            LinkEvent::StationStarted => log::info!("wifi: station started"),
            LinkEvent::RetryAttempt => log::debug!("wifi: retry driver attempt"),
            LinkEvent::GotAddress(address) => {
                telemetry::record_connected(address);
                log::info!("wifi: connected address={}", address);
            }
            LinkEvent::Disconnected { reason } => {
                telemetry::record_disconnect(reason);
                log::warn!(
                    "wifi: disconnected reason={} ({})",
                    reason,
                    disconnect_reason_label(reason)
                );
            }
        }

        let output = supervisor.handle(event, &EVENT_BUS);
        if output.changed() {
            telemetry::publish_state(output.to);
            log::info!(
                "wifi: state {}->{} event={}",
                output.from.as_str(),
                output.to.as_str(),
                event.as_str()
            );
        }
        if matches!(event, LinkEvent::Disconnected { .. })
            && output.to == ConnectionState::Failed
        {
            telemetry::record_attempt_failure();
            log::warn!(
                "wifi: reconnect attempt failed consecutive_failures={}",
                output.retry_failures
            );
        }
        if output.request_connect {
            CONNECT_REQUESTS.signal(());
        }
        if output.start_retry_driver {
            RETRY_REQUESTS.signal(());
        }
    }
}
