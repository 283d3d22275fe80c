use embassy_time::{Duration, Timer};
use esp_radio::wifi::WifiController;
use sonar_link::telemetry;

use super::{
    super::config::{CONNECT_REQUESTS, WIFI_START_RETRY_MS},
    diag,
};

/// Owns the radio controller; every connect request becomes one association attempt.
///
/// Outcomes are not reported from here: success shows up as an address from the IP
/// stack and failure as a station-disconnected event.
#[embassy_executor::task]
pub(crate) async fn link_task(mut controller: WifiController<'static>) {
    diag::install_event_handlers();

    while let Err(err) = controller.start_async().await {
        log::error!("wifi: start err={:?}", err);
        Timer::after(Duration::from_millis(WIFI_START_RETRY_MS)).await;
    }

    loop {
        CONNECT_REQUESTS.wait().await;
        telemetry::record_connect_request();
        match controller.connect_async().await {
            Ok(()) => log::info!("wifi: associated; waiting for address"),
            Err(err) => log::warn!("wifi: connect err={:?}", err),
        }
    }
}
