mod address;
mod diag;
mod link;
mod retry;
mod supervisor;

use core::fmt::Debug;

use embassy_net::{Runner, Stack, StackResources};
use esp_hal::rng::Rng;
use esp_radio::wifi::{
    AuthMethod, ClientConfig, Config as RadioConfig, ModeConfig, ScanMethod, WifiController,
    WifiDevice,
};
use sonar_link::{config::RadioBuffers, net::WifiCredentials};
use static_cell::StaticCell;

use super::config::NET_SOCKETS;

pub(crate) use address::address_task;
pub(crate) use link::link_task;
pub(crate) use retry::retry_task;
pub(crate) use supervisor::supervisor_task;

pub(crate) struct WifiRuntime {
    pub(crate) controller: WifiController<'static>,
    pub(crate) net_runner: Runner<'static, WifiDevice<'static>>,
    pub(crate) stack: Stack<'static>,
}

pub(crate) fn setup(
    wifi: esp_hal::peripherals::WIFI<'static>,
    credentials: WifiCredentials,
) -> Result<WifiRuntime, &'static str> {
    static RADIO_CTRL: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    static STACK_RESOURCES: StaticCell<StackResources<NET_SOCKETS>> = StaticCell::new();

    let mode = station_mode_config(&credentials).ok_or("credentials not utf8")?;

    let radio_ctrl = RADIO_CTRL.init(esp_radio::init().map_err(stage_failed("radio init"))?);
    let (mut controller, ifaces) =
        esp_radio::wifi::new(radio_ctrl, wifi, radio_config(RadioBuffers::STATION))
            .map_err(stage_failed("driver init"))?;
    controller
        .set_config(&mode)
        .map_err(stage_failed("station config"))?;
    log::info!(
        "wifi: station configured ssid={} auth={}",
        credentials.ssid_str().unwrap_or("<non_utf8>"),
        if credentials.is_open() { "open" } else { "wpa2_personal" }
    );

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    let (stack, net_runner) = embassy_net::new(
        ifaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(StackResources::<NET_SOCKETS>::new()),
        seed,
    );

    Ok(WifiRuntime {
        controller,
        net_runner,
        stack,
    })
}

#[embassy_executor::task]
pub(crate) async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}

/// Logs the driver's error and reduces it to the stage that failed.
fn stage_failed<E: Debug>(stage: &'static str) -> impl FnOnce(E) -> &'static str {
    move |err| {
        log::error!("wifi: {} failed err={:?}", stage, err);
        stage
    }
}

fn radio_config(buffers: RadioBuffers) -> RadioConfig {
    // Aggregation only pays off for bulk transfers.
    RadioConfig::default()
        .with_rx_queue_size(buffers.rx_queue)
        .with_tx_queue_size(buffers.tx_queue)
        .with_static_rx_buf_num(buffers.static_rx)
        .with_dynamic_rx_buf_num(buffers.dynamic_rx)
        .with_dynamic_tx_buf_num(buffers.dynamic_tx)
        .with_ampdu_rx_enable(false)
        .with_ampdu_tx_enable(false)
}

fn station_mode_config(credentials: &WifiCredentials) -> Option<ModeConfig> {
    let ssid = credentials.ssid_str()?;
    let password = credentials.password_str()?;
    // WPA2 is the weakest security the station will accept once a password is set.
    let auth_method = if credentials.is_open() {
        AuthMethod::None
    } else {
        AuthMethod::Wpa2Personal
    };
    let client = ClientConfig::default()
        .with_ssid(ssid.into())
        .with_password(password.into())
        .with_auth_method(auth_method)
        .with_scan_method(ScanMethod::AllChannels);
    Some(ModeConfig::Client(client))
}
