use embassy_net::Stack;
use sonar_link::net::LinkEvent;

use super::super::config::LINK_EVENTS;

#[embassy_executor::task]
pub(crate) async fn address_task(stack: Stack<'static>) {
    loop {
        stack.wait_config_up().await;
        match stack.config_v4() {
            Some(config) => {
                LINK_EVENTS
                    .send(LinkEvent::GotAddress(config.address.address()))
                    .await;
            }
            None => log::warn!("wifi: config up without ipv4"),
        }
        stack.wait_config_down().await;
    }
}
