use core::sync::atomic::{AtomicBool, Ordering};

use esp_radio::wifi::event::{self, EventExt};
use sonar_link::net::LinkEvent;

use super::super::config::LINK_EVENTS;

static EVENT_HANDLERS_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Turns radio driver callbacks into `LinkEvent`s for the supervisor.
///
/// Callbacks run on the radio's event path, so they only enqueue.
pub(super) fn install_event_handlers() {
    if EVENT_HANDLERS_INSTALLED.swap(true, Ordering::Relaxed) {
        return;
    }

    event::StaStart::update_handler(|_| {
        publish(LinkEvent::StationStarted);
    });

    event::StaStop::update_handler(|_| {
        log::info!("wifi: event sta_stop");
    });

    event::StaConnected::update_handler(|event| {
        let ssid_len = (event.ssid_len() as usize).min(event.ssid().len());
        let ssid = core::str::from_utf8(&event.ssid()[..ssid_len]).unwrap_or("<non_utf8>");
        log::info!(
            "wifi: event sta_connected ssid={} channel={} authmode={}",
            ssid,
            event.channel(),
            event.authmode()
        );
    });

    event::StaDisconnected::update_handler(|event| {
        publish(LinkEvent::Disconnected {
            reason: event.reason(),
        });
    });
}

fn publish(event: LinkEvent) {
    if LINK_EVENTS.try_send(event).is_err() {
        log::warn!("wifi: link event dropped event={}", event.as_str());
    }
}
