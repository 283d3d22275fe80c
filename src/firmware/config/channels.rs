use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel, signal::Signal};
use sonar_link::{
    net::{EventBus, LinkEvent},
    ranging::PulseCapture,
};

use super::LINK_EVENT_QUEUE;

pub(crate) static ECHO_CAPTURE: PulseCapture = PulseCapture::new();
pub(crate) static EVENT_BUS: EventBus = EventBus::new();
pub(crate) static LINK_EVENTS: Channel<CriticalSectionRawMutex, LinkEvent, LINK_EVENT_QUEUE> =
    Channel::new();
pub(crate) static CONNECT_REQUESTS: Signal<CriticalSectionRawMutex, ()> = Signal::new();
/// Wakes the single retry driver; extra signals while a cycle runs collapse into one.
pub(crate) static RETRY_REQUESTS: Signal<CriticalSectionRawMutex, ()> = Signal::new();
