mod channels;

pub(crate) use channels::{CONNECT_REQUESTS, ECHO_CAPTURE, EVENT_BUS, LINK_EVENTS, RETRY_REQUESTS};

pub(crate) const HEAP_SIZE: usize = 72 * 1024;
pub(crate) const LINK_EVENT_QUEUE: usize = 8;
pub(crate) const NET_SOCKETS: usize = 3;
pub(crate) const WIFI_START_RETRY_MS: u64 = 3_000;
