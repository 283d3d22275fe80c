use core::{
    net::Ipv4Addr,
    sync::atomic::{AtomicU32, AtomicU8, Ordering},
};

use crate::{
    net::ConnectionState,
    ranging::{DistanceSample, SampleStatus},
};

static COUNTERS: Counters = Counters::new();

pub struct Counters {
    measurement_cycles: AtomicU32,
    samples_valid: AtomicU32,
    samples_non_physical: AtomicU32,
    echo_timeouts: AtomicU32,
    connect_requests: AtomicU32,
    connections: AtomicU32,
    disconnects: AtomicU32,
    attempt_failures: AtomicU32,
    retry_cycles: AtomicU32,
    last_disconnect_reason: AtomicU8,
    connection_state: AtomicU8,
    ipv4: AtomicU32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub measurement_cycles: u32,
    pub samples_valid: u32,
    pub samples_non_physical: u32,
    pub echo_timeouts: u32,
    pub connect_requests: u32,
    pub connections: u32,
    pub disconnects: u32,
    pub attempt_failures: u32,
    pub retry_cycles: u32,
    pub last_disconnect_reason: u8,
    pub connection_state: ConnectionState,
    pub ipv4: Option<Ipv4Addr>,
}

impl Counters {
    pub const fn new() -> Self {
        Self {
            measurement_cycles: AtomicU32::new(0),
            samples_valid: AtomicU32::new(0),
            samples_non_physical: AtomicU32::new(0),
            echo_timeouts: AtomicU32::new(0),
            connect_requests: AtomicU32::new(0),
            connections: AtomicU32::new(0),
            disconnects: AtomicU32::new(0),
            attempt_failures: AtomicU32::new(0),
            retry_cycles: AtomicU32::new(0),
            last_disconnect_reason: AtomicU8::new(0),
            connection_state: AtomicU8::new(ConnectionState::Idle as u8),
            ipv4: AtomicU32::new(0),
        }
    }

    pub fn record_sample(&self, sample: &DistanceSample) {
        self.measurement_cycles.fetch_add(1, Ordering::Relaxed);
        let counter = match sample.status {
            SampleStatus::Valid => &self.samples_valid,
            SampleStatus::NonPhysical => &self.samples_non_physical,
            SampleStatus::NoEcho => &self.echo_timeouts,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connect_request(&self) {
        self.connect_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connected(&self, address: Ipv4Addr) {
        self.connections.fetch_add(1, Ordering::Relaxed);
        self.ipv4.store(u32::from(address), Ordering::Relaxed);
    }

    pub fn record_disconnect(&self, reason: u8) {
        self.disconnects.fetch_add(1, Ordering::Relaxed);
        self.last_disconnect_reason.store(reason, Ordering::Relaxed);
        self.ipv4.store(0, Ordering::Relaxed);
    }

    pub fn record_attempt_failure(&self) {
        self.attempt_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry_cycle(&self) {
        self.retry_cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn publish_state(&self, state: ConnectionState) {
        self.connection_state.store(state as u8, Ordering::Relaxed);
    }

    pub fn connection_state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.connection_state.load(Ordering::Relaxed))
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        match self.ipv4.load(Ordering::Relaxed) {
            0 => None,
            raw => Some(Ipv4Addr::from(raw)),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            measurement_cycles: self.measurement_cycles.load(Ordering::Relaxed),
            samples_valid: self.samples_valid.load(Ordering::Relaxed),
            samples_non_physical: self.samples_non_physical.load(Ordering::Relaxed),
            echo_timeouts: self.echo_timeouts.load(Ordering::Relaxed),
            connect_requests: self.connect_requests.load(Ordering::Relaxed),
            connections: self.connections.load(Ordering::Relaxed),
            disconnects: self.disconnects.load(Ordering::Relaxed),
            attempt_failures: self.attempt_failures.load(Ordering::Relaxed),
            retry_cycles: self.retry_cycles.load(Ordering::Relaxed),
            last_disconnect_reason: self.last_disconnect_reason.load(Ordering::Relaxed),
            connection_state: self.connection_state(),
            ipv4: self.ipv4(),
        }
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

pub fn record_sample(sample: &DistanceSample) {
    COUNTERS.record_sample(sample);
}

pub fn record_connect_request() {
    COUNTERS.record_connect_request();
}

pub fn record_connected(address: Ipv4Addr) {
    COUNTERS.record_connected(address);
}

pub fn record_disconnect(reason: u8) {
    COUNTERS.record_disconnect(reason);
}

pub fn record_attempt_failure() {
    COUNTERS.record_attempt_failure();
}

pub fn record_retry_cycle() {
    COUNTERS.record_retry_cycle();
}

pub fn publish_state(state: ConnectionState) {
    COUNTERS.publish_state(state);
}

pub fn snapshot() -> Snapshot {
    COUNTERS.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranging::EchoTiming;

    #[test]
    fn samples_are_bucketed_by_status() {
        let counters = Counters::new();
        let valid = DistanceSample::from_timing(
            EchoTiming {
                rising_us: 0,
                falling_us: 1_000,
            },
            0.034_32,
        );
        let flat = DistanceSample::from_timing(
            EchoTiming {
                rising_us: 10,
                falling_us: 10,
            },
            0.034_32,
        );

        counters.record_sample(&valid);
        counters.record_sample(&flat);
        counters.record_sample(&DistanceSample::no_echo());
        counters.record_sample(&DistanceSample::no_echo());

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.measurement_cycles, 4);
        assert_eq!(snapshot.samples_valid, 1);
        assert_eq!(snapshot.samples_non_physical, 1);
        assert_eq!(snapshot.echo_timeouts, 2);
    }

    #[test]
    fn address_is_published_until_disconnect() {
        let counters = Counters::new();
        assert_eq!(counters.ipv4(), None);

        counters.record_connected(Ipv4Addr::new(10, 0, 0, 7));
        assert_eq!(counters.ipv4(), Some(Ipv4Addr::new(10, 0, 0, 7)));

        counters.record_disconnect(201);
        let snapshot = counters.snapshot();
        assert_eq!(snapshot.ipv4, None);
        assert_eq!(snapshot.connections, 1);
        assert_eq!(snapshot.disconnects, 1);
        assert_eq!(snapshot.last_disconnect_reason, 201);
    }

    #[test]
    fn published_state_reads_back() {
        let counters = Counters::new();
        assert_eq!(counters.connection_state(), ConnectionState::Idle);
        counters.publish_state(ConnectionState::Retrying);
        assert_eq!(counters.snapshot().connection_state, ConnectionState::Retrying);
    }
}
