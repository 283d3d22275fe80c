use core::net::Ipv4Addr;

pub const WIFI_SSID_MAX: usize = 32;
pub const WIFI_PASSWORD_MAX: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: [u8; WIFI_SSID_MAX],
    pub ssid_len: u8,
    pub password: [u8; WIFI_PASSWORD_MAX],
    pub password_len: u8,
}

impl WifiCredentials {
    pub fn from_parts(ssid: &[u8], password: &[u8]) -> Result<Self, &'static str> {
        if ssid.is_empty() || ssid.len() > WIFI_SSID_MAX || password.len() > WIFI_PASSWORD_MAX {
            return Err("invalid wifi credentials length");
        }
        let mut result = Self {
            ssid: [0u8; WIFI_SSID_MAX],
            ssid_len: ssid.len() as u8,
            password: [0u8; WIFI_PASSWORD_MAX],
            password_len: password.len() as u8,
        };
        result.ssid[..ssid.len()].copy_from_slice(ssid);
        result.password[..password.len()].copy_from_slice(password);
        Ok(result)
    }

    pub fn ssid_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.ssid[..self.ssid_len as usize]).ok()
    }

    pub fn password_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.password[..self.password_len as usize]).ok()
    }

    pub fn is_open(&self) -> bool {
        self.password_len == 0
    }
}

/// Notifications from the radio driver and the IP stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    StationStarted,
    /// The retry driver issued another connect request.
    RetryAttempt,
    GotAddress(Ipv4Addr),
    Disconnected { reason: u8 },
}

impl LinkEvent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StationStarted => "sta_start",
            Self::RetryAttempt => "retry_attempt",
            Self::GotAddress(_) => "got_ip",
            Self::Disconnected { .. } => "sta_disconnected",
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Connected,
    Retrying,
    /// The last retry attempt failed. Left for `Retrying` on the driver's next
    /// attempt, or for `Connected` if an address arrives first.
    Failed,
}

impl ConnectionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Retrying => "retrying",
            Self::Failed => "failed",
        }
    }

    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::Retrying,
            _ => Self::Failed,
        }
    }
}

/// Consecutive failed connection attempts since the last address was acquired.
///
/// There is no cap: retries continue for as long as the link keeps failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryBudget {
    failures: u32,
}

impl RetryBudget {
    pub const fn new() -> Self {
        Self { failures: 0 }
    }

    pub fn record_failure(&mut self) -> u32 {
        self.failures = self.failures.saturating_add(1);
        self.failures
    }

    pub fn reset(&mut self) {
        self.failures = 0;
    }

    pub const fn failures(self) -> u32 {
        self.failures
    }
}

pub fn disconnect_reason_label(reason: u8) -> &'static str {
    match reason {
        2 => "auth_expire",
        3 => "auth_leave",
        4 => "assoc_expire",
        8 => "assoc_leave",
        15 => "4way_handshake_timeout",
        200 => "beacon_timeout",
        201 => "no_ap_found",
        202 => "auth_fail",
        203 => "assoc_fail",
        204 => "handshake_timeout",
        205 => "connection_fail",
        210 => "no_ap_found_compatible_security",
        211 => "no_ap_found_authmode_threshold",
        212 => "no_ap_found_rssi_threshold",
        _ => "other",
    }
}
