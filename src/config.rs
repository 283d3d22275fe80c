use crate::net::WifiCredentials;

pub const TRIGGER_GPIO: u8 = 14;
pub const ECHO_GPIO: u8 = 12;

// HC-SR04 datasheet: trigger must stay high for at least 10us.
pub const TRIGGER_PULSE_DEFAULT_US: u32 = 10;
// 10ms of echo is a ~171cm round trip; anything farther reads as no echo.
pub const ECHO_TIMEOUT_DEFAULT_MS: u32 = 10;
pub const MEASUREMENT_PERIOD_DEFAULT_MS: u32 = 1_000;
/// Centimetres travelled per microsecond at ~20C.
pub const SPEED_OF_SOUND_CM_PER_US: f32 = 0.034_32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangingConfig {
    pub trigger_pulse_us: u32,
    pub echo_timeout_ms: u32,
    pub period_ms: u32,
    pub speed_of_sound_cm_per_us: f32,
}

impl RangingConfig {
    pub const fn defaults() -> Self {
        Self {
            trigger_pulse_us: TRIGGER_PULSE_DEFAULT_US,
            echo_timeout_ms: ECHO_TIMEOUT_DEFAULT_MS,
            period_ms: MEASUREMENT_PERIOD_DEFAULT_MS,
            speed_of_sound_cm_per_us: SPEED_OF_SOUND_CM_PER_US,
        }
    }

    pub const fn sanitized(self) -> Self {
        let trigger_pulse_us = clamp_u32(self.trigger_pulse_us, 10, 1_000);
        let period_ms = clamp_u32(self.period_ms, 50, 60_000);
        let mut echo_timeout_ms = clamp_u32(self.echo_timeout_ms, 1, 100);
        // The wait must end inside its own slot or the ticker falls behind.
        if echo_timeout_ms >= period_ms {
            echo_timeout_ms = period_ms - 1;
        }
        let speed_of_sound_cm_per_us = if self.speed_of_sound_cm_per_us > 0.0 {
            self.speed_of_sound_cm_per_us
        } else {
            SPEED_OF_SOUND_CM_PER_US
        };
        Self {
            trigger_pulse_us,
            echo_timeout_ms,
            period_ms,
            speed_of_sound_cm_per_us,
        }
    }
}

impl Default for RangingConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

const fn clamp_u32(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Radio driver buffer counts.
///
/// The node only keeps a DHCP lease alive, so traffic is a few small frames
/// and the heap goes to the driver's fixed cost instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioBuffers {
    pub rx_queue: usize,
    pub tx_queue: usize,
    pub static_rx: u8,
    pub dynamic_rx: u16,
    pub dynamic_tx: u16,
}

impl RadioBuffers {
    pub const STATION: Self = Self {
        rx_queue: 3,
        tx_queue: 2,
        static_rx: 4,
        dynamic_rx: 8,
        dynamic_tx: 8,
    };
}

fn wifi_credentials() -> Option<(&'static str, &'static str)> {
    let ssid = option_env!("SONAR_WIFI_SSID").or(option_env!("SSID"))?;
    let password = option_env!("SONAR_WIFI_PASSWORD")
        .or(option_env!("PASSWORD"))
        .unwrap_or("");
    Some((ssid, password))
}

/// Credentials baked in at build time, if any were provided.
pub fn compiled_wifi_credentials() -> Option<WifiCredentials> {
    wifi_credentials().and_then(|(ssid, password)| {
        WifiCredentials::from_parts(ssid.as_bytes(), password.as_bytes()).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_survive_sanitizing() {
        assert_eq!(RangingConfig::defaults().sanitized(), RangingConfig::defaults());
    }

    #[test]
    fn short_trigger_pulse_is_raised_to_sensor_minimum() {
        let config = RangingConfig {
            trigger_pulse_us: 2,
            ..RangingConfig::defaults()
        }
        .sanitized();
        assert_eq!(config.trigger_pulse_us, 10);
    }

    #[test]
    fn echo_timeout_is_kept_below_period() {
        let config = RangingConfig {
            echo_timeout_ms: 100,
            period_ms: 50,
            ..RangingConfig::defaults()
        }
        .sanitized();
        assert_eq!(config.period_ms, 50);
        assert_eq!(config.echo_timeout_ms, 49);
    }

    #[test]
    fn non_positive_speed_falls_back_to_constant() {
        let config = RangingConfig {
            speed_of_sound_cm_per_us: -1.0,
            ..RangingConfig::defaults()
        }
        .sanitized();
        assert_eq!(config.speed_of_sound_cm_per_us, SPEED_OF_SOUND_CM_PER_US);
    }

    #[test]
    fn station_buffers_respect_driver_minimums() {
        let buffers = RadioBuffers::STATION;
        // The driver refuses fewer than two static rx buffers.
        assert!(buffers.static_rx >= 2);
        assert!(buffers.dynamic_rx >= u16::from(buffers.static_rx));
        assert!(buffers.rx_queue <= usize::from(buffers.dynamic_rx));
        assert!(buffers.tx_queue >= 1);
    }
}
