#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeLevel {
    /// Echo line went active; the acoustic burst has left the sensor.
    Rising,
    /// Echo line returned to idle; the reflection arrived.
    Falling,
}

impl EdgeLevel {
    pub const fn from_level(high: bool) -> Self {
        if high {
            Self::Rising
        } else {
            Self::Falling
        }
    }
}

/// Timestamp pair of one echo pulse, in microseconds of the monotonic clock.
///
/// The counter is 32 bits wide and wraps roughly every 71 minutes, so the
/// difference is taken with wrapping arithmetic and read back as signed: a
/// falling edge that precedes its rising edge shows up as a negative width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EchoTiming {
    pub rising_us: u32,
    pub falling_us: u32,
}

impl EchoTiming {
    pub const fn elapsed_us(self) -> i32 {
        self.falling_us.wrapping_sub(self.rising_us) as i32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleStatus {
    Valid,
    /// An echo arrived but its width does not map to a positive distance.
    NonPhysical,
    /// No falling edge inside the wait window.
    NoEcho,
}

impl SampleStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::NonPhysical => "non_physical",
            Self::NoEcho => "no_echo",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceSample {
    pub elapsed_us: i32,
    pub distance_cm: f32,
    pub status: SampleStatus,
}

impl DistanceSample {
    pub fn from_timing(timing: EchoTiming, speed_of_sound_cm_per_us: f32) -> Self {
        let elapsed_us = timing.elapsed_us();
        let distance_cm = elapsed_us as f32 * speed_of_sound_cm_per_us / 2.0;
        let status = if distance_cm > 0.0 {
            SampleStatus::Valid
        } else {
            SampleStatus::NonPhysical
        };
        Self {
            elapsed_us,
            distance_cm,
            status,
        }
    }

    pub const fn no_echo() -> Self {
        Self {
            elapsed_us: 0,
            distance_cm: 0.0,
            status: SampleStatus::NoEcho,
        }
    }

    pub const fn valid(&self) -> bool {
        matches!(self.status, SampleStatus::Valid)
    }
}
