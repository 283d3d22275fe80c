use core::ops::ControlFlow;

use embassy_time::{Duration, Ticker};

use super::types::{DistanceSample, EchoTiming};
use crate::{
    config::RangingConfig,
    platform::{DelayOps, TriggerOutput},
};

/// Where a ranging cycle gets its echo from.
#[allow(async_fn_in_trait)]
pub trait EchoSource {
    /// Drops any pulse left over from an earlier cycle.
    fn arm(&self);
    async fn wait_echo(&self, timeout: Duration) -> Option<EchoTiming>;
}

impl<E: EchoSource + ?Sized> EchoSource for &E {
    fn arm(&self) {
        (**self).arm();
    }

    async fn wait_echo(&self, timeout: Duration) -> Option<EchoTiming> {
        (**self).wait_echo(timeout).await
    }
}

pub struct RangeSampler<T, D, E> {
    trigger: T,
    delay: D,
    echo: E,
    config: RangingConfig,
}

impl<T, D, E> RangeSampler<T, D, E>
where
    T: TriggerOutput,
    D: DelayOps,
    E: EchoSource,
{
    pub fn new(mut trigger: T, delay: D, echo: E, config: RangingConfig) -> Self {
        trigger.set_low();
        Self {
            trigger,
            delay,
            echo,
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> RangingConfig {
        self.config
    }

    /// Fires one trigger pulse and classifies whatever comes back.
    pub async fn measure_once(&mut self) -> DistanceSample {
        self.echo.arm();

        self.trigger.set_high();
        self.delay.delay_us(self.config.trigger_pulse_us);
        self.trigger.set_low();

        let timeout = Duration::from_millis(self.config.echo_timeout_ms as u64);
        match self.echo.wait_echo(timeout).await {
            Some(timing) => {
                DistanceSample::from_timing(timing, self.config.speed_of_sound_cm_per_us)
            }
            None => DistanceSample::no_echo(),
        }
    }

    /// Measures once per period until `on_sample` breaks.
    ///
    /// Cycle starts sit on fixed period boundaries counted from the first
    /// cycle, so a timed-out echo never shifts the ones after it.
    pub async fn run<F>(&mut self, mut on_sample: F)
    where
        F: FnMut(DistanceSample) -> ControlFlow<()>,
    {
        let mut ticker = Ticker::every(Duration::from_millis(self.config.period_ms as u64));
        loop {
            let sample = self.measure_once().await;
            if on_sample(sample).is_break() {
                return;
            }
            ticker.next().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::{Cell, RefCell};

    use embassy_futures::block_on;
    use embassy_time::Instant;

    use super::*;
    use crate::ranging::{EdgeLevel, PulseCapture, SampleStatus};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum PinOp {
        High,
        Low,
        Delay(u32),
    }

    #[derive(Default)]
    struct Trace {
        ops: RefCell<Vec<PinOp>>,
    }

    struct FakeTrigger<'a>(&'a Trace);

    impl TriggerOutput for FakeTrigger<'_> {
        fn set_high(&mut self) {
            self.0.ops.borrow_mut().push(PinOp::High);
        }

        fn set_low(&mut self) {
            self.0.ops.borrow_mut().push(PinOp::Low);
        }
    }

    struct FakeDelay<'a>(&'a Trace);

    impl DelayOps for FakeDelay<'_> {
        fn delay_us(&self, micros: u32) {
            self.0.ops.borrow_mut().push(PinOp::Delay(micros));
        }
    }

    /// Replays one scripted echo per cycle and records each wait window.
    struct ScriptedEcho {
        replies: RefCell<Vec<Option<EchoTiming>>>,
        armed: Cell<u32>,
        timeouts: RefCell<Vec<Duration>>,
    }

    impl ScriptedEcho {
        fn new(mut replies: Vec<Option<EchoTiming>>) -> Self {
            replies.reverse();
            Self {
                replies: RefCell::new(replies),
                armed: Cell::new(0),
                timeouts: RefCell::new(Vec::new()),
            }
        }
    }

    impl EchoSource for ScriptedEcho {
        fn arm(&self) {
            self.armed.set(self.armed.get() + 1);
        }

        async fn wait_echo(&self, timeout: Duration) -> Option<EchoTiming> {
            self.timeouts.borrow_mut().push(timeout);
            self.replies.borrow_mut().pop().flatten()
        }
    }

    fn timing(rising_us: u32, falling_us: u32) -> Option<EchoTiming> {
        Some(EchoTiming {
            rising_us,
            falling_us,
        })
    }

    #[test]
    fn trigger_pulse_is_high_delay_low() {
        let trace = Trace::default();
        let echo = ScriptedEcho::new(vec![timing(0, 2_000)]);
        let mut sampler = RangeSampler::new(
            FakeTrigger(&trace),
            FakeDelay(&trace),
            &echo,
            RangingConfig::defaults(),
        );
        trace.ops.borrow_mut().clear();

        let _ = block_on(sampler.measure_once());

        assert_eq!(
            *trace.ops.borrow(),
            [PinOp::High, PinOp::Delay(10), PinOp::Low]
        );
        assert_eq!(echo.armed.get(), 1);
        assert_eq!(*echo.timeouts.borrow(), [Duration::from_millis(10)]);
    }

    #[test]
    fn echo_of_2000us_measures_34_cm() {
        let trace = Trace::default();
        let echo = ScriptedEcho::new(vec![timing(100, 2_100)]);
        let mut sampler = RangeSampler::new(
            FakeTrigger(&trace),
            FakeDelay(&trace),
            &echo,
            RangingConfig::defaults(),
        );

        let sample = block_on(sampler.measure_once());

        assert!(sample.valid());
        assert!((sample.distance_cm - 34.32).abs() < 1e-3);
    }

    #[test]
    fn missing_echo_is_invalid_and_next_cycle_still_measures() {
        let trace = Trace::default();
        let echo = ScriptedEcho::new(vec![None, timing(0, 1_000)]);
        let mut sampler = RangeSampler::new(
            FakeTrigger(&trace),
            FakeDelay(&trace),
            &echo,
            RangingConfig::defaults(),
        );

        let first = block_on(sampler.measure_once());
        let second = block_on(sampler.measure_once());

        assert_eq!(first.status, SampleStatus::NoEcho);
        assert!(second.valid());
        assert_eq!(echo.armed.get(), 2);
    }

    #[test]
    fn non_positive_width_is_never_valid() {
        let trace = Trace::default();
        let echo = ScriptedEcho::new(vec![timing(500, 500), timing(900, 100)]);
        let mut sampler = RangeSampler::new(
            FakeTrigger(&trace),
            FakeDelay(&trace),
            &echo,
            RangingConfig::defaults(),
        );

        for _ in 0..2 {
            let sample = block_on(sampler.measure_once());
            assert_eq!(sample.status, SampleStatus::NonPhysical);
        }
    }

    #[test]
    fn stale_pulse_from_previous_cycle_is_not_read() {
        let trace = Trace::default();
        let capture = PulseCapture::new();
        capture.on_edge(EdgeLevel::Rising, 0);
        capture.on_edge(EdgeLevel::Falling, 2_000);

        let mut sampler = RangeSampler::new(
            FakeTrigger(&trace),
            FakeDelay(&trace),
            &capture,
            RangingConfig::defaults(),
        );

        let sample = block_on(sampler.measure_once());
        assert_eq!(sample.status, SampleStatus::NoEcho);
    }

    #[test]
    fn timed_out_cycles_stay_on_period_boundaries() {
        let trace = Trace::default();
        let capture = PulseCapture::new();
        let config = RangingConfig {
            period_ms: 50,
            echo_timeout_ms: 30,
            ..RangingConfig::defaults()
        };
        let mut sampler =
            RangeSampler::new(FakeTrigger(&trace), FakeDelay(&trace), &capture, config);

        let mut finished = Vec::new();
        block_on(sampler.run(|sample| {
            assert_eq!(sample.status, SampleStatus::NoEcho);
            finished.push(Instant::now());
            if finished.len() == 5 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }));

        // Sleeping a full period after each 30 ms timeout would take 320 ms.
        let span = finished[4] - finished[0];
        assert!(span >= Duration::from_millis(195), "span={:?}", span);
        assert!(span < Duration::from_millis(250), "span={:?}", span);
        for pair in finished.windows(2) {
            assert!(pair[1] - pair[0] < Duration::from_millis(80));
        }
    }
}
