//! On-target checks for the pieces that depend on the real timer and executor.
//! No sensor or access point needs to be attached.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(not(target_os = "none"))]
fn main() {}

#[cfg(all(test, target_os = "none"))]
#[embedded_test::tests(executor = esp_rtos::embassy::Executor::new())]
mod tests {
    use embassy_futures::join::join;
    use embassy_time::{Duration, Instant, Timer};
    use sonar_link::{
        net::{Conditions, EventBus},
        ranging::{EchoSource, EdgeLevel, PulseCapture},
    };

    static CAPTURE: PulseCapture = PulseCapture::new();
    static BUS: EventBus = EventBus::new();

    #[init]
    fn init() {
        let peripherals = esp_hal::init(esp_hal::Config::default());
        let timg0 = esp_hal::timer::timg::TimerGroup::new(peripherals.TIMG0);
        esp_rtos::start(timg0.timer0);
    }

    #[test]
    async fn echo_wait_times_out_without_edges() {
        CAPTURE.arm();
        let started = Instant::now();
        let echo = CAPTURE.wait_echo(Duration::from_millis(10)).await;
        let waited = started.elapsed();

        assert!(echo.is_none());
        assert!(waited >= Duration::from_millis(10));
        assert!(waited < Duration::from_millis(50));
    }

    #[test]
    async fn echo_wait_wakes_on_falling_edge() {
        CAPTURE.arm();
        let (echo, _) = join(CAPTURE.wait_echo(Duration::from_millis(100)), async {
            Timer::after(Duration::from_millis(2)).await;
            CAPTURE.on_edge(EdgeLevel::Rising, 1_000);
            CAPTURE.on_edge(EdgeLevel::Falling, 3_000);
        })
        .await;

        let echo = echo.expect("echo before timeout");
        assert_eq!(echo.elapsed_us(), 2_000);
    }

    #[test]
    async fn event_bus_wakes_waiter_under_executor() {
        BUS.clear(Conditions::CONNECTED | Conditions::ATTEMPT_FAILED);
        let (hit, _) = join(
            BUS.wait_any(Conditions::CONNECTED | Conditions::ATTEMPT_FAILED),
            async {
                Timer::after(Duration::from_millis(5)).await;
                BUS.set(Conditions::CONNECTED);
            },
        )
        .await;

        assert_eq!(hit, Conditions::CONNECTED);
    }
}
