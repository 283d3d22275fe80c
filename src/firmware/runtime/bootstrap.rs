use esp_hal::{
    gpio::{Input, InputConfig, Io, Level, Output, OutputConfig, Pull},
    timer::timg::TimerGroup,
};
use sonar_link::config::{compiled_wifi_credentials, RangingConfig, ECHO_GPIO, TRIGGER_GPIO};

use super::{
    super::{config::HEAP_SIZE, echo_irq, platform::TriggerPin, wifi},
    range_task::range_task,
};

pub(crate) fn run() -> ! {
    esp_println::logger::init_logger(log::LevelFilter::Info);
    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let trigger = Output::new(peripherals.GPIO14, Level::Low, OutputConfig::default());
    let echo = Input::new(
        peripherals.GPIO12,
        InputConfig::default().with_pull(Pull::Down),
    );
    let mut io = Io::new(peripherals.IO_MUX);
    echo_irq::install(&mut io, echo);
    log::info!(
        "boot: sonar pins trigger=GPIO{} echo=GPIO{}",
        TRIGGER_GPIO,
        ECHO_GPIO
    );

    let network = match compiled_wifi_credentials() {
        Some(credentials) => match wifi::setup(peripherals.WIFI, credentials) {
            Ok(runtime) => Some(runtime),
            Err(reason) => {
                esp_println::println!("boot: wifi setup failed reason={}", reason);
                halt_forever();
            }
        },
        None => {
            log::warn!("boot: no wifi credentials compiled in; ranging only");
            None
        }
    };

    let mut executor = esp_rtos::embassy::Executor::new();
    let executor = unsafe { make_static(&mut executor) };
    executor.run(move |spawner| {
        spawner.must_spawn(range_task(
            TriggerPin::new(trigger),
            RangingConfig::defaults(),
        ));
        if let Some(network) = network {
            spawner.must_spawn(wifi::net_task(network.net_runner));
            spawner.must_spawn(wifi::supervisor_task());
            spawner.must_spawn(wifi::retry_task());
            spawner.must_spawn(wifi::address_task(network.stack));
            spawner.must_spawn(wifi::link_task(network.controller));
        }
    });
}

unsafe fn make_static<T>(value: &mut T) -> &'static mut T {
    unsafe { core::mem::transmute(value) }
}

fn halt_forever() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
