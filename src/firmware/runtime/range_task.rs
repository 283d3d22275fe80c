use core::ops::ControlFlow;

use sonar_link::{
    config::RangingConfig,
    ranging::{RangeSampler, SampleStatus},
    telemetry,
};

use super::super::{
    config::ECHO_CAPTURE,
    platform::{BusyDelay, TriggerPin},
};

#[embassy_executor::task]
pub(crate) async fn range_task(trigger: TriggerPin, config: RangingConfig) {
    let mut sampler = RangeSampler::new(trigger, BusyDelay::new(), &ECHO_CAPTURE, config);
    let config = sampler.config();
    log::info!(
        "range: start period_ms={} echo_timeout_ms={} trigger_pulse_us={}",
        config.period_ms,
        config.echo_timeout_ms,
        config.trigger_pulse_us
    );

    sampler
        .run(|sample| {
            telemetry::record_sample(&sample);
            match sample.status {
                SampleStatus::Valid => log::info!(
                    "range: distance_cm={:.2} elapsed_us={}",
                    sample.distance_cm,
                    sample.elapsed_us
                ),
                SampleStatus::NonPhysical => {
                    log::warn!("range: non_physical elapsed_us={}", sample.elapsed_us)
                }
                SampleStatus::NoEcho => {
                    log::warn!("range: no_echo timeout_ms={}", config.echo_timeout_ms)
                }
            }
            ControlFlow::Continue(())
        })
        .await;
}
