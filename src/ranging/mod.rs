mod capture;
mod sampler;
mod types;

pub use capture::PulseCapture;
pub use sampler::{EchoSource, RangeSampler};
pub use types::{DistanceSample, EchoTiming, EdgeLevel, SampleStatus};
