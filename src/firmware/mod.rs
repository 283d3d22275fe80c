mod config;
mod echo_irq;
mod platform;
mod runtime;
mod wifi;

pub(crate) use runtime::run;
