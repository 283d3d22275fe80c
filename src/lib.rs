#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod net;
pub mod platform;
pub mod ranging;
pub mod telemetry;
