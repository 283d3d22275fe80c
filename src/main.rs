#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware;

#[cfg(target_os = "none")]
use esp_backtrace as _;

#[cfg(target_os = "none")]
#[esp_hal::main]
fn main() -> ! {
    firmware::run()
}

#[cfg(not(target_os = "none"))]
fn main() {}
