mod event_bus;
mod retry;
mod supervisor;
mod types;

pub use event_bus::{Conditions, EventBus};
pub use retry::{run_retry_cycle, LinkControl, RetryReport};
pub use supervisor::{ConnectionSupervisor, SupervisorOutput};
pub use types::{
    disconnect_reason_label, ConnectionState, LinkEvent, RetryBudget, WifiCredentials,
    WIFI_PASSWORD_MAX, WIFI_SSID_MAX,
};
