use getset::CopyGetters;
use std::time::Duration;

#[derive(Debug, CopyGetters, PartialEq, Eq)]
pub struct Options {
    /// Re-observe an unchanged snapshot after this long.
    #[getset(get_copy = "pub")]
    auto_cycle_duration: Duration,

    #[getset(get_copy = "pub")]
    sync_retry_duration: Duration,

    #[getset(get_copy = "pub")]
    watch_restart_duration: Duration,

    #[getset(get_copy = "pub")]
    event_queue_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            auto_cycle_duration: Duration::from_secs(60),
            sync_retry_duration: Duration::from_secs(15),
            watch_restart_duration: Duration::from_secs(5),
            event_queue_capacity: 256,
        }
    }
}
