mod observed_config;

pub use observed_config::{SyncObservedConfigParams, sync_observed_config};
