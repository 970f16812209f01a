use netobserve_core::instrumentation::METER;
use opentelemetry::KeyValue;
use opentelemetry::metrics::Counter;
use std::sync::LazyLock;

static OBSERVATIONS: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("network_observations")
        .with_description("Number of network configuration observations")
        .build()
});

static EVENTS_DROPPED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("events_dropped")
        .with_description("Number of Kubernetes events dropped before publishing")
        .build()
});

pub fn record_observation(degraded: bool) {
    let outcome = if degraded { "degraded" } else { "ok" };
    OBSERVATIONS.add(1, &[KeyValue::new("outcome", outcome)]);
}

pub fn record_event_dropped(reason: &str) {
    EVENTS_DROPPED.add(1, &[KeyValue::new("reason", reason.to_string())]);
}
