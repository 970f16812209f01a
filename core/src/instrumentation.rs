use opentelemetry::global::meter;
use opentelemetry::metrics::Meter;
use std::sync::{LazyLock, Once};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub static METER: LazyLock<Meter> = LazyLock::new(|| meter("netobserve"));

pub fn init_instrumentation() {
    INIT.call_once(|| {
        #[cfg(debug_assertions)]
        unsafe {
            backtrace_on_stack_overflow::enable();
        };

        // tokio-console takes over the subscriber when asked for
        if std::env::var("TOKIO_CONSOLE_BIND").is_ok() {
            console_subscriber::init();
        } else {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_target(false)
                .with_thread_ids(true)
                .with_level(true)
                .finish();

            #[allow(clippy::expect_used)]
            // Failing to install logging at startup should stop the process
            tracing::subscriber::set_global_default(subscriber)
                .expect("Failed to set tracing subscriber");
        }
    });
}
