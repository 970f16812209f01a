/// Spawns a task that mirrors every object of `$object_type` into a signal of
/// [`Objects`](crate::kubernetes::objects::Objects) snapshots.
///
/// A snapshot is published once the initial list completes and after every
/// change reported by the watch.
#[macro_export]
macro_rules! watch_objects {
    ($options:ident, $task_builder:ident, $object_type:ty, $kube_client_rx:ident) => {{
        #[allow(unused_imports)]
        use kube::runtime::watcher::Config;

        watch_objects!(
            $options,
            $task_builder,
            $object_type,
            $kube_client_rx,
            Config::default()
        )
    }};
    ($options:ident, $task_builder:ident, $object_type:ty, $kube_client_rx:ident, $config:expr) => {{
        use futures::StreamExt;
        use kube::Api;
        use kube::runtime::watcher::Event;
        use kube::runtime::{WatchStreamExt, reflector, watcher};
        use netobserve_core::continue_after;
        use netobserve_core::continue_on;
        use netobserve_core::sync::signal::signal;
        use std::sync::Arc;
        use tokio::select;
        use tokio::signal::ctrl_c;
        use tracing::{debug, info, warn};
        use $crate::kubernetes::objects::Objects;
        use $crate::options::Options;

        let options: Arc<Options> = $options.clone();
        let kube_client_rx = $kube_client_rx.clone();
        let config: watcher::Config = $config;
        let (tx, rx) = signal::<Objects<$object_type>>(stringify!($object_type));

        debug!(
            "Spawning controller for watching {} objects",
            stringify!($object_type)
        );

        $task_builder
            .new_task(concat!("watch_", stringify!($object_type)))
            .spawn(async move {
                loop {
                    if let Some(kube_client) = kube_client_rx.cloned().await {
                        let api = Api::<$object_type>::all(kube_client.into());
                        let (reader, writer) = reflector::store::<$object_type>();
                        let mut events = reflector(writer, watcher(api, config.clone()))
                            .default_backoff()
                            .boxed();

                        loop {
                            let event = select! {
                                event = events.next() => event,
                                _ = ctrl_c() => {
                                    debug!("Received Ctrl+C, stopping watch for {} objects", stringify!($object_type));
                                    return;
                                }
                            };

                            match event {
                                Some(Ok(Event::InitDone | Event::Apply(_) | Event::Delete(_))) => {
                                    let objects = reader
                                        .state()
                                        .into_iter()
                                        .collect::<Objects<$object_type>>();
                                    debug!(
                                        "Observed {} objects: count={}",
                                        stringify!($object_type),
                                        objects.size()
                                    );
                                    tx.set(objects).await;
                                }
                                Some(Ok(Event::Init | Event::InitApply(_))) => {}
                                Some(Err(e)) => {
                                    warn!("Watch for {} objects failed: {}", stringify!($object_type), e);
                                }
                                None => break,
                            }
                        }

                        info!("Watch for {} objects ended, restarting", stringify!($object_type));
                        continue_after!(options.watch_restart_duration(), kube_client_rx.changed());
                    } else {
                        continue_on!(kube_client_rx.changed());
                    }
                }
            });

        rx
    }};
}
