mod instrumentation;

use crate::sync::signal::instrumentation::{record_set_applied, record_set_skipped};
use atomic_refcell::AtomicRefCell;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError as BroadcastRecvError;
use tokio::sync::broadcast::{Receiver as BroadcastReceiver, Sender as BroadcastSender, channel};
use tokio::sync::RwLock;
use tracing::trace;

#[derive(Debug, Error)]
#[error("Signal sender dropped")]
pub struct RecvError;

/// A named, change-notifying cell. Receivers are woken only when the value actually changes.
pub fn signal<T: PartialEq>(name: &'static str) -> (Sender<T>, Receiver<T>) {
    let data = Arc::new(RwLock::new(None));
    let (tx, rx) = channel(16);
    (
        Sender {
            name,
            data: data.clone(),
            tx,
        },
        Receiver {
            name,
            rx: AtomicRefCell::new(rx),
            data,
        },
    )
}

#[derive(Clone, Debug)]
pub struct Sender<T: PartialEq> {
    name: &'static str,
    data: Arc<RwLock<Option<T>>>,
    tx: BroadcastSender<()>,
}

impl<T: PartialEq> Sender<T> {
    pub async fn set(&self, value: T) {
        let changed = self.data.read().await.as_ref() != Some(&value);

        if changed {
            record_set_applied(self.name);
            self.data.write().await.replace(value);
            let _ = self.tx.send(());
        } else {
            record_set_skipped(self.name);
        }
    }
}

#[derive(Debug)]
pub struct Receiver<T: PartialEq> {
    name: &'static str,
    rx: AtomicRefCell<BroadcastReceiver<()>>,
    data: Arc<RwLock<Option<T>>>,
}

impl<T: PartialEq> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        Receiver {
            name: self.name,
            rx: AtomicRefCell::new(self.rx.borrow().resubscribe()),
            data: self.data.clone(),
        }
    }
}

impl<T: PartialEq> Receiver<T> {
    pub async fn cloned(&self) -> Option<T>
    where
        T: Clone,
    {
        self.data.read().await.clone()
    }

    /// Waits for the next change. Missed notifications collapse into one wake up.
    pub async fn changed(&self) -> Result<(), RecvError> {
        match self.rx.borrow_mut().recv().await {
            Ok(()) | Err(BroadcastRecvError::Lagged(_)) => Ok(()),
            Err(BroadcastRecvError::Closed) => {
                trace!("Sender dropped: signal.name={}", self.name);
                Err(RecvError)
            }
        }
    }
}
