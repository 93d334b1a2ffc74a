//! Cooperative cancellation for pipeline runs.
//!
//! A [`StopHandle`] is held by whoever may ask a run to stop (the CLI's Ctrl-C handler, the
//! scheduler on shutdown); fetch loops poll the matching [`StopSignal`] at page boundaries.

use tokio::sync::watch;

/// Sending side of a stop request.
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

/// Receiving side of a stop request. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

/// Create a connected handle/signal pair.
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

impl StopHandle {
    /// Request a stop. Idempotent.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn signal(&self) -> StopSignal {
        StopSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl StopSignal {
    /// A signal that never fires, for scheduled runs.
    pub fn never() -> Self {
        stop_channel().1
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once a stop has been requested.
    ///
    /// Never resolves if the handle is dropped without stopping.
    pub async fn stopped(&mut self) {
        if self.rx.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
