pub mod expiry;
pub mod monitor;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a spawned background job. Dropping it leaves the job running;
/// call [`JobHandle::shutdown`] for an orderly stop.
pub struct JobHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl JobHandle {
    pub fn new(shutdown: watch::Sender<bool>, handle: JoinHandle<()>) -> Self {
        Self { shutdown, handle }
    }

    /// Signal the job loop to stop and wait for it to wind down.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
