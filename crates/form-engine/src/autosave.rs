use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use crate::draft::{Draft, DraftSlot};

const MIN_PERIOD: Duration = Duration::from_millis(10);

/// Periodic draft writer scoped to a session.
///
/// Writes only when a new snapshot has been published since the last tick.
/// Dropping the handle cancels the task; the task also stops once the
/// session's snapshot sender is gone.
pub struct Autosave {
    cancel: DropGuard,
    handle: JoinHandle<()>,
}

impl Autosave {
    pub fn spawn(
        slot: Arc<DraftSlot>,
        snapshots: watch::Receiver<Option<Draft>>,
        period: Duration,
    ) -> Self {
        let token = CancellationToken::new();
        let handle = tokio::spawn(run(slot, snapshots, period.max(MIN_PERIOD), token.clone()));
        Self {
            cancel: token.drop_guard(),
            handle,
        }
    }

    /// Cancels the task and waits for an in-progress write to finish.
    pub async fn shutdown(self) {
        let Autosave { cancel, handle } = self;
        drop(cancel);
        if let Err(err) = handle.await {
            warn!(error = %err, "autosave task ended abnormally");
        }
    }
}

async fn run(
    slot: Arc<DraftSlot>,
    mut snapshots: watch::Receiver<Option<Draft>>,
    period: Duration,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                match snapshots.has_changed() {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(_) => break,
                }
                match slot.save_latest(&mut snapshots).await {
                    Ok(true) => debug!("draft autosaved"),
                    Ok(false) => {}
                    Err(err) => warn!(error = %err, "draft autosave failed"),
                }
            }
        }
    }
    debug!("autosave stopped");
}
