//! Decorative progress indicator
//!
//! The bar does not reflect server progress. It advances on a timer while the
//! upload request is outstanding and stops at the configured cap until the
//! controller stops it and renders a terminal state.

use chrono::Utc;
use stemview_common::config::ProgressConfig;
use stemview_common::events::{EventBus, ViewEvent};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::view::SharedView;

/// Running ticker for one upload
///
/// `stop` consumes the ticker, so it runs at most once. Dropping a ticker
/// that was never stopped still cancels its task.
pub struct ProgressTicker {
    upload_id: Uuid,
    token: CancellationToken,
    percent_rx: watch::Receiver<u8>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    /// Spawn the tick task for `upload_id`
    pub fn start(
        config: ProgressConfig,
        upload_id: Uuid,
        view: SharedView,
        event_bus: EventBus,
    ) -> Self {
        let token = CancellationToken::new();
        let (percent_tx, percent_rx) = watch::channel(0u8);
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let period = config.tick();
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut percent: u8 = 0;

            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = ticks.tick() => {
                        percent = percent.saturating_add(config.step).min(config.cap);

                        // Checked under the write lock: a tick racing `stop`
                        // must not land after the terminal state
                        let mut page = view.write().await;
                        if task_token.is_cancelled() {
                            break;
                        }
                        if !page.set_progress(upload_id, percent) {
                            debug!(%upload_id, "Progress target no longer processing");
                            break;
                        }
                        drop(page);

                        let _ = percent_tx.send(percent);
                        event_bus.emit_lossy(ViewEvent::ProgressUpdated {
                            upload_id,
                            percent,
                            timestamp: Utc::now(),
                        });

                        if percent >= config.cap {
                            debug!(%upload_id, percent, "Progress reached cap");
                            break;
                        }
                    }
                }
            }
        });

        Self {
            upload_id,
            token,
            percent_rx,
            handle: Some(handle),
        }
    }

    pub fn upload_id(&self) -> Uuid {
        self.upload_id
    }

    /// Last percent published by the task
    pub fn percent(&self) -> u8 {
        *self.percent_rx.borrow()
    }

    /// Watch the published percent
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.percent_rx.clone()
    }

    /// Cancel the task and wait for it to finish
    ///
    /// Returns the last published percent. No tick is applied after this
    /// returns.
    pub async fn stop(mut self) -> u8 {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(upload_id = %self.upload_id, "Progress task ended abnormally: {}", e);
            }
        }
        self.percent()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
