//! Background idle-eviction timer.
//!
//! Each tick locks the host briefly and evicts tools idle past the manager's
//! timeout. In-flight calls are never cancelled; a sweep waits for the host
//! lock like any other mutation.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::ToolHost;

/// EvictionService runs the idle sweep on a fixed interval.
#[derive(Debug)]
pub struct EvictionService {
    host: Arc<Mutex<ToolHost>>,
    sweep_interval: Duration,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl EvictionService {
    pub fn new(host: Arc<Mutex<ToolHost>>, sweep_interval: Duration) -> Self {
        Self {
            host,
            sweep_interval,
            stop_tx: None,
        }
    }

    /// Start the sweep loop in the background.
    /// Returns immediately; the first sweep happens one interval from now.
    pub fn start(&mut self) -> tokio::task::JoinHandle<()> {
        let host = self.host.clone();
        let period = self.sweep_interval;
        let (stop_tx, mut stop_rx) = oneshot::channel();
        self.stop_tx = Some(stop_tx);

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let report = host.lock().await.evict_idle();
                        tracing::debug!(
                            "eviction_sweep_completed: evicted={} at={}",
                            report.evicted.len(),
                            report.swept_at
                        );
                    }
                    _ = &mut stop_rx => {
                        tracing::info!("eviction_service_stopped");
                        break;
                    }
                }
            }
        })
    }

    /// Stop the sweep loop.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}
