//! Periodic sweep that returns capacity held by overdue reservations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::ExpiryConfig;
use crate::services::ReservationEngine;
use crate::store::InventoryStore;

pub struct ExpiryScheduler<S: InventoryStore> {
    engine: Arc<ReservationEngine<S>>,
    interval: Duration,
    batch_size: i64,
}

impl<S: InventoryStore> ExpiryScheduler<S> {
    pub fn new(engine: Arc<ReservationEngine<S>>, config: &ExpiryConfig) -> Self {
        Self {
            engine,
            interval: config.interval,
            batch_size: config.batch_size,
        }
    }

    /// One sweep. Failures are logged and swallowed; the next tick retries.
    pub async fn run_once(&self) -> usize {
        match self.engine.batch_expire_reservations(self.batch_size).await {
            Ok(0) => 0,
            Ok(expired) => {
                info!(expired, "Expiry sweep released reservations");
                expired
            }
            Err(e) => {
                error!(error = %e, "Expiry sweep failed");
                0
            }
        }
    }

    /// Starts the sweep loop. The first run happens immediately.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        info!(
            interval_secs = self.interval.as_secs_f64(),
            batch_size = self.batch_size,
            "Starting expiry scheduler"
        );

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        self.run_once().await;
                    }
                }
            }
            debug!("Expiry scheduler loop exited");
        });

        SchedulerHandle { shutdown_tx, task }
    }
}

pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signals the loop to stop and waits for an in-flight sweep, up to `grace`.
    pub async fn shutdown(self, grace: Duration) {
        let SchedulerHandle {
            shutdown_tx,
            mut task,
        } = self;
        let _ = shutdown_tx.send(true);

        match tokio::time::timeout(grace, &mut task).await {
            Ok(Ok(())) => info!("Expiry scheduler stopped"),
            Ok(Err(e)) => error!(error = %e, "Expiry scheduler task failed"),
            Err(_) => {
                warn!(
                    grace_secs = grace.as_secs_f64(),
                    "Expiry scheduler did not stop in time, aborting"
                );
                task.abort();
            }
        }
    }
}
