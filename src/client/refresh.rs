//! Periodic refresh of the order listing
//!
//! The task polls `GET /orders` on a fixed period and publishes each snapshot
//! on a `watch` channel. It can be paused (e.g. while the view is hidden),
//! and it stops when cancelled or dropped.

use super::RepairClient;
use crate::core::order::RepairOrder;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Poll period of the shop UI
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(10);

pub struct AutoRefresh {
    cancel: CancellationToken,
    paused: Arc<AtomicBool>,
    wake: Arc<Notify>,
    snapshots: watch::Receiver<Option<Vec<RepairOrder>>>,
    handle: Option<JoinHandle<()>>,
}

impl AutoRefresh {
    /// Start polling; the first fetch happens immediately
    pub fn start(client: RepairClient, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let paused = Arc::new(AtomicBool::new(false));
        let wake = Arc::new(Notify::new());
        let (tx, rx) = watch::channel(None);

        let handle = tokio::spawn(run(
            client,
            period,
            cancel.clone(),
            paused.clone(),
            wake.clone(),
            tx,
        ));

        Self {
            cancel,
            paused,
            wake,
            snapshots: rx,
            handle: Some(handle),
        }
    }

    /// Receiver of listing snapshots; `None` until the first successful fetch
    pub fn subscribe(&self) -> watch::Receiver<Option<Vec<RepairOrder>>> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> Option<Vec<RepairOrder>> {
        self.snapshots.borrow().clone()
    }

    /// Skip ticks until [`resume`](Self::resume)
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Resume polling and fetch right away
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.wake.notify_one();
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Fetch now without waiting for the next tick
    pub fn refresh_now(&self) {
        self.wake.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the task and wait for it to finish
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            tracing::warn!(error = %e, "auto refresh task failed");
        }
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    client: RepairClient,
    period: Duration,
    cancel: CancellationToken,
    paused: Arc<AtomicBool>,
    wake: Arc<Notify>,
    tx: watch::Sender<Option<Vec<RepairOrder>>>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if paused.load(Ordering::SeqCst) {
                    continue;
                }
            }
            _ = wake.notified() => {}
        }

        match client.list_orders().await {
            Ok(orders) => {
                tx.send_replace(Some(orders));
            }
            Err(e) => tracing::warn!(error = %e, "auto refresh failed"),
        }
    }

    tracing::debug!("auto refresh stopped");
}
