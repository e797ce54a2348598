//! Background feed polling on the tokio runtime

use crate::{core::map::MapView, data::feed::FeedSource};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{sync::watch, task::JoinHandle};

type Notify = Arc<dyn Fn() + Send + Sync>;

/// Fetches a feed into a shared [`MapView`], once or on a fixed interval.
///
/// The fetch runs without holding the map lock, so a front-end can keep
/// drawing while a request is in flight. A failed refresh leaves the
/// previous markers in place and only updates the status. Dropping the
/// refresher stops periodic polling.
pub struct FeedRefresher {
    handle: JoinHandle<()>,
    stop: watch::Sender<bool>,
}

impl FeedRefresher {
    /// Must be called from within a tokio runtime
    pub fn spawn(
        map: Arc<Mutex<MapView>>,
        source: Arc<dyn FeedSource>,
        interval: Option<Duration>,
    ) -> Self {
        Self::spawn_with_notify(map, source, interval, None)
    }

    /// Like [`FeedRefresher::spawn`], calling `notify` after every update
    /// (e.g. to request a repaint).
    pub fn spawn_with_notify(
        map: Arc<Mutex<MapView>>,
        source: Arc<dyn FeedSource>,
        interval: Option<Duration>,
        notify: Option<Notify>,
    ) -> Self {
        let (stop, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut first = true;
            loop {
                let result = source.fetch().await;

                {
                    let mut map = match map.lock() {
                        Ok(map) => map,
                        Err(_) => {
                            log::error!("map lock poisoned, stopping feed refresher");
                            return;
                        }
                    };
                    // Only the initial load clears markers on failure
                    if let Ok(report) = map.apply_feed_result(result, !first) {
                        log::info!(
                            "{}: {} markers, {} skipped",
                            source.describe(),
                            report.rendered,
                            report.skipped.len()
                        );
                    }
                }
                first = false;

                if let Some(notify) = &notify {
                    notify();
                }

                let Some(period) = interval else {
                    return;
                };
                tokio::select! {
                    _ = tokio::time::sleep(period) => {}
                    _ = stopped.changed() => {
                        log::debug!("feed refresher stopped");
                        return;
                    }
                }
            }
        });

        Self { handle, stop }
    }

    /// Stops polling after the current fetch, if any
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task to exit
    pub async fn join(self) {
        let Self { handle, stop } = self;
        if let Err(err) = handle.await {
            log::error!("feed refresher task failed: {}", err);
        }
        drop(stop);
    }
}
