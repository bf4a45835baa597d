//! [`Watcher`]: owns the cooldown state and runs fetch → filter → dispatch.

use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use slotwatch_core::Clock;
use slotwatch_fetch::{AvailabilityFetcher, AvailabilityQuery};
use slotwatch_filter::{Classification, FilterState, NotificationFilter, COOLDOWN_MS};
use slotwatch_notify::{DispatchResult, Dispatcher};

use crate::schedule::CronTicker;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickReport {
    /// The fetch failed; nothing was filtered or sent.
    FetchFailed { kind: &'static str },
    /// The batch went through the filter.
    Filtered {
        centers: usize,
        classification: Classification,
        /// Records handed to the dispatcher.
        dispatched: usize,
    },
}

/// Polls one district and notifies one channel.
///
/// `FilterState` is only touched from `run_tick`, which takes `&mut self`,
/// so no locking is needed. Dispatches run on spawned tasks that never see
/// the state.
pub struct Watcher {
    district_id: String,
    fetcher: Arc<dyn AvailabilityFetcher>,
    filter: NotificationFilter,
    state: FilterState,
    dispatcher: Arc<Dispatcher>,
    clock: Arc<dyn Clock>,
    prune_state: bool,
    in_flight: JoinSet<Vec<DispatchResult>>,
}

impl Watcher {
    pub fn new(
        district_id: impl Into<String>,
        fetcher: Arc<dyn AvailabilityFetcher>,
        dispatcher: Arc<Dispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            district_id: district_id.into(),
            fetcher,
            filter: NotificationFilter::new(),
            state: FilterState::new(),
            dispatcher,
            clock,
            prune_state: false,
            in_flight: JoinSet::new(),
        }
    }

    /// Drop expired cooldown entries after every tick.
    pub fn with_pruning(mut self, prune_state: bool) -> Self {
        self.prune_state = prune_state;
        self
    }

    /// Read-only view of the cooldown state.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Run a single fetch → filter → dispatch pass.
    ///
    /// Never fails: fetch errors are logged and reported. Dispatch is
    /// spawned, so this returns once the state has been updated, without
    /// waiting for messages to go out.
    pub async fn run_tick(&mut self) -> TickReport {
        self.reap_finished();

        let query = AvailabilityQuery::new(self.district_id.clone(), self.clock.today());

        let response = match self.fetcher.fetch(&query).await {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    district_id = %query.district_id,
                    date = %query.date_param(),
                    kind = e.kind(),
                    error = %e,
                    "Error while fetching availability; skipping tick"
                );
                return TickReport::FetchFailed { kind: e.kind() };
            }
        };

        let now = self.clock.now_millis();
        let outcome = self.filter.apply(&response.centers, &mut self.state, now);

        if self.prune_state {
            let pruned = self.state.prune_expired(now, COOLDOWN_MS);
            if pruned > 0 {
                debug!(pruned, remaining = self.state.len(), "pruned expired cooldown entries");
            }
        }

        let dispatched = outcome.records.len();
        if dispatched > 0 {
            info!(
                approved = dispatched,
                tracked_topics = self.state.len(),
                channel = self.dispatcher.channel_name(),
                "Dispatching slot availability"
            );
            let dispatcher = self.dispatcher.clone();
            let records = outcome.records;
            self.in_flight
                .spawn(async move { dispatcher.dispatch_all(&records).await });
        }

        TickReport::Filtered {
            centers: response.centers.len(),
            classification: outcome.classification,
            dispatched,
        }
    }

    /// Wait for every in-flight dispatch and return their results.
    pub async fn drain(&mut self) -> Vec<DispatchResult> {
        let mut results = Vec::new();
        while let Some(joined) = self.in_flight.join_next().await {
            match joined {
                Ok(batch) => results.extend(batch),
                Err(e) => error!(error = %e, "dispatch task panicked"),
            }
        }
        log_batch(&results);
        results
    }

    /// Collect dispatch tasks that already finished, without waiting.
    fn reap_finished(&mut self) {
        while let Some(joined) = self.in_flight.try_join_next() {
            match joined {
                Ok(batch) => log_batch(&batch),
                Err(e) => error!(error = %e, "dispatch task panicked"),
            }
        }
    }

    /// Tick on every fire time of `ticker` until `shutdown` is notified.
    ///
    /// Ticks never overlap: the next fire time is computed after the
    /// current tick's fetch and filter have finished.
    pub async fn run(&mut self, ticker: &CronTicker, shutdown: Arc<Notify>) {
        info!(cron = %ticker.expression(), district_id = %self.district_id, "Watcher started");

        loop {
            let Some(wait) = ticker.until_next(&chrono::Local::now()) else {
                warn!(cron = %ticker.expression(), "schedule has no upcoming fire times");
                break;
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    let report = self.run_tick().await;
                    debug!(?report, "tick complete");
                }
                _ = shutdown.notified() => {
                    info!("Watcher shutting down");
                    break;
                }
            }
        }

        let pending = self.in_flight.len();
        if pending > 0 {
            info!(pending, "waiting for in-flight notifications");
        }
        self.drain().await;
        info!("Watcher stopped");
    }
}

fn log_batch(results: &[DispatchResult]) {
    if results.is_empty() {
        return;
    }
    let failed = results.iter().filter(|r| !r.success).count();
    if failed > 0 {
        warn!(sent = results.len() - failed, failed, "notification batch finished with failures");
    } else {
        debug!(sent = results.len(), "notification batch finished");
    }
}
