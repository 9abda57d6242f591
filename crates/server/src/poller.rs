//! Feed polling loop.
//!
//! Each cycle fetches the feed, then walks its items in feed order: already
//! recorded ids are skipped, new ones are evaluated against the active rule
//! chain, recorded, and handed to the dispatcher when they match. Delivery
//! runs in spawned tasks and is never awaited by the loop. Between cycles the
//! loop sleeps for the configured interval and applies config reloads as
//! they arrive.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use feedhook_core::Item;
use feedhook_ingest::{FeedSource, HttpFeedSource, IngestError};
use feedhook_notify::{DispatchResult, Dispatcher};
use feedhook_rules::{ActiveConfig, RuleSet};
use feedhook_storage::{SeenStore, StoreError};

use crate::logging::LogControl;
use crate::sinks::build_dispatcher;

/// What happened to one feed item.
#[derive(Debug)]
pub enum ItemStatus {
    /// Recorded by an earlier cycle (or earlier in this one).
    Seen,
    /// Evaluated and recorded, no rule matched.
    NoMatch,
    /// Evaluated, recorded and dispatched. One handle per channel.
    Matched(Vec<JoinHandle<DispatchResult>>),
}

/// Summary of one poll cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub fetched: usize,
    pub new: usize,
    pub matched: usize,
    /// Deliveries started during the cycle. Dropping them does not cancel delivery.
    pub deliveries: Vec<JoinHandle<DispatchResult>>,
}

/// Process a single item: dedup check, evaluate, record, dispatch on match.
///
/// Store errors abort the item before anything is dispatched, so an item that
/// could not be recorded is retried on the next cycle.
pub async fn process_item(
    item: Item,
    rules: &RuleSet,
    store: &dyn SeenStore,
    dispatcher: &Dispatcher,
) -> Result<ItemStatus, StoreError> {
    if store.seen(&item.id).await? {
        debug!(item_id = %item.id, "entry already seen");
        return Ok(ItemStatus::Seen);
    }

    debug!(item_id = %item.id, title = %item.title, "processing entry");
    let outcome = rules.evaluate(&item);
    store.record(&item, &outcome).await?;

    if !outcome.is_match() {
        debug!(item_id = %item.id, "no match");
        return Ok(ItemStatus::NoMatch);
    }

    info!(
        item_id = %item.id,
        rules = outcome.matched.len(),
        groups = outcome.groups.len(),
        "entry matched"
    );
    Ok(ItemStatus::Matched(dispatcher.dispatch(item, outcome)))
}

/// Fetch once and process every item in feed order.
///
/// A fetch failure is returned as-is and nothing is processed. Per-item store
/// errors are logged and the item is skipped.
pub async fn run_cycle(
    source: &dyn FeedSource,
    rules: &RuleSet,
    store: &dyn SeenStore,
    dispatcher: &Dispatcher,
) -> Result<CycleReport, IngestError> {
    let items = source.fetch().await?;
    let mut report = CycleReport {
        fetched: items.len(),
        ..Default::default()
    };

    for item in items {
        let item_id = item.id.clone();
        match process_item(item, rules, store, dispatcher).await {
            Ok(ItemStatus::Seen) => {}
            Ok(ItemStatus::NoMatch) => report.new += 1,
            Ok(ItemStatus::Matched(handles)) => {
                report.new += 1;
                report.matched += 1;
                report.deliveries.extend(handles);
            }
            Err(e) => warn!(item_id = %item_id, error = %e, "dedup store error, entry skipped"),
        }
    }

    Ok(report)
}

/// Owns everything one polling loop needs and swaps it on config reload.
pub struct Poller {
    source: Arc<dyn FeedSource>,
    store: Arc<dyn SeenStore>,
    active: Arc<ActiveConfig>,
    dispatcher: Dispatcher,
    log: LogControl,
}

impl Poller {
    pub fn new(
        source: Arc<dyn FeedSource>,
        store: Arc<dyn SeenStore>,
        active: Arc<ActiveConfig>,
        dispatcher: Dispatcher,
        log: LogControl,
    ) -> Self {
        Self {
            source,
            store,
            active,
            dispatcher,
            log,
        }
    }

    /// Run one cycle against the current snapshot. Fetch failures are logged
    /// and yield `None`.
    pub async fn poll_once(&self) -> Option<CycleReport> {
        let result = run_cycle(
            self.source.as_ref(),
            &self.active.rules,
            self.store.as_ref(),
            &self.dispatcher,
        )
        .await;

        match result {
            Ok(report) => {
                debug!(
                    fetched = report.fetched,
                    new = report.new,
                    matched = report.matched,
                    "poll cycle complete"
                );
                Some(report)
            }
            Err(e) => {
                warn!(error = %e, "feed fetch failed, skipping cycle");
                None
            }
        }
    }

    /// Install a reloaded snapshot.
    ///
    /// Rules always switch. Sinks and the feed source are rebuilt from the new
    /// config; if that fails the previous ones stay in use.
    pub fn apply(&mut self, next: Arc<ActiveConfig>) {
        match build_dispatcher(&next.config.sinks()) {
            Ok(dispatcher) => self.dispatcher = dispatcher,
            Err(e) => warn!(error = %e, "invalid sinks in reloaded config, keeping previous sinks"),
        }

        let (old, new) = (&self.active.config.http, &next.config.http);
        if old.rss_url != new.rss_url || old.user_agent() != new.user_agent() {
            match HttpFeedSource::new(new.rss_url.clone(), &new.user_agent()) {
                Ok(source) => {
                    info!(url = %new.rss_url, "feed source changed");
                    self.source = Arc::new(source);
                }
                Err(e) => warn!(error = %e, "failed to rebuild feed source, keeping previous"),
            }
        }

        if self.active.config.database.path() != next.config.database.path() {
            warn!(
                path = next.config.database.path(),
                "database path change takes effect after restart"
            );
        }

        self.log.apply(next.config.log_filter());
        info!(
            rules = next.rules.len(),
            sinks = self.dispatcher.len(),
            "applied reloaded config"
        );
        self.active = next;
    }

    /// Poll forever, sleeping the configured interval between cycles.
    pub async fn run(mut self, mut changes: watch::Receiver<Arc<ActiveConfig>>) {
        info!(
            url = %self.active.config.http.rss_url,
            interval_ms = self.active.config.http.polling_interval().as_millis() as u64,
            "poller started"
        );

        loop {
            self.poll_once().await;

            let sleep = tokio::time::sleep(self.active.config.http.polling_interval());
            tokio::pin!(sleep);
            loop {
                tokio::select! {
                    _ = &mut sleep => break,
                    changed = changes.changed() => match changed {
                        Ok(()) => {
                            let next = Arc::clone(&changes.borrow_and_update());
                            self.apply(next);
                        }
                        Err(_) => {
                            // Loader gone: no more reloads, just finish the sleep.
                            (&mut sleep).await;
                            break;
                        }
                    },
                }
            }
        }
    }
}
