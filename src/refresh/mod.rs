//! The view-refresh engine
//!
//! Two independent polling loops keep the dashboard approximately fresh: the
//! market loop re-fetches every watched epic's snapshot on one cadence, the
//! trade loop swaps the trade panel wholesale on another. The loops never
//! coordinate. Per-epic fetches run as independent tasks, so completions can
//! land out of tick order; a failed fetch leaves the previous card content in
//! place until a later tick succeeds. Card ordering is recomputed on every
//! market tick whether or not any fetch has completed, so it can act on
//! stale cards.
//!
//! At most one fetch is in flight per tracked resource: a new tick aborts a
//! still-pending request for the same epic (or the trade panel) and issues a
//! fresh one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::RwLock;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::client::{DashClient, MarketSnapshot};

pub mod sort;

pub use sort::{compare_keys, sort_by_key};

/// In-flight key for the trade panel; epics are dot-segmented uppercase, so
/// this cannot collide with one.
const TRADES_RESOURCE: &str = "trades";

/// Shared handle to the dashboard state.
pub type SharedDashState = Arc<RwLock<DashState>>;

/// One market card slot, keyed by epic. The slot itself is the only identity
/// that persists across ticks; its snapshot is replaced wholesale.
#[derive(Debug, Clone)]
pub struct CardState {
    pub epic: String,
    pub snapshot: Option<MarketSnapshot>,
    pub updated_at: Option<Instant>,
}

impl CardState {
    fn new(epic: String) -> Self {
        Self {
            epic,
            snapshot: None,
            updated_at: None,
        }
    }

    /// Numeric key the cards are ordered by. NaN until the first snapshot
    /// lands, which the loose comparator treats as "stay in place".
    pub fn sort_key(&self) -> f64 {
        self.snapshot
            .as_ref()
            .map(|s| s.prediction.score)
            .unwrap_or(f64::NAN)
    }
}

/// Everything the dashboard renders, owned behind one lock.
#[derive(Debug, Default)]
pub struct DashState {
    cards: HashMap<String, CardState>,
    order: Vec<String>,
    trades_panel: Option<String>,
    trades_updated_at: Option<Instant>,
}

impl DashState {
    pub fn new(epics: &[String]) -> Self {
        let cards = epics
            .iter()
            .map(|epic| (epic.clone(), CardState::new(epic.clone())))
            .collect();
        Self {
            cards,
            order: epics.to_vec(),
            trades_panel: None,
            trades_updated_at: None,
        }
    }

    /// Replace the card content for the snapshot's epic. Snapshots for
    /// untracked epics are dropped.
    pub fn apply_snapshot(&mut self, snapshot: MarketSnapshot) {
        match self.cards.get_mut(&snapshot.epic) {
            Some(card) => {
                card.updated_at = Some(Instant::now());
                card.snapshot = Some(snapshot);
            }
            None => debug!(epic = %snapshot.epic, "snapshot for untracked epic dropped"),
        }
    }

    /// Swap the trade panel content wholesale.
    pub fn apply_trades(&mut self, panel: String) {
        self.trades_panel = Some(panel);
        self.trades_updated_at = Some(Instant::now());
    }

    /// Recompute the display order: ascending by sort key under the loose
    /// comparator. Runs on every market tick, even over stale cards.
    pub fn recompute_order(&mut self) {
        let mut ordered: Vec<&CardState> = self
            .order
            .iter()
            .filter_map(|epic| self.cards.get(epic))
            .collect();
        sort_by_key(&mut ordered, |card| card.sort_key());
        self.order = ordered.iter().map(|card| card.epic.clone()).collect();
    }

    /// Cards in display order.
    pub fn cards_in_order(&self) -> Vec<CardState> {
        self.order
            .iter()
            .filter_map(|epic| self.cards.get(epic))
            .cloned()
            .collect()
    }

    pub fn card(&self, epic: &str) -> Option<&CardState> {
        self.cards.get(epic)
    }

    pub fn trades_panel(&self) -> Option<&str> {
        self.trades_panel.as_deref()
    }

    pub fn trades_updated_at(&self) -> Option<Instant> {
        self.trades_updated_at
    }
}

/// Owns the polling loops and the shared state they write into.
pub struct ViewRefresher {
    client: DashClient,
    state: SharedDashState,
    epics: Vec<String>,
    market_interval: Duration,
    trade_interval: Duration,
    in_flight: Arc<DashMap<String, AbortHandle>>,
}

impl ViewRefresher {
    pub fn new(
        client: DashClient,
        epics: Vec<String>,
        market_interval: Duration,
        trade_interval: Duration,
    ) -> Self {
        let state = Arc::new(RwLock::new(DashState::new(&epics)));
        Self {
            client,
            state,
            epics,
            market_interval,
            trade_interval,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    pub fn state(&self) -> SharedDashState {
        Arc::clone(&self.state)
    }

    /// Start both loops. The market loop only runs when there are epics to
    /// watch; the trade loop always does.
    pub fn spawn(self) -> RefresherHandle {
        let mut tasks = Vec::new();

        if self.epics.is_empty() {
            info!("no epics to watch; market refresh disabled");
        } else {
            info!(
                epics = self.epics.len(),
                interval_ms = self.market_interval.as_millis() as u64,
                "starting market refresh loop"
            );
            tasks.push(tokio::spawn(market_loop(
                self.client.clone(),
                Arc::clone(&self.state),
                self.epics.clone(),
                self.market_interval,
                Arc::clone(&self.in_flight),
            )));
        }

        info!(
            interval_ms = self.trade_interval.as_millis() as u64,
            "starting trade refresh loop"
        );
        tasks.push(tokio::spawn(trade_loop(
            self.client,
            Arc::clone(&self.state),
            self.trade_interval,
            Arc::clone(&self.in_flight),
        )));

        RefresherHandle {
            state: self.state,
            in_flight: self.in_flight,
            tasks,
        }
    }
}

/// Handle to the running loops; aborts everything on shutdown.
pub struct RefresherHandle {
    state: SharedDashState,
    in_flight: Arc<DashMap<String, AbortHandle>>,
    tasks: Vec<JoinHandle<()>>,
}

impl RefresherHandle {
    pub fn state(&self) -> SharedDashState {
        Arc::clone(&self.state)
    }

    /// Number of fetches currently in flight (at most one per resource).
    pub fn in_flight_len(&self) -> usize {
        self.in_flight
            .iter()
            .filter(|entry| !entry.value().is_finished())
            .count()
    }

    pub fn shutdown(&self) {
        for task in &self.tasks {
            task.abort();
        }
        for entry in self.in_flight.iter() {
            entry.value().abort();
        }
    }
}

async fn market_loop(
    client: DashClient,
    state: SharedDashState,
    epics: Vec<String>,
    interval: Duration,
    in_flight: Arc<DashMap<String, AbortHandle>>,
) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        for epic in &epics {
            spawn_fetch(epic.clone(), &in_flight, {
                let client = client.clone();
                let state = Arc::clone(&state);
                let epic = epic.clone();
                async move {
                    match client.fetch_market(&epic).await {
                        Ok(snapshot) => state.write().await.apply_snapshot(snapshot),
                        Err(err) => {
                            debug!(%epic, error = %err, "market refresh failed; card stays stale")
                        }
                    }
                }
            });
        }

        // re-sort runs every tick, independent of fetch completions
        state.write().await.recompute_order();
    }
}

async fn trade_loop(
    client: DashClient,
    state: SharedDashState,
    interval: Duration,
    in_flight: Arc<DashMap<String, AbortHandle>>,
) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        spawn_fetch(TRADES_RESOURCE.to_string(), &in_flight, {
            let client = client.clone();
            let state = Arc::clone(&state);
            async move {
                match client.fetch_trades().await {
                    Ok(panel) => state.write().await.apply_trades(panel),
                    Err(err) => debug!(error = %err, "trade refresh failed; panel stays stale"),
                }
            }
        });
    }
}

/// Spawn one fetch task for a resource, superseding a still-pending previous
/// fetch for the same resource.
fn spawn_fetch<F>(resource: String, in_flight: &DashMap<String, AbortHandle>, fetch: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let handle = tokio::spawn(fetch).abort_handle();

    if let Some(previous) = in_flight.insert(resource.clone(), handle) {
        if !previous.is_finished() {
            debug!(%resource, "superseding in-flight refresh");
            previous.abort();
        }
    }
}
