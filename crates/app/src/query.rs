//! Geospatial Query Layer
//!
//! Fetches available postings for the map, applying the grace-period
//! visibility policy either in SQL or on the fetched rows. Every backend call
//! is recorded in the shared [`QueryMonitor`]. Failures never escape: callers
//! get an empty, `degraded` result instead.

use std::{
    fmt::Display,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use freight::{
    filters::PostingFilter,
    monitor::QueryMonitor,
    sequence::{LatestSlot, Rejected, Ticket},
    visibility::{EntityKind, GracePeriod, VisibilityMode, VisibilityPolicy},
};
use jiff::civil::Date;
use rustc_hash::FxHashMap;
use tracing::{debug, error, warn};

use crate::domain::{
    cargas::{CargasService, records::CargaRecord},
    profiles::records::UserUuid,
    settings::SettingsService,
    trucks::{TrucksService, records::TruckRecord},
};

/// Rows of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    /// Visible postings, newest first.
    pub rows: Vec<T>,

    /// The backend call failed; `rows` is empty.
    pub degraded: bool,

    /// Grace period the rows were filtered with.
    pub grace: GracePeriod,
}

impl<T> Default for Fetched<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            degraded: false,
            grace: GracePeriod::default(),
        }
    }
}

/// Monitored, visibility-aware access to the posting tables.
#[derive(Clone)]
pub struct PostingsQuery {
    cargas: Arc<dyn CargasService>,
    trucks: Arc<dyn TrucksService>,
    settings: Arc<dyn SettingsService>,
    monitor: Arc<QueryMonitor>,
    mode: VisibilityMode,
}

impl PostingsQuery {
    /// `mode` decides whether the visibility cutoff is bound into SQL or
    /// applied to the fetched rows.
    #[must_use]
    pub fn new(
        cargas: Arc<dyn CargasService>,
        trucks: Arc<dyn TrucksService>,
        settings: Arc<dyn SettingsService>,
        monitor: Arc<QueryMonitor>,
        mode: VisibilityMode,
    ) -> Self {
        Self {
            cargas,
            trucks,
            settings,
            monitor,
            mode,
        }
    }

    #[must_use]
    pub fn monitor(&self) -> &Arc<QueryMonitor> {
        &self.monitor
    }

    #[must_use]
    pub const fn mode(&self) -> VisibilityMode {
        self.mode
    }

    /// Visibility policy for `kind`, falling back to the default grace period
    /// when settings cannot be read.
    pub async fn policy(&self, kind: EntityKind) -> VisibilityPolicy {
        let timer = self.monitor.start("system_variables", kind.setting_key());

        let grace = timer
            .observe(self.settings.grace_period(kind).await)
            .unwrap_or_else(|error| {
                warn!(key = kind.setting_key(), %error, "using default grace period");

                GracePeriod::default()
            });

        VisibilityPolicy::new(grace)
    }

    /// Available cargas matching `filter` that are visible on `today`.
    pub async fn fetch_cargas(&self, filter: &PostingFilter, today: Date) -> Fetched<CargaRecord> {
        let policy = self.policy(EntityKind::Cargo).await;
        let cutoff = self.server_cutoff(&policy, today);

        let timer = self
            .monitor
            .start(EntityKind::Cargo.table(), "list_available");

        let result = timer.observe(
            self.cargas
                .list_available_cargas(filter.normalised(), cutoff)
                .await,
        );

        self.settle(EntityKind::Cargo, policy, today, result, |carga| {
            carga.available_until
        })
    }

    /// Available trucks matching `filter` that are visible on `today`.
    pub async fn fetch_trucks(&self, filter: &PostingFilter, today: Date) -> Fetched<TruckRecord> {
        let policy = self.policy(EntityKind::Truck).await;
        let cutoff = self.server_cutoff(&policy, today);

        let timer = self
            .monitor
            .start(EntityKind::Truck.table(), "list_available");

        let result = timer.observe(
            self.trucks
                .list_available_trucks(filter.normalised(), cutoff)
                .await,
        );

        self.settle(EntityKind::Truck, policy, today, result, |truck| {
            truck.availability.end_date()
        })
    }

    fn server_cutoff(&self, policy: &VisibilityPolicy, today: Date) -> Option<Date> {
        match self.mode {
            VisibilityMode::Server => Some(policy.cutoff(today)),
            VisibilityMode::Client => None,
        }
    }

    fn settle<T, E: Display>(
        &self,
        kind: EntityKind,
        policy: VisibilityPolicy,
        today: Date,
        result: Result<Vec<T>, E>,
        end_date: impl Fn(&T) -> Option<Date>,
    ) -> Fetched<T> {
        match result {
            Ok(mut rows) => {
                if self.mode == VisibilityMode::Client {
                    policy.retain(&mut rows, today, end_date);
                }

                Fetched {
                    rows,
                    degraded: false,
                    grace: policy.grace(),
                }
            }
            Err(error) => {
                error!(table = kind.table(), %error, "postings query failed");

                Fetched {
                    rows: Vec::new(),
                    degraded: true,
                    grace: policy.grace(),
                }
            }
        }
    }
}

/// Result of a feed refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedUpdate<T> {
    /// Ticket this refresh was issued.
    pub sequence: u64,

    /// A newer refresh was issued meanwhile; `current` was not replaced.
    pub stale: bool,

    /// The feed was closed; nothing is applied any more.
    pub closed: bool,

    /// What the feed holds after this refresh.
    pub current: Fetched<T>,
}

/// Map view state of one user, refreshed last-issued-wins.
#[derive(Debug, Default)]
pub struct MapFeed {
    cargas: LatestSlot<Fetched<CargaRecord>>,
    trucks: LatestSlot<Fetched<TruckRecord>>,
}

impl MapFeed {
    /// An empty feed with no tickets issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-fetch cargas and apply them unless a newer refresh was issued.
    pub async fn refresh_cargas(
        &self,
        query: &PostingsQuery,
        filter: &PostingFilter,
        today: Date,
    ) -> FeedUpdate<CargaRecord> {
        let ticket = self.cargas.issue();
        let fetched = query.fetch_cargas(filter, today).await;

        settle(&self.cargas, ticket, fetched)
    }

    /// Re-fetch trucks and apply them unless a newer refresh was issued.
    pub async fn refresh_trucks(
        &self,
        query: &PostingsQuery,
        filter: &PostingFilter,
        today: Date,
    ) -> FeedUpdate<TruckRecord> {
        let ticket = self.trucks.issue();
        let fetched = query.fetch_trucks(filter, today).await;

        settle(&self.trucks, ticket, fetched)
    }

    /// Stop applying refreshes.
    pub fn close(&self) {
        self.cargas.close();
        self.trucks.close();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.cargas.is_closed()
    }
}

fn settle<T: Clone>(slot: &LatestSlot<Fetched<T>>, ticket: Ticket, fetched: Fetched<T>) -> FeedUpdate<T> {
    let (stale, closed) = match slot.resolve(ticket, fetched) {
        Ok(()) => (false, false),
        Err(Rejected::Stale { .. }) => (true, false),
        Err(Rejected::Closed) => (false, true),
    };

    FeedUpdate {
        sequence: ticket.sequence(),
        stale,
        closed,
        current: slot.get(),
    }
}

/// Feeds untouched for this long are dropped.
pub const DEFAULT_FEED_IDLE_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Most feeds kept at once; the least recently used one goes first.
pub const DEFAULT_FEED_CAPACITY: usize = 1024;

#[derive(Debug)]
struct FeedEntry {
    feed: Arc<MapFeed>,
    touched: Instant,
    last_use: u64,
}

#[derive(Debug, Default)]
struct FeedTable {
    entries: FxHashMap<UserUuid, FeedEntry>,
    uses: u64,
}

/// Open map feeds, one per user.
///
/// Bounded: idle feeds are evicted and the map never holds more than its
/// capacity. Evicted feeds are not closed; the user's next request opens a
/// fresh one.
#[derive(Debug)]
pub struct MapFeeds {
    feeds: Mutex<FeedTable>,
    capacity: usize,
    idle_timeout: Duration,
}

impl Default for MapFeeds {
    fn default() -> Self {
        Self::with_limits(DEFAULT_FEED_CAPACITY, DEFAULT_FEED_IDLE_TIMEOUT)
    }
}

impl MapFeeds {
    /// Feeds with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds bounded by `capacity` (at least one) and `idle_timeout`.
    #[must_use]
    pub fn with_limits(capacity: usize, idle_timeout: Duration) -> Self {
        Self {
            feeds: Mutex::new(FeedTable::default()),
            capacity: capacity.max(1),
            idle_timeout,
        }
    }

    /// The user's open feed, opening a fresh one if needed.
    pub fn feed(&self, user: UserUuid) -> Arc<MapFeed> {
        let now = Instant::now();
        let mut table = self.lock();

        table.uses += 1;
        let last_use = table.uses;

        let feeds = &mut table.entries;

        feeds.retain(|_, entry| now.duration_since(entry.touched) < self.idle_timeout);

        if !feeds.contains_key(&user) && feeds.len() >= self.capacity {
            let oldest = feeds
                .iter()
                .min_by_key(|(_, entry)| entry.last_use)
                .map(|(uuid, _)| *uuid);

            if let Some(oldest) = oldest {
                debug!(user = %oldest, "evicting least recently used map feed");

                feeds.remove(&oldest);
            }
        }

        let entry = feeds.entry(user).or_insert_with(|| FeedEntry {
            feed: Arc::default(),
            touched: now,
            last_use,
        });

        if entry.feed.is_closed() {
            entry.feed = Arc::default();
        }

        entry.touched = now;
        entry.last_use = last_use;

        Arc::clone(&entry.feed)
    }

    /// Tear down the user's feed; in-flight refreshes are discarded.
    pub fn close(&self, user: UserUuid) -> bool {
        let Some(entry) = self.lock().entries.remove(&user) else {
            return false;
        };

        entry.feed.close();

        true
    }

    /// Number of feeds currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, FeedTable> {
        self.feeds.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
