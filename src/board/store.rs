//! Board Store: the single writer of the slot collection
//!
//! Mutating calls queue on one FIFO async mutex, so each observes the previous
//! one fully committed. A regenerate that is still queued when a newer regenerate
//! (or initialize, or lock-triggered regenerate) is requested gets superseded and
//! returns without fetching. Every commit publishes exactly one snapshot.

use crate::board::slot::{ImageSlot, SlotFill, SlotId, SlotOrigin};
use crate::board::state::{Board, LockChange, LockPolicy, SlotLimits};
use crate::fetch::fallback::FallbackImages;
use crate::fetch::source::ImageSource;
use crate::io::configuration::{DEFAULT_SEED, DEFAULT_SLOT_COUNT, FETCH_TIMEOUT, SETTLE_DELAY};
use crate::io::error::{FetchError, Result, invalid_parameter};
use crate::similarity::resolver::SimilarityResolver;
use crate::similarity::taxonomy::Taxonomy;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

/// Store parameters fixed at construction
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Slots created by `initialize`
    pub slot_count: usize,
    /// Floor and ceiling on the collection size
    pub limits: SlotLimits,
    /// Lock cardinality
    pub lock_policy: LockPolicy,
    /// Upper bound on one Fetch Adapter call
    pub fetch_timeout: Duration,
    /// Pause before a regenerate starts fetching
    pub settle_delay: Duration,
    /// Seed for tag draws and fallback labels
    pub seed: u64,
    /// Local placeholder set
    pub fallback: FallbackImages,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            limits: SlotLimits::default(),
            lock_policy: LockPolicy::default(),
            fetch_timeout: FETCH_TIMEOUT,
            settle_delay: SETTLE_DELAY,
            seed: DEFAULT_SEED,
            fallback: FallbackImages::default(),
        }
    }
}

impl BoardConfig {
    /// Check that the initial slot count fits the limits
    ///
    /// # Errors
    ///
    /// Returns an error if `slot_count` lies outside `limits`
    pub fn validate(&self) -> Result<()> {
        if !self.limits.contains(self.slot_count) {
            return Err(invalid_parameter(
                "slot_count",
                &self.slot_count,
                &format!(
                    "must lie within {}..={}",
                    self.limits.min(),
                    self.limits.max()
                ),
            ));
        }
        Ok(())
    }
}

/// Result of a regenerate request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerateOutcome {
    /// Unlocked slots were replaced and the result committed
    Committed {
        /// Slots that received new content
        replaced: usize,
        /// Of those, how many came from the local fallback set
        fallback: usize,
    },
    /// A newer request arrived first; nothing was fetched or committed
    Superseded,
}

/// Result of a lock toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// No slot carries the id; nothing changed
    UnknownSlot,
    /// The slot is now unlocked
    Unlocked,
    /// The slot is now locked
    Locked {
        /// Implicit similarity regenerate, run under [`LockPolicy::Single`]
        regenerated: Option<RegenerateOutcome>,
    },
}

struct Inner {
    board: Board,
    rng: StdRng,
}

/// Owner of the ordered slot collection
pub struct BoardStore {
    inner: Mutex<Inner>,
    source: Arc<dyn ImageSource>,
    resolver: SimilarityResolver,
    config: BoardConfig,
    latest_request: AtomicU64,
    snapshots: watch::Sender<Vec<ImageSlot>>,
}

impl BoardStore {
    /// Create an empty store; call [`BoardStore::initialize`] to fill it
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is inconsistent
    pub fn new(
        source: Arc<dyn ImageSource>,
        taxonomy: Arc<Taxonomy>,
        config: BoardConfig,
    ) -> Result<Self> {
        config.validate()?;
        let (snapshots, _) = watch::channel(Vec::new());
        Ok(Self {
            inner: Mutex::new(Inner {
                board: Board::new(config.limits, config.lock_policy),
                rng: StdRng::seed_from_u64(config.seed),
            }),
            source,
            resolver: SimilarityResolver::new(taxonomy),
            config,
            latest_request: AtomicU64::new(0),
            snapshots,
        })
    }

    /// Configuration in force
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Taxonomy shared with the similarity resolver
    pub fn taxonomy(&self) -> &Taxonomy {
        self.resolver.taxonomy()
    }

    /// Last committed collection; never waits on in-flight work
    pub fn snapshot(&self) -> Vec<ImageSlot> {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified once per committed mutation
    pub fn subscribe(&self) -> watch::Receiver<Vec<ImageSlot>> {
        self.snapshots.subscribe()
    }

    fn issue_request(&self) -> u64 {
        self.latest_request.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, request: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) == request
    }

    fn commit(&self, inner: &mut Inner, next: Board) {
        debug_assert!(next.positions_consistent());
        inner.board = next;
        self.snapshots.send_replace(inner.board.slots().to_vec());
    }

    /// Fill the board with `slot_count` fresh slots for `query`
    ///
    /// An empty query asks for unfiltered images. A failed or empty fetch yields the
    /// local placeholder set instead, so the board is never left empty.
    pub async fn initialize(&self, query: &str) -> Vec<ImageSlot> {
        self.issue_request();
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        let count = self.config.slot_count;
        let tags = self
            .resolver
            .plan_search_tags(query, &[], count, &mut inner.rng);
        let fills = self.fetch_fills(&tags, 0, &mut inner.rng).await;
        let fallback = count_fallback(&fills);

        let mut next = inner.board.clone();
        next.reset(fills);
        self.commit(inner, next);
        info!(count, fallback, query, "board initialized");
        inner.board.slots().to_vec()
    }

    /// Replace the board with caller-supplied content, such as a saved session
    ///
    /// Every restored slot gets a fresh id and starts unlocked. Returns false,
    /// changing nothing, if the number of fills lies outside the slot limits.
    pub async fn restore(&self, fills: Vec<SlotFill>) -> bool {
        if !self.config.limits.contains(fills.len()) {
            debug!(count = fills.len(), "restore ignored: size out of limits");
            return false;
        }
        self.issue_request();
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let count = fills.len();
        let mut next = inner.board.clone();
        next.reset(fills);
        self.commit(inner, next);
        info!(count, "board restored");
        true
    }

    /// Replace every unlocked slot with new content for `query`
    ///
    /// Locked slots keep their id, tag, location and index; new slots take the
    /// freed indices in order. With an empty query and a lock in place, the new
    /// slots search tags related to the locked ones.
    pub async fn regenerate(&self, query: &str) -> RegenerateOutcome {
        let request = self.issue_request();
        let mut guard = self.inner.lock().await;
        if !self.is_latest(request) {
            debug!(request, "regenerate superseded before start");
            return RegenerateOutcome::Superseded;
        }

        self.settle().await;
        if !self.is_latest(request) {
            debug!(request, "regenerate superseded while settling");
            return RegenerateOutcome::Superseded;
        }

        let inner = &mut *guard;
        let mut next = inner.board.clone();
        let outcome = self.refill_unlocked(&mut next, &mut inner.rng, query).await;
        self.commit(inner, next);
        info!(?outcome, query, "board regenerated");
        outcome
    }

    /// Flip the lock on the slot carrying `id`
    ///
    /// Under [`LockPolicy::Single`] locking releases any other lock and regenerates
    /// the unlocked slots around the new seed; the board is published once, after
    /// that regenerate.
    pub async fn toggle_lock(&self, id: SlotId) -> LockOutcome {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let mut next = inner.board.clone();

        match next.toggle_lock(id) {
            LockChange::Unknown => {
                debug!(%id, "toggle ignored: unknown slot");
                LockOutcome::UnknownSlot
            }
            LockChange::Unlocked => {
                self.commit(inner, next);
                info!(%id, "slot unlocked");
                LockOutcome::Unlocked
            }
            LockChange::Locked { tag, released } => {
                if next.policy() == LockPolicy::Multi {
                    self.commit(inner, next);
                    info!(%id, tag = %tag, "slot locked");
                    return LockOutcome::Locked { regenerated: None };
                }

                self.issue_request();
                self.settle().await;
                let outcome = self.refill_unlocked(&mut next, &mut inner.rng, "").await;
                self.commit(inner, next);
                info!(%id, tag = %tag, released = released.len(), ?outcome, "slot locked; similar images loaded");
                LockOutcome::Locked {
                    regenerated: Some(outcome),
                }
            }
        }
    }

    /// Move the slot at `from` to index `to` (splice semantics)
    ///
    /// Returns false, changing nothing, for equal or out-of-range indices.
    pub async fn reorder(&self, from: usize, to: usize) -> bool {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let mut next = inner.board.clone();
        if !next.reorder(from, to) {
            debug!(from, to, len = next.len(), "reorder ignored");
            return false;
        }
        self.commit(inner, next);
        debug!(from, to, "slot moved");
        true
    }

    /// Append one slot for `query` unless the board is at its ceiling
    pub async fn add_slot(&self, query: &str) -> Option<SlotId> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        if inner.board.is_full() {
            debug!(len = inner.board.len(), "add ignored: board full");
            return None;
        }

        let seeds = inner.board.locked_tags();
        let tags = self
            .resolver
            .plan_search_tags(query, &seeds, 1, &mut inner.rng);
        let offset = inner.board.len();
        let fills = self.fetch_fills(&tags, offset, &mut inner.rng).await;

        let mut next = inner.board.clone();
        let id = fills.into_iter().next().and_then(|fill| next.push(fill))?;
        self.commit(inner, next);
        info!(%id, "slot added");
        Some(id)
    }

    /// Remove the slot carrying `id` unless the board is at its floor
    pub async fn remove_slot(&self, id: SlotId) -> bool {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let mut next = inner.board.clone();
        if !next.remove(id) {
            debug!(%id, len = next.len(), "remove ignored");
            return false;
        }
        self.commit(inner, next);
        info!(%id, "slot removed");
        true
    }

    async fn settle(&self) {
        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }
    }

    async fn refill_unlocked(
        &self,
        board: &mut Board,
        rng: &mut StdRng,
        query: &str,
    ) -> RegenerateOutcome {
        let count = board.unlocked_count();
        let seeds = board.locked_tags();
        let tags = self.resolver.plan_search_tags(query, &seeds, count, rng);
        let fills = self.fetch_fills(&tags, 0, rng).await;
        let fallback = count_fallback(&fills);
        let replaced = board.replace_unlocked(fills);
        RegenerateOutcome::Committed { replaced, fallback }
    }

    /// One fill per search tag, fetching once per distinct tag
    ///
    /// Missing locations are padded from the fallback set, indexed from `offset`.
    async fn fetch_fills(&self, tags: &[String], offset: usize, rng: &mut StdRng) -> Vec<SlotFill> {
        let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
        for (index, tag) in tags.iter().enumerate() {
            match groups.iter_mut().find(|(t, _)| *t == tag.as_str()) {
                Some((_, indices)) => indices.push(index),
                None => groups.push((tag.as_str(), vec![index])),
            }
        }

        let mut fills: Vec<Option<SlotFill>> = vec![None; tags.len()];
        for (tag, indices) in groups {
            let locations = self.fetch(tag, indices.len()).await;
            for (location, index) in locations.into_iter().zip(&indices) {
                let label = if tag.is_empty() {
                    self.taxonomy().random_tag(rng)
                } else {
                    tag.to_string()
                };
                if let Some(fill) = fills.get_mut(*index) {
                    *fill = Some(SlotFill::fetched(location, label));
                }
            }
        }

        fills
            .into_iter()
            .enumerate()
            .map(|(index, fill)| {
                fill.unwrap_or_else(|| {
                    self.config
                        .fallback
                        .fill(offset + index, self.taxonomy(), rng)
                })
            })
            .collect()
    }

    /// Fetch Adapter call with every failure mode collapsed to "no results"
    async fn fetch(&self, query: &str, count: usize) -> Vec<String> {
        if count == 0 {
            return Vec::new();
        }
        let result = tokio::time::timeout(
            self.config.fetch_timeout,
            self.source.fetch_images(query, count),
        )
        .await
        .unwrap_or(Err(FetchError::Timeout));

        match result {
            Ok(mut locations) => {
                locations.truncate(count);
                if locations.len() < count {
                    warn!(
                        query,
                        requested = count,
                        received = locations.len(),
                        "short fetch; padding with local fallback"
                    );
                }
                locations
            }
            Err(error) => {
                warn!(query, %error, "fetch failed; using local fallback");
                Vec::new()
            }
        }
    }
}

fn count_fallback(fills: &[SlotFill]) -> usize {
    fills
        .iter()
        .filter(|fill| fill.origin == SlotOrigin::Fallback)
        .count()
}
