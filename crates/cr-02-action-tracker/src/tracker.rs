//! # Action Tracker
//!
//! Maps `(record, action)` pairs to live tokens.
//!
//! Flow:
//! 1. Caller calls `begin()` and gets an [`ActionGuard`] or [`AlreadyInFlight`]
//! 2. Caller awaits the backend
//! 3. Guard is finished or dropped, releasing its token
//! 4. Tokens nobody released are reclaimed by the watchdog after the timeout

use crate::config::TrackerConfig;
use crate::error::AlreadyInFlight;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::{ActionKind, RecordId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Identity of one trackable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub entity: RecordId,
    pub kind: ActionKind,
}

impl ActionKey {
    pub fn new(entity: RecordId, kind: ActionKind) -> Self {
        Self { entity, kind }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity, self.kind)
    }
}

/// A live token.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    serial: u64,
    started_at: Instant,
    timeout: Duration,
}

impl InFlight {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.timeout
    }
}

/// Tracker counters.
#[derive(Debug, Default)]
pub struct TrackerStats {
    /// Tokens handed out.
    pub begun: AtomicU64,
    /// Tokens released by their guard or by `end`.
    pub completed: AtomicU64,
    /// `begin` calls refused because a token was live.
    pub rejected: AtomicU64,
    /// Tokens reclaimed by the watchdog.
    pub forced_releases: AtomicU64,
}

impl TrackerStats {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn begun(&self) -> u64 {
        self.begun.load(Ordering::Relaxed)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn forced_releases(&self) -> u64 {
        self.forced_releases.load(Ordering::Relaxed)
    }
}

/// Per-record concurrency guard.
///
/// Shared as `Arc<ActionTracker>`; guards keep the tracker alive so they can
/// be moved into spawned tasks.
pub struct ActionTracker {
    in_flight: DashMap<ActionKey, InFlight>,
    config: TrackerConfig,
    next_serial: AtomicU64,
    stats: Arc<TrackerStats>,
}

impl ActionTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            in_flight: DashMap::new(),
            config,
            next_serial: AtomicU64::new(1),
            stats: Arc::new(TrackerStats::default()),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Acquire the token for `(entity, kind)` with the configured watchdog timeout.
    pub fn begin(
        self: &Arc<Self>,
        entity: RecordId,
        kind: ActionKind,
    ) -> Result<ActionGuard, AlreadyInFlight> {
        self.begin_with_timeout(entity, kind, self.config.watchdog_timeout)
    }

    /// Acquire the token with an explicit watchdog timeout.
    pub fn begin_with_timeout(
        self: &Arc<Self>,
        entity: RecordId,
        kind: ActionKind,
        timeout: Duration,
    ) -> Result<ActionGuard, AlreadyInFlight> {
        let key = ActionKey::new(entity, kind);
        let now = Instant::now();
        let token = InFlight {
            serial: self.next_serial.fetch_add(1, Ordering::Relaxed),
            started_at: now,
            timeout,
        };

        match self.in_flight.entry(key) {
            Entry::Occupied(mut existing) => {
                let held = *existing.get();
                if !held.is_expired(now) {
                    TrackerStats::bump(&self.stats.rejected);
                    debug!(record_id = %entity, action = %kind, "Action already in flight");
                    return Err(AlreadyInFlight {
                        entity,
                        kind,
                        held_for: now.saturating_duration_since(held.started_at),
                    });
                }
                // Stale token the watchdog has not swept yet.
                TrackerStats::bump(&self.stats.forced_releases);
                warn!(
                    record_id = %entity,
                    action = %kind,
                    serial = held.serial,
                    "Replacing expired in-flight token"
                );
                existing.insert(token);
            }
            Entry::Vacant(slot) => {
                slot.insert(token);
            }
        }

        TrackerStats::bump(&self.stats.begun);
        debug!(record_id = %entity, action = %kind, serial = token.serial, "Action begun");

        Ok(ActionGuard {
            tracker: Arc::clone(self),
            key,
            serial: token.serial,
            started_at: now,
            released: false,
        })
    }

    /// Explicitly end whatever token is held for `(entity, kind)`.
    ///
    /// Returns `false` if nothing was in flight.
    pub fn end(&self, entity: RecordId, kind: ActionKind) -> bool {
        let key = ActionKey::new(entity, kind);
        match self.in_flight.remove(&key) {
            Some((_, token)) => {
                TrackerStats::bump(&self.stats.completed);
                debug!(record_id = %entity, action = %kind, serial = token.serial, "Action ended");
                true
            }
            None => false,
        }
    }

    /// Whether a live token exists. Expired tokens are reclaimed on read.
    pub fn is_in_flight(&self, entity: RecordId, kind: ActionKind) -> bool {
        let key = ActionKey::new(entity, kind);
        let now = Instant::now();
        let expired = match self.in_flight.get(&key) {
            None => return false,
            Some(token) => token.is_expired(now),
        };
        if expired {
            self.force_release(&key, now);
            false
        } else {
            true
        }
    }

    /// Whether any action is in flight for `entity`.
    pub fn is_busy(&self, entity: RecordId) -> bool {
        self.in_flight_for(entity).next().is_some()
    }

    /// Live action kinds for one record.
    pub fn active_kinds(&self, entity: RecordId) -> Vec<ActionKind> {
        self.in_flight_for(entity).collect()
    }

    fn in_flight_for(&self, entity: RecordId) -> impl Iterator<Item = ActionKind> + '_ {
        let now = Instant::now();
        self.in_flight
            .iter()
            .filter(move |e| e.key().entity == entity && !e.value().is_expired(now))
            .map(|e| e.key().kind)
    }

    /// Number of tokens currently held (including not-yet-swept expired ones).
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Reclaim every expired token. Returns how many were released.
    pub fn release_expired(&self) -> usize {
        let now = Instant::now();
        let mut released = 0;

        self.in_flight.retain(|key, token| {
            if token.is_expired(now) {
                warn!(
                    record_id = %key.entity,
                    action = %key.kind,
                    serial = token.serial,
                    held_ms = now.saturating_duration_since(token.started_at).as_millis() as u64,
                    "Watchdog released in-flight token"
                );
                TrackerStats::bump(&self.stats.forced_releases);
                released += 1;
                false
            } else {
                true
            }
        });

        released
    }

    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }

    /// Spawn [`watchdog_task`] on the current runtime.
    pub fn spawn_watchdog(self: &Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(watchdog_task(Arc::clone(self), self.config.sweep_interval))
    }

    fn force_release(&self, key: &ActionKey, now: Instant) {
        if let Some((_, token)) = self.in_flight.remove_if(key, |_, t| t.is_expired(now)) {
            TrackerStats::bump(&self.stats.forced_releases);
            warn!(
                record_id = %key.entity,
                action = %key.kind,
                serial = token.serial,
                "Watchdog released in-flight token"
            );
        }
    }

    /// Release only if the held token is still the one `serial` names.
    fn release(&self, key: &ActionKey, serial: u64) -> bool {
        let removed = self
            .in_flight
            .remove_if(key, |_, token| token.serial == serial)
            .is_some();
        if removed {
            TrackerStats::bump(&self.stats.completed);
        }
        removed
    }
}

/// Scoped ownership of one token.
///
/// Dropping the guard releases the token, so `?` and panics cannot leak it.
#[must_use = "dropping the guard immediately releases the action"]
pub struct ActionGuard {
    tracker: Arc<ActionTracker>,
    key: ActionKey,
    serial: u64,
    started_at: Instant,
    released: bool,
}

impl ActionGuard {
    pub fn key(&self) -> ActionKey {
        self.key
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Whether this guard still owns the live token (not force-released).
    pub fn is_current(&self) -> bool {
        self.tracker
            .in_flight
            .get(&self.key)
            .map(|t| t.serial == self.serial)
            .unwrap_or(false)
    }

    /// Release the token. Equivalent to dropping, but explicit at call sites.
    pub fn finish(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if self.tracker.release(&self.key, self.serial) {
            debug!(
                record_id = %self.key.entity,
                action = %self.key.kind,
                serial = self.serial,
                elapsed_ms = self.elapsed().as_millis() as u64,
                "Action finished"
            );
        } else {
            // Late completion after a forced release or explicit end.
            debug!(
                record_id = %self.key.entity,
                action = %self.key.kind,
                serial = self.serial,
                "Action finished after its token was already released"
            );
        }
    }
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl fmt::Debug for ActionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionGuard")
            .field("key", &self.key)
            .field("serial", &self.serial)
            .field("released", &self.released)
            .finish()
    }
}

/// Background task that periodically reclaims expired tokens.
pub async fn watchdog_task(tracker: Arc<ActionTracker>, interval: Duration) {
    let mut sweep = tokio::time::interval(interval);
    sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        sweep.tick().await;
        let released = tracker.release_expired();
        if released > 0 {
            debug!(released, "Watchdog sweep released tokens");
        }
    }
}
