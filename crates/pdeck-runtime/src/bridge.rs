#![forbid(unsafe_code)]

//! Binding between an engine's push notifications and a mounted view.
//!
//! A [`StateBridge`] owns at most one [`EngineSubscription`]. The listener it
//! registers stores each delivered [`ProofState`] into an
//! [`ArcSwapOption`] slot and bumps a version counter; the view reads the
//! slot when it renders and compares versions to decide whether a re-render
//! is due.
//!
//! # Invariants
//! 1. `snapshot()` returns `None` until the first delivery after activation.
//! 2. Each delivery replaces the slot atomically. Readers observe the old or
//!    the new snapshot, never a mix.
//! 3. `version()` never decreases, and a reader that observed version `v`
//!    then reads a snapshot at least as new as delivery `v`.
//! 4. After `deactivate()` returns the listener applies nothing, even if
//!    the engine calls it late from another thread.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use pdeck_core::engine::{EngineSubscription, ProofEngine};
use pdeck_core::state::ProofState;
use tracing::{debug, info};

/// Called after every applied delivery to schedule a render.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

struct Shared {
    slot: ArcSwapOption<ProofState>,
    version: AtomicU64,
    live: AtomicBool,
    waker: Option<Waker>,
}

impl Shared {
    fn deliver(&self, state: &ProofState) {
        if !self.live.load(Ordering::Acquire) {
            return;
        }
        self.slot.store(Some(Arc::new(state.clone())));
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(
            version,
            is_finished = state.is_finished,
            goals = state.monitor.goals.len(),
            "snapshot delivered"
        );
        if let Some(ref wake) = self.waker {
            wake();
        }
    }
}

/// Holds a view's engine subscription and its latest snapshot.
pub struct StateBridge {
    shared: Arc<Shared>,
    subscription: Option<EngineSubscription>,
}

impl StateBridge {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A bridge that calls `waker` after each applied delivery.
    pub fn with_waker(waker: Waker) -> Self {
        Self::build(Some(waker))
    }

    fn build(waker: Option<Waker>) -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: ArcSwapOption::empty(),
                version: AtomicU64::new(0),
                live: AtomicBool::new(false),
                waker,
            }),
            subscription: None,
        }
    }

    /// Register with `engine`. Returns `false` (and does nothing) if the
    /// bridge already holds a live subscription.
    pub fn activate<E: ProofEngine + ?Sized>(&mut self, engine: &E) -> bool {
        if self.subscription.is_some() {
            return false;
        }
        self.shared.live.store(true, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        let subscription = engine.subscribe(Arc::new(move |state: &ProofState| {
            shared.deliver(state);
        }));
        info!(subscription = subscription.id(), "bridge activated");
        self.subscription = Some(subscription);
        true
    }

    /// Remove the registration and forget the snapshot. Idempotent.
    pub fn deactivate(&mut self) {
        self.shared.live.store(false, Ordering::Release);
        if let Some(subscription) = self.subscription.take() {
            let id = subscription.id();
            subscription.unsubscribe();
            self.shared.slot.store(None);
            info!(subscription = id, "bridge deactivated");
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// The latest snapshot, or `None` while nothing was delivered.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<ProofState>> {
        self.shared.slot.load_full()
    }

    /// Number of deliveries applied so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.version.load(Ordering::Acquire)
    }

    /// Version and snapshot read in the order that upholds invariant 3.
    #[must_use]
    pub fn load(&self) -> (u64, Option<Arc<ProofState>>) {
        let version = self.version();
        (version, self.snapshot())
    }
}

impl Default for StateBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StateBridge {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl fmt::Debug for StateBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateBridge")
            .field("active", &self.is_active())
            .field("version", &self.version())
            .field("loaded", &self.shared.slot.load().is_some())
            .finish()
    }
}
