//! Deduplicated login redirect raised by authentication failures
//!
//! The dispatcher never navigates. It flips a latch and publishes a single
//! [`RedirectEvent`]; whatever owns the router subscribes and performs the
//! actual navigation. Further failures while the latch is set are absorbed,
//! so a burst of concurrent `401`s produces exactly one event.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, info};

const CHANNEL_CAPACITY: usize = 16;

/// Request to move the UI to `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEvent {
    pub target: String,
}

pub struct AuthRedirect {
    login_path: String,
    latched: AtomicBool,
    emitted: AtomicU64,
    tx: broadcast::Sender<RedirectEvent>,
}

impl AuthRedirect {
    pub fn new(login_path: impl Into<String>) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            login_path: login_path.into(),
            latched: AtomicBool::new(false),
            emitted: AtomicU64::new(0),
            tx,
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Receive future redirect events
    pub fn subscribe(&self) -> broadcast::Receiver<RedirectEvent> {
        self.tx.subscribe()
    }

    /// Publish a redirect unless one is already pending.
    ///
    /// Returns `true` for the call that actually emitted the event.
    pub fn trigger(&self) -> bool {
        if self
            .latched
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Login redirect already pending");
            return false;
        }

        self.emitted.fetch_add(1, Ordering::Relaxed);
        let event = RedirectEvent {
            target: self.login_path.clone(),
        };
        if self.tx.send(event).is_err() {
            debug!("No redirect subscribers");
        }
        info!(path = %self.login_path, "Redirecting to login");
        true
    }

    /// Re-arm after a successful login
    pub fn reset(&self) {
        self.latched.store(false, Ordering::Release);
    }

    pub fn is_pending(&self) -> bool {
        self.latched.load(Ordering::Acquire)
    }

    /// Number of events published since construction
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for AuthRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRedirect")
            .field("login_path", &self.login_path)
            .field("pending", &self.is_pending())
            .finish()
    }
}
