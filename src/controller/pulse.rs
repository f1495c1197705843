use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

/// How long every feedback pulse stays active.
pub const PULSE_DURATION: Duration = Duration::from_millis(1000);

/// A boolean flag that reverts to `false` a fixed time after being raised.
///
/// At most one expiry timer is pending at a time: raising an active pulse
/// cancels the pending timer and starts a new one. Dropping the pulse aborts
/// its timer, so no expiry fires after teardown. A closed pulse ignores
/// every later raise.
///
/// The expiry timer is a tokio task. Raising outside a tokio runtime logs a
/// warning and leaves the pulse inactive.
#[derive(Debug)]
pub struct Pulse {
    active: Arc<watch::Sender<bool>>,
    // Bumped on every raise and cancel, always under the watch lock; an
    // expiry only clears the flag if its generation is still current.
    generation: Arc<AtomicU64>,
    timer: Mutex<Option<JoinHandle<()>>>,
    // Only written under the timer lock.
    closed: AtomicBool,
    duration: Duration,
}

impl Default for Pulse {
    fn default() -> Self {
        Self::new()
    }
}

impl Pulse {
    /// Creates an inactive pulse lasting [`PULSE_DURATION`].
    pub fn new() -> Self {
        Self::with_duration(PULSE_DURATION)
    }

    /// Creates an inactive pulse lasting `duration`.
    pub fn with_duration(duration: Duration) -> Self {
        let (active, _) = watch::channel(false);
        Self {
            active: Arc::new(active),
            generation: Arc::new(AtomicU64::new(0)),
            timer: Mutex::new(None),
            closed: AtomicBool::new(false),
            duration,
        }
    }

    /// Returns `true` while the pulse is active.
    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// Returns a receiver that observes every change of the flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.active.subscribe()
    }

    /// Returns `true` if an expiry timer is still pending.
    pub fn has_pending_timer(&self) -> bool {
        self.lock_timer()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Activates the pulse and (re)starts its expiry timer.
    ///
    /// Does nothing on a closed pulse.
    pub fn raise(&self) {
        let mut timer = self.lock_timer();
        if self.is_closed() {
            tracing::debug!("Ignoring raise on a closed pulse");
            return;
        }
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("No tokio runtime to time the pulse, leaving it inactive");
            return;
        };
        if let Some(previous) = timer.take() {
            previous.abort();
        }

        let mut generation = 0;
        self.active.send_modify(|active| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *active = true;
        });

        let deadline = Instant::now() + self.duration;
        let active = Arc::clone(&self.active);
        let current = Arc::clone(&self.generation);
        *timer = Some(runtime.spawn(async move {
            sleep_until(deadline).await;
            active.send_if_modified(|active| {
                let expired = *active && current.load(Ordering::SeqCst) == generation;
                if expired {
                    *active = false;
                }
                expired
            });
        }));
    }

    /// Deactivates the pulse immediately and cancels any pending timer.
    pub fn cancel(&self) {
        let mut timer = self.lock_timer();
        self.deactivate(&mut timer);
    }

    /// Cancels the pulse and refuses every later raise.
    pub fn close(&self) {
        let mut timer = self.lock_timer();
        self.closed.store(true, Ordering::SeqCst);
        self.deactivate(&mut timer);
    }

    fn deactivate(&self, timer: &mut Option<JoinHandle<()>>) {
        if let Some(timer) = timer.take() {
            timer.abort();
        }
        self.active.send_if_modified(|active| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            std::mem::replace(active, false)
        });
    }

    fn lock_timer(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Pulse {
    fn drop(&mut self) {
        let timer = self
            .timer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(timer) = timer {
            timer.abort();
        }
    }
}
