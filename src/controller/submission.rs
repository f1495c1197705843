use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use super::error::SubmitError;
use super::form_store::FormStore;
use super::pulse::Pulse;
use crate::model::{FormRecord, validate_complete};
use crate::storage::{KeyValueStore, PersistenceError, PersistenceGateway};

/// Where the controller is in its load/submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The startup load has not resolved yet.
    Loading,
    /// Ready to accept a submission.
    Idle,
    /// Checking the record for completeness.
    Validating,
    /// Waiting for the save to finish.
    Persisting,
    /// Shut down; no submission is accepted and no pulse fires.
    Closed,
}

#[mutants::skip]
impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Loading => "loading",
            Phase::Idle => "idle",
            Phase::Validating => "validating",
            Phase::Persisting => "persisting",
            Phase::Closed => "closed",
        })
    }
}

/// Moves to `next` unless the controller is already closed.
fn advance(phase: &watch::Sender<Phase>, next: Phase) {
    phase.send_if_modified(|current| {
        if *current == Phase::Closed {
            return false;
        }
        *current = next;
        true
    });
}

/// Returns the phase to [`Phase::Idle`] however a submission ends,
/// including the submit future being dropped mid-save.
struct IdleOnDrop<'a>(&'a watch::Sender<Phase>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        advance(self.0, Phase::Idle);
    }
}

/// Gates submission on completeness, saves, and drives the feedback pulses.
///
/// Only one submission runs at a time. A submit attempt while loading or
/// while another submission is in flight returns [`SubmitError::Busy`]
/// instead of queueing.
pub struct SubmissionController<S> {
    form: FormStore,
    gateway: PersistenceGateway<S>,
    success: Pulse,
    failure: Pulse,
    phase: watch::Sender<Phase>,
    load_started: AtomicBool,
}

impl<S: KeyValueStore> SubmissionController<S> {
    /// Creates a controller in [`Phase::Loading`].
    ///
    /// Call [`initialize`](Self::initialize) before submitting.
    pub fn new(form: FormStore, gateway: PersistenceGateway<S>) -> Self {
        Self::with_pulses(form, gateway, Pulse::new(), Pulse::new())
    }

    /// Creates a controller with custom success and failure pulses.
    pub fn with_pulses(
        form: FormStore,
        gateway: PersistenceGateway<S>,
        success: Pulse,
        failure: Pulse,
    ) -> Self {
        let (phase, _) = watch::channel(Phase::Loading);
        Self {
            form,
            gateway,
            success,
            failure,
            phase,
            load_started: AtomicBool::new(false),
        }
    }

    /// Loads the last saved record into the form, then enters [`Phase::Idle`].
    ///
    /// A read failure is not fatal: the form keeps its empty record and the
    /// error is returned for diagnostics only. The controller is usable
    /// either way. Only the first call loads; later calls return `Ok(())`.
    pub async fn initialize(&self) -> Result<(), PersistenceError> {
        if self.load_started.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let _idle = IdleOnDrop(&self.phase);
        match self.gateway.load().await {
            Ok(Some(record)) => {
                tracing::info!("Loaded saved form");
                self.form.load_record(record);
                Ok(())
            }
            Ok(None) => {
                tracing::debug!("No saved form, starting empty");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to an empty form");
                Err(e)
            }
        }
    }

    /// Validates the current record and, if complete, saves it.
    ///
    /// Returns [`SubmitError::Busy`] unless the controller is idle. On success the success pulse is raised and the saved record returned.
    /// An incomplete record raises the failure pulse. A failed save raises
    /// neither pulse and leaves the form contents untouched for a retry.
    pub async fn submit(&self) -> Result<FormRecord, SubmitError> {
        let entered = self.phase.send_if_modified(|phase| match phase {
            Phase::Idle => {
                *phase = Phase::Validating;
                true
            }
            _ => false,
        });
        if !entered {
            tracing::debug!(phase = %self.phase(), "Ignoring submit while busy");
            return Err(SubmitError::Busy);
        }
        let _idle = IdleOnDrop(&self.phase);

        let record = self.form.snapshot();
        if let Err(e) = validate_complete(&record) {
            tracing::info!(reason = %e, "Submission rejected");
            self.failure.raise();
            return Err(e.into());
        }

        advance(&self.phase, Phase::Persisting);
        if let Err(e) = self.gateway.save(&record).await {
            tracing::warn!(error = %e, "Submission not saved");
            return Err(e.into());
        }

        tracing::info!("Form saved");
        self.success.raise();
        Ok(record)
    }

    /// Enters [`Phase::Closed`] and closes every pulse. Nothing fires after
    /// this returns, even for a save that is still in flight.
    pub fn shutdown(&self) {
        self.phase.send_replace(Phase::Closed);
        self.success.close();
        self.failure.close();
        self.form.selection().close();
        tracing::debug!("Controller shut down");
    }

    /// Returns the form store.
    pub fn form(&self) -> &FormStore {
        &self.form
    }

    /// Returns the pulse raised after a successful save.
    pub fn success(&self) -> &Pulse {
        &self.success
    }

    /// Returns the pulse raised when validation fails.
    pub fn failure(&self) -> &Pulse {
        &self.failure
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Returns a receiver that observes phase changes.
    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }
}
