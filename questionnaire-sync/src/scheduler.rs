//! Debounced auto-save.
//!
//! [`AutoSaveScheduler`] turns a burst of edits into at most one write per
//! debounce window. Every `schedule` supersedes the previous timer, so only
//! the last snapshot of a burst is ever sent. A timer whose write has already
//! started is not interrupted; its outcome only moves the dedup fingerprint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use questionnaire_types::{Answers, QuestionCatalog, SessionState, progress};
use tokio::task::JoinHandle;

use crate::{Fingerprint, PersistenceGateway, SaveRequest};

/// Sync bookkeeping shared between a session and its timers.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    /// Fingerprint of the last answer set the store is known to hold.
    pub(crate) last_persisted: Option<Fingerprint>,
    pub(crate) state: SessionState,
    /// Auto-save writes currently awaiting the store.
    pub(crate) autosaves_in_flight: usize,
}

impl Ledger {
    fn record_success(&mut self, fingerprint: Fingerprint, state: SessionState) {
        self.last_persisted = Some(fingerprint);
        self.state = self.state.advance_to(state);
    }
}

/// What a flush did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The store already holds this snapshot, or the session is completed.
    Skipped,
    /// The snapshot was written.
    Saved,
    /// The write failed; the failure has been logged.
    Failed,
}

/// Writes snapshots of one session to the store.
#[derive(Clone)]
pub(crate) struct Flusher {
    gateway: Arc<dyn PersistenceGateway>,
    questionnaire: Arc<str>,
    catalog: Arc<QuestionCatalog>,
    ledger: Arc<Mutex<Ledger>>,
}

impl Flusher {
    pub(crate) fn new(
        gateway: Arc<dyn PersistenceGateway>,
        questionnaire: Arc<str>,
        catalog: Arc<QuestionCatalog>,
        ledger: Ledger,
    ) -> Self {
        Self {
            gateway,
            questionnaire,
            catalog,
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    pub(crate) fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Auto-save `snapshot` unless the store already holds it.
    ///
    /// Failures are logged and swallowed.
    pub(crate) async fn flush(&self, snapshot: &Answers) -> FlushOutcome {
        let records = snapshot.records(&self.catalog);
        let fingerprint = Fingerprint::of(&records);
        {
            let mut ledger = self.ledger();
            if ledger.state.is_completed() {
                tracing::debug!(
                    questionnaire = %self.questionnaire,
                    "auto-save after completion ignored"
                );
                return FlushOutcome::Skipped;
            }
            // A write still in flight may replace what the store holds.
            if ledger.autosaves_in_flight == 0 && ledger.last_persisted == Some(fingerprint) {
                tracing::debug!(
                    questionnaire = %self.questionnaire,
                    %fingerprint,
                    "answers unchanged, skipping auto-save"
                );
                return FlushOutcome::Skipped;
            }
            ledger.autosaves_in_flight += 1;
        }

        let progress = progress::compute(&self.catalog, snapshot);
        let request = SaveRequest::in_progress(records, progress);
        let result = self.gateway.save_answers(&self.questionnaire, &request).await;

        let mut ledger = self.ledger();
        ledger.autosaves_in_flight -= 1;
        match result {
            Ok(()) => {
                ledger.record_success(fingerprint, SessionState::InProgress);
                tracing::debug!(
                    questionnaire = %self.questionnaire,
                    progress,
                    %fingerprint,
                    "auto-saved"
                );
                FlushOutcome::Saved
            }
            Err(err) => {
                tracing::warn!(
                    questionnaire = %self.questionnaire,
                    error = %err,
                    "auto-save failed"
                );
                FlushOutcome::Failed
            }
        }
    }

    /// Save `snapshot` as in progress, bypassing dedup. Returns the saved progress.
    pub(crate) async fn save(&self, snapshot: &Answers) -> anyhow::Result<u8> {
        let records = snapshot.records(&self.catalog);
        let fingerprint = Fingerprint::of(&records);
        let progress = progress::compute(&self.catalog, snapshot);

        self.gateway
            .save_answers(&self.questionnaire, &SaveRequest::in_progress(records, progress))
            .await?;

        self.ledger()
            .record_success(fingerprint, SessionState::InProgress);
        Ok(progress)
    }

    /// Submit `snapshot` as the final answers.
    pub(crate) async fn complete(&self, snapshot: &Answers) -> anyhow::Result<()> {
        let records = snapshot.records(&self.catalog);
        let fingerprint = Fingerprint::of(&records);

        self.gateway
            .complete_answers(&self.questionnaire, &SaveRequest::completed(records))
            .await?;

        self.ledger()
            .record_success(fingerprint, SessionState::Completed);
        Ok(())
    }
}

impl std::fmt::Debug for Flusher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flusher")
            .field("questionnaire", &self.questionnaire)
            .field("ledger", &*self.ledger())
            .finish_non_exhaustive()
    }
}

/// Debounces auto-saves of one session.
///
/// Timers run on the ambient Tokio runtime. Dropping the scheduler cancels a
/// timer that has not fired yet.
pub struct AutoSaveScheduler {
    flusher: Flusher,
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl AutoSaveScheduler {
    pub(crate) fn new(flusher: Flusher, delay: Duration) -> Self {
        Self {
            flusher,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    /// Flush `snapshot` once the debounce window passes without another call.
    ///
    /// Supersedes any timer started earlier. Must be called from within a
    /// Tokio runtime.
    pub fn schedule(&mut self, snapshot: Answers) {
        if self.cancel() {
            tracing::debug!("pending auto-save superseded");
        }

        let generation = Arc::clone(&self.generation);
        let ticket = generation.load(Ordering::SeqCst);
        let flusher = self.flusher.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) != ticket {
                return;
            }
            flusher.flush(&snapshot).await;
        }));
    }

    /// Cancel any pending timer and flush `snapshot` right away.
    pub async fn flush_immediate(&mut self, snapshot: &Answers) -> FlushOutcome {
        self.cancel();
        self.flusher.flush(snapshot).await
    }

    /// Cancel the pending timer, if any. Returns whether one was waiting.
    ///
    /// A write that has already started is left to finish.
    pub fn cancel(&mut self) -> bool {
        self.generation.fetch_add(1, Ordering::SeqCst);
        match self.pending.take() {
            Some(handle) => !handle.is_finished(),
            None => false,
        }
    }

    /// Check if a timer is waiting or its write is still running.
    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for AutoSaveScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for AutoSaveScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSaveScheduler")
            .field("delay", &self.delay)
            .field("pending", &self.has_pending())
            .finish()
    }
}
