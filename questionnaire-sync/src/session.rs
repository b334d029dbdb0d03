//! The response session state machine.
//!
//! A [`ResponseSession`] owns the answers of one open questionnaire, the
//! navigation position, and the auto-save timer. The UI dispatches events
//! into it and renders from [`ResponseSession::view`].

use std::sync::Arc;

use questionnaire_types::{
    AnswerIssue, AnswerValue, Answers, CatalogError, Question, QuestionCatalog, QuestionId,
    SessionState, progress, validation,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::scheduler::{Flusher, Ledger};
use crate::{
    AutoSaveScheduler, Fingerprint, FlushOutcome, Notice, PersistenceGateway, RemoteSession,
    SessionError, SyncConfig,
};

const NOTICE_CAPACITY: usize = 32;

/// How questions are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// One question at a time; answering may advance to the next one.
    #[default]
    StepByStep,

    /// Every question on one page; answering never navigates.
    FullView,
}

/// Result of an answer change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer is stored and an auto-save is scheduled.
    Scheduled,

    /// The answer was saved and the session moved to this question.
    Advanced(usize),

    /// The answer was saved; there is no next question to move to.
    AtLastQuestion,

    /// The answer was saved but the current question is required and still
    /// unanswered, so the session did not move.
    Required(QuestionId),
}

/// What leaving the session requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPrompt {
    /// Nothing to lose; leave right away.
    Immediate,

    /// Ask the user to discard, save and exit, or cancel.
    Confirm,
}

/// The user's answer to [`ExitPrompt::Confirm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitChoice {
    Discard,
    SaveAndExit,
    Cancel,
}

/// Whether the caller should navigate away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Leave,
    Stay,
}

/// Everything the UI needs to render a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub current_index: usize,
    pub view_mode: ViewMode,
    pub progress: u8,
    pub answered: usize,
    pub total: usize,
    pub is_auto_saving: bool,
    pub state: SessionState,
}

/// One respondent answering one questionnaire.
#[derive(Debug)]
pub struct ResponseSession {
    questionnaire: Arc<str>,
    catalog: Arc<QuestionCatalog>,
    answers: Answers,
    current: usize,
    view_mode: ViewMode,
    config: SyncConfig,
    flusher: Flusher,
    scheduler: AutoSaveScheduler,
    notices: broadcast::Sender<Notice>,
}

impl ResponseSession {
    /// Fetch a questionnaire and its saved answers, then open a session on it.
    pub async fn load<G>(
        gateway: Arc<G>,
        questionnaire: impl Into<Arc<str>>,
        config: SyncConfig,
    ) -> Result<Self, SessionError>
    where
        G: PersistenceGateway + 'static,
    {
        let questionnaire = questionnaire.into();
        let remote = gateway
            .fetch_session(&questionnaire)
            .await
            .map_err(|err| match err.downcast::<CatalogError>() {
                Ok(err) => SessionError::Catalog(err),
                Err(err) => SessionError::Persistence(err),
            })?;
        Ok(Self::hydrate(gateway, questionnaire, remote, config))
    }

    /// Open a session on an already fetched questionnaire.
    ///
    /// Prior answers are kept only when they belong to the current catalog
    /// and are present. The dedup fingerprint starts at the hydrated answers,
    /// so re-saving them unchanged does not write.
    pub fn hydrate<G>(
        gateway: Arc<G>,
        questionnaire: impl Into<Arc<str>>,
        remote: RemoteSession,
        config: SyncConfig,
    ) -> Self
    where
        G: PersistenceGateway + 'static,
    {
        let questionnaire = questionnaire.into();
        let catalog = Arc::new(remote.catalog);
        for problem in catalog.lint() {
            tracing::warn!(
                questionnaire = %questionnaire,
                question = %problem.question(),
                %problem,
                "questionnaire has authoring problems"
            );
        }

        let prior = remote
            .prior_answers
            .into_iter()
            .map(|(id, prior)| (id, prior.value));
        let answers = Answers::hydrate(prior, &catalog);
        let ledger = Ledger {
            last_persisted: Some(Fingerprint::of(&answers.records(&catalog))),
            state: remote.state,
            autosaves_in_flight: 0,
        };
        tracing::debug!(
            questionnaire = %questionnaire,
            state = %remote.state,
            answered = answers.count_answered(&catalog),
            "session hydrated"
        );

        let gateway: Arc<dyn PersistenceGateway> = gateway;
        let flusher = Flusher::new(
            gateway,
            Arc::clone(&questionnaire),
            Arc::clone(&catalog),
            ledger,
        );
        let scheduler = AutoSaveScheduler::new(flusher.clone(), config.autosave_delay);
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);

        Self {
            questionnaire,
            catalog,
            answers,
            current: 0,
            view_mode: config.view_mode,
            config,
            flusher,
            scheduler,
            notices,
        }
    }

    /// Receive the notices this session publishes from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub fn questionnaire(&self) -> &str {
        &self.questionnaire
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// The current answers, read-only.
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.flusher.ledger().state
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question at the current position, if the catalog has any.
    pub fn current_question(&self) -> Option<&Question> {
        self.catalog.get(self.current)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    /// Switch between step-by-step and full view.
    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = match self.view_mode {
            ViewMode::StepByStep => ViewMode::FullView,
            ViewMode::FullView => ViewMode::StepByStep,
        };
        self.view_mode
    }

    /// Completion percentage of the current answers.
    pub fn progress(&self) -> u8 {
        progress::compute(&self.catalog, &self.answers)
    }

    /// Check if an auto-save write is waiting for the store.
    pub fn is_auto_saving(&self) -> bool {
        self.flusher.ledger().autosaves_in_flight > 0
    }

    /// Check if the question at `index` has a present answer.
    pub fn is_answered(&self, index: usize) -> bool {
        self.catalog
            .get(index)
            .is_some_and(|question| validation::is_present(self.answers.get(question.id())))
    }

    /// Per-question feedback on the current answers, in catalog order.
    pub fn issues(&self) -> Vec<(&Question, AnswerIssue)> {
        validation::review(&self.catalog, &self.answers)
    }

    pub fn view(&self) -> SessionView {
        let ledger = self.flusher.ledger();
        SessionView {
            current_index: self.current,
            view_mode: self.view_mode,
            progress: self.progress(),
            answered: self.answers.count_answered(&self.catalog),
            total: self.catalog.len(),
            is_auto_saving: ledger.autosaves_in_flight > 0,
            state: ledger.state,
        }
    }

    /// Record an answer. `None` clears it.
    ///
    /// With `auto_advance` in step-by-step view the answer is saved right
    /// away, and after the advance delay the session moves to the next
    /// question if the current one is satisfied. Otherwise an auto-save is
    /// scheduled.
    pub async fn set_answer(
        &mut self,
        id: impl Into<QuestionId>,
        value: Option<AnswerValue>,
        auto_advance: bool,
    ) -> Result<AnswerOutcome, SessionError> {
        self.ensure_open()?;
        let id = id.into();
        if !self.catalog.contains(&id) {
            return Err(SessionError::UnknownQuestion(id));
        }

        let next = match value {
            Some(value) => self.answers.set(id, value),
            None => self.answers.clear(&id),
        };

        if auto_advance && self.view_mode == ViewMode::StepByStep {
            self.answers = next.clone();
            self.scheduler.flush_immediate(&next).await;
            tokio::time::sleep(self.config.advance_delay).await;
            Ok(self.advance(&next))
        } else {
            self.scheduler.schedule(next.clone());
            self.answers = next;
            Ok(AnswerOutcome::Scheduled)
        }
    }

    // Validates against the snapshot that triggered the advance.
    fn advance(&mut self, answers: &Answers) -> AnswerOutcome {
        let Some(question) = self.catalog.get(self.current) else {
            return AnswerOutcome::AtLastQuestion;
        };
        if !validation::is_question_satisfied(question, answers) {
            let id = question.id().clone();
            self.notify(Notice::RequiredQuestion(id.clone()));
            return AnswerOutcome::Required(id);
        }
        if self.current + 1 < self.catalog.len() {
            self.current += 1;
            AnswerOutcome::Advanced(self.current)
        } else {
            AnswerOutcome::AtLastQuestion
        }
    }

    /// Move to the next question without validating. Returns the new position.
    pub fn next(&mut self) -> usize {
        if self.current + 1 < self.catalog.len() {
            self.current += 1;
        }
        self.current
    }

    /// Move to the previous question without validating. Returns the new position.
    pub fn previous(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    /// Move to a position without validating. Out-of-range positions are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.catalog.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Save the current answers now, bypassing the debounce window.
    ///
    /// Returns the saved progress. Failures are reported to the caller and
    /// published as [`Notice::SaveFailed`].
    pub async fn save_progress(&mut self) -> Result<u8, SessionError> {
        self.ensure_open()?;
        match self.flusher.save(&self.answers).await {
            Ok(progress) => {
                tracing::info!(questionnaire = %self.questionnaire, progress, "progress saved");
                self.notify(Notice::Saved { progress });
                Ok(progress)
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    /// Submit the answers and close the session.
    ///
    /// Refused while required questions are unanswered. A failed submission
    /// leaves the session open.
    pub async fn complete(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;

        let missing: Vec<QuestionId> =
            validation::find_unsatisfied_required(&self.catalog, &self.answers)
                .into_iter()
                .map(|question| question.id().clone())
                .collect();
        if !missing.is_empty() {
            let count = missing.len();
            self.notify(Notice::MissingRequired { count });
            return Err(SessionError::MissingRequired {
                count,
                questions: missing,
            });
        }

        let had_pending = self.scheduler.cancel();
        match self.flusher.complete(&self.answers).await {
            Ok(()) => {
                tracing::info!(questionnaire = %self.questionnaire, "questionnaire completed");
                self.notify(Notice::Completed);
                Ok(())
            }
            Err(err) => {
                if had_pending {
                    self.scheduler.schedule(self.answers.clone());
                }
                Err(self.surface(err))
            }
        }
    }

    /// Whether leaving needs confirmation.
    pub fn request_exit(&self) -> ExitPrompt {
        if !self.state().is_completed() && self.answers.has_present() {
            ExitPrompt::Confirm
        } else {
            ExitPrompt::Immediate
        }
    }

    /// Act on the user's exit choice.
    ///
    /// If saving fails the session stays open and the error is returned.
    pub async fn resolve_exit(&mut self, choice: ExitChoice) -> Result<ExitOutcome, SessionError> {
        match choice {
            ExitChoice::Cancel => Ok(ExitOutcome::Stay),
            ExitChoice::Discard => {
                self.scheduler.cancel();
                Ok(ExitOutcome::Leave)
            }
            ExitChoice::SaveAndExit if self.state().is_completed() => Ok(ExitOutcome::Leave),
            ExitChoice::SaveAndExit => {
                self.save_progress().await?;
                Ok(ExitOutcome::Leave)
            }
        }
    }

    /// Flush pending edits right away, e.g. before the window loses focus.
    pub async fn flush(&mut self) -> Result<FlushOutcome, SessionError> {
        self.ensure_open()?;
        Ok(self.scheduler.flush_immediate(&self.answers).await)
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.state().is_completed() {
            Err(SessionError::Completed)
        } else {
            Ok(())
        }
    }

    fn surface(&self, err: anyhow::Error) -> SessionError {
        tracing::error!(questionnaire = %self.questionnaire, error = %err, "save failed");
        self.notify(Notice::SaveFailed {
            message: err.to_string(),
        });
        SessionError::Persistence(err)
    }

    fn notify(&self, notice: Notice) {
        // No subscribers is fine.
        let _ = self.notices.send(notice);
    }
}
