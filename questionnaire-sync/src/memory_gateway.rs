//! In-memory persistence for tests and demos.
//!
//! `MemoryGateway` stores sessions in a map and records every write, so
//! session behavior can be checked without a server.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use questionnaire_sync::{MemoryGateway, RemoteSession, ResponseSession, SyncConfig};
//!
//! let gateway = MemoryGateway::new().with_session("intake", RemoteSession::pending(catalog));
//! let gateway = Arc::new(gateway);
//! let mut session =
//!     ResponseSession::load(gateway.clone(), "intake", SyncConfig::default()).await?;
//!
//! session.set_answer("name", Some("Ana".into()), false).await?;
//! session.save_progress().await?;
//!
//! assert_eq!(gateway.writes().len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use crate::{PersistenceGateway, PriorAnswer, RemoteSession, SaveRequest};

/// A persistence gateway backed by a map.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<String, RemoteSession>,
    writes: Vec<RecordedWrite>,
    fail_next: usize,
    latency: Option<Duration>,
}

/// A write the gateway accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedWrite {
    pub questionnaire: String,
    pub request: SaveRequest,
}

/// Error type for MemoryGateway.
#[derive(Debug, thiserror::Error)]
pub enum MemoryGatewayError {
    #[error("Unknown questionnaire: {0}")]
    UnknownQuestionnaire(String),

    #[error("Questionnaire '{0}' is already completed")]
    AlreadyCompleted(String),

    #[error("Injected failure")]
    Injected,
}

impl MemoryGateway {
    /// Create a new empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stored session.
    pub fn with_session(self, questionnaire: impl Into<String>, session: RemoteSession) -> Self {
        self.lock().sessions.insert(questionnaire.into(), session);
        self
    }

    /// Delay every call by `latency`.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = Some(latency);
        self
    }

    /// Make the next `count` writes fail.
    pub fn fail_next(&self, count: usize) {
        self.lock().fail_next = count;
    }

    /// Every accepted write, oldest first.
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.lock().writes.clone()
    }

    /// The stored session, as the next fetch would see it.
    pub fn session(&self, questionnaire: &str) -> Option<RemoteSession> {
        self.lock().sessions.get(questionnaire).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn wait(&self) {
        let latency = self.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn store(&self, questionnaire: &str, request: &SaveRequest) -> Result<(), MemoryGatewayError> {
        let mut inner = self.lock();
        if inner.fail_next > 0 {
            inner.fail_next -= 1;
            return Err(MemoryGatewayError::Injected);
        }

        let session = inner
            .sessions
            .get_mut(questionnaire)
            .ok_or_else(|| MemoryGatewayError::UnknownQuestionnaire(questionnaire.to_string()))?;
        if session.state.is_completed() {
            return Err(MemoryGatewayError::AlreadyCompleted(questionnaire.to_string()));
        }

        // Answers to questions outside the catalog are not stored.
        let stored: HashMap<_, _> = request
            .answers
            .iter()
            .filter(|record| session.catalog.contains(&record.question_id))
            .map(|record| {
                (
                    record.question_id.clone(),
                    PriorAnswer::new(record.value.clone()),
                )
            })
            .collect();
        session.prior_answers = stored;
        session.state = request.state;
        session.progress = request.progress;

        inner.writes.push(RecordedWrite {
            questionnaire: questionnaire.to_string(),
            request: request.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn fetch_session(&self, questionnaire: &str) -> anyhow::Result<RemoteSession> {
        self.wait().await;
        self.session(questionnaire).ok_or_else(|| {
            MemoryGatewayError::UnknownQuestionnaire(questionnaire.to_string()).into()
        })
    }

    async fn save_answers(&self, questionnaire: &str, request: &SaveRequest) -> anyhow::Result<()> {
        self.wait().await;
        Ok(self.store(questionnaire, request)?)
    }

    async fn complete_answers(
        &self,
        questionnaire: &str,
        request: &SaveRequest,
    ) -> anyhow::Result<()> {
        self.wait().await;
        Ok(self.store(questionnaire, request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questionnaire_types::{
        AnswerRecord, Question, QuestionCatalog, QuestionId, QuestionKind, SessionState,
        TextQuestion,
    };

    fn gateway() -> MemoryGateway {
        let catalog = QuestionCatalog::new([Question::new(
            "name",
            "Your name?",
            QuestionKind::Text(TextQuestion::new()),
        )])
        .unwrap();
        MemoryGateway::new().with_session("intake", RemoteSession::pending(catalog))
    }

    fn request(value: &str) -> SaveRequest {
        SaveRequest::in_progress(
            vec![AnswerRecord {
                question_id: "name".into(),
                value: value.into(),
            }],
            100,
        )
    }

    #[tokio::test]
    async fn stores_saved_answers() {
        let gateway = gateway();
        gateway.save_answers("intake", &request("Ana")).await.unwrap();

        let stored = gateway.session("intake").unwrap();
        assert_eq!(stored.state, SessionState::InProgress);
        assert_eq!(stored.progress, 100);
        assert_eq!(
            stored.prior_answers[&QuestionId::new("name")].value,
            Some("Ana".into())
        );
        assert_eq!(gateway.writes().len(), 1);
    }

    #[tokio::test]
    async fn injected_failures_are_not_recorded() {
        let gateway = gateway();
        gateway.fail_next(1);

        assert!(gateway.save_answers("intake", &request("Ana")).await.is_err());
        assert!(gateway.save_answers("intake", &request("Ana")).await.is_ok());
        assert_eq!(gateway.writes().len(), 1);
    }

    #[tokio::test]
    async fn refuses_writes_after_completion() {
        let gateway = gateway();
        gateway
            .complete_answers("intake", &SaveRequest::completed(Vec::new()))
            .await
            .unwrap();

        let err = gateway
            .save_answers("intake", &request("Ana"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already completed"));
    }

    #[tokio::test]
    async fn unknown_questionnaire() {
        let gateway = MemoryGateway::new();
        assert!(gateway.fetch_session("missing").await.is_err());
    }
}
