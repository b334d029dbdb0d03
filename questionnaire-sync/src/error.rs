use questionnaire_types::{CatalogError, QuestionId};

/// Error type for response session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session has been completed; answers can no longer change.
    #[error("Questionnaire already completed")]
    Completed,

    /// The question does not belong to this questionnaire.
    #[error("Unknown question: {0}")]
    UnknownQuestion(QuestionId),

    /// Required questions are still unanswered.
    #[error("{count} required questions are still unanswered")]
    MissingRequired {
        count: usize,
        questions: Vec<QuestionId>,
    },

    /// The questionnaire document could not be turned into a catalog.
    ///
    /// Produced on load when the gateway's failure is a [`CatalogError`].
    #[error("Invalid questionnaire: {0}")]
    Catalog(#[from] CatalogError),

    /// An explicit save, completion, or load failed in the persistence store.
    #[error("Persistence error: {0}")]
    Persistence(#[from] anyhow::Error),
}

impl SessionError {
    /// Check if this error is a validation failure the user can fix by answering.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingRequired { .. })
    }

    /// Check if this error came from the persistence store (worth retrying).
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
