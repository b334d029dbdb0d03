use crate::QuestionId;

/// Error type for building a question catalog.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// Two questions share an identifier.
    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),

    /// A question's configuration breaks an authoring rule.
    #[error("Invalid configuration for question '{question}': {reason}")]
    InvalidConfiguration { question: QuestionId, reason: String },
}

impl CatalogError {
    /// The question this error is about.
    pub fn question(&self) -> &QuestionId {
        match self {
            Self::DuplicateQuestion(id) | Self::InvalidConfiguration { question: id, .. } => id,
        }
    }
}
