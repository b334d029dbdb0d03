use questionnaire_types::QuestionId;

/// User-facing notifications published by a response session.
///
/// Auto-save failures are logged, never published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An explicit save went through.
    Saved { progress: u8 },

    /// An explicit save or completion failed; the user may retry.
    SaveFailed { message: String },

    /// Auto-advance stopped on a required question without an answer.
    RequiredQuestion(QuestionId),

    /// Completion was refused because required questions are unanswered.
    MissingRequired { count: usize },

    /// The questionnaire was submitted.
    Completed,
}

impl Notice {
    /// Whether the notice reports a problem rather than a success.
    pub fn is_warning(&self) -> bool {
        !matches!(self, Self::Saved { .. } | Self::Completed)
    }
}
