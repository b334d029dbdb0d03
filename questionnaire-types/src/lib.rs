//! Core types for questionnaire responses.
//!
//! This crate provides the presentation-agnostic building blocks of a
//! response session:
//! - `QuestionCatalog`, `Question` and `QuestionKind` - what is being asked
//! - `Answers`, `AnswerValue` and `QuestionId` - what has been answered so far
//! - `SessionState` - where the response is in its lifecycle
//! - `validation` and `progress` - pure rules over a catalog and its answers

mod question_id;
pub use question_id::QuestionId;

mod answer_value;
pub use answer_value::AnswerValue;

mod answers;
pub use answers::{AnswerRecord, Answers};

mod question;
pub use question::{
    ChoiceQuestion, Configuration, DEFAULT_LIKERT_POINTS, KindTag, LikertQuestion,
    MultiChoiceQuestion, NumberQuestion, Question, QuestionKind, QuestionRecord, TextQuestion,
};

mod catalog;
pub use catalog::QuestionCatalog;

mod session_state;
pub use session_state::SessionState;

mod error;
pub use error::CatalogError;

pub mod progress;
pub mod validation;
pub use validation::AnswerIssue;
