//! Answer validation.
//!
//! Two layers live here. Presence rules decide whether a question counts as
//! answered; they gate auto-advance and completion. Per-kind rules
//! ([`check_answer`]) describe what is wrong with a present answer and are
//! used for feedback only.

use crate::{AnswerValue, Answers, Question, QuestionCatalog, QuestionKind};

/// What is wrong with an answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnswerIssue {
    #[error("This question is required")]
    Required,

    #[error("Expected {expected}, got {actual}")]
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("At least {0} characters")]
    TooShort(usize),

    #[error("At most {0} characters")]
    TooLong(usize),

    #[error("Must be at least {0}")]
    BelowMinimum(f64),

    #[error("Must be at most {0}")]
    AboveMaximum(f64),

    #[error("'{0}' is not one of the options")]
    UnknownOption(String),

    #[error("Select at least {0} options")]
    TooFewSelections(usize),

    #[error("Select at most {0} options")]
    TooManySelections(usize),

    #[error("Scale value must be between 1 and {0}")]
    OutOfScale(u8),
}

/// Whether a possibly missing value counts as answered.
///
/// See [`AnswerValue::is_present`] for the rules on concrete values.
pub fn is_present(value: Option<&AnswerValue>) -> bool {
    value.is_some_and(AnswerValue::is_present)
}

/// Whether `question` is satisfied by `answers`.
///
/// Optional questions are always satisfied; required ones need a present answer.
pub fn is_question_satisfied(question: &Question, answers: &Answers) -> bool {
    !question.is_required() || is_present(answers.get(question.id()))
}

/// Required questions without a present answer, in catalog order.
pub fn find_unsatisfied_required<'a>(
    catalog: &'a QuestionCatalog,
    answers: &Answers,
) -> Vec<&'a Question> {
    catalog
        .iter()
        .filter(|question| !is_question_satisfied(question, answers))
        .collect()
}

/// Check a single answer against its question's configuration.
///
/// A missing or blank answer is only an issue for required questions.
pub fn check_answer(question: &Question, value: Option<&AnswerValue>) -> Result<(), AnswerIssue> {
    let value = match value {
        Some(value) if value.is_present() => value,
        _ if question.is_required() => return Err(AnswerIssue::Required),
        _ => return Ok(()),
    };

    match question.kind() {
        QuestionKind::Text(text) => {
            let s = expect(value.as_str(), "Text", value)?;
            let length = s.chars().count();
            if let Some(min) = text.min_length
                && length < min
            {
                return Err(AnswerIssue::TooShort(min));
            }
            if let Some(max) = text.max_length
                && length > max
            {
                return Err(AnswerIssue::TooLong(max));
            }
        }
        QuestionKind::Number(number) => {
            let n = expect(value.as_number(), "Number", value)?;
            if let Some(min) = number.min
                && n < min
            {
                return Err(AnswerIssue::BelowMinimum(min));
            }
            if let Some(max) = number.max
                && n > max
            {
                return Err(AnswerIssue::AboveMaximum(max));
            }
        }
        QuestionKind::Boolean => {
            expect(value.as_bool(), "Bool", value)?;
        }
        QuestionKind::SingleChoice(choice) => {
            let chosen = expect(value.as_str(), "Text", value)?;
            if !choice.options.iter().any(|option| option == chosen) {
                return Err(AnswerIssue::UnknownOption(chosen.to_string()));
            }
        }
        QuestionKind::MultiChoice(choice) => {
            let chosen = expect(value.as_choices(), "Choices", value)?;
            if let Some(unknown) = chosen.iter().find(|item| !choice.options.contains(item)) {
                return Err(AnswerIssue::UnknownOption(unknown.clone()));
            }
            if let Some(min) = choice.min_selections
                && chosen.len() < min
            {
                return Err(AnswerIssue::TooFewSelections(min));
            }
            if let Some(max) = choice.max_selections
                && chosen.len() > max
            {
                return Err(AnswerIssue::TooManySelections(max));
            }
        }
        QuestionKind::LikertScale(likert) => {
            let point = expect(value.as_int(), "Int", value)?;
            if !(1..=i64::from(likert.points)).contains(&point) {
                return Err(AnswerIssue::OutOfScale(likert.points));
            }
        }
    }

    Ok(())
}

/// All answer issues of a catalog, in catalog order.
pub fn review<'a>(
    catalog: &'a QuestionCatalog,
    answers: &Answers,
) -> Vec<(&'a Question, AnswerIssue)> {
    catalog
        .iter()
        .filter_map(|question| {
            check_answer(question, answers.get(question.id()))
                .err()
                .map(|issue| (question, issue))
        })
        .collect()
}

fn expect<T>(
    found: Option<T>,
    expected: &'static str,
    value: &AnswerValue,
) -> Result<T, AnswerIssue> {
    found.ok_or(AnswerIssue::WrongType {
        expected,
        actual: value.type_name(),
    })
}
