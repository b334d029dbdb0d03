use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{CatalogError, Question, QuestionId, QuestionKind};

/// Smallest and largest scale an author may configure for a Likert question.
const LIKERT_POINTS: std::ops::RangeInclusive<u8> = 3..=10;

/// The ordered list of questions of a questionnaire.
///
/// Questions are sorted by their `order` (ties keep their given sequence) and
/// identifiers are unique. A catalog is immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct QuestionCatalog {
    questions: Vec<Question>,
    positions: HashMap<QuestionId, usize>,
}

impl QuestionCatalog {
    /// Build a catalog, sorting by order and rejecting duplicate identifiers.
    pub fn new(questions: impl IntoIterator<Item = Question>) -> Result<Self, CatalogError> {
        let mut questions: Vec<Question> = questions.into_iter().collect();
        questions.sort_by_key(Question::order);

        let mut positions = HashMap::with_capacity(questions.len());
        for (index, question) in questions.iter().enumerate() {
            if positions.insert(question.id().clone(), index).is_some() {
                return Err(CatalogError::DuplicateQuestion(question.id().clone()));
            }
        }

        Ok(Self {
            questions,
            positions,
        })
    }

    /// Create an empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the questions in traversal order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Iterate over the questions in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    /// Get the question at a position.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Look a question up by identifier.
    pub fn find(&self, id: &QuestionId) -> Option<&Question> {
        self.position(id).map(|index| &self.questions[index])
    }

    /// Position of a question in traversal order.
    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Check if a question with this identifier belongs to the catalog.
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.positions.contains_key(id)
    }

    /// Check if the catalog has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Report authoring mistakes that do not prevent answering.
    ///
    /// Choice questions need at least two distinct, non-blank options and a
    /// Likert scale needs between 3 and 10 points.
    pub fn lint(&self) -> Vec<CatalogError> {
        let mut problems = Vec::new();
        for question in &self.questions {
            let reason = match question.kind() {
                QuestionKind::SingleChoice(_) | QuestionKind::MultiChoice(_) => {
                    let options = question.kind().options().unwrap_or_default();
                    if options.len() < 2 {
                        Some("needs at least 2 options".to_string())
                    } else if options.iter().any(|option| option.trim().is_empty()) {
                        Some("options must not be blank".to_string())
                    } else if has_duplicates(options) {
                        Some("options must be unique".to_string())
                    } else {
                        None
                    }
                }
                QuestionKind::LikertScale(likert) if !LIKERT_POINTS.contains(&likert.points) => {
                    Some(format!(
                        "scale must have between {} and {} points",
                        LIKERT_POINTS.start(),
                        LIKERT_POINTS.end()
                    ))
                }
                _ => None,
            };

            if let Some(reason) = reason {
                problems.push(CatalogError::InvalidConfiguration {
                    question: question.id().clone(),
                    reason,
                });
            }
        }
        problems
    }
}

fn has_duplicates(options: &[String]) -> bool {
    options
        .iter()
        .enumerate()
        .any(|(index, option)| options[..index].contains(option))
}

impl TryFrom<Vec<Question>> for QuestionCatalog {
    type Error = CatalogError;

    fn try_from(questions: Vec<Question>) -> Result<Self, Self::Error> {
        Self::new(questions)
    }
}

impl From<QuestionCatalog> for Vec<Question> {
    fn from(catalog: QuestionCatalog) -> Self {
        catalog.questions
    }
}

impl<'a> IntoIterator for &'a QuestionCatalog {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChoiceQuestion, LikertQuestion, TextQuestion};

    fn text(id: &str, order: i32) -> Question {
        Question::new(id, id, QuestionKind::Text(TextQuestion::new())).with_order(order)
    }

    #[test]
    fn sorts_by_order_stably() {
        let catalog =
            QuestionCatalog::new(vec![text("c", 3), text("a", 1), text("b", 1)]).unwrap();

        let ids: Vec<_> = catalog.iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(catalog.position(&"c".into()), Some(2));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = QuestionCatalog::new(vec![text("a", 1), text("a", 2)]);
        assert!(matches!(result, Err(CatalogError::DuplicateQuestion(id)) if id.as_str() == "a"));
    }

    #[test]
    fn lint_reports_authoring_problems() {
        let catalog = QuestionCatalog::new(vec![
            Question::new("one", "?", QuestionKind::SingleChoice(ChoiceQuestion::new(["only"]))),
            Question::new("dup", "?", QuestionKind::SingleChoice(ChoiceQuestion::new(["x", "x"]))),
            Question::new("scale", "?", QuestionKind::LikertScale(LikertQuestion::new(2))),
            Question::new("ok", "?", QuestionKind::SingleChoice(ChoiceQuestion::new(["x", "y"]))),
        ])
        .unwrap();

        let flagged: Vec<_> = catalog
            .lint()
            .into_iter()
            .map(|problem| {
                assert!(matches!(problem, CatalogError::InvalidConfiguration { .. }));
                problem.question().to_string()
            })
            .collect();
        assert_eq!(flagged, vec!["one", "dup", "scale"]);
    }

    #[test]
    fn deserializes_from_question_list() {
        let catalog: QuestionCatalog = serde_json::from_str(
            r#"[{"id": "b", "tipo": "abierta", "orden": 2},
                {"id": "a", "tipo": "verdadero_falso", "orden": 1}]"#,
        )
        .unwrap();

        assert_eq!(catalog.get(0).map(|q| q.id().as_str()), Some("a"));
        assert_eq!(catalog.len(), 2);
    }
}
