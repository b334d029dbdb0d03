use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AnswerValue, QuestionCatalog, QuestionId};

/// The answers given so far in a response session.
///
/// Keys are question identifiers; a question without an entry is unanswered.
/// Entries are kept in key order so that two stores with the same contents
/// always serialize identically.
///
/// Updates through [`Answers::set`] and [`Answers::clear`] are pure: they
/// return a new store and leave the receiver untouched, so callers can diff
/// the old and new state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    values: BTreeMap<QuestionId, AnswerValue>,
}

impl Answers {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Keep the prior answers that still belong to `catalog` and are present.
    ///
    /// Answers to questions that have been retired or renamed since the
    /// session started are dropped, as are empty placeholders, so neither can
    /// resurface as "answered".
    pub fn hydrate<I, K>(prior: I, catalog: &QuestionCatalog) -> Self
    where
        I: IntoIterator<Item = (K, Option<AnswerValue>)>,
        K: Into<QuestionId>,
    {
        let values = prior
            .into_iter()
            .filter_map(|(id, value)| Some((id.into(), value?)))
            .filter(|(id, value)| catalog.contains(id) && value.is_present())
            .collect();
        Self { values }
    }

    /// Get the answer to a question.
    pub fn get(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.values.get(id)
    }

    /// Return a copy of this store with `id` answered by `value`.
    pub fn set(&self, id: impl Into<QuestionId>, value: impl Into<AnswerValue>) -> Self {
        let mut next = self.clone();
        next.values.insert(id.into(), value.into());
        next
    }

    /// Return a copy of this store without an answer for `id`.
    pub fn clear(&self, id: &QuestionId) -> Self {
        let mut next = self.clone();
        next.values.remove(id);
        next
    }

    /// Count the answers that belong to `catalog` and are present.
    ///
    /// Keys unknown to the catalog are ignored.
    pub fn count_answered(&self, catalog: &QuestionCatalog) -> usize {
        self.values
            .iter()
            .filter(|(id, value)| catalog.contains(id) && value.is_present())
            .count()
    }

    /// Check if at least one stored answer is present.
    pub fn has_present(&self) -> bool {
        self.values.values().any(AnswerValue::is_present)
    }

    /// The answers worth persisting: present, known to `catalog`, in catalog order.
    pub fn records(&self, catalog: &QuestionCatalog) -> Vec<AnswerRecord> {
        catalog
            .iter()
            .filter_map(|question| {
                let value = self.values.get(question.id())?;
                value.is_present().then(|| AnswerRecord {
                    question_id: question.id().clone(),
                    value: value.clone(),
                })
            })
            .collect()
    }

    /// Get an iterator over all id-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.values.iter()
    }

    /// Get the number of stored answers, present or not.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no stored answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<QuestionId>, V: Into<AnswerValue>> FromIterator<(K, V)> for Answers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(id, value)| (id.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Answers {
    type Item = (QuestionId, AnswerValue);
    type IntoIter = std::collections::btree_map::IntoIter<QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = (&'a QuestionId, &'a AnswerValue);
    type IntoIter = std::collections::btree_map::Iter<'a, QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// One answer as sent to the persistence store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub value: AnswerValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Question, QuestionKind, TextQuestion};

    fn catalog(ids: &[&str]) -> QuestionCatalog {
        QuestionCatalog::new(
            ids.iter()
                .map(|id| Question::new(*id, *id, QuestionKind::Text(TextQuestion::new()))),
        )
        .unwrap()
    }

    #[test]
    fn set_does_not_alias() {
        let before = Answers::new().set("q1", "a");
        let after = before.set("q1", "b");

        assert_eq!(before.get(&"q1".into()), Some(&AnswerValue::from("a")));
        assert_eq!(after.get(&"q1".into()), Some(&AnswerValue::from("b")));
    }

    #[test]
    fn hydrate_keeps_only_known_present_answers() {
        let catalog = catalog(&["q1", "q2"]);
        let prior = vec![
            ("q1", Some(AnswerValue::from(""))),
            ("q2", Some(AnswerValue::from("yes"))),
            ("q3", Some(AnswerValue::from("orphan"))),
        ];

        let answers = Answers::hydrate(prior, &catalog);

        assert_eq!(answers, Answers::from_iter([("q2", "yes")]));
    }

    #[test]
    fn hydrate_drops_nulls() {
        let catalog = catalog(&["q1"]);
        let answers = Answers::hydrate([("q1", None)], &catalog);
        assert!(answers.is_empty());
    }

    #[test]
    fn count_ignores_unknown_and_blank() {
        let catalog = catalog(&["q1", "q2", "q3"]);
        let answers = Answers::from_iter([
            ("q1", AnswerValue::from("x")),
            ("q2", AnswerValue::from(" ")),
            ("stale", AnswerValue::from("y")),
        ]);

        assert_eq!(answers.count_answered(&catalog), 1);
    }

    #[test]
    fn records_follow_catalog_order() {
        let catalog = catalog(&["b", "a", "c"]);
        let answers = Answers::from_iter([
            ("a", AnswerValue::Int(1)),
            ("b", AnswerValue::Bool(false)),
            ("c", AnswerValue::Choices(Vec::new())),
        ]);

        let ids: Vec<_> = answers
            .records(&catalog)
            .into_iter()
            .map(|record| record.question_id.to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
