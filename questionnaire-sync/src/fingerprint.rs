use std::fmt;

use questionnaire_types::{AnswerRecord, AnswerValue};
use sha2::{Digest, Sha256};

/// Content hash of a persistable answer set.
///
/// Two answer sets with equal records hash equally regardless of how the
/// underlying maps were built. Used to suppress writes that would not change
/// what the store already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Hash a list of records.
    pub fn of(records: &[AnswerRecord]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((records.len() as u64).to_be_bytes());
        for record in records {
            feed(&mut hasher, record.question_id.as_str().as_bytes());
            match &record.value {
                AnswerValue::Bool(b) => hasher.update([b'b', u8::from(*b)]),
                AnswerValue::Int(i) => {
                    hasher.update([b'i']);
                    hasher.update(i.to_be_bytes());
                }
                AnswerValue::Float(f) => {
                    hasher.update([b'f']);
                    hasher.update(f.to_bits().to_be_bytes());
                }
                AnswerValue::Text(s) => {
                    hasher.update([b't']);
                    feed(&mut hasher, s.as_bytes());
                }
                AnswerValue::Choices(items) => {
                    hasher.update([b'c']);
                    hasher.update((items.len() as u64).to_be_bytes());
                    for item in items {
                        feed(&mut hasher, item.as_bytes());
                    }
                }
            }
        }
        Self(hasher.finalize().into())
    }
}

// Length-prefixed so that ("ab", "c") and ("a", "bc") differ.
fn feed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questionnaire_types::{Answers, Question, QuestionCatalog, QuestionKind};

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::new(["a", "b", "c"].map(|id| Question::new(id, id, QuestionKind::Boolean)))
            .unwrap()
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let catalog = catalog();
        let one = Answers::new().set("a", true).set("b", false);
        let two = Answers::new().set("b", false).set("a", true);

        assert_eq!(
            Fingerprint::of(&one.records(&catalog)),
            Fingerprint::of(&two.records(&catalog))
        );
    }

    #[test]
    fn blank_answers_hash_like_missing_ones() {
        let catalog = catalog();
        let with_blank = Answers::new().set("a", true).set("c", "  ");
        let without = Answers::new().set("a", true);

        assert_eq!(
            Fingerprint::of(&with_blank.records(&catalog)),
            Fingerprint::of(&without.records(&catalog))
        );
    }

    #[test]
    fn values_are_distinguished() {
        let catalog = catalog();
        let yes = Answers::new().set("a", true);
        let no = Answers::new().set("a", false);
        let text = Answers::new().set("a", "true");

        let yes = Fingerprint::of(&yes.records(&catalog));
        assert_ne!(yes, Fingerprint::of(&no.records(&catalog)));
        assert_ne!(yes, Fingerprint::of(&text.records(&catalog)));
    }

    #[test]
    fn choice_boundaries_matter() {
        let left = vec![AnswerRecord {
            question_id: "a".into(),
            value: AnswerValue::from(vec!["ab", "c"]),
        }];
        let right = vec![AnswerRecord {
            question_id: "a".into(),
            value: AnswerValue::from(vec!["a", "bc"]),
        }];
        assert_ne!(Fingerprint::of(&left), Fingerprint::of(&right));
    }
}
