use serde::{Deserialize, Serialize};

/// A single answer value given to a question.
///
/// This is the value stored in `Answers` for each question. An unanswered
/// question has no entry at all; JSON `null` deserializes to `None` wherever an
/// `Option<AnswerValue>` is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// A yes/no answer (Boolean questions).
    Bool(bool),

    /// An integer answer (Number questions, Likert scale points).
    Int(i64),

    /// A floating-point answer (Number questions).
    Float(f64),

    /// A text answer (Text questions, the chosen option of SingleChoice questions).
    Text(String),

    /// The chosen options of a MultiChoice question.
    Choices(Vec<String>),
}

impl AnswerValue {
    /// Whether this value counts as answered.
    ///
    /// Booleans (including `false`) and numbers (including `0`) are always
    /// present. Text is present unless it is blank after trimming. A choice
    /// list is present unless it is empty; its elements are not inspected.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Bool(_) | Self::Int(_) | Self::Float(_) => true,
            Self::Text(s) => !s.trim().is_empty(),
            Self::Choices(items) => !items.is_empty(),
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a number, widening integers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as a list of chosen options.
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(items) => Some(items),
            _ => None,
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Float(_) => "Float",
            Self::Text(_) => "Text",
            Self::Choices(_) => "Choices",
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for AnswerValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for AnswerValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for AnswerValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(items: Vec<String>) -> Self {
        Self::Choices(items)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(items: Vec<&str>) -> Self {
        Self::Choices(items.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_edge_cases() {
        assert!(AnswerValue::Bool(false).is_present());
        assert!(AnswerValue::Int(0).is_present());
        assert!(AnswerValue::Float(0.0).is_present());
        assert!(!AnswerValue::from("").is_present());
        assert!(!AnswerValue::from("   \t").is_present());
        assert!(!AnswerValue::Choices(Vec::new()).is_present());
        assert!(AnswerValue::from(vec![" "]).is_present());
    }

    #[test]
    fn deserializes_untagged_json() {
        let values: Vec<Option<AnswerValue>> =
            serde_json::from_str(r#"[true, 3, 2.5, "yes", ["a", "b"], null]"#).unwrap();

        assert_eq!(
            values,
            vec![
                Some(AnswerValue::Bool(true)),
                Some(AnswerValue::Int(3)),
                Some(AnswerValue::Float(2.5)),
                Some(AnswerValue::from("yes")),
                Some(AnswerValue::from(vec!["a", "b"])),
                None,
            ]
        );
    }

    #[test]
    fn number_widening() {
        assert_eq!(AnswerValue::Int(4).as_number(), Some(4.0));
        assert_eq!(AnswerValue::from("4").as_number(), None);
    }
}
