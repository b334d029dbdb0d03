use serde::{Deserialize, Serialize};

use crate::QuestionId;

/// Default number of points on a Likert scale when the configuration omits it.
pub const DEFAULT_LIKERT_POINTS: u8 = 5;

/// A single question in a questionnaire.
///
/// Questions are authored elsewhere and are immutable for the duration of a
/// response session; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    /// Identifier used as the key in `Answers`.
    id: QuestionId,

    /// The prompt text shown to the respondent.
    text: String,

    /// The kind of question (determines what counts as a valid answer).
    kind: QuestionKind,

    /// Whether an answer is needed before completion.
    required: bool,

    /// Position in the questionnaire; questions are traversed in ascending order.
    order: i32,
}

impl Question {
    /// Create a new optional question with order `0`.
    pub fn new(id: impl Into<QuestionId>, text: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind,
            required: false,
            order: 0,
        }
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the position of the question.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Get the question identifier.
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Get the prompt text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the question kind.
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Check if the question must be answered before completion.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Get the position of the question.
    pub fn order(&self) -> i32 {
        self.order
    }
}

/// The kind of question, determining which answers are acceptable.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Free text input.
    Text(TextQuestion),

    /// Numeric input with optional bounds.
    Number(NumberQuestion),

    /// True/false.
    Boolean,

    /// Pick exactly one option (radio buttons, drop-down lists).
    SingleChoice(ChoiceQuestion),

    /// Pick any number of options (checkboxes).
    MultiChoice(MultiChoiceQuestion),

    /// A point on an agreement scale, `1..=points`.
    LikertScale(LikertQuestion),
}

impl QuestionKind {
    /// The type tag of this kind.
    pub fn tag(&self) -> KindTag {
        match self {
            Self::Text(_) => KindTag::Text,
            Self::Number(_) => KindTag::Number,
            Self::Boolean => KindTag::Boolean,
            Self::SingleChoice(_) => KindTag::SingleChoice,
            Self::MultiChoice(_) => KindTag::MultiChoice,
            Self::LikertScale(_) => KindTag::LikertScale,
        }
    }

    /// The options of a choice question, if this is one.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::SingleChoice(choice) => Some(&choice.options),
            Self::MultiChoice(choice) => Some(&choice.options),
            _ => None,
        }
    }
}

/// Configuration for a free text question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextQuestion {
    /// Minimum number of characters.
    pub min_length: Option<usize>,

    /// Maximum number of characters.
    pub max_length: Option<usize>,
}

impl TextQuestion {
    /// Create an unbounded text question.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with length bounds.
    pub fn with_bounds(min_length: Option<usize>, max_length: Option<usize>) -> Self {
        Self {
            min_length,
            max_length,
        }
    }
}

/// Configuration for a numeric question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberQuestion {
    /// Optional minimum value.
    pub min: Option<f64>,

    /// Optional maximum value.
    pub max: Option<f64>,
}

impl NumberQuestion {
    /// Create an unbounded numeric question.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with bounds.
    pub fn with_bounds(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
}

/// Configuration for a single-choice question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceQuestion {
    /// The options to choose from, in display order.
    pub options: Vec<String>,
}

impl ChoiceQuestion {
    /// Create with the given options.
    pub fn new<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Configuration for a multi-choice question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiChoiceQuestion {
    /// The options to choose from, in display order.
    pub options: Vec<String>,

    /// Optional minimum number of selections.
    pub min_selections: Option<usize>,

    /// Optional maximum number of selections.
    pub max_selections: Option<usize>,
}

impl MultiChoiceQuestion {
    /// Create with the given options and no selection bounds.
    pub fn new<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            min_selections: None,
            max_selections: None,
        }
    }

    /// Set selection count constraints.
    pub fn with_selection_bounds(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_selections = min;
        self.max_selections = max;
        self
    }
}

/// Configuration for a Likert scale question.
#[derive(Debug, Clone, PartialEq)]
pub struct LikertQuestion {
    /// Number of points on the scale.
    pub points: u8,
}

impl LikertQuestion {
    /// Create a scale with the given number of points.
    pub fn new(points: u8) -> Self {
        Self { points }
    }
}

impl Default for LikertQuestion {
    fn default() -> Self {
        Self::new(DEFAULT_LIKERT_POINTS)
    }
}

/// Type tag of a question as it appears in questionnaire documents.
///
/// Also accepts the tags used by the questionnaire-authoring backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    #[serde(alias = "abierta")]
    Text,
    Number,
    #[serde(alias = "verdadero_falso")]
    Boolean,
    #[serde(alias = "opcion_multiple", alias = "select", alias = "radio_button")]
    SingleChoice,
    #[serde(alias = "checkbox")]
    MultiChoice,
    #[serde(alias = "escala_likert")]
    LikertScale,
}

/// Type-dependent settings of a question as they appear in questionnaire documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(alias = "opciones", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Turns a single-choice tag into a multi-choice question.
    #[serde(alias = "seleccion_multiple", skip_serializing_if = "std::ops::Not::not")]
    pub multiple_selection: bool,

    #[serde(alias = "longitud_minima", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(
        alias = "limite_caracteres",
        alias = "longitud_maxima",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(alias = "minimo_selecciones", skip_serializing_if = "Option::is_none")]
    pub min_selections: Option<usize>,

    #[serde(alias = "maximo_selecciones", skip_serializing_if = "Option::is_none")]
    pub max_selections: Option<usize>,

    #[serde(alias = "puntos_escala", skip_serializing_if = "Option::is_none")]
    pub points: Option<u8>,
}

/// Document form of a `Question`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,

    #[serde(rename = "type", alias = "tipo")]
    pub kind: KindTag,

    #[serde(default, alias = "texto")]
    pub text: String,

    #[serde(default, alias = "obligatoria")]
    pub required: bool,

    #[serde(default, alias = "orden")]
    pub order: i32,

    #[serde(default, alias = "configuracion")]
    pub configuration: Configuration,
}

impl From<QuestionRecord> for Question {
    fn from(record: QuestionRecord) -> Self {
        let config = record.configuration;
        let kind = match record.kind {
            KindTag::Text => {
                QuestionKind::Text(TextQuestion::with_bounds(config.min_length, config.max_length))
            }
            KindTag::Number => {
                QuestionKind::Number(NumberQuestion::with_bounds(config.min, config.max))
            }
            KindTag::Boolean => QuestionKind::Boolean,
            KindTag::SingleChoice if !config.multiple_selection => {
                QuestionKind::SingleChoice(ChoiceQuestion::new(config.options))
            }
            KindTag::SingleChoice | KindTag::MultiChoice => QuestionKind::MultiChoice(
                MultiChoiceQuestion::new(config.options)
                    .with_selection_bounds(config.min_selections, config.max_selections),
            ),
            KindTag::LikertScale => QuestionKind::LikertScale(LikertQuestion::new(
                config.points.unwrap_or(DEFAULT_LIKERT_POINTS),
            )),
        };

        Self {
            id: record.id,
            text: record.text,
            kind,
            required: record.required,
            order: record.order,
        }
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        let kind = question.kind.tag();
        let mut configuration = Configuration::default();
        match question.kind {
            QuestionKind::Text(text) => {
                configuration.min_length = text.min_length;
                configuration.max_length = text.max_length;
            }
            QuestionKind::Number(number) => {
                configuration.min = number.min;
                configuration.max = number.max;
            }
            QuestionKind::Boolean => {}
            QuestionKind::SingleChoice(choice) => configuration.options = choice.options,
            QuestionKind::MultiChoice(choice) => {
                configuration.options = choice.options;
                configuration.min_selections = choice.min_selections;
                configuration.max_selections = choice.max_selections;
            }
            QuestionKind::LikertScale(likert) => configuration.points = Some(likert.points),
        }

        Self {
            id: question.id,
            kind,
            text: question.text,
            required: question.required,
            order: question.order,
            configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_vocabulary() {
        let question: Question = serde_json::from_str(
            r#"{
                "id": "p1",
                "tipo": "checkbox",
                "texto": "Which subjects?",
                "obligatoria": true,
                "orden": 2,
                "configuracion": { "opciones": ["Math", "Art"], "minimo_selecciones": 1 }
            }"#,
        )
        .unwrap();

        assert_eq!(question.id().as_str(), "p1");
        assert!(question.is_required());
        assert_eq!(question.order(), 2);
        assert_eq!(
            question.kind(),
            &QuestionKind::MultiChoice(
                MultiChoiceQuestion::new(["Math", "Art"]).with_selection_bounds(Some(1), None)
            )
        );
    }

    #[test]
    fn multiple_selection_flag_upgrades_single_choice() {
        let question: Question = serde_json::from_str(
            r#"{"id": "p1", "type": "opcion_multiple",
                "configuration": {"options": ["a", "b"], "multiple_selection": true}}"#,
        )
        .unwrap();

        assert!(matches!(question.kind(), QuestionKind::MultiChoice(_)));
    }

    #[test]
    fn likert_defaults_to_five_points() {
        let question: Question =
            serde_json::from_str(r#"{"id": "p1", "type": "escala_likert"}"#).unwrap();

        assert_eq!(
            question.kind(),
            &QuestionKind::LikertScale(LikertQuestion::new(5))
        );
    }

    #[test]
    fn record_keeps_kind_tag() {
        let question = Question::new(
            "q1",
            "Agree?",
            QuestionKind::LikertScale(LikertQuestion::new(7)),
        )
        .required()
        .with_order(3);

        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["type"], "likert_scale");
        assert_eq!(json["configuration"]["points"], 7);

        let back: Question = serde_json::from_value(json).unwrap();
        assert_eq!(back, question);
    }
}
