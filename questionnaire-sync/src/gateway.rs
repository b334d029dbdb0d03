use std::collections::HashMap;

use async_trait::async_trait;
use questionnaire_types::{AnswerRecord, AnswerValue, QuestionCatalog, QuestionId, SessionState};
use serde::{Deserialize, Serialize};

/// Remote store holding a respondent's answers.
///
/// The engine never sees transport details: any failure is an `anyhow::Error`,
/// and the engine decides whether to swallow it (auto-save) or surface it
/// (explicit save, completion, load).
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Load the catalog and whatever was saved for it before.
    async fn fetch_session(&self, questionnaire: &str) -> anyhow::Result<RemoteSession>;

    /// Store an in-progress snapshot of the answers.
    async fn save_answers(&self, questionnaire: &str, request: &SaveRequest) -> anyhow::Result<()>;

    /// Store the final answers and mark the response as completed.
    async fn complete_answers(
        &self,
        questionnaire: &str,
        request: &SaveRequest,
    ) -> anyhow::Result<()>;
}

/// A response session as the store knows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteSession {
    #[serde(alias = "preguntas")]
    pub catalog: QuestionCatalog,

    #[serde(default, alias = "respuestas_previas")]
    pub prior_answers: HashMap<QuestionId, PriorAnswer>,

    #[serde(default, alias = "estado_respuesta")]
    pub state: SessionState,

    #[serde(default, alias = "progreso")]
    pub progress: u8,
}

impl RemoteSession {
    /// A session that has never been saved.
    pub fn pending(catalog: QuestionCatalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Set the previously saved answers.
    pub fn with_prior_answers<K, V>(mut self, answers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<QuestionId>,
        V: Into<AnswerValue>,
    {
        self.prior_answers = answers
            .into_iter()
            .map(|(id, value)| (id.into(), PriorAnswer::new(value)))
            .collect();
        self
    }

    /// Set the stored lifecycle state and progress.
    pub fn with_state(mut self, state: SessionState, progress: u8) -> Self {
        self.state = state;
        self.progress = progress;
        self
    }
}

/// A previously saved answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorAnswer {
    #[serde(default, alias = "valor")]
    pub value: Option<AnswerValue>,

    /// Free text typed next to an "other" option. Carried by the store but not
    /// used when answering.
    #[serde(default, alias = "texto_otro", skip_serializing_if = "Option::is_none")]
    pub other_text: Option<String>,
}

impl PriorAnswer {
    pub fn new(value: impl Into<AnswerValue>) -> Self {
        Self {
            value: Some(value.into()),
            other_text: None,
        }
    }
}

/// Payload of a save or completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub answers: Vec<AnswerRecord>,
    pub state: SessionState,
    pub progress: u8,
}

impl SaveRequest {
    /// An in-progress snapshot.
    pub fn in_progress(answers: Vec<AnswerRecord>, progress: u8) -> Self {
        Self {
            answers,
            state: SessionState::InProgress,
            progress,
        }
    }

    /// The final submission; progress is always reported as complete.
    pub fn completed(answers: Vec<AnswerRecord>) -> Self {
        Self {
            answers,
            state: SessionState::Completed,
            progress: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_document() {
        let session: RemoteSession = serde_json::from_str(
            r#"{
                "preguntas": [
                    {"id": "p1", "tipo": "abierta", "texto": "Name?",
                     "obligatoria": true, "orden": 1},
                    {"id": "p2", "tipo": "radio_button", "orden": 2,
                     "configuracion": {"opciones": ["Yes", "No"]}}
                ],
                "respuestas_previas": {
                    "p1": {"valor": "Ana", "texto_otro": null},
                    "p2": {"valor": null}
                },
                "estado_respuesta": "en_progreso",
                "progreso": 50
            }"#,
        )
        .unwrap();

        assert_eq!(session.catalog.len(), 2);
        assert_eq!(session.state, SessionState::InProgress);
        assert_eq!(session.progress, 50);
        assert_eq!(
            session.prior_answers[&QuestionId::new("p1")].value,
            Some(AnswerValue::from("Ana"))
        );
        assert_eq!(session.prior_answers[&QuestionId::new("p2")].value, None);
    }

    #[test]
    fn completion_always_reports_full_progress() {
        let request = SaveRequest::completed(Vec::new());
        assert_eq!(request.progress, 100);
        assert_eq!(request.state, SessionState::Completed);
    }
}
