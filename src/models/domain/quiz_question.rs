use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One assessable question plus its correctness rule.
///
/// Questions are owned by their quiz and may only change while the quiz is in
/// draft; once a completed attempt references them they are historical record.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub question_type: QuestionType,
    /// Choice labels; required (>= 2) for multiple-choice questions.
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: AnswerValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub points: u32,
    /// Per-question countdown, seconds. Display concern only; scoring never
    /// reads it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<u32>,
    pub order: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    FillBlank,
    Essay,
}

/// A submitted or correct answer: a single string or a set of strings.
///
/// Serializes untagged, so the wire shape is a bare string or a string array.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Many(Vec<String>),
}

impl AnswerValue {
    pub fn single(value: impl Into<String>) -> Self {
        AnswerValue::Single(value.into())
    }

    pub fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Many(values.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Single(value) => value.is_empty(),
            AnswerValue::Many(values) => values.is_empty(),
        }
    }
}

impl Question {
    pub fn new(
        text: &str,
        question_type: QuestionType,
        options: Vec<String>,
        correct_answer: AnswerValue,
        points: u32,
        order: u32,
    ) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            question_type,
            options,
            correct_answer,
            explanation: None,
            points,
            time_limit_seconds: None,
            order,
            tags: Vec::new(),
        }
    }

    /// Essay questions have no automatic evaluator and are excluded from the
    /// automatic percentage denominator.
    pub fn is_auto_gradable(&self) -> bool {
        self.question_type != QuestionType::Essay
    }
}
