use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_attempt::QuizAnswer;
use crate::models::domain::quiz_question::AnswerValue;

/// Output of scoring one attempt against its quiz. Carried into the
/// attempt's terminal transition and expanded into a `QuizResult` for
/// callers.
#[derive(Clone, Debug, PartialEq)]
pub struct AttemptScore {
    /// Stored answers rescored against the quiz definition.
    pub answers: Vec<QuizAnswer>,
    pub score: u32,
    /// Rounded to a whole percent for storage and display.
    pub percentage: f64,
    /// Unrounded ratio used for the pass decision.
    pub raw_percentage: f64,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub passed: bool,
}

/// Detailed report for a finalized attempt, including per-question review
/// rows in quiz order.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizResult {
    pub attempt_id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub score: u32,
    pub percentage: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub time_spent_seconds: u32,
    pub passed: bool,
    pub question_results: Vec<QuestionResult>,
}

/// One review row: what was asked, what was submitted, what was right.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub question_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_answer: Option<AnswerValue>,
    pub correct_answer: AnswerValue,
    pub is_correct: bool,
    pub points_earned: u32,
    pub points_possible: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}
