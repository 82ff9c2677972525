use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz::QuizDifficulty;
use crate::models::domain::quiz_question::{AnswerValue, Question, QuestionType};

/// Authoring input for a new draft quiz. Unset policy fields fall back to
/// the configured defaults.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: String,

    #[validate(length(min = 1))]
    pub course_id: String,

    #[validate(length(min = 1))]
    pub owner_id: String,

    #[validate(range(min = 0.0, max = 100.0))]
    pub passing_score: Option<f64>,

    #[validate(range(min = 1))]
    pub max_attempts: Option<u32>,

    #[validate(range(min = 1))]
    pub time_limit_minutes: Option<u32>,

    pub difficulty: Option<QuizDifficulty>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Authoring input for one question, applied to a draft quiz.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,

    pub question_type: QuestionType,

    #[serde(default)]
    pub options: Vec<String>,

    pub correct_answer: AnswerValue,

    #[validate(length(max = 2000))]
    pub explanation: Option<String>,

    #[validate(range(min = 1))]
    pub points: u32,

    #[validate(range(min = 1))]
    pub time_limit_seconds: Option<u32>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl QuestionInput {
    /// Cross-field rules the derive attributes cannot express.
    pub fn validate_structure(&self) -> AppResult<()> {
        if self.question_type == QuestionType::MultipleChoice && self.options.len() < 2 {
            return Err(AppError::ValidationError(
                "Multiple-choice question must have at least 2 options".to_string(),
            ));
        }
        if self.correct_answer.is_empty() {
            return Err(AppError::ValidationError(
                "Question must have a non-empty correct answer".to_string(),
            ));
        }
        Ok(())
    }

    pub fn into_question(self, order: u32) -> Question {
        Question {
            id: Uuid::new_v4().to_string(),
            text: self.text,
            question_type: self.question_type,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            points: self.points,
            time_limit_seconds: self.time_limit_seconds,
            order,
            tags: self.tags,
        }
    }
}
