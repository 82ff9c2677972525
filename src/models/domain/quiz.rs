use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz_question::Question;

/// An ordered, gradable set of questions plus publication and attempt policy.
///
/// Quizzes are immutable value records: every transition returns a new record
/// and the caller persists the replacement.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub course_id: String,
    pub owner_id: String,
    pub questions: Vec<Question>,
    /// Overall attempt countdown, minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    /// Percentage threshold in [0, 100] a completed attempt must reach.
    pub passing_score: f64,
    pub max_attempts: u32,
    pub difficulty: QuizDifficulty,
    pub status: QuizStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Quiz {
    pub fn new_draft(
        title: &str,
        description: &str,
        course_id: &str,
        owner_id: &str,
        passing_score: f64,
        max_attempts: u32,
        difficulty: QuizDifficulty,
    ) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            course_id: course_id.to_string(),
            owner_id: owner_id.to_string(),
            questions: Vec::new(),
            time_limit_minutes: None,
            passing_score,
            max_attempts,
            difficulty,
            status: QuizStatus::Draft,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of all question points, essays included.
    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }

    /// Sum of auto-gradable question points; the automatic percentage
    /// denominator.
    pub fn gradable_points(&self) -> u32 {
        self.questions
            .iter()
            .filter(|q| q.is_auto_gradable())
            .map(|q| q.points)
            .sum()
    }

    /// Published and, if a due date is set, not yet past it.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == QuizStatus::Published && self.due_date.map_or(true, |due| due > now)
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn published(&self, now: DateTime<Utc>) -> Self {
        Quiz {
            status: QuizStatus::Published,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn archived(&self, now: DateTime<Utc>) -> Self {
        Quiz {
            status: QuizStatus::Archived,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn with_question(&self, question: Question, now: DateTime<Utc>) -> Self {
        let mut questions = self.questions.clone();
        questions.push(question);
        Quiz {
            questions,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Replaces the question with the same id, keeping its position.
    pub fn with_updated_question(&self, question: Question, now: DateTime<Utc>) -> Self {
        let questions = self
            .questions
            .iter()
            .map(|existing| {
                if existing.id == question.id {
                    question.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        Quiz {
            questions,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Removes the question and compacts the order indexes of the rest.
    pub fn without_question(&self, question_id: &str, now: DateTime<Utc>) -> Self {
        let questions = self
            .questions
            .iter()
            .filter(|q| q.id != question_id)
            .cloned()
            .enumerate()
            .map(|(index, mut question)| {
                question.order = index as u32;
                question
            })
            .collect();
        Quiz {
            questions,
            updated_at: now,
            ..self.clone()
        }
    }
}
