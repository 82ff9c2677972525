use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz::Quiz;
use crate::models::domain::quiz_question::AnswerValue;
use crate::models::domain::quiz_result::AttemptScore;

/// One student's pass at a quiz, tracked from start to a terminal outcome.
///
/// `in-progress` is the only non-terminal state; `completed`, `timed-out` and
/// `abandoned` are terminal and an attempt is never mutated after reaching
/// one. Like `Quiz`, attempts are immutable value records: transitions return
/// a new record for the caller to persist.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub status: AttemptStatus,
    pub answers: Vec<QuizAnswer>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Aggregates are populated only when the attempt is finalized with a
    /// score; abandoned attempts keep them unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptStatus {
    InProgress,
    Completed,
    TimedOut,
    Abandoned,
}

impl AttemptStatus {
    pub fn is_terminal(&self) -> bool {
        *self != AttemptStatus::InProgress
    }
}

/// One stored answer within an attempt, keyed by question id.
///
/// `is_correct` and `points_earned` are provisional (false/0) until the
/// owning attempt is finalized; the scoring engine always recomputes them
/// from the authoritative question definition.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAnswer {
    pub question_id: String,
    pub value: AnswerValue,
    pub is_correct: bool,
    pub points_earned: u32,
    pub time_spent_seconds: u32,
}

impl QuizAnswer {
    pub fn provisional(question_id: &str, value: AnswerValue, time_spent_seconds: u32) -> Self {
        QuizAnswer {
            question_id: question_id.to_string(),
            value,
            is_correct: false,
            points_earned: 0,
            time_spent_seconds,
        }
    }
}

impl QuizAttempt {
    pub fn new_in_progress(quiz_id: &str, student_id: &str, started_at: DateTime<Utc>) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            student_id: student_id.to_string(),
            status: AttemptStatus::InProgress,
            answers: Vec::new(),
            started_at,
            ended_at: None,
            score: None,
            percentage: None,
            passed: None,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == AttemptStatus::InProgress
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&QuizAnswer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    /// Upserts an answer by question id: a later submission for the same
    /// question replaces the earlier one in place.
    pub fn with_answer(&self, answer: QuizAnswer) -> Self {
        let mut answers = self.answers.clone();
        match answers
            .iter_mut()
            .find(|a| a.question_id == answer.question_id)
        {
            Some(existing) => *existing = answer,
            None => answers.push(answer),
        }
        QuizAttempt {
            answers,
            ..self.clone()
        }
    }

    /// Terminal transition carrying a computed score; used for both explicit
    /// completion and timeout.
    pub fn finalized(
        &self,
        outcome: AttemptStatus,
        score: AttemptScore,
        ended_at: DateTime<Utc>,
    ) -> Self {
        QuizAttempt {
            status: outcome,
            answers: score.answers,
            ended_at: Some(ended_at),
            score: Some(score.score),
            percentage: Some(score.percentage),
            passed: Some(score.passed),
            ..self.clone()
        }
    }

    /// Terminal transition without scoring; aggregates stay unset.
    pub fn abandoned(&self, ended_at: DateTime<Utc>) -> Self {
        QuizAttempt {
            status: AttemptStatus::Abandoned,
            ended_at: Some(ended_at),
            ..self.clone()
        }
    }

    /// Whole seconds between start and end (or `now` while unfinished),
    /// clamped at zero.
    pub fn time_spent_seconds(&self, now: DateTime<Utc>) -> u32 {
        let end = self.ended_at.unwrap_or(now);
        (end - self.started_at).num_seconds().max(0) as u32
    }

    /// When the quiz time limit runs out for this attempt, if it has one.
    pub fn deadline(&self, quiz: &Quiz) -> Option<DateTime<Utc>> {
        quiz.time_limit_minutes
            .map(|minutes| self.started_at + Duration::minutes(i64::from(minutes)))
    }

    pub fn has_expired(&self, quiz: &Quiz, now: DateTime<Utc>) -> bool {
        self.deadline(quiz).map_or(false, |deadline| now >= deadline)
    }
}
