use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{errors::AppResult, models::domain::quiz_attempt::QuizAttempt};

/// Storage contract for quiz attempts.
///
/// Implementations must treat `create` as an atomic check-and-insert: at
/// most one in-progress attempt may exist per (quiz, student) pair, and a
/// concurrent second create for the same pair must fail with
/// `AttemptInProgress` without storing anything. `update` must reject
/// records whose stored counterpart is already terminal, so that racing
/// finalizers cannot re-score a finished attempt.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>>;
    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>>;
    async fn find_by_student_and_quiz(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<QuizAttempt>>;
    /// The pair's in-progress attempt, if any, resolved through a
    /// (quiz, student) index rather than a status scan.
    async fn find_in_progress(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> AppResult<Option<QuizAttempt>>;
    /// Number of the student's attempts at this quiz that already reached a
    /// terminal state.
    async fn count_finished(&self, student_id: &str, quiz_id: &str) -> AppResult<usize>;
    /// Full-record replacement keyed by `attempt.id`; fails with `NotFound`
    /// for unknown ids.
    async fn update(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
}
