use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{errors::AppResult, models::domain::Quiz};

/// Storage contract for quiz definitions.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<Quiz>>;
    /// Create-or-update keyed by `quiz.id`.
    async fn save(&self, quiz: Quiz) -> AppResult<Quiz>;
}
