use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz_attempt::QuizAttempt;
use crate::models::domain::Quiz;
use crate::repositories::quiz_attempt_repository::QuizAttemptRepository;
use crate::repositories::quiz_repository::QuizRepository;

/// In-memory quiz store keyed by id. The reference backend for tests and
/// embedded use.
pub struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<String, Quiz>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryQuizRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(id).cloned())
    }

    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes
            .values()
            .filter(|q| q.course_id == course_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items)
    }

    async fn save(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }
}

#[derive(Default)]
struct AttemptStore {
    attempts: HashMap<String, QuizAttempt>,
    /// (quiz_id, student_id) -> attempt id, kept only for in-progress rows.
    /// Enforces the one-in-progress-attempt-per-pair constraint inside a
    /// single write lock.
    in_progress: HashMap<(String, String), String>,
}

/// In-memory attempt store with the uniqueness constraint the contract
/// requires from every backend.
pub struct InMemoryQuizAttemptRepository {
    store: RwLock<AttemptStore>,
}

impl InMemoryQuizAttemptRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(AttemptStore::default()),
        }
    }
}

impl Default for InMemoryQuizAttemptRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut store = self.store.write().await;
        if store.attempts.contains_key(&attempt.id) {
            return Err(AppError::AlreadyExists(format!(
                "Attempt with id '{}' already exists",
                attempt.id
            )));
        }

        let key = (attempt.quiz_id.clone(), attempt.student_id.clone());
        if attempt.is_in_progress() {
            if store.in_progress.contains_key(&key) {
                return Err(AppError::AttemptInProgress(format!(
                    "Student '{}' already has an attempt in progress for quiz '{}'",
                    attempt.student_id, attempt.quiz_id
                )));
            }
            store.in_progress.insert(key, attempt.id.clone());
        }

        store.attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let store = self.store.read().await;
        Ok(store.attempts.get(id).cloned())
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let store = self.store.read().await;
        let mut items: Vec<_> = store
            .attempts
            .values()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(items)
    }

    async fn find_by_student_and_quiz(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<QuizAttempt>> {
        let store = self.store.read().await;
        let mut items: Vec<_> = store
            .attempts
            .values()
            .filter(|a| a.student_id == student_id && a.quiz_id == quiz_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(items)
    }

    async fn find_in_progress(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> AppResult<Option<QuizAttempt>> {
        let store = self.store.read().await;
        let key = (quiz_id.to_string(), student_id.to_string());
        let attempt = store
            .in_progress
            .get(&key)
            .and_then(|id| store.attempts.get(id))
            .cloned();
        Ok(attempt)
    }

    async fn count_finished(&self, student_id: &str, quiz_id: &str) -> AppResult<usize> {
        let store = self.store.read().await;
        let count = store
            .attempts
            .values()
            .filter(|a| {
                a.student_id == student_id && a.quiz_id == quiz_id && a.status.is_terminal()
            })
            .count();
        Ok(count)
    }

    async fn update(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut store = self.store.write().await;
        match store.attempts.get(&attempt.id) {
            None => {
                return Err(AppError::NotFound(format!(
                    "Attempt with id '{}' not found",
                    attempt.id
                )));
            }
            Some(stored) if !stored.is_in_progress() => {
                return Err(AppError::AttemptAlreadyFinalized(format!(
                    "Attempt with id '{}' is already finalized",
                    attempt.id
                )));
            }
            Some(_) => {}
        }

        let key = (attempt.quiz_id.clone(), attempt.student_id.clone());
        if attempt.is_in_progress() {
            store.in_progress.insert(key, attempt.id.clone());
        } else {
            store.in_progress.remove(&key);
        }

        store.attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }
}
