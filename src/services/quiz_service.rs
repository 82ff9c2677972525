use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::quiz::QuizStatus,
    models::domain::quiz_question::Question,
    models::domain::Quiz,
    models::dto::request::{CreateQuizRequest, QuestionInput},
    repositories::QuizRepository,
    services::publication_service::PublicationValidator,
};

/// Authoring and lifecycle orchestration for quiz definitions.
pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
    config: Config,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>, config: Config) -> Self {
        Self { repository, config }
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        let quiz = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;

        Ok(quiz)
    }

    pub async fn list_course_quizzes(&self, course_id: &str) -> AppResult<Vec<Quiz>> {
        self.repository.find_by_course(course_id).await
    }

    /// Creates a draft quiz, filling unset policy fields from the configured
    /// defaults.
    pub async fn create_draft(&self, request: CreateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;

        let mut quiz = Quiz::new_draft(
            &request.title,
            &request.description,
            &request.course_id,
            &request.owner_id,
            request
                .passing_score
                .unwrap_or(self.config.default_passing_score),
            request
                .max_attempts
                .unwrap_or(self.config.default_max_attempts),
            request.difficulty.unwrap_or_default(),
        );
        quiz.time_limit_minutes = request
            .time_limit_minutes
            .or(self.config.default_time_limit_minutes);
        quiz.due_date = request.due_date;

        log::info!(
            "Created draft quiz '{}' for course '{}'",
            quiz.id,
            quiz.course_id
        );
        self.repository.save(quiz).await
    }

    pub async fn add_question(&self, quiz_id: &str, input: QuestionInput) -> AppResult<Quiz> {
        input.validate()?;
        input.validate_structure()?;

        let quiz = self.get_quiz(quiz_id).await?;
        Self::ensure_draft(&quiz)?;

        let order = quiz.questions.len() as u32;
        let updated = quiz.with_question(input.into_question(order), Utc::now());
        self.repository.save(updated).await
    }

    /// Replaces a question's content in place, keeping its id and order.
    pub async fn update_question(
        &self,
        quiz_id: &str,
        question_id: &str,
        input: QuestionInput,
    ) -> AppResult<Quiz> {
        input.validate()?;
        input.validate_structure()?;

        let quiz = self.get_quiz(quiz_id).await?;
        Self::ensure_draft(&quiz)?;

        let existing = quiz.question(question_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Question with id '{}' not found in quiz '{}'",
                question_id, quiz_id
            ))
        })?;
        let replacement = Question {
            id: existing.id.clone(),
            ..input.into_question(existing.order)
        };

        let updated = quiz.with_updated_question(replacement, Utc::now());
        self.repository.save(updated).await
    }

    pub async fn remove_question(&self, quiz_id: &str, question_id: &str) -> AppResult<Quiz> {
        let quiz = self.get_quiz(quiz_id).await?;
        Self::ensure_draft(&quiz)?;

        if quiz.question(question_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found in quiz '{}'",
                question_id, quiz_id
            )));
        }

        let updated = quiz.without_question(question_id, Utc::now());
        self.repository.save(updated).await
    }

    /// Publishes a draft quiz once every publication rule passes. The error
    /// message joins all collected violations.
    pub async fn publish(&self, quiz_id: &str) -> AppResult<Quiz> {
        let quiz = self.get_quiz(quiz_id).await?;
        if quiz.status != QuizStatus::Draft {
            return Err(AppError::ValidationError(format!(
                "Quiz '{}' can only be published from draft",
                quiz_id
            )));
        }

        let check = PublicationValidator::check(&quiz);
        if !check.valid {
            log::warn!(
                "Quiz '{}' failed publication checks: {}",
                quiz_id,
                check.joined_errors()
            );
            return Err(AppError::ValidationError(check.joined_errors()));
        }

        let published = quiz.published(Utc::now());
        log::info!("Published quiz '{}'", quiz_id);
        self.repository.save(published).await
    }

    /// Archives a draft or published quiz. Archived quizzes accept no new
    /// attempts; historical attempts stay readable.
    pub async fn archive(&self, quiz_id: &str) -> AppResult<Quiz> {
        let quiz = self.get_quiz(quiz_id).await?;
        if quiz.status == QuizStatus::Archived {
            return Err(AppError::ValidationError(format!(
                "Quiz '{}' is already archived",
                quiz_id
            )));
        }

        let archived = quiz.archived(Utc::now());
        log::info!("Archived quiz '{}'", quiz_id);
        self.repository.save(archived).await
    }

    fn ensure_draft(quiz: &Quiz) -> AppResult<()> {
        if quiz.status != QuizStatus::Draft {
            return Err(AppError::ValidationError(format!(
                "Quiz '{}' is no longer in draft; its questions cannot change",
                quiz.id
            )));
        }
        Ok(())
    }
}
