use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::quiz_attempt::{AttemptStatus, QuizAnswer, QuizAttempt},
    models::domain::quiz_question::AnswerValue,
    models::domain::quiz_result::QuizResult,
    models::domain::Quiz,
    models::dto::response::{AttemptEligibility, StartedAttempt},
    repositories::{QuizAttemptRepository, QuizRepository},
    services::scoring_service::ScoringService,
};

/// Attempt lifecycle orchestration: start, answer, finalize, report.
///
/// Guard failures are raised before any mutation; a rejected start never
/// creates an attempt.
pub struct QuizAttemptService {
    quiz_repository: Arc<dyn QuizRepository>,
    attempt_repository: Arc<dyn QuizAttemptRepository>,
}

impl QuizAttemptService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            quiz_repository,
            attempt_repository,
        }
    }

    /// Starts a new attempt once every start guard passes.
    ///
    /// The repository's create enforces the same one-in-progress rule
    /// atomically, so a racing start between guard check and create still
    /// fails with `AttemptInProgress` rather than storing a duplicate.
    pub async fn start_attempt(&self, quiz_id: &str, student_id: &str) -> AppResult<StartedAttempt> {
        let quiz = self.get_quiz(quiz_id).await?;
        let now = Utc::now();
        self.check_start_guards(&quiz, student_id, now).await?;

        let attempt = QuizAttempt::new_in_progress(quiz_id, student_id, now);
        let attempt = self.attempt_repository.create(attempt).await?;

        log::info!(
            "Student '{}' started attempt '{}' on quiz '{}'",
            student_id,
            attempt.id,
            quiz_id
        );
        Ok(StartedAttempt { quiz, attempt })
    }

    /// Read-only mirror of the start guards, for UI gating.
    pub async fn can_attempt(&self, quiz_id: &str, student_id: &str) -> AppResult<AttemptEligibility> {
        let quiz = self.get_quiz(quiz_id).await?;
        match self.check_start_guards(&quiz, student_id, Utc::now()).await {
            Ok(()) => Ok(AttemptEligibility::allowed()),
            Err(
                err @ (AppError::QuizNotActive(_)
                | AppError::MaxAttemptsReached(_)
                | AppError::AttemptInProgress(_)),
            ) => Ok(AttemptEligibility::blocked(err.to_string())),
            Err(err) => Err(err),
        }
    }

    /// Records one answer on an in-progress attempt, replacing any earlier
    /// answer to the same question. Correctness stays provisional until
    /// completion.
    pub async fn submit_answer(
        &self,
        attempt_id: &str,
        question_id: &str,
        value: AnswerValue,
        time_spent_seconds: u32,
    ) -> AppResult<QuizAttempt> {
        let attempt = self.get_attempt(attempt_id).await?;
        Self::ensure_in_progress(&attempt)?;

        let quiz = self.get_quiz(&attempt.quiz_id).await?;
        if quiz.question(question_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found in quiz '{}'",
                question_id, quiz.id
            )));
        }

        let updated =
            attempt.with_answer(QuizAnswer::provisional(question_id, value, time_spent_seconds));
        self.attempt_repository.update(updated).await
    }

    /// Finalizes an in-progress attempt as completed, rescoring every stored
    /// answer against the quiz definition.
    pub async fn complete_attempt(&self, attempt_id: &str) -> AppResult<QuizResult> {
        self.finalize(attempt_id, AttemptStatus::Completed).await
    }

    /// Timer-driven finalization. Scoring is identical to an explicit
    /// completion; only the resulting status label differs.
    pub async fn time_out_attempt(&self, attempt_id: &str) -> AppResult<QuizResult> {
        self.finalize(attempt_id, AttemptStatus::TimedOut).await
    }

    /// Terminal transition without scoring, for a student who walks away.
    pub async fn abandon_attempt(&self, attempt_id: &str) -> AppResult<QuizAttempt> {
        let attempt = self.get_attempt(attempt_id).await?;
        Self::ensure_in_progress(&attempt)?;

        let abandoned = attempt.abandoned(Utc::now());
        let abandoned = self.attempt_repository.update(abandoned).await?;

        log::info!("Attempt '{}' abandoned", attempt_id);
        Ok(abandoned)
    }

    /// Report for an attempt that finished with a score.
    pub async fn attempt_result(&self, attempt_id: &str) -> AppResult<QuizResult> {
        let attempt = self.get_attempt(attempt_id).await?;
        match attempt.status {
            AttemptStatus::Completed | AttemptStatus::TimedOut => {}
            AttemptStatus::InProgress | AttemptStatus::Abandoned => {
                return Err(AppError::ValidationError(format!(
                    "Attempt '{}' has no result to report",
                    attempt_id
                )));
            }
        }

        let quiz = self.get_quiz(&attempt.quiz_id).await?;
        Ok(ScoringService::result_for(&quiz, &attempt))
    }

    pub async fn student_attempts(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>> {
        self.attempt_repository.find_by_student(student_id).await
    }

    /// The student's attempt history on one quiz, newest first.
    pub async fn student_quiz_attempts(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<QuizAttempt>> {
        self.attempt_repository
            .find_by_student_and_quiz(student_id, quiz_id)
            .await
    }

    async fn finalize(&self, attempt_id: &str, outcome: AttemptStatus) -> AppResult<QuizResult> {
        let attempt = self.get_attempt(attempt_id).await?;
        Self::ensure_in_progress(&attempt)?;

        let quiz = self.get_quiz(&attempt.quiz_id).await?;
        let score = ScoringService::score_attempt(&quiz, &attempt);
        let finalized = attempt.finalized(outcome, score, Utc::now());
        // update() re-checks the stored status under its own lock, so a
        // racing finalizer loses with AttemptAlreadyFinalized instead of
        // re-scoring.
        let finalized = self.attempt_repository.update(finalized).await?;

        log::info!(
            "Attempt '{}' finalized with score {}/{} ({}%)",
            attempt_id,
            finalized.score.unwrap_or(0),
            quiz.gradable_points(),
            finalized.percentage.unwrap_or(0.0)
        );
        Ok(ScoringService::result_for(&quiz, &finalized))
    }

    async fn check_start_guards(
        &self,
        quiz: &Quiz,
        student_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if !quiz.is_active(now) {
            return Err(AppError::QuizNotActive(format!(
                "Quiz '{}' is not open for attempts",
                quiz.id
            )));
        }

        let finished = self
            .attempt_repository
            .count_finished(student_id, &quiz.id)
            .await?;
        if finished >= quiz.max_attempts as usize {
            return Err(AppError::MaxAttemptsReached(format!(
                "Quiz '{}' allows {} attempts",
                quiz.id, quiz.max_attempts
            )));
        }

        if self
            .attempt_repository
            .find_in_progress(&quiz.id, student_id)
            .await?
            .is_some()
        {
            return Err(AppError::AttemptInProgress(format!(
                "Student '{}' already has an attempt in progress for quiz '{}'",
                student_id, quiz.id
            )));
        }

        Ok(())
    }

    async fn get_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quiz_repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    async fn get_attempt(&self, attempt_id: &str) -> AppResult<QuizAttempt> {
        self.attempt_repository
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })
    }

    fn ensure_in_progress(attempt: &QuizAttempt) -> AppResult<()> {
        if !attempt.is_in_progress() {
            return Err(AppError::AttemptAlreadyFinalized(format!(
                "Attempt with id '{}' is already finalized",
                attempt.id
            )));
        }
        Ok(())
    }
}
