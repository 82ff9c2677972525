use thiserror::Error;

/// Caller-facing error taxonomy for the quiz domain.
///
/// Every variant is recoverable from the caller's point of view: none are
/// retried here, and precondition failures are raised before any mutation.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Quiz not active: {0}")]
    QuizNotActive(String),

    #[error("Max attempts reached: {0}")]
    MaxAttemptsReached(String),

    #[error("Attempt in progress: {0}")]
    AttemptInProgress(String),

    #[error("Attempt already finalized: {0}")]
    AttemptAlreadyFinalized(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl AppError {
    /// Stable machine-readable code, for presentation layers that map errors
    /// to HTTP statuses or UI states.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::QuizNotActive(_) => "QUIZ_NOT_ACTIVE",
            AppError::MaxAttemptsReached(_) => "MAX_ATTEMPTS_REACHED",
            AppError::AttemptInProgress(_) => "ATTEMPT_IN_PROGRESS",
            AppError::AttemptAlreadyFinalized(_) => "ATTEMPT_ALREADY_FINALIZED",
            AppError::RepositoryError(_) => "REPOSITORY_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
