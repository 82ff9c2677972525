use std::sync::Arc;

use crate::{
    config::Config,
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{quiz_attempt_service::QuizAttemptService, quiz_service::QuizService},
};

/// Service wiring over injected repositories. The embedding layer picks the
/// backend; any pair of implementations satisfying the repository contracts
/// works.
#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub quiz_attempt_service: Arc<QuizAttemptService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        let quiz_service = Arc::new(QuizService::new(quiz_repository.clone(), config.clone()));
        let quiz_attempt_service = Arc::new(QuizAttemptService::new(
            quiz_repository,
            attempt_repository,
        ));

        Self {
            quiz_service,
            quiz_attempt_service,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryQuizAttemptRepository, InMemoryQuizRepository};

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_app_state_wires_services_over_shared_repositories() {
        let state = AppState::new(
            Config::test_config(),
            Arc::new(InMemoryQuizRepository::new()),
            Arc::new(InMemoryQuizAttemptRepository::new()),
        );

        assert_eq!(state.config.default_max_attempts, 3);
        assert_eq!(Arc::strong_count(&state.quiz_service), 1);
    }
}
