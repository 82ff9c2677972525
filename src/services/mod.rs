pub mod publication_service;
pub mod quiz_attempt_service;
pub mod quiz_service;
pub mod scoring_service;

pub use publication_service::{PublicationCheck, PublicationValidator};
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_service::QuizService;
pub use scoring_service::ScoringService;
