pub mod memory;
pub mod quiz_attempt_repository;
pub mod quiz_repository;

pub use memory::{InMemoryQuizAttemptRepository, InMemoryQuizRepository};
pub use quiz_attempt_repository::QuizAttemptRepository;
pub use quiz_repository::QuizRepository;
