pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod quiz_result;
pub use quiz::Quiz;
pub use quiz_attempt::QuizAttempt;
pub use quiz_question::Question;
pub use quiz_result::QuizResult;
