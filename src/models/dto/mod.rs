pub mod request;
pub mod response;
pub use request::{CreateQuizRequest, QuestionInput};
pub use response::{AttemptEligibility, StartedAttempt};
