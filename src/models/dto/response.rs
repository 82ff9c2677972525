use serde::Serialize;

use crate::models::domain::quiz_attempt::QuizAttempt;
use crate::models::domain::Quiz;

/// Payload returned by a successful attempt start: the quiz to render plus
/// the freshly created attempt.
#[derive(Debug, Clone, Serialize)]
pub struct StartedAttempt {
    pub quiz: Quiz,
    pub attempt: QuizAttempt,
}

/// Read-only precheck result mirroring the start guards, for UI gating.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptEligibility {
    pub can_attempt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AttemptEligibility {
    pub fn allowed() -> Self {
        AttemptEligibility {
            can_attempt: true,
            reason: None,
        }
    }

    pub fn blocked(reason: String) -> Self {
        AttemptEligibility {
            can_attempt: false,
            reason: Some(reason),
        }
    }
}
