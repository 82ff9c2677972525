use crate::models::domain::quiz_question::QuestionType;
use crate::models::domain::Quiz;

/// Outcome of the publication rule check: every violation, not just the
/// first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicationCheck {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl PublicationCheck {
    pub fn joined_errors(&self) -> String {
        self.errors.join("; ")
    }
}

/// Business rules a quiz must satisfy before it becomes attemptable.
pub struct PublicationValidator;

impl PublicationValidator {
    /// Pure rule check over the quiz definition. No side effects, no
    /// short-circuiting.
    pub fn check(quiz: &Quiz) -> PublicationCheck {
        let mut errors = Vec::new();

        if quiz.title.trim().is_empty() {
            errors.push("Quiz title must not be empty".to_string());
        }
        if quiz.description.trim().is_empty() {
            errors.push("Quiz description must not be empty".to_string());
        }
        if quiz.questions.is_empty() {
            errors.push("Quiz must have at least one question".to_string());
        }
        if !(0.0..=100.0).contains(&quiz.passing_score) {
            errors.push(format!(
                "Passing score must be between 0 and 100, got {}",
                quiz.passing_score
            ));
        }
        if let Some(limit) = quiz.time_limit_minutes {
            if limit == 0 {
                errors.push("Time limit must be greater than zero".to_string());
            }
        }

        for question in &quiz.questions {
            let label = question.order + 1;
            if question.text.trim().is_empty() {
                errors.push(format!("Question {} must have text", label));
            }
            if question.points == 0 {
                errors.push(format!("Question {} must be worth at least one point", label));
            }
            if question.question_type == QuestionType::MultipleChoice
                && question.options.len() < 2
            {
                errors.push(format!("Question {} must have at least 2 options", label));
            }
            if question.correct_answer.is_empty() {
                errors.push(format!("Question {} must have a correct answer", label));
            }
        }

        PublicationCheck {
            valid: errors.is_empty(),
            errors,
        }
    }
}
