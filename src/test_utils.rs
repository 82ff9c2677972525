use chrono::Utc;

use crate::models::domain::quiz::{Quiz, QuizDifficulty};
use crate::models::domain::quiz_attempt::QuizAttempt;
use crate::models::domain::quiz_question::{AnswerValue, Question, QuestionType};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Creates a multiple-choice question with one correct option
    pub fn choice_question(text: &str, correct: &str, points: u32, order: u32) -> Question {
        Question::new(
            text,
            QuestionType::MultipleChoice,
            vec![
                correct.to_string(),
                "wrong-a".to_string(),
                "wrong-b".to_string(),
            ],
            AnswerValue::single(correct),
            points,
            order,
        )
    }

    /// Creates a published two-question quiz ready to attempt
    pub fn published_quiz() -> Quiz {
        let now = Utc::now();
        Quiz::new_draft(
            "Rust basics",
            "Ownership and borrowing",
            "course-1",
            "teacher-1",
            50.0,
            3,
            QuizDifficulty::Medium,
        )
        .with_question(choice_question("2 + 2?", "4", 2, 0), now)
        .with_question(choice_question("3 * 3?", "9", 2, 1), now)
        .published(now)
    }

    /// Creates an in-progress attempt at the given quiz
    pub fn in_progress_attempt(quiz: &Quiz, student_id: &str) -> QuizAttempt {
        QuizAttempt::new_in_progress(&quiz.id, student_id, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::AnswerValue;
    use chrono::Utc;

    #[test]
    fn test_fixtures_published_quiz() {
        let quiz = published_quiz();

        assert!(quiz.is_active(Utc::now()));
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.total_points(), 4);
        assert_eq!(quiz.passing_score, 50.0);
    }

    #[test]
    fn test_fixtures_choice_question() {
        let question = choice_question("2 + 2?", "4", 2, 0);

        assert!(question.is_auto_gradable());
        assert_eq!(question.options.len(), 3);
        assert_eq!(question.correct_answer, AnswerValue::single("4"));
    }

    #[test]
    fn test_fixtures_in_progress_attempt() {
        let quiz = published_quiz();
        let attempt = in_progress_attempt(&quiz, "student-1");

        assert!(attempt.is_in_progress());
        assert_eq!(attempt.quiz_id, quiz.id);
        assert!(attempt.answers.is_empty());
    }
}
