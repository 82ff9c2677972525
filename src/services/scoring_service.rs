use std::collections::HashMap;

use crate::models::domain::quiz_attempt::{QuizAnswer, QuizAttempt};
use crate::models::domain::quiz_question::{AnswerValue, Question};
use crate::models::domain::quiz_result::{AttemptScore, QuestionResult, QuizResult};
use crate::models::domain::Quiz;

/// Answer evaluation and score aggregation. Pure functions over the quiz
/// definition and an attempt's stored answers; mid-attempt correctness
/// values are never trusted.
pub struct ScoringService;

impl ScoringService {
    /// Correctness of one submitted answer against the authoritative
    /// question definition.
    ///
    /// Set answers must match on cardinality and full mutual containment,
    /// order-independent with no partial credit. Scalar answers compare by
    /// exact case-sensitive equality. A scalar submitted against a set
    /// answer (or the reverse) is wrong. Essays are never auto-correct.
    pub fn is_correct(question: &Question, submitted: &AnswerValue) -> bool {
        if !question.is_auto_gradable() {
            return false;
        }
        match (&question.correct_answer, submitted) {
            (AnswerValue::Single(correct), AnswerValue::Single(value)) => correct == value,
            (AnswerValue::Many(correct), AnswerValue::Many(values)) => {
                correct.len() == values.len() && correct.iter().all(|c| values.contains(c))
            }
            _ => false,
        }
    }

    /// Full points when correct, zero otherwise.
    pub fn points_for(question: &Question, submitted: &AnswerValue) -> u32 {
        if Self::is_correct(question, submitted) {
            question.points
        } else {
            0
        }
    }

    /// Rescores every stored answer against the quiz definition and
    /// aggregates the totals.
    ///
    /// Answers referencing a question no longer in the quiz stay in the
    /// history but score nothing. The percentage denominator is the quiz's
    /// auto-gradable points; `total_questions` still counts every question,
    /// answered or not. The stored percentage is rounded to a whole percent;
    /// the pass decision compares the unrounded ratio against the passing
    /// score.
    pub fn score_attempt(quiz: &Quiz, attempt: &QuizAttempt) -> AttemptScore {
        let questions: HashMap<&str, &Question> = quiz
            .questions
            .iter()
            .map(|q| (q.id.as_str(), q))
            .collect();

        let mut score = 0u32;
        let mut correct_answers = 0u32;
        let mut answers = Vec::with_capacity(attempt.answers.len());

        for answer in &attempt.answers {
            let (is_correct, points_earned) = match questions.get(answer.question_id.as_str()) {
                Some(question) => {
                    let is_correct = Self::is_correct(question, &answer.value);
                    (is_correct, if is_correct { question.points } else { 0 })
                }
                None => (false, 0),
            };
            score += points_earned;
            if is_correct {
                correct_answers += 1;
            }
            answers.push(QuizAnswer {
                is_correct,
                points_earned,
                ..answer.clone()
            });
        }

        let gradable_points = quiz.gradable_points();
        let raw_percentage = if gradable_points == 0 {
            0.0
        } else {
            f64::from(score) / f64::from(gradable_points) * 100.0
        };
        let percentage = raw_percentage.round();
        let passed = raw_percentage >= quiz.passing_score;

        AttemptScore {
            answers,
            score,
            percentage,
            raw_percentage,
            correct_answers,
            total_questions: quiz.questions.len() as u32,
            passed,
        }
    }

    /// Expands a finalized attempt into its per-question report, one row per
    /// quiz question in quiz order. Unanswered questions appear with no
    /// submitted value and zero points.
    pub fn result_for(quiz: &Quiz, attempt: &QuizAttempt) -> QuizResult {
        let answers: HashMap<&str, &QuizAnswer> = attempt
            .answers
            .iter()
            .map(|a| (a.question_id.as_str(), a))
            .collect();

        let question_results: Vec<QuestionResult> = quiz
            .questions
            .iter()
            .map(|question| {
                let answer = answers.get(question.id.as_str());
                QuestionResult {
                    question_id: question.id.clone(),
                    question_text: question.text.clone(),
                    submitted_answer: answer.map(|a| a.value.clone()),
                    correct_answer: question.correct_answer.clone(),
                    is_correct: answer.map_or(false, |a| a.is_correct),
                    points_earned: answer.map_or(0, |a| a.points_earned),
                    points_possible: question.points,
                    explanation: question.explanation.clone(),
                }
            })
            .collect();

        let time_spent_seconds = attempt
            .ended_at
            .map(|ended| (ended - attempt.started_at).num_seconds().max(0) as u32)
            .unwrap_or(0);

        QuizResult {
            attempt_id: attempt.id.clone(),
            quiz_id: quiz.id.clone(),
            student_id: attempt.student_id.clone(),
            score: attempt.score.unwrap_or(0),
            percentage: attempt.percentage.unwrap_or(0.0),
            total_questions: quiz.questions.len() as u32,
            correct_answers: question_results.iter().filter(|r| r.is_correct).count() as u32,
            time_spent_seconds,
            passed: attempt.passed.unwrap_or(false),
            question_results,
        }
    }
}
