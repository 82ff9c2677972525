use std::sync::Arc;

use chrono::{Duration, Utc};

use quiz_core::{
    app_state::AppState,
    config::Config,
    errors::AppError,
    models::domain::quiz_attempt::AttemptStatus,
    models::domain::quiz_question::{AnswerValue, QuestionType},
    models::domain::Quiz,
    models::dto::request::{CreateQuizRequest, QuestionInput},
    repositories::{InMemoryQuizAttemptRepository, InMemoryQuizRepository},
};

fn state() -> AppState {
    let _ = env_logger::builder().is_test(true).try_init();
    AppState::new(
        Config::default(),
        Arc::new(InMemoryQuizRepository::new()),
        Arc::new(InMemoryQuizAttemptRepository::new()),
    )
}

fn draft_request(max_attempts: u32) -> CreateQuizRequest {
    CreateQuizRequest {
        title: "Rust basics".to_string(),
        description: "Ownership and borrowing".to_string(),
        course_id: "course-1".to_string(),
        owner_id: "teacher-1".to_string(),
        passing_score: Some(50.0),
        max_attempts: Some(max_attempts),
        time_limit_minutes: None,
        difficulty: None,
        due_date: None,
    }
}

fn choice_input(text: &str, correct: &str) -> QuestionInput {
    QuestionInput {
        text: text.to_string(),
        question_type: QuestionType::MultipleChoice,
        options: vec![
            correct.to_string(),
            "wrong-a".to_string(),
            "wrong-b".to_string(),
        ],
        correct_answer: AnswerValue::single(correct),
        explanation: Some("Basic arithmetic".to_string()),
        points: 2,
        time_limit_seconds: None,
        tags: vec![],
    }
}

/// Two multiple-choice questions worth 2 points each, passing score 50.
async fn published_two_question_quiz(state: &AppState, max_attempts: u32) -> Quiz {
    let quiz = state
        .quiz_service
        .create_draft(draft_request(max_attempts))
        .await
        .expect("create draft should work");
    state
        .quiz_service
        .add_question(&quiz.id, choice_input("2 + 2?", "4"))
        .await
        .expect("first question should be added");
    state
        .quiz_service
        .add_question(&quiz.id, choice_input("3 * 3?", "9"))
        .await
        .expect("second question should be added");
    state
        .quiz_service
        .publish(&quiz.id)
        .await
        .expect("publish should work")
}

async fn complete_one_cycle(state: &AppState, quiz: &Quiz, student_id: &str) {
    let started = state
        .quiz_attempt_service
        .start_attempt(&quiz.id, student_id)
        .await
        .expect("start should work");
    state
        .quiz_attempt_service
        .complete_attempt(&started.attempt.id)
        .await
        .expect("complete should work");
}

#[tokio::test]
async fn end_to_end_attempt_flow() {
    let state = state();
    let quiz = published_two_question_quiz(&state, 3).await;

    let started = state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await
        .expect("start should work");
    assert_eq!(started.attempt.status, AttemptStatus::InProgress);
    assert_eq!(started.quiz.id, quiz.id);

    state
        .quiz_attempt_service
        .submit_answer(
            &started.attempt.id,
            &quiz.questions[0].id,
            AnswerValue::single("4"),
            12,
        )
        .await
        .expect("correct answer should be recorded");
    state
        .quiz_attempt_service
        .submit_answer(
            &started.attempt.id,
            &quiz.questions[1].id,
            AnswerValue::single("wrong-a"),
            8,
        )
        .await
        .expect("incorrect answer should be recorded");

    let result = state
        .quiz_attempt_service
        .complete_attempt(&started.attempt.id)
        .await
        .expect("complete should work");

    assert_eq!(result.score, 2);
    assert_eq!(result.percentage, 50.0);
    assert_eq!(result.correct_answers, 1);
    assert_eq!(result.total_questions, 2);
    assert!(result.passed);
    assert_eq!(result.question_results.len(), 2);
    assert_eq!(
        result.question_results[0].explanation.as_deref(),
        Some("Basic arithmetic")
    );

    let attempts = state
        .quiz_attempt_service
        .student_attempts("student-1")
        .await
        .expect("attempt listing should work");
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].status, AttemptStatus::Completed);
    assert_eq!(attempts[0].score, Some(2));
    assert_eq!(attempts[0].passed, Some(true));
    assert!(attempts[0].ended_at.is_some());
}

#[tokio::test]
async fn second_start_without_completing_fails() {
    let state = state();
    let quiz = published_two_question_quiz(&state, 3).await;

    state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await
        .expect("first start should work");

    let second = state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await;
    assert!(matches!(second, Err(AppError::AttemptInProgress(_))));

    let attempts = state
        .quiz_attempt_service
        .student_attempts("student-1")
        .await
        .expect("attempt listing should work");
    assert_eq!(attempts.len(), 1, "failed start must not create an attempt");
}

#[tokio::test]
async fn max_attempts_are_enforced() {
    let state = state();
    let quiz = published_two_question_quiz(&state, 2).await;

    complete_one_cycle(&state, &quiz, "student-1").await;
    complete_one_cycle(&state, &quiz, "student-1").await;

    let third = state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await;
    assert!(matches!(third, Err(AppError::MaxAttemptsReached(_))));

    let history = state
        .quiz_attempt_service
        .student_quiz_attempts("student-1", &quiz.id)
        .await
        .expect("history query should work");
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|a| a.status == AttemptStatus::Completed));

    // Another student still has a full budget
    state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-2")
        .await
        .expect("other student should start");
}

#[tokio::test]
async fn completion_is_idempotent_only_once() {
    let state = state();
    let quiz = published_two_question_quiz(&state, 3).await;

    let started = state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await
        .expect("start should work");
    state
        .quiz_attempt_service
        .submit_answer(
            &started.attempt.id,
            &quiz.questions[0].id,
            AnswerValue::single("4"),
            10,
        )
        .await
        .expect("answer should be recorded");

    let first = state
        .quiz_attempt_service
        .complete_attempt(&started.attempt.id)
        .await
        .expect("first complete should work");

    let second = state
        .quiz_attempt_service
        .complete_attempt(&started.attempt.id)
        .await;
    assert!(matches!(second, Err(AppError::AttemptAlreadyFinalized(_))));

    // The stored result is unchanged by the failed second call
    let replayed = state
        .quiz_attempt_service
        .attempt_result(&started.attempt.id)
        .await
        .expect("result should be rebuildable");
    assert_eq!(replayed.score, first.score);
    assert_eq!(replayed.percentage, first.percentage);
    assert_eq!(replayed.correct_answers, first.correct_answers);
    assert_eq!(replayed.passed, first.passed);
}

#[tokio::test]
async fn answers_stay_provisional_until_completion() {
    let state = state();
    let quiz = published_two_question_quiz(&state, 3).await;

    let started = state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await
        .expect("start should work");

    let after_submit = state
        .quiz_attempt_service
        .submit_answer(
            &started.attempt.id,
            &quiz.questions[0].id,
            AnswerValue::single("4"),
            10,
        )
        .await
        .expect("answer should be recorded");

    // Correct answer, but nothing is graded yet
    assert!(!after_submit.answers[0].is_correct);
    assert_eq!(after_submit.answers[0].points_earned, 0);

    state
        .quiz_attempt_service
        .complete_attempt(&started.attempt.id)
        .await
        .expect("complete should work");

    let attempts = state
        .quiz_attempt_service
        .student_attempts("student-1")
        .await
        .expect("attempt listing should work");
    assert!(attempts[0].answers[0].is_correct);
    assert_eq!(attempts[0].answers[0].points_earned, 2);
}

#[tokio::test]
async fn submit_answer_upserts_by_question_id() {
    let state = state();
    let quiz = published_two_question_quiz(&state, 3).await;

    let started = state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await
        .expect("start should work");

    state
        .quiz_attempt_service
        .submit_answer(
            &started.attempt.id,
            &quiz.questions[0].id,
            AnswerValue::single("wrong-a"),
            5,
        )
        .await
        .expect("first answer should be recorded");
    let attempt = state
        .quiz_attempt_service
        .submit_answer(
            &started.attempt.id,
            &quiz.questions[0].id,
            AnswerValue::single("4"),
            9,
        )
        .await
        .expect("replacement answer should be recorded");

    assert_eq!(attempt.answers.len(), 1);
    assert_eq!(attempt.answers[0].value, AnswerValue::single("4"));
    assert_eq!(attempt.answers[0].time_spent_seconds, 9);

    let unknown_question = state
        .quiz_attempt_service
        .submit_answer(
            &started.attempt.id,
            "no-such-question",
            AnswerValue::single("4"),
            5,
        )
        .await;
    assert!(matches!(unknown_question, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn draft_questions_can_be_edited_until_publication() {
    let state = state();

    let draft = state
        .quiz_service
        .create_draft(draft_request(3))
        .await
        .expect("create draft should work");
    state
        .quiz_service
        .add_question(&draft.id, choice_input("2 + 2?", "4"))
        .await
        .expect("first question should be added");
    let quiz = state
        .quiz_service
        .add_question(&draft.id, choice_input("3 * 3?", "9"))
        .await
        .expect("second question should be added");

    // Replacement keeps the question's id and position
    let first_id = quiz.questions[0].id.clone();
    let updated = state
        .quiz_service
        .update_question(&quiz.id, &first_id, choice_input("5 + 5?", "10"))
        .await
        .expect("update should work");
    assert_eq!(updated.questions.len(), 2);
    assert_eq!(updated.questions[0].id, first_id);
    assert_eq!(updated.questions[0].text, "5 + 5?");
    assert_eq!(updated.questions[0].correct_answer, AnswerValue::single("10"));
    assert_eq!(updated.questions[0].order, 0);

    // Removal compacts the remaining order indexes
    let trimmed = state
        .quiz_service
        .remove_question(&quiz.id, &first_id)
        .await
        .expect("remove should work");
    assert_eq!(trimmed.questions.len(), 1);
    assert_eq!(trimmed.questions[0].text, "3 * 3?");
    assert_eq!(trimmed.questions[0].order, 0);

    let missing = state.quiz_service.remove_question(&quiz.id, &first_id).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let listed = state
        .quiz_service
        .list_course_quizzes("course-1")
        .await
        .expect("course listing should work");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, quiz.id);
}

#[tokio::test]
async fn unpublished_and_archived_quizzes_reject_starts() {
    let state = state();

    let draft = state
        .quiz_service
        .create_draft(draft_request(3))
        .await
        .expect("create draft should work");
    state
        .quiz_service
        .add_question(&draft.id, choice_input("2 + 2?", "4"))
        .await
        .expect("question should be added");

    let on_draft = state
        .quiz_attempt_service
        .start_attempt(&draft.id, "student-1")
        .await;
    assert!(matches!(on_draft, Err(AppError::QuizNotActive(_))));

    state
        .quiz_service
        .publish(&draft.id)
        .await
        .expect("publish should work");
    state
        .quiz_service
        .archive(&draft.id)
        .await
        .expect("archive should work");

    let on_archived = state
        .quiz_attempt_service
        .start_attempt(&draft.id, "student-1")
        .await;
    assert!(matches!(on_archived, Err(AppError::QuizNotActive(_))));

    // Archived is terminal: no re-archive, no re-publish
    let again = state.quiz_service.archive(&draft.id).await;
    assert!(matches!(again, Err(AppError::ValidationError(_))));
    let republish = state.quiz_service.publish(&draft.id).await;
    assert!(matches!(republish, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn past_due_quizzes_reject_starts() {
    let state = state();

    let mut request = draft_request(3);
    request.due_date = Some(Utc::now() - Duration::hours(1));
    let quiz = state
        .quiz_service
        .create_draft(request)
        .await
        .expect("create draft should work");
    state
        .quiz_service
        .add_question(&quiz.id, choice_input("2 + 2?", "4"))
        .await
        .expect("question should be added");
    state
        .quiz_service
        .publish(&quiz.id)
        .await
        .expect("publish should work");

    let result = state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await;
    assert!(matches!(result, Err(AppError::QuizNotActive(_))));

    let eligibility = state
        .quiz_attempt_service
        .can_attempt(&quiz.id, "student-1")
        .await
        .expect("precheck should work");
    assert!(!eligibility.can_attempt);
    assert!(eligibility.reason.is_some());
}

#[tokio::test]
async fn can_attempt_mirrors_the_start_guards_without_mutating() {
    let state = state();
    let quiz = published_two_question_quiz(&state, 3).await;

    let before = state
        .quiz_attempt_service
        .can_attempt(&quiz.id, "student-1")
        .await
        .expect("precheck should work");
    assert!(before.can_attempt);
    assert_eq!(before.reason, None);

    state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await
        .expect("start should work");

    let during = state
        .quiz_attempt_service
        .can_attempt(&quiz.id, "student-1")
        .await
        .expect("precheck should work");
    assert!(!during.can_attempt);
    assert!(during
        .reason
        .as_deref()
        .unwrap_or_default()
        .contains("in progress"));

    let attempts = state
        .quiz_attempt_service
        .student_attempts("student-1")
        .await
        .expect("attempt listing should work");
    assert_eq!(attempts.len(), 1, "prechecks must not create attempts");
}

#[tokio::test]
async fn abandoned_attempts_skip_scoring_but_consume_the_budget() {
    let state = state();
    let quiz = published_two_question_quiz(&state, 1).await;

    let started = state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await
        .expect("start should work");
    state
        .quiz_attempt_service
        .submit_answer(
            &started.attempt.id,
            &quiz.questions[0].id,
            AnswerValue::single("4"),
            10,
        )
        .await
        .expect("answer should be recorded");

    let abandoned = state
        .quiz_attempt_service
        .abandon_attempt(&started.attempt.id)
        .await
        .expect("abandon should work");
    assert_eq!(abandoned.status, AttemptStatus::Abandoned);
    assert!(abandoned.ended_at.is_some());
    assert_eq!(abandoned.score, None);
    assert_eq!(abandoned.passed, None);

    let no_result = state
        .quiz_attempt_service
        .attempt_result(&started.attempt.id)
        .await;
    assert!(matches!(no_result, Err(AppError::ValidationError(_))));

    let retry = state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await;
    assert!(matches!(retry, Err(AppError::MaxAttemptsReached(_))));
}

#[tokio::test]
async fn timeouts_score_exactly_like_completion() {
    let state = state();
    let quiz = published_two_question_quiz(&state, 3).await;

    let started = state
        .quiz_attempt_service
        .start_attempt(&quiz.id, "student-1")
        .await
        .expect("start should work");
    state
        .quiz_attempt_service
        .submit_answer(
            &started.attempt.id,
            &quiz.questions[0].id,
            AnswerValue::single("4"),
            10,
        )
        .await
        .expect("answer should be recorded");

    let result = state
        .quiz_attempt_service
        .time_out_attempt(&started.attempt.id)
        .await
        .expect("timeout should work");

    assert_eq!(result.score, 2);
    assert_eq!(result.percentage, 50.0);
    assert!(result.passed);

    let attempts = state
        .quiz_attempt_service
        .student_attempts("student-1")
        .await
        .expect("attempt listing should work");
    assert_eq!(attempts[0].status, AttemptStatus::TimedOut);

    // The losing manual submission observes the terminal state
    let late_complete = state
        .quiz_attempt_service
        .complete_attempt(&started.attempt.id)
        .await;
    assert!(matches!(
        late_complete,
        Err(AppError::AttemptAlreadyFinalized(_))
    ));
}

#[tokio::test]
async fn publication_is_gated_on_having_questions() {
    let state = state();

    let draft = state
        .quiz_service
        .create_draft(draft_request(3))
        .await
        .expect("create draft should work");

    let empty = state.quiz_service.publish(&draft.id).await;
    match empty {
        Err(AppError::ValidationError(message)) => {
            assert!(message.contains("at least one question"));
        }
        other => panic!("Expected validation error, got: {:?}", other),
    }

    state
        .quiz_service
        .add_question(&draft.id, choice_input("2 + 2?", "4"))
        .await
        .expect("question should be added");
    let published = state
        .quiz_service
        .publish(&draft.id)
        .await
        .expect("publish should work after adding a question");
    assert!(published.is_active(Utc::now()));
}

#[tokio::test]
async fn starting_an_unknown_quiz_fails_cleanly() {
    let state = state();

    let result = state
        .quiz_attempt_service
        .start_attempt("missing-quiz", "student-1")
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let precheck = state
        .quiz_attempt_service
        .can_attempt("missing-quiz", "student-1")
        .await;
    assert!(matches!(precheck, Err(AppError::NotFound(_))));
}
