// src/mock_api/results_api.rs

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppError,
    mock_api::{ApiResult, test_not_found},
    models::{
        question::OptionLabel,
        result::{Score, TestResult},
        test::Test,
    },
    store::MemoryStore,
};

/// Scores a set of answers against a test.
///
/// Correct answers earn `marks_per_question`, wrong ones lose
/// `negative_marks`, unanswered questions count as skipped. Answers to
/// question ids the test does not contain are ignored.
pub fn score_answers(test: &Test, answers: &HashMap<String, OptionLabel>) -> Score {
    let mut score = Score::default();

    for question in &test.questions {
        match answers.get(&question.id) {
            None => score.skipped += 1,
            Some(answer) if *answer == question.correct_answer => score.correct += 1,
            Some(_) => score.wrong += 1,
        }
    }

    score.total_marks = test.questions.len() as f64 * test.marks_per_question;
    score.score = score.correct as f64 * test.marks_per_question
        - score.wrong as f64 * test.negative_marks;
    score.percentage = if score.total_marks > 0.0 {
        round2(score.score / score.total_marks * 100.0)
    } else {
        0.0
    };

    score
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scores a finished attempt against the stored test and records it.
pub async fn record_result(
    store: &MemoryStore,
    test_id: &str,
    user_id: &str,
    student_name: &str,
    answers: &HashMap<String, OptionLabel>,
) -> ApiResult<TestResult> {
    let mut db = store.write().await;
    let test = db.test(test_id).ok_or_else(test_not_found)?;

    if let Some(unknown) = answers.keys().find(|id| test.question(id).is_none()) {
        return Err(AppError::Validation(format!(
            "Question '{}' does not belong to this test",
            unknown
        )));
    }

    let now = Utc::now();
    if let Some(window) = test.settings.as_ref().and_then(|s| s.schedule.as_ref()) {
        if !window.contains(now) {
            return Err(AppError::Validation(
                "This test is not open for submissions".to_string(),
            ));
        }
    }

    if let Some(limit) = test.attempt_limit() {
        let used = db
            .results
            .iter()
            .filter(|r| r.test_id == test_id && r.user_id == user_id)
            .count();
        if used >= limit as usize {
            return Err(AppError::Conflict(format!(
                "Attempt limit of {} reached",
                limit
            )));
        }
    }

    let result = TestResult {
        attempt_id: Uuid::new_v4().to_string(),
        test_id: test_id.to_string(),
        user_id: user_id.to_string(),
        student_name: student_name.to_string(),
        score: score_answers(test, answers),
        submitted_at: now,
    };

    db.results.push(result.clone());
    tracing::info!(
        test_id,
        user_id,
        attempt_id = %result.attempt_id,
        "Recorded result {}/{}",
        result.score.score,
        result.score.total_marks
    );

    Ok(result)
}

pub async fn fetch_results_by_test(store: &MemoryStore, test_id: &str) -> ApiResult<Vec<TestResult>> {
    let db = store.read().await;
    if !db.has_test(test_id) {
        return Err(test_not_found());
    }
    Ok(db
        .results
        .iter()
        .filter(|r| r.test_id == test_id)
        .cloned()
        .collect())
}

pub async fn fetch_results_by_user(store: &MemoryStore, user_id: &str) -> ApiResult<Vec<TestResult>> {
    let db = store.read().await;
    Ok(db
        .results
        .iter()
        .filter(|r| r.user_id == user_id)
        .cloned()
        .collect())
}
