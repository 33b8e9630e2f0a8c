// src/test_session.rs

//! State of one in-progress test attempt.
//!
//! `NotStarted -> InProgress -> Completed`, with `reset` returning to
//! `NotStarted`. The timer is driven by the caller through [`TestSession::tick`];
//! running out of time completes the attempt.

use std::collections::HashMap;
use std::time::Duration;

use crate::{
    config::DEFAULT_TEST_DURATION_MINUTES,
    error::AppError,
    mock_api::results_api::score_answers,
    models::{question::OptionLabel, result::Score, test::Test},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Completed,
}

/// How an attempt reached `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Submitted,
    TimeExpired,
}

#[derive(Debug, Clone)]
pub struct TestSession {
    phase: Phase,
    selected_test: Option<Test>,
    student_name: String,
    /// question id -> chosen label
    answers: HashMap<String, OptionLabel>,
    current_index: usize,
    remaining: Duration,
    completion: Option<Completion>,
    score: Option<Score>,
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

fn allotted_time(test: &Test) -> Duration {
    let minutes = if test.duration == 0 {
        DEFAULT_TEST_DURATION_MINUTES
    } else {
        test.duration
    };
    Duration::from_secs(u64::from(minutes) * 60)
}

impl TestSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::NotStarted,
            selected_test: None,
            student_name: String::new(),
            answers: HashMap::new(),
            current_index: 0,
            remaining: Duration::ZERO,
            completion: None,
            score: None,
        }
    }

    /// Selects `test` and begins an attempt.
    pub fn start(&mut self, test: Test, student_name: &str) -> Result<(), AppError> {
        if self.phase == Phase::InProgress {
            return Err(AppError::Conflict("A test is already in progress".to_string()));
        }
        let name = student_name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Student name is required".to_string()));
        }

        self.remaining = allotted_time(&test);
        self.selected_test = Some(test);
        self.student_name = name.to_string();
        self.answers.clear();
        self.current_index = 0;
        self.completion = None;
        self.score = None;
        self.phase = Phase::InProgress;
        Ok(())
    }

    /// Starts a fresh attempt on the test kept from the previous one.
    pub fn retake(&mut self, student_name: &str) -> Result<(), AppError> {
        let test = self
            .selected_test
            .clone()
            .ok_or_else(|| AppError::Validation("No test selected".to_string()))?;
        self.start(test, student_name)
    }

    fn in_progress_test(&self) -> Result<&Test, AppError> {
        match (self.phase, &self.selected_test) {
            (Phase::InProgress, Some(test)) => Ok(test),
            (Phase::Completed, _) => Err(AppError::Validation("Test already submitted".to_string())),
            _ => Err(AppError::Validation("Test has not been started".to_string())),
        }
    }

    /// Records an answer, replacing any earlier one for the same question.
    pub fn answer(&mut self, question_id: &str, label: OptionLabel) -> Result<(), AppError> {
        let test = self.in_progress_test()?;
        let question = test.question(question_id).ok_or_else(|| {
            AppError::Validation(format!(
                "Question '{}' does not belong to this test",
                question_id
            ))
        })?;
        if !question.has_option(label) {
            return Err(AppError::Validation(format!(
                "Option {:?} is not available for question '{}'",
                label, question_id
            )));
        }

        self.answers.insert(question_id.to_string(), label);
        Ok(())
    }

    /// Removes the answer for a question, marking it skipped again.
    pub fn clear_answer(&mut self, question_id: &str) -> Result<(), AppError> {
        self.in_progress_test()?;
        self.answers.remove(question_id);
        Ok(())
    }

    /// Moves to `index`, clamped to the last question.
    pub fn go_to(&mut self, index: usize) -> Result<usize, AppError> {
        let last = self.in_progress_test()?.questions.len().saturating_sub(1);
        self.current_index = index.min(last);
        Ok(self.current_index)
    }

    pub fn next(&mut self) -> Result<usize, AppError> {
        self.go_to(self.current_index + 1)
    }

    pub fn previous(&mut self) -> Result<usize, AppError> {
        self.go_to(self.current_index.saturating_sub(1))
    }

    /// Advances the timer. Reaching zero completes the attempt.
    pub fn tick(&mut self, elapsed: Duration) -> Phase {
        if self.phase != Phase::InProgress {
            return self.phase;
        }

        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            tracing::info!(student = %self.student_name, "Time is up, submitting attempt");
            self.complete(Completion::TimeExpired);
        }
        self.phase
    }

    /// Submits the attempt.
    pub fn submit(&mut self) -> Result<Score, AppError> {
        self.in_progress_test()?;
        Ok(self.complete(Completion::Submitted))
    }

    fn complete(&mut self, how: Completion) -> Score {
        let score = self
            .selected_test
            .as_ref()
            .map(|test| score_answers(test, &self.answers))
            .unwrap_or_default();
        self.score = Some(score);
        self.completion = Some(how);
        self.phase = Phase::Completed;
        score
    }

    /// Back to `NotStarted`. The selected test is kept so it can be retaken.
    pub fn reset(&mut self) {
        self.phase = Phase::NotStarted;
        self.answers.clear();
        self.current_index = 0;
        self.remaining = Duration::ZERO;
        self.completion = None;
        self.score = None;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    pub fn selected_test(&self) -> Option<&Test> {
        self.selected_test.as_ref()
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn answers(&self) -> &HashMap<String, OptionLabel> {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn score(&self) -> Option<Score> {
        self.score
    }
}
