// src/mock_api/tests_api.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::{DEFAULT_MARKS_PER_QUESTION, DEFAULT_NEGATIVE_MARKS, DEFAULT_TEST_DURATION_MINUTES},
    error::AppError,
    mock_api::{ApiResult, test_not_found},
    models::{
        question::validate_questions,
        test::{NewTest, Test, TestPatch},
    },
    store::{Collections, MemoryStore},
};

/// Creates a test, filling every omitted field with its default.
///
/// The new test is prepended so listings stay most-recent-first.
pub async fn create_test(store: &MemoryStore, new: NewTest) -> ApiResult<Test> {
    new.validate()?;
    if let Some(questions) = &new.questions {
        validate_questions(questions)?;
    }
    if let Some(settings) = &new.settings {
        settings.check()?;
    }

    let mut db = store.write().await;

    let id = match new.id {
        Some(id) if db.has_test(&id) => {
            return Err(AppError::Conflict(format!("Test '{}' already exists", id)));
        }
        Some(id) => id,
        None => unique_test_id(&db),
    };

    let test = Test {
        id,
        title: new.title,
        description: new.description.unwrap_or_default(),
        questions: new.questions.unwrap_or_default(),
        duration: new.duration.unwrap_or(DEFAULT_TEST_DURATION_MINUTES),
        marks_per_question: new.marks_per_question.unwrap_or(DEFAULT_MARKS_PER_QUESTION),
        negative_marks: new.negative_marks.unwrap_or(DEFAULT_NEGATIVE_MARKS),
        is_public: new.is_public.unwrap_or(true),
        created_by: new.created_by,
        settings: new.settings,
        created_at: Utc::now(),
        updated_at: None,
    };

    db.tests.insert(0, test.clone());
    tracing::info!(test_id = %test.id, "Created test '{}'", test.title);

    Ok(test)
}

fn unique_test_id(db: &Collections) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !db.has_test(&id) {
            return id;
        }
    }
}

/// Shallow-merges `patch` into the stored test.
///
/// Applying the same patch twice leaves the record as after the first call;
/// `updated_at` only moves when a field actually changes.
pub async fn update_test(store: &MemoryStore, id: &str, patch: TestPatch) -> ApiResult<Test> {
    patch.validate()?;
    if let Some(questions) = &patch.questions {
        validate_questions(questions)?;
    }
    if let Some(settings) = &patch.settings {
        settings.check()?;
    }

    let mut db = store.write().await;
    let test = db
        .tests
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(test_not_found)?;

    if patch.apply(test) {
        test.updated_at = Some(Utc::now());
        tracing::debug!(test_id = %id, "Updated test");
    }

    Ok(test.clone())
}

pub async fn fetch_tests(store: &MemoryStore) -> ApiResult<Vec<Test>> {
    Ok(store.read().await.tests.clone())
}

pub async fn fetch_test_by_id(store: &MemoryStore, id: &str) -> ApiResult<Test> {
    store
        .read()
        .await
        .test(id)
        .cloned()
        .ok_or_else(test_not_found)
}

/// Tests created by `creator_id`, most recent first.
pub async fn fetch_tests_by_user_id(store: &MemoryStore, creator_id: &str) -> ApiResult<Vec<Test>> {
    let db = store.read().await;
    Ok(db
        .tests
        .iter()
        .filter(|t| t.created_by.as_deref() == Some(creator_id))
        .cloned()
        .collect())
}
