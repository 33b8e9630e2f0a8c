// src/mock_api/feedback_api.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    mock_api::{ApiResult, test_not_found},
    models::feedback::{Feedback, NewFeedback},
    store::MemoryStore,
    utils::html::clean_html,
};

/// Records a rating for a test.
///
/// Rejected before touching the store when no rating (0) or an out-of-range
/// rating was given.
pub async fn submit_feedback(
    store: &MemoryStore,
    test_id: &str,
    user_id: &str,
    new: NewFeedback,
) -> ApiResult<Feedback> {
    if !(1..=5).contains(&new.rating) {
        return Err(AppError::Validation("Please select a rating".to_string()));
    }
    new.validate()?;

    let comment = new
        .comment
        .as_deref()
        .map(|c| clean_html(c.trim()))
        .unwrap_or_default();

    let mut db = store.write().await;
    if !db.has_test(test_id) {
        return Err(test_not_found());
    }

    let feedback = Feedback {
        id: Uuid::new_v4().to_string(),
        test_id: test_id.to_string(),
        user_id: user_id.to_string(),
        rating: new.rating,
        comment,
        created_at: Utc::now(),
    };
    db.feedback.push(feedback.clone());
    tracing::info!(test_id, user_id, rating = feedback.rating, "Feedback submitted");

    Ok(feedback)
}

/// Feedback for a test, newest first.
pub async fn fetch_feedback(store: &MemoryStore, test_id: &str) -> ApiResult<Vec<Feedback>> {
    let db = store.read().await;
    if !db.has_test(test_id) {
        return Err(test_not_found());
    }
    Ok(db
        .feedback
        .iter()
        .rev()
        .filter(|f| f.test_id == test_id)
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const GK: &str = "test-general-knowledge";

    fn rated(rating: u8, comment: Option<&str>) -> NewFeedback {
        NewFeedback {
            rating,
            comment: comment.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn zero_rating_is_rejected_without_insert() {
        let store = MemoryStore::seeded(Duration::ZERO);
        let err = submit_feedback(&store, GK, "u1", rated(0, Some("great")))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Validation("Please select a rating".to_string()));
        assert!(fetch_feedback(&store, GK).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn comment_is_sanitized() {
        let store = MemoryStore::seeded(Duration::ZERO);
        let saved = submit_feedback(
            &store,
            GK,
            "u1",
            rated(5, Some("<b>Loved it</b><script>alert(1)</script>")),
        )
        .await
        .unwrap();
        assert_eq!(saved.comment, "<b>Loved it</b>");
    }

    #[tokio::test]
    async fn newest_first() {
        let store = MemoryStore::seeded(Duration::ZERO);
        submit_feedback(&store, GK, "u1", rated(3, None)).await.unwrap();
        submit_feedback(&store, GK, "u2", rated(4, None)).await.unwrap();
        let all = fetch_feedback(&store, GK).await.unwrap();
        assert_eq!(all.iter().map(|f| f.rating).collect::<Vec<_>>(), [4, 3]);
    }

    #[tokio::test]
    async fn feedback_for_unknown_test_is_not_found() {
        let store = MemoryStore::new(Duration::ZERO);
        let err = submit_feedback(&store, "ghost", "u1", rated(4, None)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
