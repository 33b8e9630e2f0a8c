// src/mock_api/likes_api.rs

use serde::Serialize;

use crate::{
    mock_api::{ApiResult, test_not_found},
    store::MemoryStore,
};

/// Result of a toggle, both halves read under the same write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub count: usize,
}

/// Flips `user_id`'s like on a test.
pub async fn toggle_test_like(store: &MemoryStore, test_id: &str, user_id: &str) -> ApiResult<LikeToggle> {
    let mut db = store.write().await;
    if !db.has_test(test_id) {
        return Err(test_not_found());
    }

    let likers = db.likes.entry(test_id.to_string()).or_default();
    let liked = if likers.remove(user_id) {
        false
    } else {
        likers.insert(user_id.to_string());
        true
    };

    let count = likers.len();

    tracing::debug!(test_id, user_id, liked, count, "Toggled like");
    Ok(LikeToggle { liked, count })
}

pub async fn get_test_like_count(store: &MemoryStore, test_id: &str) -> ApiResult<usize> {
    let db = store.read().await;
    if !db.has_test(test_id) {
        return Err(test_not_found());
    }
    Ok(db.likes.get(test_id).map_or(0, |likers| likers.len()))
}

pub async fn get_test_like_status(store: &MemoryStore, test_id: &str, user_id: &str) -> ApiResult<bool> {
    let db = store.read().await;
    if !db.has_test(test_id) {
        return Err(test_not_found());
    }
    Ok(db
        .likes
        .get(test_id)
        .is_some_and(|likers| likers.contains(user_id)))
}
