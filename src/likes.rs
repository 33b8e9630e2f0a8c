// src/likes.rs

//! Optimistic like toggle for a single test.
//!
//! The local view flips immediately, the backend call follows, and a failed
//! call restores the view to what it was before the toggle. Once the widget
//! is dropped, late replies are discarded.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{error::AppError, mock_api::likes_api, store::MemoryStore};

/// What the like button shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LikeView {
    pub liked: bool,
    pub count: usize,
}

impl LikeView {
    fn flipped(self) -> Self {
        if self.liked {
            Self {
                liked: false,
                count: self.count.saturating_sub(1),
            }
        } else {
            Self {
                liked: true,
                count: self.count + 1,
            }
        }
    }
}

#[async_trait]
pub trait LikeClient: Send + Sync {
    /// Returns the liked flag after the toggle.
    async fn toggle_like(&self, test_id: &str, user_id: &str) -> Result<bool, AppError>;
    async fn like_count(&self, test_id: &str) -> Result<usize, AppError>;
    async fn like_status(&self, test_id: &str, user_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
impl LikeClient for MemoryStore {
    async fn toggle_like(&self, test_id: &str, user_id: &str) -> Result<bool, AppError> {
        likes_api::toggle_test_like(self, test_id, user_id)
            .await
            .map(|toggled| toggled.liked)
    }

    async fn like_count(&self, test_id: &str) -> Result<usize, AppError> {
        likes_api::get_test_like_count(self, test_id).await
    }

    async fn like_status(&self, test_id: &str, user_id: &str) -> Result<bool, AppError> {
        likes_api::get_test_like_status(self, test_id, user_id).await
    }
}

pub struct LikeWidget {
    client: Arc<dyn LikeClient>,
    test_id: String,
    user_id: String,
    view: Arc<Mutex<LikeView>>,
}

impl LikeWidget {
    pub fn new(client: Arc<dyn LikeClient>, test_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            client,
            test_id: test_id.into(),
            user_id: user_id.into(),
            view: Arc::new(Mutex::new(LikeView::default())),
        }
    }

    pub async fn view(&self) -> LikeView {
        *self.view.lock().await
    }

    /// Loads count and status concurrently. Each one is applied on its own,
    /// so a failure of one leaves the other's value in place.
    pub async fn refresh(&self) -> LikeView {
        let (count, status) = tokio::join!(
            self.client.like_count(&self.test_id),
            self.client.like_status(&self.test_id, &self.user_id),
        );

        let mut view = self.view.lock().await;
        match count {
            Ok(count) => view.count = count,
            Err(e) => tracing::warn!(test_id = %self.test_id, "Failed to load like count: {}", e),
        }
        match status {
            Ok(liked) => view.liked = liked,
            Err(e) => tracing::warn!(test_id = %self.test_id, "Failed to load like status: {}", e),
        }
        *view
    }

    /// Flips the view, then asks the backend. Returns the settled liked flag.
    pub async fn toggle(&self) -> Result<bool, AppError> {
        self.flip().await;
        settle(
            Arc::downgrade(&self.view),
            self.client.toggle_like(&self.test_id, &self.user_id).await,
        )
        .await
        .unwrap_or_else(|| Err(AppError::InternalServerError("Like widget dropped".to_string())))
    }

    /// Flips the view and finishes the backend call in the background.
    ///
    /// The task holds only a weak handle to the view: if the widget has been
    /// dropped by the time the reply arrives it resolves to `None` and
    /// touches nothing.
    pub async fn toggle_detached(&self) -> JoinHandle<Option<Result<bool, AppError>>> {
        self.flip().await;
        let view = Arc::downgrade(&self.view);
        let client = Arc::clone(&self.client);
        let test_id = self.test_id.clone();
        let user_id = self.user_id.clone();

        tokio::spawn(async move {
            let outcome = client.toggle_like(&test_id, &user_id).await;
            settle(view, outcome).await
        })
    }

    /// Applies the optimistic flip.
    async fn flip(&self) {
        let mut view = self.view.lock().await;
        *view = view.flipped();
    }
}

/// Reconciles one toggle's optimistic flip with the backend reply.
///
/// A failure undoes only this toggle's flip, so overlapping toggles that
/// fail in any order land back on the view they started from.
async fn settle(
    view: Weak<Mutex<LikeView>>,
    outcome: Result<bool, AppError>,
) -> Option<Result<bool, AppError>> {
    let Some(view) = view.upgrade() else {
        tracing::debug!("Like widget gone, discarding reply");
        return None;
    };

    let mut view = view.lock().await;
    match &outcome {
        Ok(liked) => {
            // Backend disagrees with the optimistic guess: adopt its answer.
            if view.liked != *liked {
                *view = view.flipped();
            }
        }
        Err(e) => {
            tracing::warn!("Like toggle failed, reverting: {}", e);
            *view = view.flipped();
        }
    }
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::sync::Semaphore;

    use super::*;
    use crate::store::fixtures::DEMO_STUDENT_ID;

    const GK: &str = "test-general-knowledge";

    /// Backend that can fail on demand and hold replies until released.
    struct ScriptedClient {
        fail: AtomicBool,
        gate: Option<Arc<Semaphore>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(fail: bool, gate: Option<Arc<Semaphore>>) -> Self {
            Self {
                fail: AtomicBool::new(fail),
                gate,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LikeClient for ScriptedClient {
        async fn toggle_like(&self, _test_id: &str, _user_id: &str) -> Result<bool, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            if self.fail.load(Ordering::SeqCst) {
                Err(AppError::Provider("network down".to_string()))
            } else {
                Ok(true)
            }
        }

        async fn like_count(&self, _test_id: &str) -> Result<usize, AppError> {
            Ok(5)
        }

        async fn like_status(&self, _test_id: &str, _user_id: &str) -> Result<bool, AppError> {
            Err(AppError::Provider("status unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn toggle_against_store() {
        let store = MemoryStore::seeded(Duration::ZERO);
        let widget = LikeWidget::new(Arc::new(store.clone()), GK, "reader-1");

        assert_eq!(widget.refresh().await, LikeView { liked: false, count: 1 });
        assert!(widget.toggle().await.unwrap());
        assert_eq!(widget.view().await, LikeView { liked: true, count: 2 });
        assert_eq!(likes_api::get_test_like_count(&store, GK).await.unwrap(), 2);

        assert!(!widget.toggle().await.unwrap());
        assert_eq!(widget.view().await, LikeView { liked: false, count: 1 });
    }

    #[tokio::test]
    async fn refresh_shows_existing_like() {
        let store = MemoryStore::seeded(Duration::ZERO);
        let widget = LikeWidget::new(Arc::new(store), GK, DEMO_STUDENT_ID);
        assert_eq!(widget.refresh().await, LikeView { liked: true, count: 1 });
    }

    #[tokio::test]
    async fn refresh_applies_each_half_independently() {
        let widget = LikeWidget::new(Arc::new(ScriptedClient::new(false, None)), GK, "u1");
        assert_eq!(widget.refresh().await, LikeView { liked: false, count: 5 });
    }

    #[tokio::test]
    async fn failed_toggle_rolls_back() {
        let widget = LikeWidget::new(Arc::new(ScriptedClient::new(true, None)), GK, "u1");
        widget.refresh().await;

        let err = widget.toggle().await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
        assert_eq!(widget.view().await, LikeView { liked: false, count: 5 });
    }

    #[tokio::test]
    async fn view_is_optimistic_while_pending() {
        let gate = Arc::new(Semaphore::new(0));
        let client = Arc::new(ScriptedClient::new(true, Some(gate.clone())));
        let widget = LikeWidget::new(client, GK, "u1");

        let pending = widget.toggle_detached().await;
        assert_eq!(widget.view().await, LikeView { liked: true, count: 1 });

        gate.add_permits(1);
        let outcome = pending.await.unwrap();
        assert!(matches!(outcome, Some(Err(AppError::Provider(_)))));
        assert_eq!(widget.view().await, LikeView { liked: false, count: 0 });
    }

    #[tokio::test]
    async fn reply_after_teardown_is_ignored() {
        let gate = Arc::new(Semaphore::new(0));
        let client = Arc::new(ScriptedClient::new(true, Some(gate.clone())));
        let widget = LikeWidget::new(client.clone(), GK, "u1");

        let pending = widget.toggle_detached().await;
        drop(widget);
        gate.add_permits(1);

        assert!(pending.await.unwrap().is_none());
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn overlapping_failed_toggles_restore_starting_view() {
        let gate = Arc::new(Semaphore::new(0));
        let client = Arc::new(ScriptedClient::new(true, Some(gate.clone())));
        let widget = LikeWidget::new(client.clone(), GK, "u1");
        let before = widget.refresh().await;

        let first = widget.toggle_detached().await;
        let second = widget.toggle_detached().await;
        assert_eq!(widget.view().await, before);

        gate.add_permits(1);
        assert!(matches!(first.await.unwrap(), Some(Err(_))));
        gate.add_permits(1);
        assert!(matches!(second.await.unwrap(), Some(Err(_))));

        assert_eq!(widget.view().await, before);
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }
}
