// src/store/mod.rs

//! In-memory system of record for tests, sections, results, likes and feedback.
//!
//! Every access goes through [`MemoryStore::read`] or [`MemoryStore::write`],
//! which wait the configured nominal latency before taking the lock. An
//! operation takes the lock once, so each call is atomic with respect to
//! the others.

pub mod fixtures;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{
    feedback::Feedback, result::TestResult, section::Section, test::Test,
};

/// The collections backing the mock API.
#[derive(Debug, Default, Clone)]
pub struct Collections {
    /// Most recent first.
    pub tests: Vec<Test>,
    pub sections: Vec<Section>,
    /// test id -> ordered section ids
    pub test_sections: HashMap<String, Vec<String>>,
    pub results: Vec<TestResult>,
    /// test id -> ids of users who liked it
    pub likes: HashMap<String, HashSet<String>>,
    pub feedback: Vec<Feedback>,
}

impl Collections {
    pub fn test(&self, id: &str) -> Option<&Test> {
        self.tests.iter().find(|t| t.id == id)
    }

    pub fn has_test(&self, id: &str) -> bool {
        self.test(id).is_some()
    }
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
    latency: Duration,
}

impl MemoryStore {
    /// Empty store.
    pub fn new(latency: Duration) -> Self {
        Self::with_collections(Collections::default(), latency)
    }

    /// Store pre-populated with the demo fixtures.
    pub fn seeded(latency: Duration) -> Self {
        Self::with_collections(fixtures::collections(), latency)
    }

    pub fn with_collections(collections: Collections, latency: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(collections)),
            latency,
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.simulate_latency().await;
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.simulate_latency().await;
        self.inner.write().await
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
