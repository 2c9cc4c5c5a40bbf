//! Wrap-up storage.
//!
//! `WrapupStore` is the seam handlers depend on. `InMemoryWrapupStore`
//! keeps documents in insertion order for the lifetime of the process.

use crate::errors::WuError;
use async_trait::async_trait;
use chrono::Utc;
use common::types::{NewWrapup, Wrapup};
use tokio::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait WrapupStore: Send + Sync {
    /// Documents matching `filter` in creation order. An empty filter
    /// returns everything.
    async fn list(&self, filter: &str) -> Result<Vec<Wrapup>, WuError>;

    /// The document with `id`, if any.
    async fn get(&self, id: &str) -> Result<Option<Wrapup>, WuError>;

    /// Persist a new document, assigning its id and creation time.
    async fn create(&self, new: NewWrapup) -> Result<Wrapup, WuError>;
}

#[derive(Debug, Default)]
pub struct InMemoryWrapupStore {
    wrapups: RwLock<Vec<Wrapup>>,
}

impl InMemoryWrapupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.wrapups.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.wrapups.read().await.is_empty()
    }
}

#[async_trait]
impl WrapupStore for InMemoryWrapupStore {
    async fn list(&self, filter: &str) -> Result<Vec<Wrapup>, WuError> {
        let wrapups = self.wrapups.read().await;
        Ok(wrapups.iter().filter(|w| w.matches(filter)).cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Wrapup>, WuError> {
        let wrapups = self.wrapups.read().await;
        Ok(wrapups.iter().find(|w| w.id == id).cloned())
    }

    async fn create(&self, new: NewWrapup) -> Result<Wrapup, WuError> {
        let wrapup = Wrapup {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            wrapup: new.wrapup,
            comment: new.comment,
            note: new.note,
            create_time: Utc::now(),
        };

        self.wrapups.write().await.push(wrapup.clone());

        Ok(wrapup)
    }
}
