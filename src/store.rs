//! Likes and comments on news articles.
//!
//! [`EngagementStore`] is the seam; [`MemoryStore`] keeps everything in a
//! process-local map that is lost on restart.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::Engagement;

/// Storage for per-article likes and comments.
pub trait EngagementStore: Send + Sync {
    /// Current engagement for `article_id` (zero/empty when unknown).
    fn get(&self, article_id: &str) -> Engagement;

    /// Add one like and return the new total.
    fn like(&self, article_id: &str) -> u64;

    /// Append a comment and return all comments in insertion order.
    fn comment(&self, article_id: &str, comment: String) -> Vec<String>;
}

/// In-memory [`EngagementStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: RwLock<HashMap<String, Engagement>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EngagementStore for MemoryStore {
    fn get(&self, article_id: &str) -> Engagement {
        let articles = self.articles.read().unwrap_or_else(|e| e.into_inner());
        articles.get(article_id).cloned().unwrap_or_default()
    }

    fn like(&self, article_id: &str) -> u64 {
        let mut articles = self.articles.write().unwrap_or_else(|e| e.into_inner());
        let entry = articles.entry(article_id.to_string()).or_default();
        entry.likes += 1;
        entry.likes
    }

    fn comment(&self, article_id: &str, comment: String) -> Vec<String> {
        let mut articles = self.articles.write().unwrap_or_else(|e| e.into_inner());
        let entry = articles.entry(article_id.to_string()).or_default();
        entry.comments.push(comment);
        entry.comments.clone()
    }
}
