//! In-memory delivery log.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::template::StoreError;

use super::{DeliveryAttempt, DeliveryLog};

/// Entries kept by [`MemoryDeliveryLog::new`]
const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Delivery log held in process memory, in append order.
///
/// Intended for development and tests: entries are lost on restart, and once
/// `max_entries` is reached the oldest entry is dropped for each append. Use
/// the PostgreSQL backend where the log must be kept.
pub struct MemoryDeliveryLog {
    entries: RwLock<VecDeque<DeliveryAttempt>>,
    max_entries: usize,
}

impl Default for MemoryDeliveryLog {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}

impl MemoryDeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_entries` (at least one)
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// All retained entries in append order
    pub async fn entries(&self) -> Vec<DeliveryAttempt> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl DeliveryLog for MemoryDeliveryLog {
    async fn append(&self, attempt: &DeliveryAttempt) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        if entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(attempt.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<DeliveryAttempt>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }
}
