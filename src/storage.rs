//! Storage seam for subscription state.
//!
//! The receiver only computes three fields per event; everything about how
//! they are persisted (including deduplication of replayed deliveries)
//! belongs behind the [`SubscriptionStore`] trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;

/// Trait for persisting the simplified subscription record.
///
/// Implementations must be safe under concurrent calls; the receiver issues
/// one call per relevant event and performs no deduplication of its own, so
/// a store that needs replay protection should upsert by subscription id.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Save (upsert) the subscription status for a customer.
    async fn save_subscription(
        &self,
        subscription_id: &str,
        customer_id: &str,
        active: bool,
    ) -> Result<()>;
}

/// The persisted shape of a subscription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionRecord {
    /// Provider-issued subscription ID.
    pub subscription_id: String,
    /// Provider-issued customer ID.
    pub customer_id: String,
    /// Whether the subscription is currently active.
    pub active: bool,
}

/// A single recorded `save_subscription` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCall {
    pub subscription_id: String,
    pub customer_id: String,
    pub active: bool,
}

/// In-memory subscription store for development and testing.
///
/// Records are upserted keyed by subscription id. Every call is also kept in
/// an append-only log so tests can assert exactly which persistence calls
/// the receiver made.
#[derive(Clone, Default)]
pub struct InMemorySubscriptionStore {
    records: Arc<RwLock<HashMap<String, SubscriptionRecord>>>,
    calls: Arc<RwLock<Vec<SaveCall>>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the stored record for a subscription id.
    pub async fn get(&self, subscription_id: &str) -> Option<SubscriptionRecord> {
        self.records.read().await.get(subscription_id).cloned()
    }

    /// All `save_subscription` calls made so far, in order.
    pub async fn calls(&self) -> Vec<SaveCall> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn save_subscription(
        &self,
        subscription_id: &str,
        customer_id: &str,
        active: bool,
    ) -> Result<()> {
        let record = SubscriptionRecord {
            subscription_id: subscription_id.to_string(),
            customer_id: customer_id.to_string(),
            active,
        };

        self.calls.write().await.push(SaveCall {
            subscription_id: subscription_id.to_string(),
            customer_id: customer_id.to_string(),
            active,
        });

        self.records
            .write()
            .await
            .insert(subscription_id.to_string(), record);

        tracing::debug!(
            subscription_id,
            customer_id,
            active,
            "subscription record saved"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_get() {
        let store = InMemorySubscriptionStore::new();
        store
            .save_subscription("sub_1", "cus_1", true)
            .await
            .unwrap();

        let record = store.get("sub_1").await.unwrap();
        assert_eq!(record.subscription_id, "sub_1");
        assert_eq!(record.customer_id, "cus_1");
        assert!(record.active);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_by_subscription_id() {
        let store = InMemorySubscriptionStore::new();
        store
            .save_subscription("sub_1", "cus_1", true)
            .await
            .unwrap();
        store
            .save_subscription("sub_1", "cus_1", false)
            .await
            .unwrap();

        let record = store.get("sub_1").await.unwrap();
        assert!(!record.active);

        // Both calls are visible in the log even though the record converged.
        assert_eq!(store.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_record() {
        let store = InMemorySubscriptionStore::new();
        assert!(store.get("sub_missing").await.is_none());
    }
}
