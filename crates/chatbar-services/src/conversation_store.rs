//! Read side of conversation persistence, as consumed by views

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use chatbar_event_bus::SubscriptionId;
use chatbar_types::Conversation;

/// Zero-argument callback fired whenever the persisted conversation set changes
pub type ChangeHandler = Box<dyn Fn() + Send + Sync>;

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Look up one conversation. An empty or unknown id yields `Ok(None)`.
    async fn get_one_conversation(&self, conv_id: &str) -> Result<Option<Conversation>>;

    /// Full snapshot, newest first
    async fn get_all_conversations(&self) -> Result<Vec<Conversation>>;

    fn on_conversation_changed(&self, handler: ChangeHandler) -> SubscriptionId;

    /// Returns false if `id` was not subscribed
    fn off_conversation_changed(&self, id: SubscriptionId) -> bool;
}

/// Change listener that unsubscribes when dropped
pub struct ChangeSubscription {
    store: Arc<dyn ConversationStore>,
    id: Option<SubscriptionId>,
}

impl ChangeSubscription {
    pub fn new<F>(store: Arc<dyn ConversationStore>, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = store.on_conversation_changed(Box::new(handler));
        Self {
            store,
            id: Some(id),
        }
    }

    pub fn id(&self) -> Option<SubscriptionId> {
        self.id
    }

    /// Unsubscribe now instead of at drop
    pub fn release(&mut self) {
        if let Some(id) = self.id.take() {
            if !self.store.off_conversation_changed(id) {
                log::warn!("[ChangeSubscription] {:?} was already removed", id);
            }
        }
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ChangeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSubscription")
            .field("id", &self.id)
            .finish()
    }
}
