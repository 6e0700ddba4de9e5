use crate::core::{EventBusContainer, EventBusStats, SubscriptionId};
use chatbar_types::ConversationChangeEvent;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    ConversationChanged(ConversationChangeEvent),
}

/// Process-wide event channel shared by the store and the UI
#[derive(Clone)]
pub struct EventHub {
    bus: EventBusContainer<AppEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        Self {
            bus: EventBusContainer::new(),
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) -> bool + Send + Sync + 'static,
    {
        self.bus.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn publish(&self, event: AppEvent) {
        self.bus.publish(event);
    }

    pub fn stats(&self) -> EventBusStats {
        self.bus.stats()
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    pub fn subscribe_conversation_changes<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ConversationChangeEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe_with_filter(
            move |event| {
                let AppEvent::ConversationChanged(event) = event;
                callback(event);
                true
            },
            |event| matches!(event, AppEvent::ConversationChanged(_)),
        )
    }

    /// Only changes to the conversation with `conv_id`
    pub fn subscribe_conversation_changes_for<F>(
        &self,
        conv_id: String,
        callback: F,
    ) -> SubscriptionId
    where
        F: Fn(&ConversationChangeEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe_with_filter(
            move |event| {
                let AppEvent::ConversationChanged(event) = event;
                callback(event);
                true
            },
            move |event| {
                matches!(
                    event,
                    AppEvent::ConversationChanged(change) if change.conv_id() == conv_id
                )
            },
        )
    }

    pub fn publish_conversation_change(&self, event: ConversationChangeEvent) {
        log::debug!("[EventHub] Conversation change: {:?}", event);
        self.publish(AppEvent::ConversationChanged(event));
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}
