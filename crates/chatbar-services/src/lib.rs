pub mod conversation_service;
pub mod conversation_store;

pub use conversation_service::ConversationService;
pub use conversation_store::{ChangeHandler, ChangeSubscription, ConversationStore};

// Re-export for store consumers
pub use chatbar_event_bus::SubscriptionId;
pub use chatbar_types::Conversation;
