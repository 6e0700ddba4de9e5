pub mod config;
pub mod config_manager;
pub mod events;
pub mod route;
pub mod schemas;

pub use config::{Config, DEFAULT_LOG_FILTER, SidebarConfig};
pub use events::ConversationChangeEvent;
pub use route::{Route, RouteHistory};
pub use schemas::{Conversation, newest_modified, sort_by_recent};
