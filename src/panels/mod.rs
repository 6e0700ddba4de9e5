mod conversation_pane;
mod conversation_sidebar;

pub use conversation_pane::ConversationPane;
pub use conversation_sidebar::ConversationSidebarPanel;
