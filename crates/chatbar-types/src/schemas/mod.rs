pub mod conversation;

pub use conversation::{Conversation, newest_modified, sort_by_recent};
