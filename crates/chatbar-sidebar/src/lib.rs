//! Conversation sidebar, independent of any UI toolkit
//!
//! [`ConversationSidebar`] owns the display state and the store
//! subscription; [`render_sidebar`] turns that state into a [`SidebarView`]
//! which a host toolkit maps to widgets.

pub mod controller;
pub mod direction;
pub mod navigator;
pub mod state;
pub mod view;

pub use controller::{ConversationSidebar, CurrentLoad, ListLoad};
pub use direction::TextDirection;
pub use navigator::{ChannelNavigator, Navigator};
pub use state::{LoadKind, LoadTicket, Loaded, SidebarState};
pub use view::{SidebarEntry, SidebarLabels, SidebarView, render_sidebar};
