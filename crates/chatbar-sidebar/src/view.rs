use std::path::PathBuf;

use chatbar_types::Route;

use crate::direction::TextDirection;
use crate::state::SidebarState;

/// Localized strings and footer content the view needs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarLabels {
    pub title: String,
    pub new_conversation: String,
    pub footer_note: Option<String>,
    pub footer_image: Option<PathBuf>,
}

impl Default for SidebarLabels {
    fn default() -> Self {
        Self {
            title: "Conversations".to_string(),
            new_conversation: "+ New conversation".to_string(),
            footer_note: None,
            footer_image: None,
        }
    }
}

/// One clickable row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarEntry {
    /// Stable key: the conversation id, or `None` for the new-chat row
    pub key: Option<String>,
    pub label: String,
    pub active: bool,
    pub direction: TextDirection,
    /// Where a click on this row navigates
    pub target: Route,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarView {
    pub title: String,
    pub footer_note: Option<String>,
    /// Shown below the list when expanded
    pub footer_image: Option<PathBuf>,
    pub collapsed: bool,
    pub new_conversation: SidebarEntry,
    pub conversations: Vec<SidebarEntry>,
    pub error: Option<String>,
}

impl SidebarView {
    /// The single highlighted row, if any
    pub fn active_entry(&self) -> Option<&SidebarEntry> {
        std::iter::once(&self.new_conversation)
            .chain(self.conversations.iter())
            .find(|entry| entry.active)
    }
}

/// Pure mapping from sidebar state to what should be on screen
pub fn render_sidebar(state: &SidebarState, labels: &SidebarLabels) -> SidebarView {
    let current_id = state.current().map(|c| c.id.as_str());

    let new_conversation = SidebarEntry {
        key: None,
        label: labels.new_conversation.clone(),
        active: current_id.is_none(),
        direction: TextDirection::detect(&labels.new_conversation),
        target: Route::NewChat,
    };

    let conversations = state
        .conversations()
        .iter()
        .map(|conv| SidebarEntry {
            key: Some(conv.id.clone()),
            label: conv.name.clone(),
            active: current_id == Some(conv.id.as_str()),
            direction: TextDirection::detect(&conv.name),
            target: Route::chat(conv.id.clone()),
        })
        .collect();

    SidebarView {
        title: labels.title.clone(),
        footer_note: labels.footer_note.clone(),
        footer_image: labels.footer_image.clone(),
        collapsed: state.is_collapsed(),
        new_conversation,
        conversations,
        error: state.error().map(|e| e.message.clone()),
    }
}
