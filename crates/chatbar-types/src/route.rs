//! Application routes
//!
//! The app has two kinds of screens: the new-chat screen at `/` and a
//! conversation screen at `/chat/{id}`.

use std::fmt;

const CHAT_PREFIX: &str = "/chat/";

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
    /// Root route, where a new conversation is started
    #[default]
    NewChat,
    /// A single conversation, keyed by its identifier
    Chat(String),
}

impl Route {
    /// Route for a conversation; an empty id maps to the new-chat route
    pub fn chat(conv_id: impl Into<String>) -> Self {
        let conv_id = conv_id.into();
        if conv_id.is_empty() {
            Self::NewChat
        } else {
            Self::Chat(conv_id)
        }
    }

    /// Parse a path. Unknown paths fall back to the new-chat route.
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        match path.strip_prefix(CHAT_PREFIX) {
            Some(rest) => {
                let conv_id = rest.trim_end_matches('/');
                if conv_id.is_empty() || conv_id.contains('/') {
                    log::debug!("[Route] Unrecognized chat path: {}", path);
                    Self::NewChat
                } else {
                    Self::Chat(conv_id.to_string())
                }
            }
            None => Self::NewChat,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::NewChat => "/".to_string(),
            Self::Chat(conv_id) => format!("{}{}", CHAT_PREFIX, conv_id),
        }
    }

    /// The `convId` route parameter, if any
    pub fn conv_id(&self) -> Option<&str> {
        match self {
            Self::NewChat => None,
            Self::Chat(conv_id) => Some(conv_id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Current route plus a back stack
#[derive(Clone, Debug, Default)]
pub struct RouteHistory {
    current: Route,
    back_stack: Vec<Route>,
}

impl RouteHistory {
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial,
            back_stack: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Navigate to `route`. Returns false when already there.
    pub fn navigate(&mut self, route: Route) -> bool {
        if route == self.current {
            return false;
        }
        let previous = std::mem::replace(&mut self.current, route);
        self.back_stack.push(previous);
        true
    }

    /// Replace the current route without recording history
    pub fn replace(&mut self, route: Route) -> bool {
        if route == self.current {
            return false;
        }
        self.current = route;
        true
    }

    /// Go back one step. Returns false when there is nothing to go back to.
    pub fn back(&mut self) -> bool {
        match self.back_stack.pop() {
            Some(route) => {
                self.current = route;
                true
            }
            None => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    /// Drop every history entry pointing at `conv_id`, e.g. after deletion
    pub fn forget(&mut self, conv_id: &str) {
        self.back_stack
            .retain(|route| route.conv_id() != Some(conv_id));
        self.back_stack.dedup();
        // Going back must actually leave the current screen
        while self.back_stack.last() == Some(&self.current) {
            self.back_stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::NewChat.path(), "/");
        assert_eq!(Route::chat("abc").path(), "/chat/abc");
        assert_eq!(Route::chat(""), Route::NewChat);
        assert_eq!(Route::chat("abc").to_string(), "/chat/abc");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse("/"), Route::NewChat);
        assert_eq!(Route::parse("/chat/conv-1"), Route::Chat("conv-1".into()));
        assert_eq!(Route::parse("/chat/conv-1/"), Route::Chat("conv-1".into()));
        assert_eq!(Route::parse("/chat/"), Route::NewChat);
        assert_eq!(Route::parse("/chat/a/b"), Route::NewChat);
        assert_eq!(Route::parse("/settings"), Route::NewChat);
    }

    #[test]
    fn test_conv_id() {
        assert_eq!(Route::NewChat.conv_id(), None);
        assert_eq!(Route::chat("b").conv_id(), Some("b"));
    }

    #[test]
    fn test_history_navigate_and_back() {
        let mut history = RouteHistory::default();
        assert!(!history.can_go_back());

        assert!(history.navigate(Route::chat("a")));
        assert!(!history.navigate(Route::chat("a")));
        assert!(history.navigate(Route::chat("b")));
        assert_eq!(history.current(), &Route::chat("b"));

        assert!(history.back());
        assert_eq!(history.current(), &Route::chat("a"));
        assert!(history.back());
        assert_eq!(history.current(), &Route::NewChat);
        assert!(!history.back());
    }

    #[test]
    fn test_history_forget() {
        let mut history = RouteHistory::default();
        history.navigate(Route::chat("a"));
        history.navigate(Route::chat("b"));
        history.navigate(Route::NewChat);

        history.forget("b");
        assert!(history.back());
        assert_eq!(history.current(), &Route::chat("a"));
    }

    #[test]
    fn test_forget_after_leaving_deleted_conversation() {
        let mut history = RouteHistory::default();
        history.navigate(Route::chat("a"));
        history.navigate(Route::NewChat);

        history.forget("a");
        assert!(!history.can_go_back());
        assert!(!history.back());
        assert_eq!(history.current(), &Route::NewChat);
    }

    #[test]
    fn test_forget_skips_entries_equal_to_current() {
        let mut history = RouteHistory::default();
        history.navigate(Route::chat("b"));
        history.navigate(Route::NewChat);
        history.navigate(Route::chat("a"));
        history.navigate(Route::NewChat);

        history.forget("a");
        assert!(history.back());
        assert_eq!(history.current(), &Route::chat("b"));
    }
}
