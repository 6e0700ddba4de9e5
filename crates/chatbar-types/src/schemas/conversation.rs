use serde::{Deserialize, Serialize};

/// A persisted chat session as listed in the sidebar
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique, stable identifier (e.g. `conv-1718000000000-1a2b3c4d`)
    pub id: String,
    /// Display name, may be in any script
    pub name: String,
    /// Last activity in milliseconds since the Unix epoch
    pub last_modified: i64,
    /// Identifier of the newest message node, 0 for a fresh conversation
    #[serde(default)]
    pub curr_node: i64,
}

impl Conversation {
    /// Create a new conversation stamped with the current time
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let suffix = uuid::Uuid::new_v4().simple().to_string();

        Self {
            id: format!("conv-{}-{}", now, &suffix[..8]),
            name: name.into(),
            last_modified: now,
            curr_node: 0,
        }
    }

    /// Record activity on this conversation
    pub fn touch(&mut self, curr_node: Option<i64>) {
        self.touch_after(None, curr_node);
    }

    /// Record activity and land strictly after `newest`, the latest
    /// `last_modified` of the list this conversation belongs to
    pub fn touch_after(&mut self, newest: Option<i64>, curr_node: Option<i64>) {
        // Keep last_modified strictly increasing so ordering follows activity
        // even when two writes land in the same millisecond.
        let now = chrono::Utc::now().timestamp_millis();
        let floor = newest.map_or(i64::MIN, |n| n.saturating_add(1));
        self.last_modified = now.max(self.last_modified.saturating_add(1)).max(floor);
        if let Some(node) = curr_node {
            self.curr_node = node;
        }
    }
}

/// Latest `last_modified` in `conversations`
pub fn newest_modified(conversations: &[Conversation]) -> Option<i64> {
    conversations.iter().map(|c| c.last_modified).max()
}

/// Sort newest first, ties broken by id so the order is stable
pub fn sort_by_recent(conversations: &mut [Conversation]) {
    conversations.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conv(id: &str, last_modified: i64) -> Conversation {
        Conversation {
            id: id.to_string(),
            name: id.to_uppercase(),
            last_modified,
            curr_node: 0,
        }
    }

    #[test]
    fn test_new_conversation_id_shape() {
        let conv = Conversation::new("Chat A");
        assert!(conv.id.starts_with("conv-"));
        assert_eq!(conv.name, "Chat A");
        assert_eq!(conv.curr_node, 0);
        assert!(conv.last_modified > 0);
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut conv = conv("a", i64::MAX / 2);
        let before = conv.last_modified;
        conv.touch(Some(7));
        assert!(conv.last_modified > before);
        assert_eq!(conv.curr_node, 7);

        conv.touch(None);
        assert_eq!(conv.curr_node, 7);
    }

    #[test]
    fn test_touch_after_overtakes_the_newest() {
        let mut list = vec![conv("a", 10), conv("b", i64::MAX / 4)];
        let newest = newest_modified(&list);
        list[0].touch_after(newest, None);
        sort_by_recent(&mut list);
        assert_eq!(list[0].id, "a");
        assert_eq!(newest_modified(&[]), None);
    }

    #[test]
    fn test_sort_by_recent() {
        let mut list = vec![conv("a", 1), conv("c", 3), conv("b", 3), conv("d", 2)];
        sort_by_recent(&mut list);
        let ids: Vec<_> = list.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_value(conv("a", 5)).unwrap();
        assert_eq!(json["lastModified"], 5);
        assert_eq!(json["currNode"], 0);

        let parsed: Conversation =
            serde_json::from_str(r#"{"id":"x","name":"X","lastModified":9}"#).unwrap();
        assert_eq!(parsed.curr_node, 0);
        assert_eq!(parsed.last_modified, 9);
    }
}
