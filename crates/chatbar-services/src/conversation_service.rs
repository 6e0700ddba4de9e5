use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use chatbar_event_bus::{EventHub, SubscriptionId};
use chatbar_types::{Conversation, ConversationChangeEvent, newest_modified, sort_by_recent};

use crate::conversation_store::{ChangeHandler, ConversationStore};

/// Service owning the persisted conversation list
///
/// This service provides:
/// - Loading and saving conversations as a JSON array
/// - Creating, renaming, touching and deleting conversations
/// - Publishing a change event on the `EventHub` after every saved mutation
#[derive(Clone)]
pub struct ConversationService {
    conversations: Arc<RwLock<Vec<Conversation>>>,
    /// `None` keeps everything in memory
    file_path: Option<PathBuf>,
    event_hub: EventHub,
}

impl ConversationService {
    /// Open the store backed by `file_path`. A missing file is an empty store.
    pub async fn open(file_path: PathBuf, event_hub: EventHub) -> Result<Self> {
        let path = file_path.clone();
        let conversations = smol::unblock(move || Self::load_file(&path)).await?;

        log::info!(
            "[ConversationService] Loaded {} conversations from {}",
            conversations.len(),
            file_path.display()
        );

        Ok(Self {
            conversations: Arc::new(RwLock::new(conversations)),
            file_path: Some(file_path),
            event_hub,
        })
    }

    pub fn in_memory(event_hub: EventHub) -> Self {
        Self {
            conversations: Arc::new(RwLock::new(Vec::new())),
            file_path: None,
            event_hub,
        }
    }

    pub fn event_hub(&self) -> &EventHub {
        &self.event_hub
    }

    fn load_file(path: &Path) -> Result<Vec<Conversation>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read conversations file: {:?}", path))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let conversations: Vec<Conversation> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse conversations file: {:?}", path))?;
        Ok(Self::dedup_ids(conversations, path))
    }

    /// Keep one entry per id, the most recently modified
    fn dedup_ids(mut conversations: Vec<Conversation>, path: &Path) -> Vec<Conversation> {
        let before = conversations.len();
        sort_by_recent(&mut conversations);
        let mut seen = HashSet::new();
        conversations.retain(|c| seen.insert(c.id.clone()));

        let dropped = before - conversations.len();
        if dropped > 0 {
            log::warn!(
                "[ConversationService] Dropped {} duplicate conversation ids in {}",
                dropped,
                path.display()
            );
        }
        conversations
    }

    /// Write the list through a temp file so a crash never leaves half a file
    async fn save(&self, conversations: &[Conversation]) -> Result<()> {
        let Some(path) = self.file_path.clone() else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(conversations)
            .context("Failed to serialize conversations")?;

        smol::unblock(move || {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
            let tmp_path = path.with_extension("json.tmp");
            std::fs::write(&tmp_path, content)
                .with_context(|| format!("Failed to write {:?}", tmp_path))?;
            std::fs::rename(&tmp_path, &path)
                .with_context(|| format!("Failed to replace {:?}", path))?;
            log::debug!("[ConversationService] Saved {}", path.display());
            Ok(())
        })
        .await
    }

    /// Apply `mutate` to a copy of the list, persist it, then commit.
    /// Nothing changes in memory if the write fails.
    async fn commit<R>(
        &self,
        mutate: impl FnOnce(&mut Vec<Conversation>) -> Result<R>,
    ) -> Result<R> {
        let mut guard = self.conversations.write().await;
        let mut next = guard.clone();
        let result = mutate(&mut next)?;
        self.save(&next).await?;
        *guard = next;
        Ok(result)
    }

    fn publish(&self, event: ConversationChangeEvent) {
        self.event_hub.publish_conversation_change(event);
    }

    fn normalize_name(name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("Conversation name must not be empty");
        }
        Ok(name.to_string())
    }

    pub async fn create_conversation(&self, name: &str) -> Result<Conversation> {
        let name = Self::normalize_name(name)?;
        let mut conversation = Conversation::new(name);

        let created = self
            .commit(move |list| {
                // A new conversation always sorts first
                if let Some(newest) = newest_modified(list) {
                    conversation.last_modified =
                        conversation.last_modified.max(newest.saturating_add(1));
                }
                list.push(conversation.clone());
                Ok(conversation)
            })
            .await?;

        log::info!(
            "[ConversationService] Created conversation {} '{}'",
            created.id,
            created.name
        );
        self.publish(ConversationChangeEvent::Created {
            conv_id: created.id.clone(),
        });
        Ok(created)
    }

    pub async fn rename_conversation(&self, conv_id: &str, name: &str) -> Result<Conversation> {
        let name = Self::normalize_name(name)?;

        let renamed = self
            .commit(|list| {
                let newest = newest_modified(list);
                let conversation = list
                    .iter_mut()
                    .find(|c| c.id == conv_id)
                    .with_context(|| format!("Conversation not found: {}", conv_id))?;
                conversation.name = name;
                conversation.touch_after(newest, None);
                Ok(conversation.clone())
            })
            .await?;

        log::info!("[ConversationService] Renamed {} to '{}'", conv_id, renamed.name);
        self.publish(ConversationChangeEvent::Updated {
            conv_id: conv_id.to_string(),
        });
        Ok(renamed)
    }

    /// Record activity, optionally moving the conversation to a new head node
    pub async fn touch_conversation(
        &self,
        conv_id: &str,
        curr_node: Option<i64>,
    ) -> Result<Conversation> {
        let touched = self
            .commit(|list| {
                let newest = newest_modified(list);
                let conversation = list
                    .iter_mut()
                    .find(|c| c.id == conv_id)
                    .with_context(|| format!("Conversation not found: {}", conv_id))?;
                conversation.touch_after(newest, curr_node);
                Ok(conversation.clone())
            })
            .await?;

        self.publish(ConversationChangeEvent::Updated {
            conv_id: conv_id.to_string(),
        });
        Ok(touched)
    }

    pub async fn delete_conversation(&self, conv_id: &str) -> Result<()> {
        self.commit(|list| {
            let before = list.len();
            list.retain(|c| c.id != conv_id);
            if list.len() == before {
                anyhow::bail!("Conversation not found: {}", conv_id);
            }
            Ok(())
        })
        .await?;

        log::info!("[ConversationService] Deleted conversation {}", conv_id);
        self.publish(ConversationChangeEvent::Deleted {
            conv_id: conv_id.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for ConversationService {
    async fn get_one_conversation(&self, conv_id: &str) -> Result<Option<Conversation>> {
        if conv_id.is_empty() {
            return Ok(None);
        }
        let conversations = self.conversations.read().await;
        Ok(conversations.iter().find(|c| c.id == conv_id).cloned())
    }

    async fn get_all_conversations(&self) -> Result<Vec<Conversation>> {
        let mut conversations = self.conversations.read().await.clone();
        sort_by_recent(&mut conversations);
        Ok(conversations)
    }

    fn on_conversation_changed(&self, handler: ChangeHandler) -> SubscriptionId {
        self.event_hub
            .subscribe_conversation_changes(move |_event| handler())
    }

    fn off_conversation_changed(&self, id: SubscriptionId) -> bool {
        self.event_hub.unsubscribe(id)
    }
}
