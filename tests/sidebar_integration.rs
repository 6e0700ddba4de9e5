use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;

use chatbar_event_bus::EventHub;
use chatbar_services::{ChangeHandler, ConversationService, ConversationStore, SubscriptionId};
use chatbar_sidebar::{ChannelNavigator, ConversationSidebar, SidebarLabels};
use chatbar_types::{Conversation, Route};

async fn settle(sidebar: &mut ConversationSidebar, pending: &AtomicUsize) {
    while pending.load(Ordering::SeqCst) > 0 {
        pending.fetch_sub(1, Ordering::SeqCst);
        if let Some(load) = sidebar.reload_list() {
            let loaded = load.await;
            sidebar.apply_list(loaded);
        }
    }
}

#[test]
fn test_sidebar_follows_file_backed_store() {
    smol::block_on(async {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("conversations.json");
        let service = Arc::new(
            ConversationService::open(file.clone(), EventHub::new())
                .await
                .unwrap(),
        );
        let first = service.create_conversation("Groceries").await.unwrap();

        let (navigator, mut routes) = ChannelNavigator::new();
        let mut sidebar = ConversationSidebar::new(
            service.clone(),
            Arc::new(navigator),
            Route::chat(first.id.clone()),
        );

        let pending = Arc::new(AtomicUsize::new(0));
        let counter = pending.clone();
        let (current, list) = sidebar.mount(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let loaded = list.await;
        sidebar.apply_list(loaded);
        let loaded = current.await;
        sidebar.apply_current(loaded);

        let second = service.create_conversation("Trip to Lisbon").await.unwrap();
        settle(&mut sidebar, &pending).await;

        let view = sidebar.view(&SidebarLabels::default());
        let names: Vec<_> = view.conversations.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(names, vec!["Trip to Lisbon", "Groceries"]);
        assert_eq!(view.active_entry().unwrap().label, "Groceries");

        // Activity moves a conversation to the top
        service.touch_conversation(&first.id, Some(3)).await.unwrap();
        settle(&mut sidebar, &pending).await;
        let view = sidebar.view(&SidebarLabels::default());
        assert_eq!(view.conversations[0].label, "Groceries");

        // Clicking a row asks the router to navigate
        sidebar.select_conversation(&second.id);
        assert_eq!(routes.try_recv().unwrap(), Route::chat(second.id.clone()));

        // A reopened store sees the same data
        let reopened = ConversationService::open(file, EventHub::new())
            .await
            .unwrap();
        let all = reopened.get_all_conversations().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].curr_node, 3);

        sidebar.unmount();
        service.delete_conversation(&second.id).await.unwrap();
        assert_eq!(pending.load(Ordering::SeqCst), 0);
    });
}

#[test]
fn test_deleted_current_conversation_clears_highlight() {
    smol::block_on(async {
        let service = Arc::new(ConversationService::in_memory(EventHub::new()));
        let conv = service.create_conversation("Scratch").await.unwrap();

        let (navigator, _routes) = ChannelNavigator::new();
        let mut sidebar =
            ConversationSidebar::new(service.clone(), Arc::new(navigator), Route::chat(conv.id.clone()));
        let pending = Arc::new(AtomicUsize::new(0));
        let counter = pending.clone();
        let (current, list) = sidebar.mount(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let loaded = current.await;
        sidebar.apply_current(loaded);
        let loaded = list.await;
        sidebar.apply_list(loaded);

        service.delete_conversation(&conv.id).await.unwrap();
        settle(&mut sidebar, &pending).await;
        assert!(sidebar.view(&SidebarLabels::default()).conversations.is_empty());

        // The shell navigates away after a deletion
        let load = sidebar.set_route(Route::NewChat).unwrap();
        let loaded = load.await;
        sidebar.apply_current(loaded);
        let view = sidebar.view(&SidebarLabels::default());
        assert!(view.new_conversation.active);
    });
}

/// Store whose list fetch can be made to fail
#[derive(Default)]
struct FlakyStore {
    failing: AtomicBool,
    hub: EventHub,
}

#[async_trait]
impl ConversationStore for FlakyStore {
    async fn get_one_conversation(&self, _conv_id: &str) -> Result<Option<Conversation>> {
        Ok(None)
    }

    async fn get_all_conversations(&self) -> Result<Vec<Conversation>> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("database is locked");
        }
        Ok(vec![Conversation::new("Only one")])
    }

    fn on_conversation_changed(&self, handler: ChangeHandler) -> SubscriptionId {
        self.hub.subscribe_conversation_changes(move |_| handler())
    }

    fn off_conversation_changed(&self, id: SubscriptionId) -> bool {
        self.hub.unsubscribe(id)
    }
}

#[test]
fn test_failed_list_load_shows_error_until_next_success() {
    smol::block_on(async {
        let store = Arc::new(FlakyStore::default());
        let (navigator, _routes) = ChannelNavigator::new();
        let mut sidebar = ConversationSidebar::new(store.clone(), Arc::new(navigator), Route::NewChat);

        let (current, list) = sidebar.mount(|| {});
        let loaded = current.await;
        sidebar.apply_current(loaded);
        let loaded = list.await;
        sidebar.apply_list(loaded);
        assert_eq!(sidebar.view(&SidebarLabels::default()).conversations.len(), 1);

        store.failing.store(true, Ordering::SeqCst);
        let loaded = sidebar.reload_list().unwrap().await;
        sidebar.apply_list(loaded);
        let view = sidebar.view(&SidebarLabels::default());
        assert!(view.error.as_deref().unwrap().contains("database is locked"));
        assert_eq!(view.conversations.len(), 1);

        store.failing.store(false, Ordering::SeqCst);
        let loaded = sidebar.reload_list().unwrap().await;
        sidebar.apply_list(loaded);
        assert!(sidebar.view(&SidebarLabels::default()).error.is_none());
    });
}
