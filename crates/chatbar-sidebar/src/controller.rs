use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use chatbar_services::{ChangeSubscription, ConversationStore};
use chatbar_types::{Conversation, Route};

use crate::navigator::Navigator;
use crate::state::{LoadKind, Loaded, SidebarState};
use crate::view::{SidebarLabels, SidebarView, render_sidebar};

/// Pending fetch of the routed conversation
pub type CurrentLoad = BoxFuture<'static, Loaded<Option<Conversation>>>;
/// Pending fetch of the full conversation list
pub type ListLoad = BoxFuture<'static, Loaded<Vec<Conversation>>>;

/// Sidebar listing every conversation, with the routed one highlighted
///
/// The host drives it:
/// - `mount` subscribes to store changes and returns the two initial loads
/// - every change notification calls `reload_list`
/// - every route change calls `set_route`
/// - finished loads go back through `apply_current` / `apply_list`
///
/// Loads are plain futures so the host decides where they run. The store
/// subscription is released on `unmount` or when the sidebar is dropped.
pub struct ConversationSidebar {
    store: Arc<dyn ConversationStore>,
    navigator: Arc<dyn Navigator>,
    state: SidebarState,
    subscription: Option<ChangeSubscription>,
}

impl ConversationSidebar {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        navigator: Arc<dyn Navigator>,
        route: Route,
    ) -> Self {
        Self {
            store,
            navigator,
            state: SidebarState::new(route),
            subscription: None,
        }
    }

    pub fn state(&self) -> &SidebarState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.state.is_mounted()
    }

    /// Subscribe to store changes; `on_change` runs on the publisher's thread
    /// and should only schedule a `reload_list` on the host's loop.
    pub fn mount<F>(&mut self, on_change: F) -> (CurrentLoad, ListLoad)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.subscription.is_some() {
            log::warn!("[Sidebar] Already mounted, replacing subscription");
        }
        // Release any previous listener before registering the new one
        self.subscription = None;
        self.subscription = Some(ChangeSubscription::new(self.store.clone(), on_change));
        self.state.set_mounted(true);
        log::debug!("[Sidebar] Mounted at {}", self.state.route());

        (self.load_current(), self.load_list())
    }

    /// Release the store subscription. Results still in flight are ignored.
    pub fn unmount(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
        }
        self.state.set_mounted(false);
        log::debug!("[Sidebar] Unmounted");
    }

    fn load_current(&mut self) -> CurrentLoad {
        let ticket = self.state.issue(LoadKind::Current);
        let store = self.store.clone();
        let conv_id = self.state.route().conv_id().unwrap_or_default().to_string();

        async move {
            let result = store.get_one_conversation(&conv_id).await;
            Loaded { ticket, result }
        }
        .boxed()
    }

    fn load_list(&mut self) -> ListLoad {
        let ticket = self.state.issue(LoadKind::List);
        let store = self.store.clone();

        async move {
            let result = store.get_all_conversations().await;
            Loaded { ticket, result }
        }
        .boxed()
    }

    /// Follow a route change. Returns a load only when `convId` changed.
    pub fn set_route(&mut self, route: Route) -> Option<CurrentLoad> {
        if !self.state.set_route(route) || !self.is_mounted() {
            return None;
        }
        Some(self.load_current())
    }

    /// React to a store change notification
    pub fn reload_list(&mut self) -> Option<ListLoad> {
        if !self.is_mounted() {
            log::debug!("[Sidebar] Change notification after unmount ignored");
            return None;
        }
        Some(self.load_list())
    }

    pub fn apply_current(&mut self, loaded: Loaded<Option<Conversation>>) -> bool {
        self.state.apply_current(loaded)
    }

    pub fn apply_list(&mut self, loaded: Loaded<Vec<Conversation>>) -> bool {
        self.state.apply_list(loaded)
    }

    /// "New conversation" affordance
    pub fn new_conversation(&self) {
        self.navigator.navigate(Route::NewChat);
    }

    /// Open one conversation
    pub fn select_conversation(&self, conv_id: &str) {
        self.navigator.navigate(Route::chat(conv_id));
    }

    pub fn toggle_collapsed(&mut self) {
        let collapsed = !self.state.is_collapsed();
        self.state.set_collapsed(collapsed);
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.state.set_collapsed(collapsed);
    }

    pub fn view(&self, labels: &SidebarLabels) -> SidebarView {
        render_sidebar(&self.state, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatbar_event_bus::EventHub;
    use chatbar_services::ConversationService;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    struct Fixture {
        service: Arc<ConversationService>,
        navigator: Arc<RecordingNavigator>,
        notifications: Arc<AtomicUsize>,
        sidebar: ConversationSidebar,
    }

    impl Fixture {
        fn new(route: Route) -> Self {
            let service = Arc::new(ConversationService::in_memory(EventHub::new()));
            let navigator = Arc::new(RecordingNavigator::default());
            let sidebar = ConversationSidebar::new(service.clone(), navigator.clone(), route);
            Self {
                service,
                navigator,
                notifications: Arc::new(AtomicUsize::new(0)),
                sidebar,
            }
        }

        async fn mount(&mut self) {
            let counter = self.notifications.clone();
            let (current, list) = self.sidebar.mount(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            let list = list.await;
            assert!(self.sidebar.apply_list(list));
            let current = current.await;
            assert!(self.sidebar.apply_current(current));
        }

        async fn refresh(&mut self) {
            if let Some(load) = self.sidebar.reload_list() {
                let loaded = load.await;
                self.sidebar.apply_list(loaded);
            }
        }

        async fn navigate(&mut self, route: Route) {
            if let Some(load) = self.sidebar.set_route(route) {
                let loaded = load.await;
                self.sidebar.apply_current(loaded);
            }
        }

        fn view(&self) -> SidebarView {
            self.sidebar.view(&SidebarLabels::default())
        }
    }

    async fn seed(service: &ConversationService) -> (Conversation, Conversation) {
        let a = service.create_conversation("Chat A").await.unwrap();
        let b = service.create_conversation("Chat B").await.unwrap();
        (a, b)
    }

    #[test]
    fn test_routed_conversation_is_active() {
        smol::block_on(async {
            let mut fx = Fixture::new(Route::NewChat);
            let (a, b) = seed(&fx.service).await;
            fx.sidebar.state.set_route(Route::chat(b.id.clone()));
            fx.mount().await;

            let view = fx.view();
            assert_eq!(view.conversations.len(), 2);
            assert!(!view.new_conversation.active);
            for entry in &view.conversations {
                assert_eq!(entry.active, entry.key.as_deref() == Some(b.id.as_str()));
            }
            let inactive = view
                .conversations
                .iter()
                .find(|e| e.key.as_deref() == Some(a.id.as_str()))
                .unwrap();
            assert_eq!(inactive.label, "Chat A");
            assert_eq!(view.active_entry().unwrap().label, "Chat B");
        });
    }

    #[test]
    fn test_empty_route_activates_new_conversation() {
        smol::block_on(async {
            let mut fx = Fixture::new(Route::NewChat);
            seed(&fx.service).await;
            fx.mount().await;

            let view = fx.view();
            assert!(view.new_conversation.active);
            assert!(view.conversations.iter().all(|e| !e.active));
        });
    }

    #[test]
    fn test_unknown_route_highlights_nothing_in_list() {
        smol::block_on(async {
            let mut fx = Fixture::new(Route::chat("missing"));
            seed(&fx.service).await;
            fx.mount().await;

            let view = fx.view();
            assert!(fx.sidebar.state().current().is_none());
            assert!(view.new_conversation.active);
            assert!(view.conversations.iter().all(|e| !e.active));
        });
    }

    #[test]
    fn test_route_change_refetches_current() {
        smol::block_on(async {
            let mut fx = Fixture::new(Route::NewChat);
            let (a, b) = seed(&fx.service).await;
            fx.mount().await;

            fx.navigate(Route::chat(a.id.clone())).await;
            assert_eq!(fx.view().active_entry().unwrap().label, "Chat A");

            fx.navigate(Route::chat(b.id.clone())).await;
            assert_eq!(fx.view().active_entry().unwrap().label, "Chat B");

            // Same convId: nothing to fetch
            assert!(fx.sidebar.set_route(Route::chat(b.id.clone())).is_none());

            fx.navigate(Route::NewChat).await;
            assert!(fx.view().new_conversation.active);
        });
    }

    #[test]
    fn test_change_notification_replaces_list() {
        smol::block_on(async {
            let mut fx = Fixture::new(Route::NewChat);
            fx.mount().await;
            assert!(fx.view().conversations.is_empty());

            let created = fx.service.create_conversation("Chat C").await.unwrap();
            assert_eq!(fx.notifications.load(Ordering::SeqCst), 1);
            fx.refresh().await;

            let view = fx.view();
            assert_eq!(view.conversations.len(), 1);
            assert_eq!(view.conversations[0].key.as_deref(), Some(created.id.as_str()));
        });
    }

    #[test]
    fn test_list_matches_latest_snapshot_in_store_order() {
        smol::block_on(async {
            let mut fx = Fixture::new(Route::NewChat);
            let (a, b) = seed(&fx.service).await;
            fx.mount().await;

            fx.service.touch_conversation(&a.id, Some(1)).await.unwrap();
            fx.refresh().await;
            fx.service.rename_conversation(&b.id, "Chat B2").await.unwrap();
            fx.refresh().await;

            let snapshot = fx.service.get_all_conversations().await.unwrap();
            let view = fx.view();
            let shown: Vec<_> = view
                .conversations
                .iter()
                .map(|e| (e.key.clone().unwrap(), e.label.clone()))
                .collect();
            let expected: Vec<_> = snapshot.into_iter().map(|c| (c.id, c.name)).collect();
            assert_eq!(shown, expected);
        });
    }

    #[test]
    fn test_identical_refresh_still_reapplies() {
        smol::block_on(async {
            let mut fx = Fixture::new(Route::NewChat);
            seed(&fx.service).await;
            fx.mount().await;
            let before = fx.view();

            let load = fx.sidebar.reload_list().unwrap();
            let loaded = load.await;
            assert!(fx.sidebar.apply_list(loaded));
            assert_eq!(fx.view(), before);
        });
    }

    #[test]
    fn test_unmount_stops_updates() {
        smol::block_on(async {
            let mut fx = Fixture::new(Route::NewChat);
            fx.mount().await;
            let in_flight = fx.sidebar.reload_list().unwrap();

            fx.sidebar.unmount();
            assert_eq!(fx.service.event_hub().subscriber_count(), 0);

            fx.service.create_conversation("After").await.unwrap();
            assert_eq!(fx.notifications.load(Ordering::SeqCst), 0);
            assert!(fx.sidebar.reload_list().is_none());
            assert!(fx.sidebar.set_route(Route::chat("x")).is_none());

            let loaded = in_flight.await;
            assert!(!fx.sidebar.apply_list(loaded));
            assert!(fx.view().conversations.is_empty());
        });
    }

    #[test]
    fn test_drop_releases_subscription() {
        smol::block_on(async {
            let mut fx = Fixture::new(Route::NewChat);
            fx.mount().await;
            assert_eq!(fx.service.event_hub().subscriber_count(), 1);

            let Fixture {
                service, sidebar, ..
            } = fx;
            drop(sidebar);
            assert_eq!(service.event_hub().subscriber_count(), 0);
        });
    }

    #[test]
    fn test_remount_keeps_single_subscription() {
        smol::block_on(async {
            let mut fx = Fixture::new(Route::NewChat);
            fx.mount().await;
            fx.mount().await;
            assert_eq!(fx.service.event_hub().subscriber_count(), 1);

            fx.sidebar.unmount();
            fx.mount().await;
            assert_eq!(fx.service.event_hub().subscriber_count(), 1);
        });
    }

    #[test]
    fn test_navigation_affordances() {
        smol::block_on(async {
            let mut fx = Fixture::new(Route::NewChat);
            let (a, _) = seed(&fx.service).await;
            fx.mount().await;

            fx.sidebar.select_conversation(&a.id);
            assert_eq!(
                *fx.navigator.routes.lock().unwrap(),
                vec![Route::chat(a.id.clone())]
            );

            fx.sidebar.new_conversation();
            let routes = fx.navigator.routes.lock().unwrap();
            assert_eq!(routes.len(), 2);
            assert_eq!(routes[1].path(), "/");
        });
    }

    #[test]
    fn test_toggle_collapsed() {
        let mut fx = Fixture::new(Route::NewChat);
        assert!(!fx.view().collapsed);
        fx.sidebar.toggle_collapsed();
        assert!(fx.view().collapsed);
        fx.sidebar.set_collapsed(false);
        assert!(!fx.view().collapsed);
    }
}
