use gpui::{App, AppContext, Entity, Global};
use std::sync::Arc;

use chatbar_event_bus::EventHub;
use chatbar_services::{ConversationService, ConversationStore};
use chatbar_sidebar::{ChannelNavigator, Navigator};
use chatbar_types::{Config, Route};

use crate::router::Router;

/// Process-wide state shared by every view in the window
pub struct AppState {
    config: Config,
    conversation_service: Arc<ConversationService>,
    router: Entity<Router>,
    navigator: ChannelNavigator,
}

impl Global for AppState {}

impl AppState {
    pub fn init(
        config: Config,
        conversation_service: Arc<ConversationService>,
        initial_route: Route,
        cx: &mut App,
    ) {
        let (navigator, rx) = ChannelNavigator::new();
        let router = cx.new(|_| Router::new(initial_route));
        Router::listen(router.downgrade(), rx, cx);

        cx.set_global::<AppState>(Self {
            config,
            conversation_service,
            router,
            navigator,
        });
    }

    pub fn global(cx: &App) -> &Self {
        cx.global::<Self>()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn event_hub(&self) -> &EventHub {
        self.conversation_service.event_hub()
    }

    pub fn conversation_service(&self) -> &Arc<ConversationService> {
        &self.conversation_service
    }

    /// The service as the read-only store the sidebar consumes
    pub fn conversation_store(&self) -> Arc<dyn ConversationStore> {
        self.conversation_service.clone()
    }

    pub fn router(&self) -> &Entity<Router> {
        &self.router
    }

    pub fn navigator(&self) -> Arc<dyn Navigator> {
        Arc::new(self.navigator.clone())
    }
}
