rust_i18n::i18n!("locales", fallback = "en");

mod app;
mod assets;
pub mod i18n;
mod panels;
mod router;
pub mod workspace;

use std::sync::Arc;

use gpui::{App, KeyBinding};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use chatbar_services::ConversationService;
use chatbar_types::{Config, Route};

pub use app::{
    actions::{GoBack, NewConversation, Quit, ToggleSidebar},
    app_state::AppState,
};
pub use assets::Assets;
pub use panels::{ConversationPane, ConversationSidebarPanel};
pub use router::Router;

/// Install the tracing subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&config.log_filter).unwrap_or_else(|e| {
            eprintln!("Invalid log filter {:?}: {}", config.log_filter, e);
            EnvFilter::new(chatbar_types::DEFAULT_LOG_FILTER)
        })
    });

    if let Err(e) = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init()
    {
        eprintln!("Logging already initialized: {}", e);
    }
}

pub fn init(
    config: Config,
    conversation_service: Arc<ConversationService>,
    initial_route: Route,
    cx: &mut App,
) {
    i18n::change_locale(&config.locale);

    gpui_component::init(cx);
    AppState::init(config, conversation_service, initial_route, cx);

    cx.bind_keys([
        #[cfg(target_os = "macos")]
        KeyBinding::new("cmd-b", ToggleSidebar, None),
        #[cfg(not(target_os = "macos"))]
        KeyBinding::new("ctrl-b", ToggleSidebar, None),
        #[cfg(target_os = "macos")]
        KeyBinding::new("cmd-n", NewConversation, None),
        #[cfg(not(target_os = "macos"))]
        KeyBinding::new("ctrl-n", NewConversation, None),
        KeyBinding::new("alt-left", GoBack, None),
        #[cfg(target_os = "macos")]
        KeyBinding::new("cmd-q", Quit, None),
        #[cfg(not(target_os = "macos"))]
        KeyBinding::new("alt-f4", Quit, None),
    ]);

    cx.on_action(|_: &Quit, cx: &mut App| {
        cx.quit();
    });

    cx.activate(true);
}
