use std::path::PathBuf;
use std::sync::Arc;

use chatbar::{Assets, workspace::open_new};
use chatbar_event_bus::EventHub;
use chatbar_services::ConversationService;
use chatbar_types::{Config, Route, config_manager};
use gpui::Application;

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct Args {
    /// `--config <path>`
    config_path: Option<PathBuf>,
    /// `--route <path>`, e.g. `/chat/conv-1`
    route: Route,
}

fn main() {
    let args = parse_args(std::env::args().skip(1));
    let config_path = args
        .config_path
        .unwrap_or_else(config_manager::get_user_config_path_or_temp);

    // Logging needs the config, so load failures are reported once it is up
    let loaded = config_manager::load_config(&config_path);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    chatbar::init_logging(&config);
    match loaded {
        Ok(_) => log::info!("Config loaded from {}", config_path.display()),
        Err(e) => log::error!("{:#}, using defaults", e),
    }

    let conversation_service = Arc::new(open_conversation_service(&config));
    let route = args.route;

    let app = Application::new().with_assets(Assets);
    app.run(move |cx| {
        chatbar::init(config, conversation_service, route, cx);
        open_new(cx).detach();
    });
}

/// Parse `--config` and `--route`; unknown arguments are ignored
fn parse_args(mut args: impl Iterator<Item = String>) -> Args {
    let mut parsed = Args::default();

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--config" => {
                if let Some(value) = args.next() {
                    parsed.config_path = Some(PathBuf::from(value));
                }
            }
            "--route" => {
                if let Some(value) = args.next() {
                    parsed.route = Route::parse(&value);
                }
            }
            _ => {}
        }
    }

    parsed
}

/// Open the file-backed store, falling back to memory so the UI still starts
fn open_conversation_service(config: &Config) -> ConversationService {
    let event_hub = EventHub::new();
    let data_dir = config.resolve_data_dir();
    let file_path = config_manager::conversations_file_in(&data_dir);

    match smol::block_on(ConversationService::open(file_path.clone(), event_hub.clone())) {
        Ok(service) => {
            log::info!("[main] Conversations stored in {}", file_path.display());
            service
        }
        Err(e) => {
            log::error!(
                "[main] Failed to open {}: {:#}; conversations will not be saved",
                file_path.display(),
                e
            );
            ConversationService::in_memory(event_hub)
        }
    }
}
