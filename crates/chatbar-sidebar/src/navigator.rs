use chatbar_types::Route;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Imperative navigation, fire and forget
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that queues routes for the UI thread to apply
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, UnboundedReceiver<Route>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        log::debug!("[Navigator] Navigate to {}", route);
        if self.tx.send(route).is_err() {
            log::warn!("[Navigator] Router is gone, navigation dropped");
        }
    }
}
