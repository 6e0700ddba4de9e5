use gpui::{App, AppContext, Context, WeakEntity};
use tokio::sync::mpsc::UnboundedReceiver;

use chatbar_types::{Route, RouteHistory};

/// Owns the window's route. Views observe this entity to follow navigation.
pub struct Router {
    history: RouteHistory,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            history: RouteHistory::new(initial),
        }
    }

    pub fn current(&self) -> &Route {
        self.history.current()
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn navigate(&mut self, route: Route, cx: &mut Context<Self>) {
        let from = self.history.current().clone();
        if self.history.navigate(route) {
            log::info!("[Router] {} -> {}", from, self.history.current());
            cx.notify();
        }
    }

    /// Navigate without leaving a history entry
    pub fn replace(&mut self, route: Route, cx: &mut Context<Self>) {
        if self.history.replace(route) {
            log::info!("[Router] Replaced with {}", self.history.current());
            cx.notify();
        }
    }

    pub fn back(&mut self, cx: &mut Context<Self>) {
        if self.history.back() {
            log::info!("[Router] Back to {}", self.history.current());
            cx.notify();
        } else {
            log::debug!("[Router] Nothing to go back to");
        }
    }

    /// Remove a deleted conversation from the back stack
    pub fn forget(&mut self, conv_id: &str) {
        self.history.forget(conv_id);
    }

    /// Apply routes queued by a `ChannelNavigator` until the router is released
    pub fn listen(router: WeakEntity<Self>, mut rx: UnboundedReceiver<Route>, cx: &mut App) {
        cx.spawn(async move |cx| {
            while let Some(route) = rx.recv().await {
                if let Some(router) = router.upgrade() {
                    _ = cx.update(|cx| {
                        router.update(cx, |this, cx| this.navigate(route, cx));
                    });
                } else {
                    break;
                }
            }
        })
        .detach();
    }
}
