use gpui::*;
use gpui_component::{ActiveTheme, Root, TitleBar, h_flex, v_flex};

use crate::{
    AppState, GoBack, NewConversation, ToggleSidebar,
    panels::{ConversationPane, ConversationSidebarPanel},
};
use chatbar_types::Route;

const WINDOW_TITLE: &str = "Chatbar";

/// Main window: sidebar on the left, conversation pane on the right
pub struct ChatWorkspace {
    focus_handle: FocusHandle,
    sidebar: Entity<ConversationSidebarPanel>,
    pane: Entity<ConversationPane>,
}

impl ChatWorkspace {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let focus_handle = cx.focus_handle();
        focus_handle.focus(window, cx);

        Self {
            focus_handle,
            sidebar: ConversationSidebarPanel::view(window, cx),
            pane: ConversationPane::view(window, cx),
        }
    }

    fn on_action_toggle_sidebar(
        &mut self,
        _: &ToggleSidebar,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.sidebar
            .update(cx, |sidebar, cx| sidebar.toggle_collapsed(cx));
    }

    fn on_action_go_back(&mut self, _: &GoBack, _window: &mut Window, cx: &mut Context<Self>) {
        let router = AppState::global(cx).router().clone();
        router.update(cx, |router, cx| router.back(cx));
    }

    fn on_action_new_conversation(
        &mut self,
        _: &NewConversation,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let router = AppState::global(cx).router().clone();
        router.update(cx, |router, cx| router.navigate(Route::NewChat, cx));
    }

    pub fn new_local(cx: &mut App) -> Task<anyhow::Result<WindowHandle<Root>>> {
        let mut window_size = size(px(1100.0), px(760.0));
        if let Some(display) = cx.primary_display() {
            let display_size = display.bounds().size;
            window_size.width = window_size.width.min(display_size.width * 0.85);
            window_size.height = window_size.height.min(display_size.height * 0.85);
        }

        let window_bounds = Bounds::centered(None, window_size, cx);

        cx.spawn(async move |cx| {
            let options = WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(window_bounds)),
                #[cfg(not(target_os = "linux"))]
                titlebar: Some(TitleBar::title_bar_options()),
                window_min_size: Some(gpui::Size {
                    width: px(480.0),
                    height: px(320.0),
                }),
                #[cfg(target_os = "linux")]
                window_background: gpui::WindowBackgroundAppearance::Transparent,
                #[cfg(target_os = "linux")]
                window_decorations: Some(gpui::WindowDecorations::Client),
                kind: WindowKind::Normal,
                ..Default::default()
            };

            let window = cx.open_window(options, |window, cx| {
                let workspace = cx.new(|cx| ChatWorkspace::new(window, cx));
                cx.new(|cx| Root::new(workspace, window, cx))
            })?;

            window.update(cx, |_, window, cx| {
                window.activate_window();
                window.set_window_title(WINDOW_TITLE);
                cx.on_release(|_, cx| {
                    cx.quit();
                })
                .detach();
            })?;

            Ok(window)
        })
    }
}

impl Focusable for ChatWorkspace {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for ChatWorkspace {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let dialog_layer = Root::render_dialog_layer(window, cx);
        let notification_layer = Root::render_notification_layer(window, cx);
        let theme = cx.theme();

        v_flex()
            .id("chatbar-workspace")
            .key_context("ChatWorkspace")
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::on_action_toggle_sidebar))
            .on_action(cx.listener(Self::on_action_go_back))
            .on_action(cx.listener(Self::on_action_new_conversation))
            .relative()
            .size_full()
            .bg(theme.background)
            .text_color(theme.foreground)
            .child(
                TitleBar::new().child(
                    div()
                        .flex()
                        .items_center()
                        .px_2()
                        .text_sm()
                        .text_color(theme.tab_foreground)
                        .child(WINDOW_TITLE),
                ),
            )
            .child(
                h_flex()
                    .flex_1()
                    .min_h_0()
                    .w_full()
                    .child(self.sidebar.clone())
                    .child(self.pane.clone()),
            )
            .children(dialog_layer)
            .children(notification_layer)
    }
}

/// Open the main window
pub fn open_new(cx: &mut App) -> Task<()> {
    let task = ChatWorkspace::new_local(cx);
    cx.spawn(async move |_cx| {
        if let Err(e) = task.await {
            log::error!("[ChatWorkspace] Failed to open window: {:#}", e);
        }
    })
}
