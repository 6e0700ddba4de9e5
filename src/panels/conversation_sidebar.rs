use gpui::{
    App, AppContext, ClickEvent, Context, Entity, InteractiveElement, IntoElement, ParentElement,
    Render, SharedString, StatefulInteractiveElement, Styled, Subscription, Window, div, img,
    prelude::FluentBuilder, px,
};

use gpui_component::{
    ActiveTheme, Icon, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};
use rust_i18n::t;

use chatbar_sidebar::{
    ConversationSidebar, CurrentLoad, ListLoad, SidebarEntry, SidebarLabels, SidebarView,
};
use chatbar_types::Route;

use crate::{AppState, i18n, router::Router};

const EXPANDED_WIDTH: f32 = 260.;
const FOOTER_IMAGE_MAX_HEIGHT: f32 = 72.;

/// GPUI host for `ConversationSidebar`: runs its loads on the foreground
/// executor and feeds router changes into it.
pub struct ConversationSidebarPanel {
    sidebar: ConversationSidebar,
    labels: SidebarLabels,
    _router_subscription: Subscription,
}

impl ConversationSidebarPanel {
    pub fn view(window: &mut Window, cx: &mut App) -> Entity<Self> {
        let entity = cx.new(|cx| Self::new(window, cx));
        entity.update(cx, |this, cx| this.mount(cx));
        entity
    }

    fn new(_window: &mut Window, cx: &mut Context<Self>) -> Self {
        let app_state = AppState::global(cx);
        let store = app_state.conversation_store();
        let navigator = app_state.navigator();
        let router = app_state.router().clone();
        let sidebar_config = app_state.config().sidebar.clone();

        let route = router.read(cx).current().clone();
        let mut sidebar = ConversationSidebar::new(store, navigator, route);
        sidebar.set_collapsed(sidebar_config.start_collapsed);

        let router_subscription = cx.observe(&router, |this, router: Entity<Router>, cx| {
            let route = router.read(cx).current().clone();
            this.on_route_changed(route, cx);
        });

        Self {
            sidebar,
            labels: i18n::sidebar_labels(&sidebar_config),
            _router_subscription: router_subscription,
        }
    }

    /// Subscribe to store changes and start the initial loads
    fn mount(&mut self, cx: &mut Context<Self>) {
        // Store callbacks fire on the publisher's thread; hop onto ours
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<()>();
        let (current, list) = self.sidebar.mount(move || {
            let _ = tx.send(());
        });

        self.spawn_current(current, cx);
        self.spawn_list(list, cx);

        // Ends when the subscription, and with it `tx`, is released
        cx.spawn(async move |this, cx| {
            while rx.recv().await.is_some() {
                let reloaded = this.update(cx, |this, cx| {
                    if let Some(load) = this.sidebar.reload_list() {
                        this.spawn_list(load, cx);
                    }
                });
                if reloaded.is_err() {
                    break;
                }
            }
        })
        .detach();
    }

    fn spawn_current(&self, load: CurrentLoad, cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| {
            let loaded = load.await;
            _ = this.update(cx, |this, cx| {
                if this.sidebar.apply_current(loaded) {
                    cx.notify();
                }
            });
        })
        .detach();
    }

    fn spawn_list(&self, load: ListLoad, cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| {
            let loaded = load.await;
            _ = this.update(cx, |this, cx| {
                if this.sidebar.apply_list(loaded) {
                    cx.notify();
                }
            });
        })
        .detach();
    }

    fn on_route_changed(&mut self, route: Route, cx: &mut Context<Self>) {
        if let Some(load) = self.sidebar.set_route(route) {
            self.spawn_current(load, cx);
        }
        cx.notify();
    }

    pub fn toggle_collapsed(&mut self, cx: &mut Context<Self>) {
        self.sidebar.toggle_collapsed();
        log::debug!(
            "[ConversationSidebarPanel] Collapsed: {}",
            self.sidebar.state().is_collapsed()
        );
        cx.notify();
    }

    fn on_entry_click(&mut self, entry: &SidebarEntry) {
        match entry.key.as_deref() {
            Some(conv_id) => self.sidebar.select_conversation(conv_id),
            None => self.sidebar.new_conversation(),
        }
    }

    fn render_entry(
        &self,
        id: impl Into<SharedString>,
        entry: SidebarEntry,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let id: SharedString = id.into();
        let theme = cx.theme();
        let hover_bg = theme.muted;
        let rtl = entry.direction.is_rtl();
        let active = entry.active;
        let label = entry.label.clone();

        h_flex()
            .id(id)
            .w_full()
            .px_2()
            .py_1()
            .rounded(theme.radius)
            .cursor_pointer()
            .text_sm()
            .overflow_hidden()
            .when(rtl, |this| this.justify_end())
            .when(active, |this| {
                this.bg(theme.accent)
                    .text_color(theme.accent_foreground)
                    .font_weight(gpui::FontWeight::MEDIUM)
            })
            .when(!active, |this| {
                this.text_color(theme.foreground)
                    .hover(move |style| style.bg(hover_bg))
            })
            .child(div().min_w_0().text_ellipsis().child(label))
            .on_click(cx.listener(move |this, _: &ClickEvent, _, _| {
                this.on_entry_click(&entry);
            }))
    }

    fn render_collapsed(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .h_full()
            .p_1()
            .gap_1()
            .border_r_1()
            .border_color(theme.border)
            .bg(theme.sidebar)
            .child(
                Button::new("sidebar-expand")
                    .icon(Icon::new(IconName::PanelLeft))
                    .ghost()
                    .small()
                    .tooltip(t!("sidebar.expand").to_string())
                    .on_click(cx.listener(|this, _, _, cx| this.toggle_collapsed(cx))),
            )
            .child(
                Button::new("sidebar-new-collapsed")
                    .icon(Icon::new(IconName::Plus))
                    .ghost()
                    .small()
                    .tooltip(self.labels.new_conversation.clone())
                    .on_click(cx.listener(|this, _, _, _| this.sidebar.new_conversation())),
            )
    }

    fn render_expanded(&self, view: SidebarView, cx: &mut Context<Self>) -> impl IntoElement {
        let new_conversation = self.render_entry("sidebar-new", view.new_conversation, cx);
        let rows: Vec<_> = view
            .conversations
            .into_iter()
            .map(|entry| {
                let id = format!("sidebar-conv-{}", entry.key.as_deref().unwrap_or_default());
                self.render_entry(id, entry, cx)
            })
            .collect();

        let theme = cx.theme();

        v_flex()
            .h_full()
            .w(px(EXPANDED_WIDTH))
            .flex_shrink_0()
            .border_r_1()
            .border_color(theme.border)
            .bg(theme.sidebar)
            .child(
                h_flex()
                    .w_full()
                    .px_3()
                    .py_2()
                    .items_center()
                    .justify_between()
                    .child(
                        div()
                            .text_sm()
                            .font_weight(gpui::FontWeight::SEMIBOLD)
                            .text_color(theme.foreground)
                            .child(view.title),
                    )
                    .child(
                        Button::new("sidebar-collapse")
                            .icon(Icon::new(IconName::PanelLeftClose))
                            .ghost()
                            .xsmall()
                            .tooltip(t!("sidebar.collapse").to_string())
                            .on_click(cx.listener(|this, _, _, cx| this.toggle_collapsed(cx))),
                    ),
            )
            .when_some(view.footer_note, |this, note| {
                this.child(
                    div()
                        .px_3()
                        .pb_2()
                        .text_xs()
                        .text_color(theme.muted_foreground)
                        .child(note),
                )
            })
            .when_some(view.error, |this, error| {
                this.child(
                    h_flex()
                        .mx_2()
                        .mb_2()
                        .px_2()
                        .py_1()
                        .gap_2()
                        .rounded(theme.radius)
                        .bg(theme.muted)
                        .text_xs()
                        .text_color(theme.red)
                        .child(Icon::new(IconName::TriangleAlert).small())
                        .child(
                            div()
                                .min_w_0()
                                .text_ellipsis()
                                .child(format!("{}: {}", t!("sidebar.load_error"), error)),
                        ),
                )
            })
            .child(div().px_2().child(new_conversation))
            .child(
                v_flex()
                    .id("sidebar-conversations")
                    .flex_1()
                    .min_h_0()
                    .px_2()
                    .py_1()
                    .gap_0p5()
                    .overflow_y_scroll()
                    .children(rows),
            )
            .when_some(view.footer_image, |this, path| {
                this.child(
                    div()
                        .w_full()
                        .p_2()
                        .border_t_1()
                        .border_color(theme.border)
                        .child(img(path).w_full().max_h(px(FOOTER_IMAGE_MAX_HEIGHT))),
                )
            })
    }
}

impl Render for ConversationSidebarPanel {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let view = self.sidebar.view(&self.labels);
        if view.collapsed {
            self.render_collapsed(cx).into_any_element()
        } else {
            self.render_expanded(view, cx).into_any_element()
        }
    }
}
