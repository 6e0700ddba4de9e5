use std::sync::Arc;

use gpui::{
    App, AppContext, Context, Entity, IntoElement, ParentElement, Render, Styled, Subscription,
    Window, div, prelude::FluentBuilder, px,
};

use gpui_component::{
    ActiveTheme, Disableable, Icon, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    v_flex,
};
use rust_i18n::t;

use chatbar_event_bus::{EventHub, SubscriptionId};
use chatbar_services::{ConversationService, ConversationStore};
use chatbar_types::{Conversation, ConversationChangeEvent, Route};

use crate::{AppState, router::Router};

/// Right-hand pane: a start form on `/`, the routed conversation otherwise
pub struct ConversationPane {
    service: Arc<ConversationService>,
    router: Entity<Router>,
    route: Route,
    conversation: Option<Conversation>,
    loading: bool,
    error: Option<String>,
    name_input: Entity<InputState>,
    rename_input: Entity<InputState>,
    change_subscription: Option<SubscriptionId>,
    _subscriptions: Vec<Subscription>,
}

impl ConversationPane {
    pub fn view(window: &mut Window, cx: &mut App) -> Entity<Self> {
        let entity = cx.new(|cx| Self::new(window, cx));
        entity.update(cx, |this, cx| {
            let route = this.route.clone();
            this.load(route, cx);
        });
        entity
    }

    fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let app_state = AppState::global(cx);
        let service = app_state.conversation_service().clone();
        let router = app_state.router().clone();
        let route = router.read(cx).current().clone();

        let name_input = cx.new(|cx| {
            InputState::new(window, cx).placeholder(t!("conversation.name_placeholder").to_string())
        });
        let rename_input = cx.new(|cx| {
            InputState::new(window, cx).placeholder(t!("conversation.rename").to_string())
        });

        let _subscriptions = vec![
            cx.observe(&router, |this, router: Entity<Router>, cx| {
                let route = router.read(cx).current().clone();
                if route != this.route {
                    this.load(route, cx);
                }
            }),
            cx.subscribe_in(&name_input, window, |this, _, event: &InputEvent, window, cx| {
                if let InputEvent::PressEnter { .. } = event {
                    this.start_conversation(window, cx);
                }
            }),
            cx.subscribe_in(&rename_input, window, |this, _, event: &InputEvent, window, cx| {
                if let InputEvent::PressEnter { .. } = event {
                    this.rename_current(window, cx);
                }
            }),
        ];

        Self {
            service,
            router,
            route,
            conversation: None,
            loading: false,
            error: None,
            name_input,
            rename_input,
            change_subscription: None,
            _subscriptions,
        }
    }

    fn event_hub(&self) -> &EventHub {
        self.service.event_hub()
    }

    /// Show `route`, fetching its conversation and following its changes
    fn load(&mut self, route: Route, cx: &mut Context<Self>) {
        if let Some(id) = self.change_subscription.take() {
            self.event_hub().unsubscribe(id);
        }
        self.route = route;
        self.conversation = None;
        self.error = None;

        let Some(conv_id) = self.route.conv_id().map(str::to_string) else {
            self.loading = false;
            cx.notify();
            return;
        };

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ConversationChangeEvent>();
        self.change_subscription = Some(self.event_hub().subscribe_conversation_changes_for(
            conv_id.clone(),
            move |event| {
                let _ = tx.send(event.clone());
            },
        ));

        cx.spawn(async move |this, cx| {
            while let Some(event) = rx.recv().await {
                let handled = this.update(cx, |this, cx| this.on_conversation_changed(event, cx));
                if handled.is_err() {
                    break;
                }
            }
        })
        .detach();

        self.fetch(conv_id, cx);
    }

    fn fetch(&mut self, conv_id: String, cx: &mut Context<Self>) {
        self.loading = true;
        cx.notify();

        let service = self.service.clone();
        cx.spawn(async move |this, cx| {
            let result = service.get_one_conversation(&conv_id).await;
            _ = this.update(cx, |this, cx| {
                // The route may have moved on while we were waiting
                if this.route.conv_id() != Some(conv_id.as_str()) {
                    return;
                }
                this.loading = false;
                match result {
                    Ok(conversation) => this.conversation = conversation,
                    Err(e) => {
                        log::warn!("[ConversationPane] Failed to load {}: {:#}", conv_id, e);
                        this.error = Some(format!("{:#}", e));
                    }
                }
                cx.notify();
            });
        })
        .detach();
    }

    fn on_conversation_changed(&mut self, event: ConversationChangeEvent, cx: &mut Context<Self>) {
        if self.route.conv_id() != Some(event.conv_id()) {
            return;
        }
        match event {
            ConversationChangeEvent::Deleted { conv_id } => {
                log::info!("[ConversationPane] {} was deleted, leaving", conv_id);
                self.router.update(cx, |router, cx| {
                    router.forget(&conv_id);
                    router.replace(Route::NewChat, cx);
                });
            }
            ConversationChangeEvent::Created { conv_id }
            | ConversationChangeEvent::Updated { conv_id } => self.fetch(conv_id, cx),
        }
    }

    fn start_conversation(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let name = self.name_input.read(cx).value().trim().to_string();
        if name.is_empty() {
            return;
        }
        self.name_input.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });

        let service = self.service.clone();
        let router = self.router.clone();
        cx.spawn(async move |this, cx| match service.create_conversation(&name).await {
            Ok(conversation) => {
                log::info!("[ConversationPane] Started {}", conversation.id);
                _ = cx.update(|cx| {
                    router.update(cx, |router, cx| {
                        router.navigate(Route::chat(conversation.id), cx);
                    });
                });
            }
            Err(e) => {
                log::error!("[ConversationPane] Failed to create conversation: {:#}", e);
                _ = this.update(cx, |this, cx| {
                    this.error = Some(format!("{:#}", e));
                    cx.notify();
                });
            }
        })
        .detach();
    }

    fn rename_current(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(conv_id) = self.route.conv_id().map(str::to_string) else {
            return;
        };
        let name = self.rename_input.read(cx).value().trim().to_string();
        if name.is_empty() {
            return;
        }
        self.rename_input.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });

        // The change event triggers the refresh
        let service = self.service.clone();
        cx.spawn(async move |this, cx| {
            if let Err(e) = service.rename_conversation(&conv_id, &name).await {
                log::error!("[ConversationPane] Failed to rename {}: {:#}", conv_id, e);
                _ = this.update(cx, |this, cx| {
                    this.error = Some(format!("{:#}", e));
                    cx.notify();
                });
            }
        })
        .detach();
    }

    fn delete_current(&mut self, cx: &mut Context<Self>) {
        let Some(conv_id) = self.route.conv_id().map(str::to_string) else {
            return;
        };

        let service = self.service.clone();
        let router = self.router.clone();
        cx.spawn(async move |this, cx| match service.delete_conversation(&conv_id).await {
            Ok(()) => {
                _ = cx.update(|cx| {
                    router.update(cx, |router, cx| {
                        router.navigate(Route::NewChat, cx);
                        router.forget(&conv_id);
                    });
                });
            }
            Err(e) => {
                log::error!("[ConversationPane] Failed to delete {}: {:#}", conv_id, e);
                _ = this.update(cx, |this, cx| {
                    this.error = Some(format!("{:#}", e));
                    cx.notify();
                });
            }
        })
        .detach();
    }

    fn render_new_chat(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .size_full()
            .items_center()
            .justify_center()
            .gap_3()
            .child(
                div()
                    .text_sm()
                    .text_color(theme.muted_foreground)
                    .child(t!("conversation.empty_hint").to_string()),
            )
            .child(
                h_flex()
                    .w(px(420.))
                    .gap_2()
                    .child(Input::new(&self.name_input).w_full())
                    .child(
                        Button::new("conversation-start")
                            .icon(Icon::new(IconName::Plus))
                            .label(t!("conversation.start").to_string())
                            .primary()
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.start_conversation(window, cx);
                            })),
                    ),
            )
    }

    fn render_chat(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let can_go_back = self.router.read(cx).can_go_back();

        let title = match (&self.conversation, self.loading) {
            (Some(conversation), _) => conversation.name.clone(),
            (None, true) => String::new(),
            (None, false) => t!("conversation.not_found").to_string(),
        };

        v_flex()
            .size_full()
            .child(
                h_flex()
                    .w_full()
                    .px_4()
                    .py_2()
                    .gap_2()
                    .items_center()
                    .border_b_1()
                    .border_color(theme.border)
                    .child(
                        Button::new("conversation-back")
                            .icon(Icon::new(IconName::ArrowLeft))
                            .ghost()
                            .small()
                            .disabled(!can_go_back)
                            .tooltip(t!("conversation.back").to_string())
                            .on_click(cx.listener(|this, _, _, cx| {
                                this.router.update(cx, |router, cx| router.back(cx));
                            })),
                    )
                    .child(
                        div()
                            .flex_1()
                            .min_w_0()
                            .text_ellipsis()
                            .font_weight(gpui::FontWeight::SEMIBOLD)
                            .text_color(theme.foreground)
                            .child(title),
                    )
                    .when(self.conversation.is_some(), |this| {
                        this.child(div().w(px(220.)).child(Input::new(&self.rename_input).small()))
                            .child(
                                Button::new("conversation-rename")
                                    .icon(Icon::new(IconName::Check))
                                    .ghost()
                                    .small()
                                    .tooltip(t!("conversation.rename").to_string())
                                    .on_click(cx.listener(|this, _, window, cx| {
                                        this.rename_current(window, cx);
                                    })),
                            )
                            .child(
                                Button::new("conversation-delete")
                                    .icon(Icon::new(IconName::Delete))
                                    .ghost()
                                    .small()
                                    .tooltip(t!("conversation.delete").to_string())
                                    .on_click(cx.listener(|this, _, _, cx| {
                                        this.delete_current(cx);
                                    })),
                            )
                    }),
            )
            .child(div().flex_1())
    }
}

impl Render for ConversationPane {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let error = self.error.clone();
        let error_color = theme.red;
        let background = theme.background;

        let body = if self.route.conv_id().is_some() {
            self.render_chat(cx).into_any_element()
        } else {
            self.render_new_chat(cx).into_any_element()
        };

        v_flex()
            .flex_1()
            .h_full()
            .min_w_0()
            .bg(background)
            .when_some(error, |this, error| {
                this.child(
                    div()
                        .px_4()
                        .py_1()
                        .text_xs()
                        .text_color(error_color)
                        .child(error),
                )
            })
            .child(body)
    }
}

impl Drop for ConversationPane {
    fn drop(&mut self) {
        if let Some(id) = self.change_subscription.take() {
            self.event_hub().unsubscribe(id);
        }
    }
}
