use chatbar_types::{Conversation, Route};

/// Which of the two sidebar loads a result belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadKind {
    /// The conversation named by the route
    Current,
    /// The full conversation list
    List,
}

/// Issued with every load so late results can be recognised
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub kind: LoadKind,
    pub generation: u64,
}

/// A finished load, ready to be applied
#[derive(Debug)]
pub struct Loaded<T> {
    pub ticket: LoadTicket,
    pub result: anyhow::Result<T>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Generations {
    issued: u64,
    applied: u64,
}

impl Generations {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadError {
    pub kind: LoadKind,
    pub message: String,
}

/// Local display state: a read-only cache of the store plus the route
#[derive(Debug, Default)]
pub struct SidebarState {
    route: Route,
    current: Option<Conversation>,
    conversations: Vec<Conversation>,
    error: Option<LoadError>,
    collapsed: bool,
    mounted: bool,
    current_generations: Generations,
    list_generations: Generations,
}

impl SidebarState {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            ..Default::default()
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn current(&self) -> Option<&Conversation> {
        self.current.as_ref()
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub(crate) fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    /// Store the new route. Returns true when the `convId` parameter changed.
    pub fn set_route(&mut self, route: Route) -> bool {
        let changed = route.conv_id() != self.route.conv_id();
        self.route = route;
        changed
    }

    pub fn issue(&mut self, kind: LoadKind) -> LoadTicket {
        let generation = match kind {
            LoadKind::Current => self.current_generations.issue(),
            LoadKind::List => self.list_generations.issue(),
        };
        LoadTicket { kind, generation }
    }

    /// A current-conversation result is only wanted if it answers the latest
    /// request, since older requests were for a route we have left.
    /// A list result is wanted if it is newer than what is shown.
    fn accepts(&self, ticket: LoadTicket) -> bool {
        if !self.mounted {
            return false;
        }
        match ticket.kind {
            LoadKind::Current => ticket.generation == self.current_generations.issued,
            LoadKind::List => ticket.generation > self.list_generations.applied,
        }
    }

    fn mark_applied(&mut self, ticket: LoadTicket) {
        let generations = match ticket.kind {
            LoadKind::Current => &mut self.current_generations,
            LoadKind::List => &mut self.list_generations,
        };
        generations.applied = generations.applied.max(ticket.generation);
    }

    fn record_outcome<T>(&mut self, kind: LoadKind, result: &anyhow::Result<T>) {
        match result {
            Ok(_) => {
                if self.error.as_ref().is_some_and(|e| e.kind == kind) {
                    self.error = None;
                }
            }
            Err(e) => {
                log::warn!("[Sidebar] {:?} load failed: {:#}", kind, e);
                self.error = Some(LoadError {
                    kind,
                    message: format!("{:#}", e),
                });
            }
        }
    }

    /// Apply a finished current-conversation load. Returns true if the state
    /// changed hands to this result.
    pub fn apply_current(&mut self, loaded: Loaded<Option<Conversation>>) -> bool {
        debug_assert_eq!(loaded.ticket.kind, LoadKind::Current);
        if !self.accepts(loaded.ticket) {
            log::debug!("[Sidebar] Dropping stale {:?}", loaded.ticket);
            return false;
        }
        self.mark_applied(loaded.ticket);
        self.record_outcome(LoadKind::Current, &loaded.result);
        // On failure nothing is known about the routed conversation
        self.current = loaded.result.unwrap_or_default();
        true
    }

    /// Apply a finished list load, replacing the list in store order.
    /// A failed load keeps the previous list.
    pub fn apply_list(&mut self, loaded: Loaded<Vec<Conversation>>) -> bool {
        debug_assert_eq!(loaded.ticket.kind, LoadKind::List);
        if !self.accepts(loaded.ticket) {
            log::debug!("[Sidebar] Dropping stale {:?}", loaded.ticket);
            return false;
        }
        self.mark_applied(loaded.ticket);
        self.record_outcome(LoadKind::List, &loaded.result);
        if let Ok(conversations) = loaded.result {
            self.conversations = conversations;
        }
        true
    }
}
