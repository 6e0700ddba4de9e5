/// Events published when the persisted conversation set changes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversationChangeEvent {
    /// A new conversation was created
    Created { conv_id: String },
    /// An existing conversation was renamed or received activity
    Updated { conv_id: String },
    /// A conversation was removed
    Deleted { conv_id: String },
}

impl ConversationChangeEvent {
    /// Identifier of the conversation the change refers to
    pub fn conv_id(&self) -> &str {
        match self {
            Self::Created { conv_id } | Self::Updated { conv_id } | Self::Deleted { conv_id } => {
                conv_id
            }
        }
    }
}
