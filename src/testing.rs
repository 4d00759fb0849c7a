//! In-memory [`Messenger`] double that records every outbound action.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::core::{
    ControlButton, DestinationResolutionError, DispatchError, IncomingMessage, MessageRef,
    Messenger, ReactionMarker,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Reaction {
        message: MessageRef,
        marker: ReactionMarker,
    },
    Send {
        channel_id: u64,
        text: String,
        control: Option<ControlButton>,
    },
    Reply {
        message: MessageRef,
        text: String,
    },
}

#[derive(Default)]
pub struct RecordingMessenger {
    actions: Mutex<Vec<Action>>,
    history: Vec<IncomingMessage>,
    failing_markers: HashSet<ReactionMarker>,
    failing_sends: Mutex<usize>,
    unknown_channels: HashSet<u64>,
    next_id: Mutex<u64>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, history: Vec<IncomingMessage>) -> Self {
        self.history = history;
        self
    }

    pub fn failing_marker(mut self, marker: ReactionMarker) -> Self {
        self.failing_markers.insert(marker);
        self
    }

    /// Fail the next `count` `send_message` calls
    pub fn failing_sends(self, count: usize) -> Self {
        *self.failing_sends.lock().unwrap() = count;
        self
    }

    pub fn unknown_channel(mut self, channel_id: u64) -> Self {
        self.unknown_channels.insert(channel_id);
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    pub fn reactions(&self) -> Vec<ReactionMarker> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Reaction { marker, .. } => Some(marker),
                _ => None,
            })
            .collect()
    }

    pub fn sends(&self) -> Vec<(u64, String, Option<ControlButton>)> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Send {
                    channel_id,
                    text,
                    control,
                } => Some((channel_id, text, control)),
                _ => None,
            })
            .collect()
    }

    fn allocate_id(&self) -> u64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        900_000 + *next
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn add_reaction(
        &self,
        message: MessageRef,
        marker: &ReactionMarker,
    ) -> Result<(), DispatchError> {
        if self.failing_markers.contains(marker) {
            return Err(DispatchError::Unavailable(format!("cannot react with {marker}")));
        }
        self.actions.lock().unwrap().push(Action::Reaction {
            message,
            marker: marker.clone(),
        });
        Ok(())
    }

    async fn send_message(
        &self,
        channel_id: u64,
        text: &str,
        control: Option<&ControlButton>,
    ) -> Result<MessageRef, DispatchError> {
        {
            let mut failing = self.failing_sends.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(DispatchError::Unavailable(format!("channel {channel_id}")));
            }
        }
        self.actions.lock().unwrap().push(Action::Send {
            channel_id,
            text: text.to_string(),
            control: control.cloned(),
        });
        Ok(MessageRef {
            channel_id,
            message_id: self.allocate_id(),
        })
    }

    async fn reply(&self, message: MessageRef, text: &str) -> Result<MessageRef, DispatchError> {
        self.actions.lock().unwrap().push(Action::Reply {
            message,
            text: text.to_string(),
        });
        Ok(MessageRef {
            channel_id: message.channel_id,
            message_id: self.allocate_id(),
        })
    }

    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: u64,
    ) -> Result<Vec<IncomingMessage>, DispatchError> {
        Ok(self
            .history
            .iter()
            .filter(|m| m.channel_id == channel_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn resolve_channel(&self, channel_id: u64) -> Result<(), DestinationResolutionError> {
        if self.unknown_channels.contains(&channel_id) {
            return Err(DestinationResolutionError {
                channel_id,
                reason: "Unknown Channel".to_string(),
            });
        }
        Ok(())
    }
}

pub fn message(author_id: u64, content: &str) -> IncomingMessage {
    IncomingMessage {
        id: 500,
        channel_id: 10,
        guild_id: Some(1),
        author_id,
        author_is_bot: false,
        content: content.to_string(),
    }
}
