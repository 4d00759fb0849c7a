//! Birthday announcements and the "Happy Birthday !" button
//!
//! The button carries the celebrated member in its custom id, so activations
//! are handled without any stored state: it never expires and every click
//! posts a fresh public message.

use log::info;
use std::sync::Arc;

use super::directory::{MemberDirectory, MemberName};
use crate::core::{
    AnnounceError, ControlButton, DestinationResolutionError, DispatchError, LookupGap,
    MessageRef, Messenger,
};

pub const BIRTHDAY_ACK_PREFIX: &str = "happy_birthday_";

/// Acknowledgment control bound to the member whose birthday it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayAck {
    pub user_id: u64,
}

impl BirthdayAck {
    pub fn new(user_id: u64) -> Self {
        Self { user_id }
    }

    pub fn custom_id(&self) -> String {
        format!("{}{}", BIRTHDAY_ACK_PREFIX, self.user_id)
    }

    /// Returns None for custom ids that are not birthday buttons
    pub fn parse(custom_id: &str) -> Option<Self> {
        let user_id = custom_id.strip_prefix(BIRTHDAY_ACK_PREFIX)?.parse().ok()?;
        Some(Self { user_id })
    }

    pub fn button(&self) -> ControlButton {
        ControlButton {
            custom_id: self.custom_id(),
            label: "Happy Birthday !".to_string(),
            emoji: Some("🎉".to_string()),
        }
    }

    /// Public message posted when `activator` clicks the button
    pub fn acknowledgment(&self, activator: &str) -> String {
        format!(
            "{} souhaite un joyeux anniversaire à <@{}> !",
            activator, self.user_id
        )
    }
}

pub fn announcement_text(name: &MemberName) -> String {
    format!("Eh ! {} a anniversaire ! Souhaitez-le lui !", name.short())
}

/// Sends birthday announcements to the broadcast channel
pub struct BirthdayAnnouncer {
    messenger: Arc<dyn Messenger>,
    channel_id: u64,
    directory: Arc<MemberDirectory>,
}

impl BirthdayAnnouncer {
    /// Resolve the broadcast channel once; failure is fatal for the caller
    pub async fn connect(
        messenger: Arc<dyn Messenger>,
        channel_id: u64,
        directory: Arc<MemberDirectory>,
    ) -> Result<Self, DestinationResolutionError> {
        messenger.resolve_channel(channel_id).await?;
        info!("📣 Birthday announcements will go to channel {channel_id}");
        Ok(Self {
            messenger,
            channel_id,
            directory,
        })
    }

    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }

    /// Announce a registry member, looking up their display name.
    ///
    /// Every registry member must be in the directory; a missing name is a
    /// [`LookupGap`], not a skip.
    pub async fn announce(&self, user_id: u64) -> Result<MessageRef, AnnounceError> {
        let name = self
            .directory
            .name_of(user_id)
            .ok_or(LookupGap { user_id })?;
        Ok(self.dispatch(user_id, name).await?)
    }

    pub async fn dispatch(
        &self,
        user_id: u64,
        name: &MemberName,
    ) -> Result<MessageRef, DispatchError> {
        let ack = BirthdayAck::new(user_id);
        let sent = self
            .messenger
            .send_message(self.channel_id, &announcement_text(name), Some(&ack.button()))
            .await?;
        info!("🎂 Announced birthday of {} ({user_id})", name.full());
        Ok(sent)
    }
}
