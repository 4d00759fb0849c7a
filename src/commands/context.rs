//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::sync::Arc;

use crate::core::Messenger;

/// Services a slash command handler may use
#[derive(Clone)]
pub struct CommandContext {
    pub messenger: Arc<dyn Messenger>,
}

impl CommandContext {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self { messenger }
    }
}
