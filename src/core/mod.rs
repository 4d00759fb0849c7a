//! # Core Module
//!
//! Configuration, error taxonomy, reaction markers and the outbound messaging seam.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod config;
pub mod error;
pub mod messaging;
pub mod reaction;

// Re-export commonly used items
pub use config::Config;
pub use error::{
    AnnounceError, DestinationResolutionError, DispatchError, LookupGap, StartupDataError,
};
pub use messaging::{ControlButton, IncomingMessage, MessageRef, Messenger, SerenityMessenger};
pub use reaction::ReactionMarker;
