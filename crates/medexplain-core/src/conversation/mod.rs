//! Conversation state: recent drugs, follow-up resolution and sessions.

mod context;
mod detector;
mod sessions;

pub use context::*;
pub use detector::*;
pub use sessions::*;
