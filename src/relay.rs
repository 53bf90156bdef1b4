//! Mention relay - turns bot mentions into completions and replies.

mod handler;
mod mention;
mod message;

pub use handler::{APOLOGY, GREETING, MentionRelay, Outcome};
pub use mention::strip_mentions;
pub use message::{InboundMessage, ReplySink};
