use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::{IdGen, format_message_timestamp};

/// Shown in place of an answer while its query is in flight.
pub const PLACEHOLDER_TEXT: &str = "Thinking...";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One transcript entry. The timestamp is formatted once at creation and is
/// display-only; transcript ordering is insertion order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: String,
}

impl Message {
    pub fn new(ids: &mut dyn IdGen, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: ids.next_id(),
            sender,
            text: text.into(),
            timestamp: format_message_timestamp(),
        }
    }

    /// The transient assistant entry appended while its query is in flight.
    pub fn pending(ids: &mut dyn IdGen) -> Self {
        Self::new(ids, Sender::Assistant, PLACEHOLDER_TEXT)
    }
}
