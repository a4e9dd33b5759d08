//! Request and response bodies of the boundary API that are not part of
//! the world model itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::MessagePriority;
use crate::ids::BotId;
use crate::structs::{Bond, CoreMemory, Message, PendingReply, Values};

/// Inner state pushed by a bot's decision loop after each heartbeat.
///
/// Absent or empty fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SyncStateRequest {
    /// Formative memories; the last 20 are kept.
    #[serde(default)]
    pub core_memories: Vec<CoreMemory>,
    /// Value system.
    #[serde(default)]
    pub values: Option<Values>,
    /// Bonds keyed by bot slot or NPC name.
    #[serde(default)]
    pub bonds: BTreeMap<String, Bond>,
    /// Recent actions as the agent remembers them; the last 10 are kept.
    #[serde(default)]
    pub recent_actions: Option<Vec<String>>,
    /// Long-term goal.
    #[serde(default)]
    pub long_term_goal: Option<String>,
    /// Life summary.
    #[serde(default)]
    pub narrative_summary: Option<String>,
    /// Drop the pending directed message once it has been answered.
    #[serde(default)]
    pub clear_pending_reply: bool,
}

/// What a bot finds on the message board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MessagesView {
    /// Latest messages addressed to the bot or to everyone.
    pub messages: Vec<Message>,
    /// Directed message awaiting a reply.
    pub pending_reply_to: Option<PendingReply>,
}

/// Body of `POST /admin/send_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SendMessageRequest {
    /// Sender label.
    #[serde(default = "default_sender")]
    pub from: String,
    /// Recipient slot; absent for a public broadcast.
    #[serde(default)]
    pub to: Option<BotId>,
    /// Text.
    pub message: String,
    /// Urgency.
    #[serde(default)]
    pub priority: MessagePriority,
}

fn default_sender() -> String {
    String::from("system")
}

/// Body of `POST /moments/{index}/like`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LikeRequest {
    /// Who likes it.
    pub bot_id: BotId,
}

/// Body of `POST /moments/{index}/comment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CommentRequest {
    /// Who comments.
    pub bot_id: BotId,
    /// Text.
    pub content: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sync_request_fields_are_optional() {
        let req: SyncStateRequest = serde_json::from_str(r#"{"clear_pending_reply": true}"#).unwrap();
        assert!(req.clear_pending_reply);
        assert!(req.core_memories.is_empty());
        assert!(req.recent_actions.is_none());
    }

    #[test]
    fn message_defaults_to_public_system_note() {
        let req: SendMessageRequest = serde_json::from_str(r#"{"message": "hello"}"#).unwrap();
        assert_eq!(req.from, "system");
        assert!(req.to.is_none());
        assert_eq!(req.priority, MessagePriority::Normal);
    }
}
