//! Conversation log
//!
//! Append-only, role-tagged message log. The persisted log is never
//! truncated or reordered; only the outbound window sent to the relay
//! is bounded.

use std::sync::Arc;
use tracing::warn;

use crate::storage::{KeyValueStorage, KEY_CONVERSATION};
use crate::types::{ChatMessage, ConversationEntry};
use crate::Result;

/// Number of trailing log entries included in an outbound request
pub const OUTBOUND_WINDOW: usize = 8;

/// Ordered, append-only conversation history
pub struct ConversationLog {
    storage: Arc<dyn KeyValueStorage>,
    entries: Vec<ConversationEntry>,
}

impl ConversationLog {
    /// Create an empty log backed by the given storage
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            entries: Vec::new(),
        }
    }

    /// Restore the persisted log. A corrupted value is discarded and the
    /// key cleared; the session continues with an empty history.
    pub async fn hydrate(&mut self) -> Result<()> {
        let Some(raw) = self.storage.get(KEY_CONVERSATION).await? else {
            return Ok(());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => self.entries = entries,
            Err(e) => {
                warn!("Discarding corrupt persisted conversation: {}", e);
                self.storage.remove(KEY_CONVERSATION).await?;
            }
        }
        Ok(())
    }

    /// Append an entry and persist the full log
    pub async fn append(&mut self, entry: ConversationEntry) -> Result<()> {
        self.entries.push(entry);
        let serialized = serde_json::to_string(&self.entries)?;
        self.storage.put(KEY_CONVERSATION, &serialized).await
    }

    /// All entries in arrival order
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the log has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last `OUTBOUND_WINDOW` entries, excluding the trailing `skip_last`
    /// entries, converted to wire messages. The caller re-appends the
    /// in-flight user message explicitly, so it is skipped here.
    pub fn outbound_window(&self, skip_last: usize) -> Vec<ChatMessage> {
        let upto = self.entries.len().saturating_sub(skip_last);
        let start = upto.saturating_sub(OUTBOUND_WINDOW);
        self.entries[start..upto].iter().map(ChatMessage::from).collect()
    }
}
