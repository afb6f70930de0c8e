//! Bounded, persisted chat history.

use crate::storage::KeyValueStore;
use crate::types::ChatMessage;
use crate::Result;
use serde_json::Value;
use std::collections::VecDeque;

/// Maximum number of messages retained in the history.
pub const MAX_HISTORY: usize = 50;

/// Storage key holding the JSON-encoded history.
pub const HISTORY_KEY: &str = "ai-widget-chat-history";

/// Ordered log of the most recent [`MAX_HISTORY`] chat messages.
///
/// Appending past the bound discards the oldest entries first, so the buffer
/// always holds the newest messages in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryBuffer {
    messages: VecDeque<ChatMessage>,
}

impl HistoryBuffer {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from messages in order, keeping only the newest ones.
    pub fn from_messages(messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        let mut buffer = Self::new();
        for message in messages {
            buffer.push(message);
        }
        buffer
    }

    /// Append a message, dropping the oldest entries beyond the bound.
    ///
    /// Returns the number of messages dropped.
    pub fn push(&mut self, message: ChatMessage) -> usize {
        self.messages.push_back(message);
        let mut dropped = 0;
        while self.messages.len() > MAX_HISTORY {
            self.messages.pop_front();
            dropped += 1;
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn first(&self) -> Option<&ChatMessage> {
        self.messages.front()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    /// Copy the messages out, oldest first.
    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Load the history stored under [`HISTORY_KEY`].
    ///
    /// A missing key yields an empty history. Entries that don't parse as a
    /// message are skipped; only a log that isn't a JSON array is an error.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let Some(raw) = store.get(HISTORY_KEY)? else {
            return Ok(Self::new());
        };
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let entries: Vec<Value> = serde_json::from_str(&raw)?;
        let messages = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<ChatMessage>(entry) {
                Ok(message) => Some(message),
                Err(e) => {
                    tracing::warn!("Skipping unreadable history entry {}: {}", index, e);
                    None
                }
            });
        Ok(Self::from_messages(messages))
    }

    /// Write the history under [`HISTORY_KEY`] as a JSON array.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        let raw = serde_json::to_string(&self.messages)?;
        store.set(HISTORY_KEY, &raw)
    }
}

impl<'a> IntoIterator for &'a HistoryBuffer {
    type Item = &'a ChatMessage;
    type IntoIter = std::collections::vec_deque::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::Role;
    use crate::Error;

    fn numbered(n: usize) -> Vec<ChatMessage> {
        (1..=n).map(|i| ChatMessage::user(format!("msg {i}"))).collect()
    }

    #[test]
    fn test_push_within_bound() {
        let mut history = HistoryBuffer::new();
        assert_eq!(history.push(ChatMessage::user("a")), 0);
        assert_eq!(history.push(ChatMessage::bot("b")), 0);

        assert_eq!(history.len(), 2);
        assert_eq!(history.first().unwrap().text(), "a");
        assert_eq!(history.last().unwrap().role(), Role::Bot);
    }

    #[test]
    fn test_bound_holds_after_every_push() {
        let mut history = HistoryBuffer::new();
        for (i, message) in numbered(120).into_iter().enumerate() {
            history.push(message);
            assert!(history.len() <= MAX_HISTORY);

            // Retained entries are exactly the most recent ones, in order
            let appended = i + 1;
            let oldest = appended.saturating_sub(MAX_HISTORY) + 1;
            let expected: Vec<String> = (oldest..=appended).map(|n| format!("msg {n}")).collect();
            let actual: Vec<String> = history.iter().map(|m| m.text().to_string()).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_sixty_appends_keep_last_fifty() {
        let mut history = HistoryBuffer::new();
        let mut dropped = 0;
        for message in numbered(60) {
            dropped += history.push(message);
        }

        assert_eq!(history.len(), 50);
        assert_eq!(dropped, 10);
        assert_eq!(history.first().unwrap().text(), "msg 11");
        assert_eq!(history.last().unwrap().text(), "msg 60");
    }

    #[test]
    fn test_from_messages_truncates_oldest() {
        let history = HistoryBuffer::from_messages(numbered(75));
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.first().unwrap().text(), "msg 26");
    }

    #[test]
    fn test_save_and_load_preserves_order() {
        let store = MemoryStore::new();
        let history = HistoryBuffer::from_messages(vec![
            ChatMessage::bot("greeting"),
            ChatMessage::user("Hello"),
            ChatMessage::bot("Hi there"),
        ]);

        history.save(&store).unwrap();
        let loaded = HistoryBuffer::load(&store).unwrap();

        assert_eq!(loaded, history);
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let store = MemoryStore::new();
        assert!(HistoryBuffer::load(&store).unwrap().is_empty());
    }

    #[test]
    fn test_load_oversized_log_keeps_newest() {
        let store = MemoryStore::new();
        let raw = serde_json::to_string(&numbered(55)).unwrap();
        store.set(HISTORY_KEY, &raw).unwrap();

        let loaded = HistoryBuffer::load(&store).unwrap();
        assert_eq!(loaded.len(), 50);
        assert_eq!(loaded.first().unwrap().text(), "msg 6");
    }

    #[test]
    fn test_load_skips_unreadable_entries() {
        let store = MemoryStore::new();
        let raw = r#"[
            {"text":"first","role":"user","timestamp":"2025-06-01T10:00:00.000Z"},
            {"type":"bot","timestamp":"2025-06-01T10:00:01.000Z"},
            {"text":"third","role":"narrator","timestamp":"2025-06-01T10:00:02.000Z"},
            {"text":"last","type":"bot","timestamp":"2025-06-01T10:00:03.000Z"}
        ]"#;
        store.set(HISTORY_KEY, raw).unwrap();

        let loaded = HistoryBuffer::load(&store).unwrap();
        let texts: Vec<&str> = loaded.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["first", "last"]);
    }

    #[test]
    fn test_load_corrupted_log() {
        let store = MemoryStore::new();
        store.set(HISTORY_KEY, "{not json").unwrap();

        assert!(matches!(HistoryBuffer::load(&store), Err(Error::Json(_))));

        store.set(HISTORY_KEY, r#"{"text":"not an array"}"#).unwrap();
        assert!(matches!(HistoryBuffer::load(&store), Err(Error::Json(_))));
    }
}
