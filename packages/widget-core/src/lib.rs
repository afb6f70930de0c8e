//! AI Widget Core - embeddable chat widget client.
//!
//! This crate provides everything the chat widget needs apart from pixels:
//!
//! - **History**: a bounded, persisted log of the last 50 chat messages
//! - **Exchange**: one `POST /api/chat` round trip per user message
//! - **Widget**: the open/minimized/typing state machine driving a [`Renderer`]
//! - **Config**: the embedding options with per-field defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use ai_widget_core::{ChatClient, MemoryStore, NullRenderer, Widget, WidgetConfig};
//!
//! # async fn run() {
//! let config = WidgetConfig::default();
//! let client = ChatClient::new(&config.api_url);
//! let widget = Widget::initialize(config, client, MemoryStore::new(), NullRenderer);
//!
//! widget.send_message("Which endpoints list users?").await;
//! for message in widget.history() {
//!     println!("[{}] {}", message.role(), message.text());
//! }
//! # }
//! ```

pub mod client;
pub mod config;
pub mod history;
pub mod i18n;
pub mod render;
pub mod storage;
pub mod types;
pub mod widget;

// Re-export commonly used types
pub use client::{ChatClient, ChatTransport};
pub use config::{Position, PositionOffsets, WidgetConfig};
pub use history::{HistoryBuffer, HISTORY_KEY, MAX_HISTORY};
pub use i18n::I18n;
pub use render::{NullRenderer, Renderer, WidgetFrame};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::{ChatMessage, ChatReply, ChatRequest, HealthStatus, ReadyStatus, Role, WidgetState};
pub use widget::{IgnoreReason, SendOutcome, Widget};

/// Error types for widget operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed: {status} {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for widget operations.
pub type Result<T> = std::result::Result<T, Error>;
