//! Widget lifecycle: history, open/minimized state and the chat exchange.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::client::ChatTransport;
use crate::config::WidgetConfig;
use crate::history::HistoryBuffer;
use crate::i18n::I18n;
use crate::render::{Renderer, WidgetFrame};
use crate::storage::KeyValueStore;
use crate::types::{ChatMessage, ChatRequest, WidgetState};

/// Result of a [`Widget::send_message`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was appended and no request was made.
    Ignored(IgnoreReason),
    /// The backend replied; the reply was appended.
    Replied(String),
    /// The exchange failed; the fallback message was appended.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The trimmed input was empty
    Empty,
    /// Another exchange is still in flight
    Busy,
}

struct WidgetInner {
    history: HistoryBuffer,
    state: WidgetState,
    in_flight: bool,
    store: Box<dyn KeyValueStore>,
    renderer: Box<dyn Renderer>,
}

impl WidgetInner {
    fn append(&mut self, message: ChatMessage) {
        let dropped = self.history.push(message);
        if dropped > 0 {
            tracing::trace!("History full, dropped {} oldest message(s)", dropped);
        }
        if let Some(last) = self.history.last() {
            self.renderer.render(last);
        }
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.history.save(self.store.as_ref()) {
            tracing::warn!("Failed to persist chat history: {}", e);
        }
    }

    fn set_typing(&mut self, visible: bool) {
        self.state.typing_indicator_visible = visible;
        self.renderer.set_typing(visible);
    }

    fn finish_exchange(&mut self) {
        self.in_flight = false;
        self.renderer.set_input_enabled(true);
    }
}

/// Releases the in-flight slot if a send is dropped before its exchange
/// resolves, so the widget accepts the next send.
struct InFlightGuard<'a> {
    inner: &'a Mutex<WidgetInner>,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::debug!("Send dropped before the exchange resolved");
        let mut inner = self.inner.lock();
        inner.set_typing(false);
        inner.finish_exchange();
    }
}

/// A single chat widget instance.
///
/// All methods take `&self`; the mutable parts sit behind one lock that is
/// never held across an `.await`, so a second [`Widget::send_message`] issued
/// while an exchange is pending sees the in-flight flag and is ignored.
pub struct Widget {
    config: WidgetConfig,
    i18n: I18n,
    context_ref: String,
    transport: Arc<dyn ChatTransport>,
    inner: Mutex<WidgetInner>,
}

impl Widget {
    /// Create a widget, mount it and restore its persisted history.
    ///
    /// With no stored history the localized greeting becomes the only entry.
    /// Restored messages are rendered but not written back.
    pub fn initialize(
        config: WidgetConfig,
        transport: impl ChatTransport + 'static,
        store: impl KeyValueStore + 'static,
        renderer: impl Renderer + 'static,
    ) -> Self {
        Self::with_shared_transport(config, Arc::new(transport), Box::new(store), Box::new(renderer))
    }

    /// Like [`Widget::initialize`], for transports shared between instances.
    pub fn with_shared_transport(
        config: WidgetConfig,
        transport: Arc<dyn ChatTransport>,
        store: Box<dyn KeyValueStore>,
        mut renderer: Box<dyn Renderer>,
    ) -> Self {
        let i18n = I18n::for_language(&config.language);

        let title = config.display_title(&i18n);
        renderer.mount(&WidgetFrame {
            typing_label: i18n.format("widget.typing", &[("title", title.as_str())]),
            title,
            subtitle: config.display_subtitle(&i18n),
            position: config.position,
            theme: config.theme.clone(),
            placeholder: i18n.t("widget.placeholder"),
            minimize_label: i18n.t("widget.toggle.minimize"),
            expand_label: i18n.t("widget.toggle.expand"),
        });

        let history = match HistoryBuffer::load(store.as_ref()) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Failed to load chat history, starting fresh: {}", e);
                HistoryBuffer::new()
            }
        };

        let history = if history.is_empty() {
            HistoryBuffer::from_messages([ChatMessage::bot(i18n.greeting())])
        } else {
            tracing::debug!("Restored {} message(s) from history", history.len());
            history
        };

        for message in &history {
            renderer.render(message);
        }

        let context_ref = config.context_ref();
        tracing::info!(api_url = %config.api_url, position = %config.position, "Widget initialized");

        Self {
            config,
            i18n,
            context_ref,
            transport,
            inner: Mutex::new(WidgetInner {
                history,
                state: WidgetState::default(),
                in_flight: false,
                store,
                renderer,
            }),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    /// Snapshot of the history, oldest first.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.inner.lock().history.to_vec()
    }

    pub fn state(&self) -> WidgetState {
        self.inner.lock().state
    }

    /// Whether an exchange is in flight.
    pub fn is_busy(&self) -> bool {
        self.inner.lock().in_flight
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// Append a message: bound the history, render it, persist the log.
    pub fn append_message(&self, message: ChatMessage) {
        self.inner.lock().append(message);
    }

    /// Send a user message and append the bot's reply.
    ///
    /// Empty input and sends issued while another exchange is pending are
    /// ignored. A failed exchange appends exactly one fallback message; no
    /// error ever escapes. Dropping the future mid-exchange appends nothing
    /// and frees the widget for the next send.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored(IgnoreReason::Empty);
        }

        {
            let mut inner = self.inner.lock();
            if inner.in_flight || inner.state.typing_indicator_visible {
                tracing::debug!("Send ignored, exchange already in flight");
                return SendOutcome::Ignored(IgnoreReason::Busy);
            }
            inner.in_flight = true;
            inner.append(ChatMessage::user(text));
            inner.renderer.set_input_enabled(false);
            inner.set_typing(true);
        }
        let guard = InFlightGuard {
            inner: &self.inner,
            armed: true,
        };

        let request = ChatRequest::new(text, self.context_ref.clone());
        let result = self.transport.exchange(&request).await;

        guard.disarm();
        let mut inner = self.inner.lock();
        inner.set_typing(false);
        let outcome = match result {
            Ok(reply) => {
                inner.append(ChatMessage::bot(reply.message.clone()));
                SendOutcome::Replied(reply.message)
            }
            Err(e) => {
                tracing::warn!("Chat exchange failed: {}", e);
                inner.append(ChatMessage::bot(self.i18n.error_fallback()));
                SendOutcome::Failed
            }
        };
        inner.finish_exchange();
        outcome
    }

    /// Reset the conversation to the greeting.
    pub fn clear_history(&self) {
        let mut inner = self.inner.lock();
        inner.history.clear();
        inner.renderer.clear();
        inner.append(ChatMessage::bot(self.i18n.greeting()));
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    /// Flip between minimized and expanded; returns the new `minimized` value.
    pub fn toggle(&self) -> bool {
        let mut inner = self.inner.lock();
        let minimized = !inner.state.minimized;
        inner.state.minimized = minimized;
        inner.renderer.set_minimized(minimized);
        minimized
    }

    pub fn show(&self) {
        self.set_visible(true);
    }

    pub fn hide(&self) {
        self.set_visible(false);
    }

    fn set_visible(&self, visible: bool) {
        let mut inner = self.inner.lock();
        inner.state.visible = visible;
        inner.renderer.set_visible(visible);
    }

    /// Tear down the widget's UI. The persisted history is kept.
    pub fn destroy(self) {
        let mut inner = self.inner.into_inner();
        inner.renderer.destroy();
        tracing::debug!("Widget destroyed");
    }
}
