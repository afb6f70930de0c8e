//! Rendering capability the widget draws through.
//!
//! The widget never touches a UI toolkit directly; a host supplies a
//! [`Renderer`] and receives every visual change through it, in order.

use crate::config::Position;
use crate::types::ChatMessage;

/// Static chrome of the widget, handed to the renderer once on mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetFrame {
    pub title: String,
    pub subtitle: String,
    pub position: Position,
    pub theme: String,
    pub placeholder: String,
    /// Label of the header toggle button while expanded
    pub minimize_label: String,
    /// Label of the header toggle button while minimized
    pub expand_label: String,
    /// Text shown while the typing indicator is on
    pub typing_label: String,
}

/// UI surface for a widget instance.
///
/// Only [`Renderer::render`] and [`Renderer::set_minimized`] are required;
/// the remaining hooks default to no-ops for hosts that don't draw them.
pub trait Renderer: Send {
    /// Draw the widget chrome.
    fn mount(&mut self, _frame: &WidgetFrame) {}

    /// Append a message to the visible transcript.
    fn render(&mut self, message: &ChatMessage);

    /// Collapse the widget to its header, or expand it again.
    fn set_minimized(&mut self, minimized: bool);

    /// Show or hide the typing indicator.
    fn set_typing(&mut self, _visible: bool) {}

    /// Enable or disable the message input and send button.
    fn set_input_enabled(&mut self, _enabled: bool) {}

    /// Show or hide the whole widget.
    fn set_visible(&mut self, _visible: bool) {}

    /// Remove every message from the transcript.
    fn clear(&mut self) {}

    /// Tear the widget down.
    fn destroy(&mut self) {}
}

/// Renderer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _message: &ChatMessage) {}

    fn set_minimized(&mut self, _minimized: bool) {}
}
