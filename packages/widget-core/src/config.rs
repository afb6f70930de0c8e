//! Embedding configuration for a widget instance.

use crate::i18n::I18n;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:5050";
pub const DEFAULT_THEME: &str = "default";
pub const DEFAULT_LANGUAGE: &str = "uk";
pub const DEFAULT_TITLE: &str = "AI Swagger Bot";

/// Distance of the widget from the screen edges, in pixels.
const EDGE_OFFSET_PX: u32 = 20;

// ============================================================================
// Position
// ============================================================================

/// Screen corner the widget is anchored to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

/// Edge offsets for a [`Position`]; `None` means the edge is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionOffsets {
    pub top: Option<u32>,
    pub right: Option<u32>,
    pub bottom: Option<u32>,
    pub left: Option<u32>,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::BottomRight => "bottom-right",
            Position::BottomLeft => "bottom-left",
            Position::TopRight => "top-right",
            Position::TopLeft => "top-left",
        }
    }

    /// Parse a placement name; unknown names fall back to bottom-right.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "bottom-left" => Position::BottomLeft,
            "top-right" => Position::TopRight,
            "top-left" => Position::TopLeft,
            _ => Position::BottomRight,
        }
    }

    pub fn offsets(&self) -> PositionOffsets {
        let edge = Some(EDGE_OFFSET_PX);
        match self {
            Position::BottomRight => PositionOffsets { bottom: edge, right: edge, ..Default::default() },
            Position::BottomLeft => PositionOffsets { bottom: edge, left: edge, ..Default::default() },
            Position::TopRight => PositionOffsets { top: edge, right: edge, ..Default::default() },
            Position::TopLeft => PositionOffsets { top: edge, left: edge, ..Default::default() },
        }
    }
}

impl From<String> for Position {
    fn from(value: String) -> Self {
        Position::parse(&value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PositionOffsets {
    /// Render the offsets as inline CSS declarations.
    pub fn to_css(&self) -> String {
        [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ]
        .iter()
        .filter_map(|(edge, px)| px.map(|px| format!("{edge}: {px}px;")))
        .collect::<Vec<_>>()
        .join(" ")
    }
}

// ============================================================================
// Widget Config
// ============================================================================

/// Options recognised when embedding the widget.
///
/// Every field has a default, and unknown options are ignored, so any partial
/// JSON or TOML object is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    /// Base URL of the chat endpoint
    #[serde(alias = "api_url")]
    pub api_url: String,
    pub position: Position,
    /// Cosmetic theme name, passed through to the renderer
    pub theme: String,
    /// Display locale
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Context reference sent with every message
    #[serde(alias = "api_spec_url", skip_serializing_if = "Option::is_none")]
    pub api_spec_url: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            position: Position::default(),
            theme: DEFAULT_THEME.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            title: None,
            subtitle: None,
            api_spec_url: None,
        }
    }
}

impl WidgetConfig {
    /// Create a config for the given endpoint with every other option defaulted.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Parse a JSON configuration object.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validated()
    }

    /// Parse a TOML configuration document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validated()
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("AI_WIDGET_CONFIG") {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".ai-widget/config.toml"))
            .unwrap_or_else(|| PathBuf::from("ai-widget.toml"))
    }

    /// Load config from the default path, falling back to defaults if absent.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    /// Load config from a file; `.json` files are read as JSON, anything else as TOML.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    fn validated(mut self) -> Result<Self> {
        let trimmed = self.api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::Config("apiUrl must not be empty".to_string()));
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(Error::Config(format!(
                "apiUrl must be an http(s) URL: {}",
                self.api_url
            )));
        }
        self.api_url = trimmed.to_string();
        Ok(self)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Context reference sent alongside each message.
    pub fn context_ref(&self) -> String {
        match &self.api_spec_url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => format!("{}/api/swagger.json", self.base_url()),
        }
    }

    /// Header title, localized default when not configured.
    pub fn display_title(&self, i18n: &I18n) -> String {
        self.title.clone().unwrap_or_else(|| i18n.t("widget.title"))
    }

    /// Header subtitle, localized default when not configured.
    pub fn display_subtitle(&self, i18n: &I18n) -> String {
        self.subtitle
            .clone()
            .unwrap_or_else(|| i18n.t("widget.subtitle"))
    }
}
