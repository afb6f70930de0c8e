//! Display strings for the widget, keyed by locale.

use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_LOCALE: &str = "uk";

#[derive(Clone, Debug)]
pub struct I18n {
    locale: String,
    messages: HashMap<String, String>,
}

impl I18n {
    /// Load the string table for a display language such as `uk` or `en-US`.
    pub fn for_language(language: &str) -> Self {
        let locale = normalize_locale(language);
        let mut messages = load_messages(DEFAULT_LOCALE);
        messages.extend(load_messages(&locale));
        Self { locale, messages }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn t(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn format(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut value = self.t(key);
        for (param, replacement) in params {
            value = value.replace(&format!("{{{param}}}"), replacement);
        }
        value
    }

    pub fn greeting(&self) -> String {
        self.t("widget.greeting")
    }

    pub fn error_fallback(&self) -> String {
        self.t("widget.error")
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::for_language(DEFAULT_LOCALE)
    }
}

fn normalize_locale(value: &str) -> String {
    let trimmed = value.trim();
    let normalized = trimmed
        .split('.')
        .next()
        .unwrap_or(trimmed)
        .replace('-', "_")
        .to_lowercase();
    if normalized.is_empty() {
        DEFAULT_LOCALE.to_string()
    } else {
        normalized
    }
}

fn load_messages(locale: &str) -> HashMap<String, String> {
    let raw = if locale.starts_with("en") {
        include_str!("../i18n/en.json")
    } else if locale.starts_with("uk") {
        include_str!("../i18n/uk.json")
    } else {
        return HashMap::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
            .collect(),
        _ => HashMap::new(),
    }
}
