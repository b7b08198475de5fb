#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CHAT_PATH: &str = "/api/chat";
pub const DEFAULT_FEEDBACK_PATH: &str = "/api/feedback";
/// Backend used by native hosts when no base URL is configured.
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_GREETING: &str = "Olá! I'm your Brazilian Housing Laws Assistant. How can I help you with tenant rights, rental obligations, or housing disputes in Brazil today?";
pub const DEFAULT_ERROR_PREFIX: &str = "Sorry, I encountered an error: ";
pub const DEFAULT_FALLBACK_ERROR: &str =
    "Sorry, I'm having trouble connecting to my knowledge base. Please try again later.";
pub const DEFAULT_REFERENCES_HEADING: &str = "References:";
pub const DEFAULT_FEEDBACK_THANKS: &str = "Thank you for your feedback!";
pub const DEFAULT_FEEDBACK_FAILED: &str = "Could not submit feedback. Please try again.";
pub const ENV_PREFIX: &str = "LEXCHAT_";

/// How bot-authored text is inserted into bubble markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotMarkup {
    /// Escape bot text before emphasis and line breaks are applied.
    Escaped,
    /// Insert bot text as-is, so backend markup renders.
    #[default]
    Trusted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Backend origin. `None` means same origin as the hosting page.
    pub base_url: Option<String>,
    pub chat_path: String,
    pub feedback_path: String,
    pub greeting: String,
    pub error_prefix: String,
    pub fallback_error: String,
    pub references_heading: String,
    pub feedback_thanks: String,
    pub feedback_failed: String,
    pub bot_markup: BotMarkup,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            feedback_path: DEFAULT_FEEDBACK_PATH.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            error_prefix: DEFAULT_ERROR_PREFIX.to_string(),
            fallback_error: DEFAULT_FALLBACK_ERROR.to_string(),
            references_heading: DEFAULT_REFERENCES_HEADING.to_string(),
            feedback_thanks: DEFAULT_FEEDBACK_THANKS.to_string(),
            feedback_failed: DEFAULT_FEEDBACK_FAILED.to_string(),
            bot_markup: BotMarkup::default(),
        }
    }
}

impl WidgetConfig {
    /// Restores defaults for blank fields and normalizes URL pieces.
    pub fn normalized(self) -> Self {
        let base_url = self
            .base_url
            .map(|base_url| base_url.trim().trim_end_matches('/').to_string())
            .filter(|base_url| !base_url.is_empty());

        Self {
            base_url,
            chat_path: normalize_path(self.chat_path, DEFAULT_CHAT_PATH),
            feedback_path: normalize_path(self.feedback_path, DEFAULT_FEEDBACK_PATH),
            greeting: or_default(self.greeting, DEFAULT_GREETING),
            error_prefix: or_default(self.error_prefix, DEFAULT_ERROR_PREFIX),
            fallback_error: or_default(self.fallback_error, DEFAULT_FALLBACK_ERROR),
            references_heading: or_default(self.references_heading, DEFAULT_REFERENCES_HEADING),
            feedback_thanks: or_default(self.feedback_thanks, DEFAULT_FEEDBACK_THANKS),
            feedback_failed: or_default(self.feedback_failed, DEFAULT_FEEDBACK_FAILED),
            bot_markup: self.bot_markup,
        }
    }

    /// Error bubble text for an application-reported failure.
    pub fn error_text(&self, error: &str) -> String {
        format!("{}{}", self.error_prefix, error)
    }

    pub fn chat_url(&self, origin: &str) -> String {
        join_url(self.base_url.as_deref().unwrap_or(origin), &self.chat_path)
    }

    pub fn feedback_url(&self, origin: &str) -> String {
        join_url(self.base_url.as_deref().unwrap_or(origin), &self.feedback_path)
    }

    /// Layers defaults, an optional JSON file, then `LEXCHAT_*` variables.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&Path>) -> crate::error::ConfigResult<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Json, Serialized},
        };
        use snafu::ResultExt;

        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.exists() {
                tracing::info!("config file not found at {:?}, using defaults", path);
            }
            figment = figment.merge(Json::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let config = figment
            .extract::<Self>()
            .map_err(Box::new)
            .context(crate::error::ExtractSnafu {
                stage: "extract-widget-config",
            })?;
        Ok(config.normalized())
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn normalize_path(path: String, default: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return default.to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn join_url(origin: &str, path: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), path)
}
