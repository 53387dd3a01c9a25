use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub moderation: ModerationConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DiscordConfig {
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Leave unset to let the model decide.
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_gemini_base_url(),
            max_output_tokens: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PanelConfig {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModerationConfig {
    #[serde(default = "default_banned_words")]
    pub banned_words: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            banned_words: default_banned_words(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Applies to the Gemini call and to attachment downloads.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_banned_words() -> Vec<String> {
    vec!["badword1".to_string(), "badword2".to_string()]
}

fn default_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Read the TOML file at `path` (if any), apply environment overrides
    /// and check that every required value is present.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)?
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Environment values take precedence over the file. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = var("DISCORD_TOKEN") {
            self.discord.bot_token = token;
        }
        if let Some(key) = var("GEMINI_API_KEY") {
            self.gemini.api_key = key;
        }
        if let Some(model) = var("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(url) = var("PANEL_URL") {
            self.panel.url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.discord.bot_token.trim().is_empty() {
            anyhow::bail!("Discord bot token is missing (set DISCORD_TOKEN or [discord] bot_token)");
        }
        if self.gemini.api_key.trim().is_empty() {
            anyhow::bail!("Gemini API key is missing (set GEMINI_API_KEY or [gemini] api_key)");
        }
        if self.panel.url.trim().is_empty() {
            anyhow::bail!("Panel URL is missing (set PANEL_URL or [panel] url)");
        }
        Ok(())
    }
}
