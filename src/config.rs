use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::coach::{self, FeedbackProvider};
use crate::session::clock::DEFAULT_DURATION_SECS;
use crate::session::engine::{DEFAULT_WINDOW_SIZE, DEFAULT_WORD_COUNT, SessionConfig};
use crate::vocabulary::{self, DEFAULT_VOCABULARY};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,
    #[serde(default = "default_vocabulary")]
    pub vocabulary: String,
    /// Overrides `vocabulary` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_path: Option<String>,
    #[serde(default = "default_coach")]
    pub coach: String,
}

fn default_word_count() -> usize {
    DEFAULT_WORD_COUNT
}
fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}
fn default_duration_secs() -> u32 {
    DEFAULT_DURATION_SECS
}
fn default_vocabulary() -> String {
    DEFAULT_VOCABULARY.to_string()
}
fn default_coach() -> String {
    "local".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_count: default_word_count(),
            window_size: default_window_size(),
            duration_secs: default_duration_secs(),
            vocabulary: default_vocabulary(),
            vocabulary_path: None,
            coach: default_coach(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typecoach")
            .join("config.toml")
    }

    /// Replace values a session cannot run with by their defaults.
    pub fn normalize(&mut self) {
        if self.word_count == 0 {
            self.word_count = default_word_count();
        }
        if self.window_size == 0 {
            self.window_size = default_window_size();
        }
        if self.duration_secs == 0 {
            self.duration_secs = default_duration_secs();
        }
        if coach::provider_from_name(&self.coach).is_none() {
            self.coach = default_coach();
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            word_count: self.word_count,
            window_size: self.window_size,
            duration_secs: self.duration_secs,
        }
    }

    pub fn load_vocabulary(&self) -> Result<Vec<String>> {
        match &self.vocabulary_path {
            Some(path) => vocabulary::load_file(Path::new(path))
                .with_context(|| format!("loading word file {path}")),
            None => vocabulary::load_bundled(&self.vocabulary)
                .with_context(|| {
                    format!(
                        "loading vocabulary '{}' (bundled: {})",
                        self.vocabulary,
                        vocabulary::bundled_names().join(", ")
                    )
                }),
        }
    }

    pub fn feedback_provider(&self) -> Box<dyn FeedbackProvider> {
        coach::provider_from_name(&self.coach)
            .unwrap_or_else(|| Box::new(coach::LocalCoach::default()))
    }
}
