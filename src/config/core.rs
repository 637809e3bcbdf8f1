use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use std::path::Path;

use super::DocsorterConfig;
use crate::taxonomy::DEFAULT_CONFIG;

/// Layered configuration sources
///
/// Priority, lowest first: embedded defaults, user config
/// (`~/.config/docsorter/config.*`), project config (`docsorter.*` in the
/// working directory), then `DOCSORTER_*` environment variables. A custom
/// config file replaces the user and project layers.
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    pub fn new(custom_config: Option<&str>) -> Self {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        if let Some(custom_path) = custom_config {
            figment = match Path::new(custom_path).extension().and_then(|e| e.to_str()) {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            let user = Self::user_config_path();
            figment = figment
                // User config - support multiple formats
                .merge(Toml::file(&user))
                .merge(Json::file(user.replace(".toml", ".json")))
                .merge(Yaml::file(user.replace(".toml", ".yaml")))
                .merge(Yaml::file(user.replace(".toml", ".yml")))
                // Project config - support multiple formats
                .merge(Toml::file("docsorter.toml"))
                .merge(Json::file("docsorter.json"))
                .merge(Yaml::file("docsorter.yaml"))
                .merge(Yaml::file("docsorter.yml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("DOCSORTER_").split("__"));

        tracing::trace!("configuration sources: {:?}", figment.metadata().count());
        Self { figment }
    }

    /// Embedded defaults with no file or environment layers
    pub fn defaults_only() -> Self {
        Self {
            figment: Figment::new().merge(Toml::string(DEFAULT_CONFIG)),
        }
    }

    /// Add a value layer on top of everything loaded so far (CLI overrides)
    pub fn with_override<V: serde::Serialize>(mut self, key: &str, value: V) -> Self {
        self.figment = self.figment.merge((key, value));
        self
    }

    /// Extract the typed configuration
    pub fn extract(&self) -> Result<DocsorterConfig> {
        self.figment
            .extract()
            .context("Failed to load docsorter configuration")
    }

    /// Get the full merged configuration as a structured value
    pub fn get_full_config(&self) -> Result<serde_json::Value> {
        Ok(self.figment.extract()?)
    }

    /// Get a nested section as JSON
    pub fn get_section(&self, path: &str) -> Result<serde_json::Value> {
        Ok(self.figment.extract_inner(path)?)
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/docsorter/config.toml", home),
            Err(_) => "~/.config/docsorter/config.toml".to_string(),
        }
    }
}
