//! Stage file handling (stage.toml)

use anyhow::{Context, Result};
use parallax_platform::headless::{HeadlessPlatform, NodeSpec};
use parallax_platform::Viewport;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level stage configuration
#[derive(Debug, Default, Deserialize)]
pub struct StageConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    /// Nodes in document order
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeSpec>,
}

/// Viewport size in pixels
#[derive(Debug, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

fn default_width() -> f64 {
    1280.0
}

fn default_height() -> f64 {
    800.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Tick timer configuration
#[derive(Debug, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
}

fn default_period_ms() -> u64 {
    10
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            period_ms: default_period_ms(),
        }
    }
}

impl StageConfig {
    /// Load a stage file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: StageConfig = toml::from_str(content)?;
        anyhow::ensure!(
            config.viewport.width > 0.0 && config.viewport.height > 0.0,
            "viewport must be larger than 0x0, got {}x{}",
            config.viewport.width,
            config.viewport.height
        );
        anyhow::ensure!(config.timer.period_ms > 0, "timer period must be at least 1ms");
        Ok(config)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport.width, self.viewport.height)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.timer.period_ms)
    }

    /// Whether the file declared any nodes; without them a stage is synthesized
    pub fn has_nodes(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Build the declared node tree
    pub fn build_platform(&self) -> Result<HeadlessPlatform> {
        HeadlessPlatform::from_specs(self.viewport(), &self.nodes).context("Invalid stage nodes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StageConfig::parse("").unwrap();
        assert_eq!(config.viewport(), Viewport::new(1280.0, 800.0));
        assert_eq!(config.tick_period(), Duration::from_millis(10));
        assert!(!config.has_nodes());
    }

    #[test]
    fn test_nodes_and_overrides() {
        let config = StageConfig::parse(
            r#"
            [viewport]
            height = 600

            [timer]
            period_ms = 16

            [[node]]
            tag = "section"
            id = "intro"

            [[node]]
            tag = "h1"
            classes = ["name", "big"]
            parent = "intro"
            "#,
        )
        .unwrap();
        assert_eq!(config.viewport(), Viewport::new(1280.0, 600.0));
        assert_eq!(config.tick_period(), Duration::from_millis(16));

        let platform = config.build_platform().unwrap();
        let intro = platform.node_by_id("intro").unwrap();
        let name = platform.query(".name.big", Some(intro)).unwrap();
        assert!(name.is_some());
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let config = StageConfig::parse(
            r#"
            [[node]]
            tag = "p"
            parent = "nowhere"
            "#,
        )
        .unwrap();
        assert!(config.build_platform().is_err());
    }

    #[test]
    fn test_empty_viewport_is_rejected() {
        assert!(StageConfig::parse("[viewport]\nwidth = 0").is_err());
    }
}
