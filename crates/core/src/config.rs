use serde::{Deserialize, Serialize};

use crate::types::Proportions;

/// Root application configuration. Loaded from environment variables
/// with the prefix `ADFRAME__` and an optional TOML or JSON config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub compositor: CompositorConfig,
}

/// Whether the position frequency counter resets for every frame or is
/// shared by every frame of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyScope {
    #[default]
    Frame,
    Batch,
}

impl std::str::FromStr for FrequencyScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "frame" => Ok(FrequencyScope::Frame),
            "batch" => Ok(FrequencyScope::Batch),
            other => Err(format!("unknown frequency scope '{other}', expected frame or batch")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f64,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: f64,
    #[serde(default = "default_mid_fraction")]
    pub vertical_mid: f64,
    #[serde(default = "default_outer_fraction")]
    pub vertical_outer: f64,
    #[serde(default = "default_mid_fraction")]
    pub horizontal_mid: f64,
    #[serde(default = "default_outer_fraction")]
    pub horizontal_outer: f64,
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default)]
    pub frequency_scope: FrequencyScope,
    /// Fixed seed for the tie-break random source. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// JSON policy table replacing the built-in one.
    #[serde(default)]
    pub policy_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompositorConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

// Default functions
fn default_canvas_width() -> f64 {
    320.0
}
fn default_canvas_height() -> f64 {
    500.0
}
fn default_mid_fraction() -> f64 {
    0.6
}
fn default_outer_fraction() -> f64 {
    0.2
}
fn default_padding() -> f64 {
    10.0
}
fn default_output_dir() -> String {
    "frames".to_string()
}
fn default_file_prefix() -> String {
    "frame".to_string()
}

impl LayoutConfig {
    pub fn proportions(&self) -> Proportions {
        Proportions {
            vertical_mid: self.vertical_mid,
            vertical_outer: self.vertical_outer,
            horizontal_mid: self.horizontal_mid,
            horizontal_outer: self.horizontal_outer,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            vertical_mid: default_mid_fraction(),
            vertical_outer: default_outer_fraction(),
            horizontal_mid: default_mid_fraction(),
            horizontal_outer: default_outer_fraction(),
            padding: default_padding(),
            frequency_scope: FrequencyScope::default(),
            seed: None,
            policy_path: None,
        }
    }
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional config file, then environment variables.
    /// Environment values win over the file.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("ADFRAME")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
