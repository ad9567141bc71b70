use anyhow::Result;
use serde::Deserialize;

use crate::detect::DetectorConfig;
use crate::feedback::FeedbackStyle;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioSettings,
    pub detection: DetectorConfig,
    pub pacing: PacingSettings,
    pub storage: StorageSettings,
    pub classifier: ClassifierSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "bitepace".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8750,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Capture sample rate (the classifier expects 16kHz mono)
    pub sample_rate: u32,
    /// Samples per amplitude-analysis frame (50ms at 16kHz)
    pub frame_samples: usize,
    /// Samples per classifier window (~1s at 16kHz)
    pub window_samples: usize,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            frame_samples: 800,
            window_samples: 16384,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingSettings {
    /// Default target seconds between bites / reminders
    pub default_interval_secs: u32,
    pub feedback: FeedbackStyle,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            default_interval_secs: 20,
            feedback: FeedbackStyle::Both,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Meal history JSON file
    pub history_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            history_path: "data/meals.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ClassifierSettings {
    /// YAMNet-style class map CSV
    pub class_map_path: Option<String>,
    /// Model weights; no inference runtime ships in this build
    pub model_path: Option<String>,
}

impl Config {
    /// Load configuration: built-in defaults, then an optional file, then
    /// `BITEPACE_*` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("BITEPACE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
