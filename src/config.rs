//! Configuration management for the skill matcher

use crate::error::{Result, SkillMatchError};
use crate::processing::catalog::SkillCategory;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub detection: DetectionConfig,
    pub scoring: ScoringConfig,
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
}

/// Tunables for weak-mention detection and input bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub enhanced_weak_detection: bool,
    /// Characters inspected on each side of a match for weak hints.
    pub proximity_window: usize,
    /// Whitespace tokens on each side of a skill token searched for hints.
    pub token_radius: usize,
    /// Characters before a match searched for a learning-section header.
    pub section_lookback: usize,
    pub legacy_window: usize,
    /// Documents longer than this (in chars) are truncated before extraction.
    pub max_text_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub baseline_score: f64,
    pub language_cap: f64,
    pub key_skill_cap: f64,
    pub max_raw_score: f64,
    pub strong_threshold: u8,
    pub medium_threshold: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub unrelated_cap: f64,
    pub low_strong_ratio: f64,
    pub low_strong_cap: f64,
}

/// Site-specific skills appended to the built-in catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub custom_skills: Vec<CustomSkill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSkill {
    pub surface_form: String,
    /// Defaults to the surface form. Must name a surface form already in the catalog.
    #[serde(default)]
    pub canonical_name: Option<String>,
    pub category: SkillCategory,
    #[serde(default)]
    pub defining: bool,
    #[serde(default)]
    pub background: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            enhanced_weak_detection: true,
            proximity_window: 100,
            token_radius: 5,
            section_lookback: 500,
            legacy_window: 40,
            max_text_length: 50_000,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            baseline_score: 2.0,
            language_cap: 6.5,
            key_skill_cap: 6.5,
            max_raw_score: 9.0,
            strong_threshold: 75,
            medium_threshold: 40,
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            unrelated_cap: 35.0,
            low_strong_ratio: 0.3,
            low_strong_cap: 75.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            pretty_json: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| SkillMatchError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SkillMatchError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("career-match")
            .join("config.toml")
    }

    /// Reject tunables that would break the score contract.
    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        if s.medium_threshold > s.strong_threshold || s.strong_threshold > 100 {
            return Err(SkillMatchError::Configuration(format!(
                "thresholds must satisfy medium <= strong <= 100 (got {} / {})",
                s.medium_threshold, s.strong_threshold
            )));
        }
        for (name, value) in [
            ("baseline_score", s.baseline_score),
            ("language_cap", s.language_cap),
            ("key_skill_cap", s.key_skill_cap),
            ("max_raw_score", s.max_raw_score),
        ] {
            if !(0.0..=10.0).contains(&value) {
                return Err(SkillMatchError::Configuration(format!(
                    "scoring.{} must be within 0..=10, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.calibration.low_strong_ratio) {
            return Err(SkillMatchError::Configuration(
                "calibration.low_strong_ratio must be within 0..=1".to_string(),
            ));
        }
        Ok(())
    }
}
