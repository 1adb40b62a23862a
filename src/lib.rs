//! Deterministic skill extraction and résumé / job-description match scoring

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, SkillMatchError};
pub use processing::analyzer::{MatchEngine, MatchResult};
pub use processing::pattern::SkillRegistry;
pub use processing::profile::ExternalSkillProfile;
pub use processing::scoring::{MatchLevel, ScoreOutcome};
