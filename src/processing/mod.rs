//! Skill extraction and match scoring

pub mod analyzer;
pub mod calibration;
pub mod catalog;
pub mod context;
pub mod extractor;
pub mod guardrail;
pub mod knowledge;
pub mod pattern;
pub mod profile;
pub mod scoring;
pub mod verifier;

pub use analyzer::{MatchEngine, MatchResult};
pub use extractor::SkillSet;
pub use knowledge::{GuidanceNote, KnowledgeBase};
pub use scoring::{MatchLevel, ScoreOutcome};
