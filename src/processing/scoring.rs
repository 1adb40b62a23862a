//! Deterministic match scoring

use crate::config::ScoringConfig;
use crate::processing::pattern::SkillRegistry;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchLevel {
    #[serde(rename = "Weak Match")]
    Weak,
    #[serde(rename = "Medium Match")]
    Medium,
    #[serde(rename = "Strong Match")]
    Strong,
}

impl MatchLevel {
    pub fn from_score(score: u8, scoring: &ScoringConfig) -> Self {
        if score >= scoring.strong_threshold {
            MatchLevel::Strong
        } else if score >= scoring.medium_threshold {
            MatchLevel::Medium
        } else {
            MatchLevel::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchLevel::Weak => "Weak Match",
            MatchLevel::Medium => "Medium Match",
            MatchLevel::Strong => "Strong Match",
        }
    }
}

impl fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchLevel::Weak => "Weak",
            MatchLevel::Medium => "Medium",
            MatchLevel::Strong => "Strong",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// 0-100
    pub score: u8,
    pub level: MatchLevel,
    /// Capped score on the 0-10 scale before conversion.
    pub raw10: f64,
}

pub struct ScoreCalculator {
    registry: Arc<SkillRegistry>,
    config: ScoringConfig,
}

impl ScoreCalculator {
    pub fn new(registry: Arc<SkillRegistry>, config: ScoringConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score how well `resume` covers `jd`. Names are normalised first, so
    /// callers may pass raw lists.
    pub fn score<J, R>(&self, jd: J, resume: R) -> ScoreOutcome
    where
        J: IntoIterator,
        J::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        let jd = normalize(jd);
        let resume = normalize(resume);
        let raw10 = self.raw_score(&jd, &resume);
        let score = to_percent(raw10);

        ScoreOutcome {
            score,
            level: MatchLevel::from_score(score, &self.config),
            raw10,
        }
    }

    fn raw_score(&self, jd: &BTreeSet<String>, resume: &BTreeSet<String>) -> f64 {
        if jd.is_empty() {
            return 0.0;
        }

        let matched = jd.intersection(resume).count();
        let mut raw10 = matched as f64 / jd.len() as f64 * 10.0;

        if matched == 0 {
            let has_background = resume
                .iter()
                .any(|s| self.registry.is_language(s) || self.registry.is_background(s));
            raw10 = if has_background { self.config.baseline_score } else { 0.0 };
        }

        let jd_languages: Vec<&String> = jd.iter().filter(|s| self.registry.is_language(s)).collect();
        if !jd_languages.is_empty() && !jd_languages.iter().any(|lang| resume.contains(*lang)) {
            raw10 = raw10.min(self.config.language_cap);
        }

        let has_key_skill = jd
            .iter()
            .any(|s| self.registry.is_defining(s) && resume.contains(s));
        if !has_key_skill {
            raw10 = raw10.min(self.config.key_skill_cap);
        }

        raw10 = raw10.min(self.config.max_raw_score);
        debug!("Scored {}/{} JD skills matched, raw {:.2}/10", matched, jd.len(), raw10);
        raw10
    }
}

fn normalize<I>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn to_percent(raw10: f64) -> u8 {
    (raw10 * 10.0).round().clamp(0.0, 100.0) as u8
}
