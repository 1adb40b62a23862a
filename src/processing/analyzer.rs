//! Match engine combining extraction, verification, scoring and calibration

use crate::config::Config;
use crate::error::Result;
use crate::processing::calibration::ProfileCalibrator;
use crate::processing::extractor::{SkillExtractor, SkillFinding, SkillSet};
use crate::processing::guardrail::{sanitize_insights, Insights};
use crate::processing::knowledge::{GuidanceNote, KnowledgeBase};
use crate::processing::pattern::SkillRegistry;
use crate::processing::profile::ExternalSkillProfile;
use crate::processing::scoring::{MatchLevel, ScoreCalculator, ScoreOutcome};
use crate::processing::verifier::EvidenceVerifier;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Main engine that coordinates all match components
pub struct MatchEngine {
    registry: Arc<SkillRegistry>,
    extractor: SkillExtractor,
    verifier: EvidenceVerifier,
    calculator: ScoreCalculator,
    calibrator: ProfileCalibrator,
    knowledge: KnowledgeBase,
    config: Config,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Final score (0 to 100)
    pub score: u8,
    pub match_level: MatchLevel,

    pub jd_skills: SkillSet,
    pub resume_skills: SkillSet,
    /// JD skills the résumé shows
    pub matched_skills: Vec<String>,
    /// JD skills the résumé lacks
    pub missing_skills: Vec<String>,

    /// Whether an external profile adjusted the score
    pub calibrated: bool,
    pub verified_profile: Option<ExternalSkillProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub catalog_entries: usize,
    pub custom_entries: usize,
    pub cached_fallback_patterns: usize,
}

impl MatchEngine {
    /// Create a new engine over a shared registry
    pub fn new(registry: Arc<SkillRegistry>, config: Config) -> Result<Self> {
        let extractor = SkillExtractor::new(Arc::clone(&registry))?;
        let verifier = EvidenceVerifier::new(Arc::clone(&registry))?;
        let calculator = ScoreCalculator::new(Arc::clone(&registry), config.scoring.clone());
        let calibrator = ProfileCalibrator::new(Arc::clone(&registry), config.calibration.clone());

        Ok(Self {
            registry,
            extractor,
            verifier,
            calculator,
            calibrator,
            knowledge: KnowledgeBase::new(),
            config,
        })
    }

    /// Build the registry from `config` and wrap it in an engine
    pub fn from_config(config: Config) -> Result<Self> {
        let registry = Arc::new(SkillRegistry::from_config(&config)?);
        Self::new(registry, config)
    }

    pub fn registry(&self) -> &Arc<SkillRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline on one JD / résumé pair
    pub fn analyze(
        &self,
        jd_text: Option<&str>,
        resume_text: Option<&str>,
        profile: Option<ExternalSkillProfile>,
    ) -> MatchResult {
        info!("Analyzing match");
        debug!("JD length: {}", jd_text.map_or(0, str::len));
        debug!("Resume length: {}", resume_text.map_or(0, str::len));

        // 1. Deterministic extraction
        let jd_skills = self.extract_skills(jd_text);
        let resume_skills = self.extract_skills(resume_text);
        info!("JD skills: {:?}", jd_skills);
        info!("Resume skills: {:?}", resume_skills);

        // 2. Untrusted profile is checked against the résumé before use
        let verified_profile = profile.map(|mut profile| {
            debug!("External strong skills (raw): {:?}", profile.strong_skills);
            debug!("External weak skills (raw): {:?}", profile.weak_skills);
            self.verifier.verify_profile(&mut profile, resume_text);
            profile
        });
        if verified_profile.is_none() {
            info!("No external profile; using deterministic score only");
        }

        // 3. Score, then calibrate
        let outcome = self.score_match(&jd_skills, &resume_skills);
        let score = match &verified_profile {
            Some(profile) => self.calibrate(profile, &jd_skills, outcome.score),
            None => outcome.score,
        };

        let matched_skills: Vec<String> = jd_skills.intersection(&resume_skills).cloned().collect();
        let missing_skills: Vec<String> = jd_skills.difference(&resume_skills).cloned().collect();
        let match_level = MatchLevel::from_score(score, &self.config.scoring);

        info!("Analysis complete. Score: {} ({})", score, match_level.label());
        MatchResult {
            score,
            match_level,
            jd_skills,
            resume_skills,
            matched_skills,
            missing_skills,
            calibrated: score != outcome.score,
            verified_profile,
        }
    }

    pub fn extract_skills(&self, text: Option<&str>) -> SkillSet {
        self.extractor.extract(text)
    }

    /// Per-entry evidence for a single document
    pub fn explain(&self, text: Option<&str>) -> Vec<SkillFinding> {
        self.extractor.findings(text)
    }

    pub fn score_match(&self, jd_skills: &SkillSet, resume_skills: &SkillSet) -> ScoreOutcome {
        self.calculator.score(jd_skills, resume_skills)
    }

    pub fn verify_against_text(&self, candidates: &[String], text: Option<&str>) -> Vec<String> {
        self.verifier.verify(candidates, text)
    }

    pub fn calibrate(&self, profile: &ExternalSkillProfile, jd_skills: &SkillSet, base: u8) -> u8 {
        self.calibrator.calibrate(profile, jd_skills, base)
    }

    /// Apply the guardrail to externally generated insights, or fall back to
    /// fixed text when none are usable
    pub fn review_insights(&self, insights: Option<Insights>, result: &MatchResult) -> Insights {
        match insights {
            Some(mut insights) if !insights.is_empty() || insights.summary.is_some() => {
                sanitize_insights(&mut insights, &result.missing_skills, result.match_level);
                insights
            }
            _ => {
                info!("No usable insights; using fallback text");
                Insights::fallback(&result.matched_skills, &result.missing_skills)
            }
        }
    }

    /// Guidance snippets for the gaps in `result`, optionally steered by a
    /// free-form question. Role focus comes from the verified profile.
    pub fn guidance(&self, question: Option<&str>, result: &MatchResult) -> Vec<GuidanceNote> {
        let role_focus = result
            .verified_profile
            .as_ref()
            .and_then(|profile| profile.role_focus.as_deref());
        let notes: Vec<GuidanceNote> = self
            .knowledge
            .relevant(question, &result.missing_skills, role_focus)
            .into_iter()
            .map(GuidanceNote::from)
            .collect();
        debug!("Selected {} guidance snippets", notes.len());
        notes
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            catalog_entries: self.registry.len(),
            custom_entries: self.config.catalog.custom_skills.len(),
            cached_fallback_patterns: self.registry.cached_fallbacks(),
        }
    }
}
