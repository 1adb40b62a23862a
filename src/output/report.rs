//! Report structures wrapping engine results for presentation

use crate::processing::analyzer::MatchResult;
use crate::processing::extractor::{SkillFinding, SkillSet};
use crate::processing::guardrail::Insights;
use crate::processing::knowledge::GuidanceNote;
use crate::processing::scoring::MatchLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full output of `analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub summary: ReportSummary,

    /// Engine output, unchanged
    pub result: MatchResult,

    /// Coaching text after the guardrail, when insights were supplied
    pub insights: Option<Insights>,

    /// Built-in advice picked for the missing skills
    #[serde(default)]
    pub guidance: Vec<GuidanceNote>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub score: u8,
    pub match_level: MatchLevel,
    pub verdict: String,
    /// Share of JD skills found in the résumé (0.0 to 1.0)
    pub coverage: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub resume_file: String,
    pub job_file: String,
    pub profile_file: Option<String>,
    pub processing_time_ms: u64,
    pub catalog_entries: usize,
}

/// Output of `extract`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub file: String,
    pub skills: SkillSet,
    /// Every catalog entry seen, including weak-only mentions
    pub findings: Vec<SkillFinding>,
    pub generated_at: DateTime<Utc>,
}

impl MatchReport {
    pub fn new(result: MatchResult, insights: Option<Insights>, metadata: ReportMetadata) -> Self {
        let coverage = if result.jd_skills.is_empty() {
            0.0
        } else {
            result.matched_skills.len() as f32 / result.jd_skills.len() as f32
        };

        Self {
            summary: ReportSummary {
                score: result.score,
                match_level: result.match_level,
                verdict: verdict(result.match_level, result.jd_skills.is_empty()).to_string(),
                coverage,
            },
            result,
            insights,
            guidance: Vec::new(),
            metadata,
        }
    }

    pub fn with_guidance(mut self, guidance: Vec<GuidanceNote>) -> Self {
        self.guidance = guidance;
        self
    }
}

impl ReportMetadata {
    pub fn new(resume_file: &str, job_file: &str) -> Self {
        Self {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.to_string(),
            job_file: job_file.to_string(),
            profile_file: None,
            processing_time_ms: 0,
            catalog_entries: 0,
        }
    }
}

impl ExtractionReport {
    pub fn new(file: &str, skills: SkillSet, findings: Vec<SkillFinding>) -> Self {
        Self {
            file: file.to_string(),
            skills,
            findings,
            generated_at: Utc::now(),
        }
    }
}

fn verdict(level: MatchLevel, no_jd_skills: bool) -> &'static str {
    if no_jd_skills {
        return "No recognised skills in the job description; nothing to match against.";
    }
    match level {
        MatchLevel::Strong => "Your résumé covers the core skills this job asks for.",
        MatchLevel::Medium => "Partial fit: some core skills match, but there are clear gaps.",
        MatchLevel::Weak => "Early fit: most of the skills this job needs are not shown yet.",
    }
}
