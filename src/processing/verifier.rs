//! Verification of untrusted skill claims against document text

use crate::error::{Result, SkillMatchError};
use crate::processing::pattern::SkillRegistry;
use crate::processing::profile::ExternalSkillProfile;
use log::{debug, info};
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

/// Phrases that put a skill in a learning context; `{}` is the skill.
const LEARNING_PHRASES: &[&str] = &[
    "currently learning {}",
    "currently exploring {}",
    "learning {}",
    "exploring {}",
    "studying {}",
    "introduction to {}",
    "intro to {}",
    "basic {}",
    "basics of {}",
    "{} course",
    "{} certification",
    "{} (course)",
    "{} - course",
    "familiar with {}",
    "exposure to {}",
];

const LEARNING_SECTION_PATTERN: &str = r"\b(?:interests|courses|certifications|training|coursework)\b";
const EXPERIENCE_SECTION_PATTERN: &str =
    r"\b(?:professional experience|work experience|experience|projects|project|internship|employment)\b";

/// Chars after a learning section word that still belong to it.
const LEARNING_SECTION_REACH: usize = 1000;
/// Chars after an experience section word that still belong to it.
const EXPERIENCE_SECTION_REACH: usize = 2000;

pub struct EvidenceVerifier {
    registry: Arc<SkillRegistry>,
    learning_sections: Regex,
    experience_sections: Regex,
}

impl EvidenceVerifier {
    pub fn new(registry: Arc<SkillRegistry>) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| SkillMatchError::Configuration(format!("Failed to build section pattern: {}", e)))
        };

        Ok(Self {
            learning_sections: compile(LEARNING_SECTION_PATTERN)?,
            experience_sections: compile(EXPERIENCE_SECTION_PATTERN)?,
            registry,
        })
    }

    /// Keep the candidates that actually occur in `text`, in first-seen order
    /// and without duplicates.
    pub fn verify(&self, candidates: &[String], text: Option<&str>) -> Vec<String> {
        let Some(text) = text else {
            return Vec::new();
        };
        if candidates.is_empty() {
            return Vec::new();
        }

        let lower = text.to_lowercase();
        let mut seen = HashSet::new();
        let mut verified = Vec::new();

        for candidate in candidates {
            let skill = candidate.trim().to_lowercase();
            if skill.is_empty() || seen.contains(&skill) {
                continue;
            }
            if self.occurs(&skill, &lower) {
                seen.insert(skill.clone());
                verified.push(skill);
            } else {
                debug!("Discarding unverified skill claim '{}'", skill);
            }
        }
        verified
    }

    /// True when the only evidence for `skill` reads as coursework, interest or
    /// early learning rather than project or work usage.
    pub fn appears_only_in_learning_context(&self, skill: &str, text: &str) -> bool {
        let lower = text.to_lowercase();
        let skill = skill.trim().to_lowercase();
        if skill.is_empty() {
            return false;
        }

        if LEARNING_PHRASES
            .iter()
            .any(|phrase| lower.contains(&phrase.replace("{}", &skill)))
        {
            return true;
        }

        let occurrences = self.occurrences(&skill, &lower);
        if occurrences.is_empty() {
            return false;
        }

        let in_learning = follows_section(&self.learning_sections, &lower, &occurrences, LEARNING_SECTION_REACH);
        in_learning && !follows_section(&self.experience_sections, &lower, &occurrences, EXPERIENCE_SECTION_REACH)
    }

    /// Replace the profile's strong and weak lists with their verified subsets
    /// and demote learning-only strong skills to weak.
    pub fn verify_profile(&self, profile: &mut ExternalSkillProfile, resume_text: Option<&str>) {
        let strong = self.verify(&profile.strong_skills, resume_text);
        let mut weak = self.verify(&profile.weak_skills, resume_text);

        let strong = match resume_text {
            Some(text) if self.registry.detection().enhanced_weak_detection => {
                let mut kept = Vec::with_capacity(strong.len());
                for skill in strong {
                    if self.appears_only_in_learning_context(&skill, text) {
                        debug!("Moving '{}' from strong to weak (learning context)", skill);
                        if !weak.contains(&skill) {
                            weak.push(skill);
                        }
                    } else {
                        kept.push(skill);
                    }
                }
                kept
            }
            _ => strong,
        };

        info!("Verified external strong skills: {:?}", strong);
        info!("Verified external weak skills: {:?}", weak);
        profile.strong_skills = strong;
        profile.weak_skills = weak;
    }

    fn occurs(&self, skill: &str, lower: &str) -> bool {
        if let Some(matcher) = self.registry.matcher(skill) {
            return matcher.is_match(lower);
        }
        match self.registry.fallback_pattern(skill) {
            Some(pattern) => pattern.is_match(lower),
            None => lower.contains(skill),
        }
    }

    /// Byte offsets where `skill` starts, using the same lookup order as [`Self::verify`].
    fn occurrences(&self, skill: &str, lower: &str) -> Vec<usize> {
        if let Some(matcher) = self.registry.matcher(skill) {
            return matcher.find_iter(lower).map(|m| m.start).collect();
        }
        match self.registry.fallback_pattern(skill) {
            Some(pattern) => pattern.find_iter(lower).map(|m| m.start()).collect(),
            None => lower.match_indices(skill).map(|(at, _)| at).collect(),
        }
    }
}

/// Some occurrence starts after a section word and no more than `reach` chars past it.
fn follows_section(sections: &Regex, lower: &str, occurrences: &[usize], reach: usize) -> bool {
    sections.find_iter(lower).any(|section| {
        occurrences
            .iter()
            .filter(|&&at| at >= section.end())
            .any(|&at| lower[section.end()..at].chars().count() <= reach)
    })
}
