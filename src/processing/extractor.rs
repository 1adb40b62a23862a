//! Deterministic skill extraction from free text

use crate::error::Result;
use crate::processing::context::{ContextClassifier, Evidence, WeakSignal};
use crate::processing::pattern::{CompiledMatcher, SkillRegistry};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Canonical skill names recognised in one document.
pub type SkillSet = BTreeSet<String>;

/// How one catalog entry showed up in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFinding {
    pub canonical_name: String,
    pub surface_form: String,
    pub evidence: Evidence,
    /// Byte offset of the first strong mention, or of the first mention when all are weak.
    pub offset: usize,
    pub weak_signal: Option<WeakSignal>,
}

pub struct SkillExtractor {
    registry: Arc<SkillRegistry>,
    classifier: ContextClassifier,
}

impl SkillExtractor {
    pub fn new(registry: Arc<SkillRegistry>) -> Result<Self> {
        let classifier = ContextClassifier::new(registry.detection())?;
        Ok(Self { registry, classifier })
    }

    pub fn registry(&self) -> &Arc<SkillRegistry> {
        &self.registry
    }

    /// Extract the canonical names of every skill with at least one strong
    /// mention, with subsumed skills removed. Blank input yields an empty set.
    pub fn extract(&self, text: Option<&str>) -> SkillSet {
        let Some(lower) = self.prepare(text) else {
            return SkillSet::new();
        };

        let found: SkillSet = self
            .registry
            .matchers()
            .iter()
            .filter_map(|matcher| self.first_strong(matcher, &lower))
            .collect();

        let skills = self.remove_subsumed(&found);
        debug!("Extracted {} skills ({} before subsumption)", skills.len(), found.len());
        skills
    }

    /// Every catalog entry that occurs in the text, strong or weak.
    pub fn findings(&self, text: Option<&str>) -> Vec<SkillFinding> {
        let Some(lower) = self.prepare(text) else {
            return Vec::new();
        };

        self.registry
            .matchers()
            .iter()
            .filter_map(|matcher| self.scan(matcher, &lower))
            .collect()
    }

    /// Drop `shorter` whenever its own matcher fires inside the canonical
    /// name of another retained skill ("spring" inside "spring boot").
    pub fn remove_subsumed(&self, skills: &SkillSet) -> SkillSet {
        skills
            .iter()
            .filter(|shorter| {
                let Some(matcher) = self.registry.matcher(shorter) else {
                    return true;
                };
                let subsumed = skills.iter().any(|longer| {
                    longer != *shorter && longer.contains(shorter.as_str()) && matcher.is_match(longer)
                });
                if subsumed {
                    debug!("Dropping '{}' (subsumed by a longer skill)", shorter);
                }
                !subsumed
            })
            .cloned()
            .collect()
    }

    fn first_strong(&self, matcher: &CompiledMatcher, lower: &str) -> Option<String> {
        matcher
            .find_iter(lower)
            .find(|m| self.classifier.classify(lower, matcher.surface_form(), m.start) == Evidence::Strong)
            .map(|m| m.canonical_name.to_string())
    }

    fn scan(&self, matcher: &CompiledMatcher, lower: &str) -> Option<SkillFinding> {
        let mut first_weak: Option<SkillFinding> = None;

        for mention in matcher.find_iter(lower) {
            match self.classifier.weak_signal(lower, matcher.surface_form(), mention.start) {
                None => {
                    return Some(SkillFinding {
                        canonical_name: mention.canonical_name.to_string(),
                        surface_form: matcher.surface_form().to_string(),
                        evidence: Evidence::Strong,
                        offset: mention.start,
                        weak_signal: None,
                    })
                }
                Some(signal) if first_weak.is_none() => {
                    first_weak = Some(SkillFinding {
                        canonical_name: mention.canonical_name.to_string(),
                        surface_form: matcher.surface_form().to_string(),
                        evidence: Evidence::Weak,
                        offset: mention.start,
                        weak_signal: Some(signal),
                    });
                }
                Some(_) => {}
            }
        }
        first_weak
    }

    /// Lowercase and bound the input; `None` for absent or blank text.
    fn prepare(&self, text: Option<&str>) -> Option<String> {
        let text = text?;
        if text.trim().is_empty() {
            return None;
        }

        let max_chars = self.registry.detection().max_text_length;
        let bounded = match text.char_indices().nth(max_chars) {
            Some((cut, _)) => {
                warn!("Input truncated to {} characters before extraction", max_chars);
                &text[..cut]
            }
            None => text,
        };
        Some(bounded.to_lowercase())
    }
}
