//! Compiled skill matchers and the shared, read-only skill registry

use crate::config::{Config, CustomSkill, DetectionConfig};
use crate::error::{Result, SkillMatchError};
use crate::processing::catalog::{builtin_definitions, SkillCategory, SkillDefinition};
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// How a surface form is delimited from the surrounding text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Ends in `+` or `#`; `\b` does not apply next to the symbol.
    Symbolic,
    /// The single letter `c`, which must not be the head of `c++` or `c#`.
    BareLetter,
    /// Contains a space or a dot.
    Phrase,
    /// Plain `\bword\b`.
    Word,
}

impl MatchMode {
    pub fn for_surface(surface_form: &str) -> Self {
        if surface_form.ends_with('+') || surface_form.ends_with('#') {
            MatchMode::Symbolic
        } else if surface_form == "c" {
            MatchMode::BareLetter
        } else if surface_form.contains(' ') || surface_form.contains('.') {
            MatchMode::Phrase
        } else {
            MatchMode::Word
        }
    }
}

fn is_symbol_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | ',' | ';' | ')' | '(' | '/')
}

fn is_phrase_lead(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | '/')
}

fn is_phrase_trail(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | ',' | ';' | ')' | '/')
}

/// A raw match of one catalog entry inside a lowercased document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillMention<'a> {
    pub canonical_name: &'a str,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    definition: SkillDefinition,
    mode: MatchMode,
    regex: Regex,
}

impl CompiledMatcher {
    pub fn compile(definition: SkillDefinition) -> Result<Self> {
        let surface = definition.surface_form.as_str();
        if surface.trim().is_empty() {
            return Err(invalid(surface, "surface form is empty"));
        }
        if surface != surface.trim() {
            return Err(invalid(surface, "surface form has surrounding whitespace"));
        }
        if surface != surface.to_lowercase() {
            return Err(invalid(surface, "surface forms must be lowercase"));
        }

        let mode = MatchMode::for_surface(surface);
        let pattern = match mode {
            MatchMode::Symbolic | MatchMode::Phrase => regex::escape(surface),
            MatchMode::BareLetter | MatchMode::Word => format!(r"\b{}\b", regex::escape(surface)),
        };
        let regex = Regex::new(&pattern).map_err(|e| invalid(surface, &e.to_string()))?;

        Ok(Self {
            definition,
            mode,
            regex,
        })
    }

    pub fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    pub fn surface_form(&self) -> &str {
        &self.definition.surface_form
    }

    pub fn canonical_name(&self) -> &str {
        &self.definition.canonical_name
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Lazily yields every accepted occurrence in `text`, left to right.
    pub fn find_iter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = SkillMention<'a>> + 'a {
        self.regex
            .find_iter(text)
            .filter(move |m| self.accepts(text, m.start(), m.end()))
            .map(move |m| SkillMention {
                canonical_name: &self.definition.canonical_name,
                start: m.start(),
                end: m.end(),
            })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.find_iter(text).next().is_some()
    }

    fn accepts(&self, text: &str, start: usize, end: usize) -> bool {
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();

        match self.mode {
            MatchMode::Symbolic => {
                before.map_or(true, is_symbol_boundary) && after.map_or(true, is_symbol_boundary)
            }
            MatchMode::BareLetter => !matches!(after, Some('+') | Some('#')),
            MatchMode::Phrase => before.map_or(true, is_phrase_lead) && after.map_or(true, is_phrase_trail),
            MatchMode::Word => true,
        }
    }
}

fn invalid(surface_form: &str, reason: &str) -> SkillMatchError {
    SkillMatchError::InvalidCatalogEntry {
        surface_form: surface_form.to_string(),
        reason: reason.to_string(),
    }
}

/// Every compiled matcher plus the detection tunables, built once at start-up
/// and shared by reference across extractions.
#[derive(Debug)]
pub struct SkillRegistry {
    matchers: Vec<CompiledMatcher>,
    by_surface: HashMap<String, usize>,
    detection: DetectionConfig,
    // `None` records a candidate that could not be compiled.
    fallback_patterns: RwLock<HashMap<String, Option<Regex>>>,
}

impl SkillRegistry {
    /// Create a registry over the built-in catalog
    pub fn new(detection: DetectionConfig) -> Result<Self> {
        Self::with_custom_skills(detection, &[])
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_custom_skills(config.detection.clone(), &config.catalog.custom_skills)
    }

    /// Create a registry with site-specific skills appended to the catalog
    pub fn with_custom_skills(detection: DetectionConfig, custom: &[CustomSkill]) -> Result<Self> {
        let mut definitions = builtin_definitions();

        for skill in custom {
            let surface_form = skill.surface_form.trim().to_lowercase();
            let canonical_name = skill
                .canonical_name
                .as_deref()
                .map(|c| c.trim().to_lowercase())
                .unwrap_or_else(|| surface_form.clone());

            if definitions.iter().any(|d| d.surface_form == surface_form) {
                return Err(invalid(&surface_form, "duplicate surface form"));
            }
            if canonical_name != surface_form
                && !definitions
                    .iter()
                    .any(|d| d.surface_form == canonical_name && !d.is_synonym())
            {
                return Err(invalid(
                    &surface_form,
                    &format!("canonical name '{}' is not a canonical catalog entry", canonical_name),
                ));
            }

            definitions.push(SkillDefinition {
                surface_form,
                canonical_name,
                category: skill.category,
                defining: skill.defining,
                background: skill.background,
            });
        }

        let mut matchers = Vec::with_capacity(definitions.len());
        let mut by_surface = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            let matcher = CompiledMatcher::compile(definition)?;
            by_surface.insert(matcher.surface_form().to_string(), matchers.len());
            matchers.push(matcher);
        }

        debug!("Compiled {} skill matchers ({} custom)", matchers.len(), custom.len());

        Ok(Self {
            matchers,
            by_surface,
            detection,
            fallback_patterns: RwLock::new(HashMap::new()),
        })
    }

    pub fn matchers(&self) -> &[CompiledMatcher] {
        &self.matchers
    }

    pub fn detection(&self) -> &DetectionConfig {
        &self.detection
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Matcher for an exact (lowercase) surface form
    pub fn matcher(&self, surface_form: &str) -> Option<&CompiledMatcher> {
        self.by_surface.get(surface_form).map(|&idx| &self.matchers[idx])
    }

    pub fn definition(&self, surface_form: &str) -> Option<&SkillDefinition> {
        self.matcher(surface_form).map(|m| m.definition())
    }

    /// Canonical name for any skill name; unknown names are only normalised.
    pub fn canonicalize(&self, name: &str) -> String {
        let normalized = name.trim().to_lowercase();
        match self.definition(&normalized) {
            Some(def) => def.canonical_name.clone(),
            None => normalized,
        }
    }

    pub fn is_language(&self, name: &str) -> bool {
        self.definition(name).is_some_and(|d| d.is_language())
    }

    pub fn is_defining(&self, name: &str) -> bool {
        self.definition(name).is_some_and(|d| d.defining)
    }

    pub fn is_background(&self, name: &str) -> bool {
        self.definition(name).is_some_and(|d| d.background)
    }

    pub fn definitions_in(&self, category: SkillCategory) -> impl Iterator<Item = &SkillDefinition> {
        self.matchers
            .iter()
            .map(|m| m.definition())
            .filter(move |d| d.category == category)
    }

    /// Cached `\bskill\b` pattern for a name outside the catalog.
    /// `None` means the name cannot be expressed as a pattern.
    pub fn fallback_pattern(&self, skill: &str) -> Option<Regex> {
        if let Some(cached) = self.read_fallbacks().get(skill) {
            return cached.clone();
        }

        let compiled = Regex::new(&format!(r"\b{}\b", regex::escape(skill))).ok();
        if compiled.is_none() {
            debug!("No word-boundary pattern for '{}', using substring match", skill);
        }
        self.write_fallbacks()
            .entry(skill.to_string())
            .or_insert(compiled)
            .clone()
    }

    pub fn cached_fallbacks(&self) -> usize {
        self.read_fallbacks().len()
    }

    fn read_fallbacks(&self) -> RwLockReadGuard<'_, HashMap<String, Option<Regex>>> {
        self.fallback_patterns
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_fallbacks(&self) -> RwLockWriteGuard<'_, HashMap<String, Option<Regex>>> {
        self.fallback_patterns
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SkillRegistry {
        SkillRegistry::new(DetectionConfig::default()).unwrap()
    }

    fn matches(registry: &SkillRegistry, surface: &str, text: &str) -> bool {
        registry.matcher(surface).unwrap().is_match(text)
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(MatchMode::for_surface("c++"), MatchMode::Symbolic);
        assert_eq!(MatchMode::for_surface("c#"), MatchMode::Symbolic);
        assert_eq!(MatchMode::for_surface("c"), MatchMode::BareLetter);
        assert_eq!(MatchMode::for_surface("node.js"), MatchMode::Phrase);
        assert_eq!(MatchMode::for_surface("spring boot"), MatchMode::Phrase);
        assert_eq!(MatchMode::for_surface("python"), MatchMode::Word);
    }

    #[test]
    fn test_bare_letter_c() {
        let r = registry();
        assert!(matches(&r, "c", "i know c for embedded work"));
        assert!(!matches(&r, "c", "i use c++ and c# daily"));
        assert!(!matches(&r, "c", "success"));
        assert!(matches(&r, "c", "languages: c, java"));
    }

    #[test]
    fn test_symbolic_boundaries() {
        let r = registry();
        assert!(matches(&r, "c++", "i use c++ and c# daily"));
        assert!(matches(&r, "c#", "(c#)"));
        assert!(matches(&r, "c++", "java/c++"));
        assert!(!matches(&r, "c++", "abc++"));
        assert!(!matches(&r, "c#", "c#x"));
    }

    #[test]
    fn test_phrase_boundaries() {
        let r = registry();
        assert!(matches(&r, "node.js", "built with node.js."));
        assert!(matches(&r, "spring boot", "java/spring boot, sql"));
        assert!(!matches(&r, "node.js", "xnode.js"));
        assert!(!matches(&r, "spring boot", "spring bootstrap"));
    }

    #[test]
    fn test_word_boundaries() {
        let r = registry();
        assert!(!matches(&r, "go", "i am ongoing with tasks"));
        assert!(matches(&r, "go", "i write go daily"));
        assert!(!matches(&r, "java", "javascript"));
    }

    #[test]
    fn test_find_iter_reports_offsets_and_canonical_name() {
        let r = registry();
        let text = "golang at work, golang at home";
        let mentions: Vec<_> = r.matcher("golang").unwrap().find_iter(text).collect();
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].canonical_name, "go");
        assert_eq!(mentions[0].start, 0);
        assert_eq!(mentions[1].start, 16);
        assert_eq!(&text[mentions[1].start..mentions[1].end], "golang");
    }

    #[test]
    fn test_registry_lookups() {
        let r = registry();
        assert_eq!(r.canonicalize("  Node JS "), "node.js");
        assert_eq!(r.canonicalize("Rust"), "rust");
        assert!(r.is_language("golang"));
        assert!(r.is_defining("spring boot"));
        assert!(!r.is_defining("communication"));
        assert!(r.is_background("git"));
        assert!(r.definitions_in(SkillCategory::SoftSkill).count() >= 6);
    }

    #[test]
    fn test_custom_skills_extend_catalog() {
        let custom = vec![
            CustomSkill {
                surface_form: "Rust".to_string(),
                canonical_name: None,
                category: SkillCategory::Language,
                defining: true,
                background: false,
            },
            CustomSkill {
                surface_form: "reactjs".to_string(),
                canonical_name: Some("react".to_string()),
                category: SkillCategory::Framework,
                defining: true,
                background: false,
            },
        ];
        let r = SkillRegistry::with_custom_skills(DetectionConfig::default(), &custom).unwrap();
        assert!(r.is_language("rust"));
        assert_eq!(r.canonicalize("reactjs"), "react");
    }

    #[test]
    fn test_invalid_custom_skills_rejected() {
        let duplicate = CustomSkill {
            surface_form: "java".to_string(),
            canonical_name: None,
            category: SkillCategory::Language,
            defining: true,
            background: false,
        };
        let err = SkillRegistry::with_custom_skills(DetectionConfig::default(), &[duplicate]).unwrap_err();
        assert!(matches!(err, SkillMatchError::InvalidCatalogEntry { .. }));

        let dangling = CustomSkill {
            surface_form: "k8s".to_string(),
            canonical_name: Some("kubernetes".to_string()),
            category: SkillCategory::DevTool,
            defining: false,
            background: false,
        };
        assert!(SkillRegistry::with_custom_skills(DetectionConfig::default(), &[dangling]).is_err());

        let empty = CustomSkill {
            surface_form: "   ".to_string(),
            canonical_name: None,
            category: SkillCategory::DevTool,
            defining: false,
            background: false,
        };
        assert!(SkillRegistry::with_custom_skills(DetectionConfig::default(), &[empty]).is_err());
    }

    #[test]
    fn test_fallback_patterns_are_cached() {
        let r = registry();
        let pattern = r.fallback_pattern("kubernetes").unwrap();
        assert!(pattern.is_match("deployed on kubernetes clusters"));
        assert!(!pattern.is_match("kuberneteses"));
        r.fallback_pattern("kubernetes");
        assert_eq!(r.cached_fallbacks(), 1);
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SkillRegistry>();
    }
}
