//! Context classification of skill mentions
//!
//! A mention is [`Evidence::Weak`] when the text around it reads like a course,
//! certificate or something the candidate is only learning, or when it sits
//! under a learning-oriented section header. The two checks are independent;
//! either one is enough.

use crate::config::DetectionConfig;
use crate::error::{Result, SkillMatchError};
use aho_corasick::AhoCorasick;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Phrases that mark a mention as certificate, course or beginner level.
pub const WEAK_SKILL_HINTS: &[&str] = &[
    // courses and certifications
    "certification",
    "certified",
    "certificate",
    "course",
    "training",
    // learning
    "introduction to",
    "intro to",
    "learning",
    "currently learning",
    "exploring",
    "currently exploring",
    "studying",
    // beginner
    "basics",
    "basic",
    "beginner",
    "foundation",
    "fundamentals",
    "familiar with",
    "exposure to",
    "working knowledge",
    // interest only
    "interested in",
    "interest in",
];

/// Headers that open a learning-oriented resume section.
pub const LEARNING_SECTION_KEYWORDS: &[&str] = &[
    "courses",
    "course",
    "certifications",
    "certification",
    "currently learning",
    "interests",
    "hobbies",
    "learning goals",
    "training",
    "coursework",
    "online courses",
    "mooc",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evidence {
    Strong,
    Weak,
}

/// Which rule classified a mention as weak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeakSignal {
    /// "currently learning python"
    HintBefore,
    /// "python basics"
    HintAfter,
    /// "learning: python"
    HintLabel,
    /// "python (course)"
    Parenthetical,
    /// "python - udemy course"
    DashedNote,
    /// hint within a few words, same sentence
    NearbyToken,
    /// under an INTERESTS / COURSES / ... header
    LearningSection,
}

fn is_sentence_boundary(c: char) -> bool {
    matches!(c, '.' | ';' | '\n' | '\r')
}

/// Byte index `chars` characters before `idx` (clamped to the start of `s`).
fn chars_before(s: &str, idx: usize, chars: usize) -> usize {
    s[..idx]
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map_or(idx, |(at, _)| at)
}

/// Byte index `chars` characters after `idx` (clamped to the end of `s`).
fn chars_after(s: &str, idx: usize, chars: usize) -> usize {
    s[idx..]
        .char_indices()
        .nth(chars)
        .map_or(s.len(), |(at, _)| idx + at)
}

/// Text around one occurrence, with the occurrence located inside it.
struct Window<'t> {
    text: &'t str,
    skill: Range<usize>,
}

impl<'t> Window<'t> {
    fn before(&self) -> &'t str {
        let text: &'t str = self.text;
        &text[..self.skill.start]
    }

    fn after(&self) -> &'t str {
        let text: &'t str = self.text;
        &text[self.skill.end..]
    }
}

pub struct ContextClassifier {
    hints: AhoCorasick,
    section_headers: AhoCorasick,
    tokens: Regex,
    detection: DetectionConfig,
}

impl ContextClassifier {
    pub fn new(detection: &DetectionConfig) -> Result<Self> {
        let hints = AhoCorasick::new(WEAK_SKILL_HINTS)
            .map_err(|e| SkillMatchError::Configuration(format!("Failed to build hint matcher: {}", e)))?;
        let section_headers = AhoCorasick::new(LEARNING_SECTION_KEYWORDS)
            .map_err(|e| SkillMatchError::Configuration(format!("Failed to build section matcher: {}", e)))?;
        let tokens = Regex::new(r"\S+")
            .map_err(|e| SkillMatchError::Configuration(format!("Failed to build tokenizer: {}", e)))?;

        Ok(Self {
            hints,
            section_headers,
            tokens,
            detection: detection.clone(),
        })
    }

    /// Classify the mention of `skill` (a lowercase surface form) starting at
    /// byte `start` of the lowercased document.
    pub fn classify(&self, lower_text: &str, skill: &str, start: usize) -> Evidence {
        match self.weak_signal(lower_text, skill, start) {
            Some(_) => Evidence::Weak,
            None => Evidence::Strong,
        }
    }

    pub fn weak_signal(&self, lower_text: &str, skill: &str, start: usize) -> Option<WeakSignal> {
        if !self.detection.enhanced_weak_detection {
            return self.legacy_signal(lower_text, skill, start);
        }

        self.proximity_signal(lower_text, skill, start).or_else(|| {
            self.in_learning_section(lower_text, start)
                .then_some(WeakSignal::LearningSection)
        })
    }

    /// Up to `radius` chars on each side of the occurrence at `start`.
    fn window<'t>(&self, text: &'t str, skill: &str, start: usize, radius: usize) -> Window<'t> {
        let end = (start + skill.len()).min(text.len());
        let from = chars_before(text, start, radius);
        let to = chars_after(text, end, radius);
        Window {
            text: &text[from..to],
            skill: start - from..end - from,
        }
    }

    /// Weak hints that occur anywhere in `window`.
    fn hints_in(&self, window: &str) -> Vec<&'static str> {
        let mut found: Vec<&'static str> = self
            .hints
            .find_overlapping_iter(window)
            .map(|m| WEAK_SKILL_HINTS[m.pattern().as_usize()])
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    fn proximity_signal(&self, text: &str, skill: &str, start: usize) -> Option<WeakSignal> {
        let window = self.window(text, skill, start, self.detection.proximity_window);
        let hints = self.hints_in(window.text);
        if hints.is_empty() {
            return None;
        }

        let (before, after) = (window.before(), window.after());
        for hint in &hints {
            if let Some(signal) = adjacent_hint(before, after, hint) {
                return Some(signal);
            }
            if before.ends_with(&format!("{}: ", hint)) || before.ends_with(&format!("{}:", hint)) {
                return Some(WeakSignal::HintLabel);
            }
            if after.starts_with(&format!(" ({}", hint)) || after.starts_with(&format!("({}", hint)) {
                return Some(WeakSignal::Parenthetical);
            }
        }
        if after.starts_with(" - ") {
            return Some(WeakSignal::DashedNote);
        }

        self.nearby_token(&window, &hints)
            .then_some(WeakSignal::NearbyToken)
    }

    /// A token holding a hint within `token_radius` tokens of the occurrence,
    /// with no sentence boundary in the gap between the two.
    fn nearby_token(&self, window: &Window<'_>, hints: &[&str]) -> bool {
        let tokens: Vec<Range<usize>> = self.tokens.find_iter(window.text).map(|m| m.range()).collect();
        let Some(first) = tokens.iter().position(|t| t.end > window.skill.start) else {
            return false;
        };
        let last = tokens
            .iter()
            .rposition(|t| t.start < window.skill.end)
            .unwrap_or(first)
            .max(first);

        let radius = self.detection.token_radius;
        let lo = first.saturating_sub(radius);
        let hi = (last + radius + 1).min(tokens.len());

        (lo..hi)
            .filter(|&i| i < first || i > last)
            .any(|i| {
                let token = &tokens[i];
                if !hints.iter().any(|h| window.text[token.clone()].contains(h)) {
                    return false;
                }
                let gap = if i < first {
                    token.end..window.skill.start
                } else {
                    window.skill.end..token.start
                };
                !window.text[gap].chars().any(is_sentence_boundary)
            })
    }

    /// A learning section header strictly before `start`, within the lookback.
    /// A keyword reads as a header when it starts a word and only spaces or
    /// tabs separate it from a colon or a line break.
    fn in_learning_section(&self, text: &str, start: usize) -> bool {
        let from = chars_before(text, start, self.detection.section_lookback);
        let before = &text[from..start];

        self.section_headers
            .find_overlapping_iter(before)
            .any(|m| {
                let at = from + m.start();
                let starts_word = text[..at].chars().next_back().map_or(true, |c| !c.is_alphanumeric());
                let follower = text[from + m.end()..].chars().find(|c| !matches!(c, ' ' | '\t'));
                starts_word && matches!(follower, Some(':') | Some('\n') | Some('\r'))
            })
    }

    fn legacy_signal(&self, text: &str, skill: &str, start: usize) -> Option<WeakSignal> {
        let window = self.window(text, skill, start, self.detection.legacy_window);
        self.hints_in(window.text)
            .into_iter()
            .find_map(|hint| adjacent_hint(window.before(), window.after(), hint))
    }
}

/// `hint` directly before or directly after the occurrence.
fn adjacent_hint(before: &str, after: &str, hint: &str) -> Option<WeakSignal> {
    if before.ends_with(&format!("{} ", hint)) {
        Some(WeakSignal::HintBefore)
    } else if after.starts_with(&format!(" {}", hint)) {
        Some(WeakSignal::HintAfter)
    } else {
        None
    }
}
