//! Guardrail for externally generated coaching text
//!
//! Strength sentences and summaries come from a language model and may claim
//! skills the résumé does not show. Anything that names a missing skill is
//! removed or replaced here; nothing is generated beyond fixed fallback text.

use crate::processing::profile::{extract_json_object, scalar_to_string};
use crate::processing::scoring::MatchLevel;
use log::{debug, error, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const STRONG_SUMMARY: &str = "You are a strong overall fit for this job based on your current skills, \
with a few areas you can still refine to stand out even more.";
const MEDIUM_SUMMARY: &str = "You are a partial fit for this job: some of your skills match well, \
but there are also important gaps you should work on next.";
const WEAK_SUMMARY: &str = "You are still early for this job: you have some useful skills, \
but you will need to build several key skills to become a stronger match.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl Insights {
    /// Parse a raw model reply. `gaps` and `nextSteps` are preferred over the
    /// older `areasForImprovement` and `recommendations` keys.
    pub fn from_llm_response(raw: &str) -> Option<Self> {
        let Some(json) = extract_json_object(raw) else {
            error!("Insights: no JSON object found in response");
            return None;
        };
        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                error!("Insights: invalid JSON ({})", e);
                return None;
            }
        };
        let object = value.as_object()?;

        let summary = object
            .get("summary")
            .and_then(scalar_to_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Some(Self {
            summary,
            strengths: sentences(object, &["strengths"]),
            areas_for_improvement: sentences(object, &["gaps", "areasForImprovement"]),
            recommendations: sentences(object, &["nextSteps", "recommendations"]),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty() && self.areas_for_improvement.is_empty() && self.recommendations.is_empty()
    }

    /// Deterministic coaching text for when no usable insights were produced.
    pub fn fallback(matched: &[String], missing: &[String]) -> Self {
        let strength = if matched.is_empty() {
            "You already have a useful base of skills that you can build on for this role.".to_string()
        } else {
            format!("You already have useful skills such as {}.", matched.join(", "))
        };
        let area = if missing.is_empty() {
            "You can still refine your resume layout and highlight your most relevant projects more clearly."
                .to_string()
        } else {
            format!(
                "You can focus on building skills in {} to better match this job.",
                missing.join(", ")
            )
        };

        Self {
            summary: None,
            strengths: vec![strength],
            areas_for_improvement: vec![area],
            recommendations: vec![
                "Update your resume to highlight your matched skills clearly in a projects or skills section."
                    .to_string(),
                "Start a small project or course to learn one or two of the missing or less visible skills \
                 and add them to your resume."
                    .to_string(),
            ],
        }
    }
}

/// Keeps the first listed key that holds a non-empty sentence list.
fn sentences(object: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .map(|key| match object.get(*key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(scalar_to_string)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        })
        .find(|list: &Vec<String>| !list.is_empty())
        .unwrap_or_default()
}

struct ForbiddenSkill {
    name: String,
    pattern: Option<Regex>,
}

impl ForbiddenSkill {
    fn new(name: String) -> Self {
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&name))).ok();
        Self { name, pattern }
    }

    fn mentioned_in(&self, lower: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(lower),
            None => lower.contains(&self.name),
        }
    }
}

pub fn generic_summary(level: MatchLevel) -> &'static str {
    match level {
        MatchLevel::Strong => STRONG_SUMMARY,
        MatchLevel::Medium => MEDIUM_SUMMARY,
        MatchLevel::Weak => WEAK_SUMMARY,
    }
}

/// Remove strength sentences that claim a missing skill and replace a summary
/// that names one with a generic summary for `level`.
pub fn sanitize_insights<I>(insights: &mut Insights, missing: I, level: MatchLevel)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let forbidden: Vec<ForbiddenSkill> = missing
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .map(ForbiddenSkill::new)
        .collect();

    let mentions_missing = |text: &str| {
        let lower = text.to_lowercase();
        forbidden.iter().any(|skill| skill.mentioned_in(&lower))
    };

    let before = insights.strengths.len();
    insights
        .strengths
        .retain(|sentence| !sentence.trim().is_empty() && !mentions_missing(sentence));
    if insights.strengths.len() != before {
        debug!(
            "Guardrail removed {} strength sentence(s)",
            before - insights.strengths.len()
        );
    }

    if forbidden.is_empty() {
        return;
    }
    if let Some(summary) = insights.summary.as_mut() {
        if !summary.trim().is_empty() && mentions_missing(summary) {
            info!("Guardrail replaced a summary that claimed a missing skill");
            *summary = generic_summary(level).to_string();
        }
    }
}
