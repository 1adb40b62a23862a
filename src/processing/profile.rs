//! Untrusted skill profile produced by an external model

use crate::error::{Result, SkillMatchError};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Skill lists and role hints returned by an external collaborator. Nothing
/// in here is trusted until it has been verified against the résumé.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSkillProfile {
    #[serde(default)]
    pub jd_required_skills: Vec<String>,
    #[serde(default)]
    pub strong_skills: Vec<String>,
    #[serde(default)]
    pub weak_skills: Vec<String>,
    #[serde(default)]
    pub role_focus: Option<String>,
    #[serde(default)]
    pub generally_related: bool,
}

impl ExternalSkillProfile {
    /// Parse a raw model reply. Markdown fences and surrounding chatter are
    /// tolerated; anything without a JSON object yields `None`.
    pub fn from_llm_response(raw: &str) -> Option<Self> {
        let Some(json) = extract_json_object(raw) else {
            error!("External profile: no JSON object found in response");
            return None;
        };

        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                error!("External profile: invalid JSON ({})", e);
                return None;
            }
        };

        let profile = Self::from_json(&value);
        if profile.is_some() {
            debug!("External profile parsed");
        }
        profile
    }

    /// Build a profile from an already parsed JSON value. Only objects qualify.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        Some(Self {
            jd_required_skills: lenient_list(object, "jdRequiredSkills"),
            strong_skills: lenient_list(object, "strongSkills"),
            weak_skills: lenient_list(object, "weakSkills"),
            role_focus: object.get("roleFocus").and_then(scalar_to_string),
            generally_related: object.get("generallyRelated").is_some_and(truthy),
        })
    }
}

/// Slice from the first `{` to the last `}` after stripping a markdown fence.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let mut cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }

    let fence = if cleaned.contains("```json") {
        Some("```json")
    } else if cleaned.contains("```") {
        Some("```")
    } else {
        None
    };
    if let Some(fence) = fence {
        if let (Some(open), Some(close)) = (cleaned.find(fence), cleaned.rfind("```")) {
            let start = open + fence.len();
            if close > start {
                cleaned = cleaned[start..close].trim();
            }
        }
    }

    let first = cleaned.find('{')?;
    let last = cleaned.rfind('}')?;
    (last > first).then(|| &cleaned[first..=last])
}

fn lenient_list(object: &Map<String, Value>, key: &str) -> Vec<String> {
    match skill_list(object, key) {
        Ok(items) => items,
        Err(e) => {
            warn!("{}; using an empty list", e);
            Vec::new()
        }
    }
}

/// Lowercased, trimmed items of an array field. Nulls are skipped.
pub fn skill_list(object: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    match object.get(key) {
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(scalar_to_string)
            .map(|s| s.to_lowercase().trim().to_string())
            .collect()),
        Some(other) => Err(SkillMatchError::MalformedExternalProfile(format!(
            "field '{}' is not a list (found {})",
            key,
            json_kind(other)
        ))),
        None => Err(SkillMatchError::MalformedExternalProfile(format!(
            "field '{}' is missing",
            key
        ))),
    }
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_fenced_response() {
        let raw = r#"Sure! Here is the profile:
```json
{
  "jdRequiredSkills": ["Java", " Spring Boot ", "SQL"],
  "strongSkills": ["java"],
  "weakSkills": ["Docker"],
  "roleFocus": "backend",
  "generallyRelated": true
}
```
Let me know if you need more."#;

        let profile = ExternalSkillProfile::from_llm_response(raw).unwrap();
        assert_eq!(profile.jd_required_skills, vec!["java", "spring boot", "sql"]);
        assert_eq!(profile.weak_skills, vec!["docker"]);
        assert_eq!(profile.role_focus.as_deref(), Some("backend"));
        assert!(profile.generally_related);
    }

    #[test]
    fn test_unusable_responses_are_absent() {
        assert!(ExternalSkillProfile::from_llm_response("").is_none());
        assert!(ExternalSkillProfile::from_llm_response("no json here").is_none());
        assert!(ExternalSkillProfile::from_llm_response("} backwards {").is_none());
        assert!(ExternalSkillProfile::from_llm_response("{ not: valid json }").is_none());
    }

    #[test]
    fn test_malformed_list_recovers_as_empty() {
        let profile = ExternalSkillProfile::from_json(&json!({
            "jdRequiredSkills": "java, sql",
            "strongSkills": ["Python", null, 3],
            "generallyRelated": "TRUE"
        }))
        .unwrap();

        assert!(profile.jd_required_skills.is_empty());
        assert!(profile.weak_skills.is_empty());
        assert_eq!(profile.strong_skills, vec!["python", "3"]);
        assert!(profile.generally_related);
    }

    #[test]
    fn test_skill_list_reports_malformed_field() {
        let object = json!({ "strongSkills": { "java": true } });
        let err = skill_list(object.as_object().unwrap(), "strongSkills").unwrap_err();
        assert!(matches!(err, SkillMatchError::MalformedExternalProfile(_)));
        assert!(err.to_string().contains("strongSkills"));
    }

    #[test]
    fn test_scalar_role_focus_and_related_flag() {
        let profile = ExternalSkillProfile::from_json(&json!({
            "roleFocus": 42,
            "generallyRelated": "nope"
        }))
        .unwrap();
        assert_eq!(profile.role_focus.as_deref(), Some("42"));
        assert!(!profile.generally_related);
    }

    #[test]
    fn test_extract_plain_fence() {
        assert_eq!(extract_json_object("```\n{\"a\": 1}\n```"), Some("{\"a\": 1}"));
        assert_eq!(extract_json_object("noise {\"a\": {}} tail"), Some("{\"a\": {}}"));
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let profile = ExternalSkillProfile {
            strong_skills: vec!["java".to_string()],
            generally_related: true,
            ..ExternalSkillProfile::default()
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["strongSkills"], json!(["java"]));
        assert_eq!(value["generallyRelated"], json!(true));
    }
}
