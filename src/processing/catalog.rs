//! Built-in skill catalog and synonym table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse grouping of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillCategory {
    Language,
    Framework,
    DataTool,
    DevTool,
    BusinessTool,
    Domain,
    Fundamental,
    SoftSkill,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 8] = [
        SkillCategory::Language,
        SkillCategory::Framework,
        SkillCategory::DataTool,
        SkillCategory::DevTool,
        SkillCategory::BusinessTool,
        SkillCategory::Domain,
        SkillCategory::Fundamental,
        SkillCategory::SoftSkill,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Language => "language",
            SkillCategory::Framework => "framework",
            SkillCategory::DataTool => "data-tool",
            SkillCategory::DevTool => "dev-tool",
            SkillCategory::BusinessTool => "business-tool",
            SkillCategory::Domain => "domain",
            SkillCategory::Fundamental => "fundamental",
            SkillCategory::SoftSkill => "soft-skill",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recognised surface form and how it scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub surface_form: String,
    pub canonical_name: String,
    pub category: SkillCategory,
    /// Role-critical skill; drives the key-skill cap.
    pub defining: bool,
    /// Signals related background; drives the zero-overlap baseline.
    pub background: bool,
}

impl SkillDefinition {
    pub fn is_language(&self) -> bool {
        self.category == SkillCategory::Language
    }

    pub fn is_synonym(&self) -> bool {
        self.surface_form != self.canonical_name
    }
}

use SkillCategory::*;

const D: bool = true;
const B: bool = true;
const N: bool = false;

/// (surface form, category, defining, background)
const BUILTIN_SKILLS: &[(&str, SkillCategory, bool, bool)] = &[
    // programming languages
    ("java", Language, D, N),
    ("python", Language, D, N),
    ("javascript", Language, D, B),
    ("typescript", Language, D, N),
    ("c", Language, N, N),
    ("c programming", Language, N, N),
    ("c++", Language, D, N),
    ("c#", Language, D, N),
    ("go", Language, D, N),
    ("golang", Language, D, N),
    ("ruby", Language, N, N),
    ("kotlin", Language, N, N),
    ("swift", Language, N, N),
    ("php", Language, N, N),
    // backend
    ("spring", Framework, D, N),
    ("spring boot", Framework, D, N),
    ("django", Framework, D, N),
    ("flask", Framework, D, N),
    ("node.js", Framework, D, N),
    ("node js", Framework, D, N),
    // frontend
    ("html", Framework, N, B),
    ("css", Framework, N, B),
    ("react", Framework, D, N),
    ("react.js", Framework, D, N),
    ("angular", Framework, D, N),
    ("vue", Framework, D, N),
    ("bootstrap", Framework, N, N),
    ("redux", Framework, N, N),
    ("next.js", Framework, N, N),
    ("jest", Framework, N, N),
    ("unit testing", Fundamental, N, N),
    // databases
    ("sql", DataTool, D, N),
    ("mysql", DataTool, D, N),
    ("postgresql", DataTool, D, N),
    ("oracle", DataTool, D, N),
    ("mongodb", DataTool, D, N),
    // cloud and tooling
    ("git", DevTool, N, B),
    ("github", DevTool, N, B),
    ("docker", DevTool, N, N),
    ("aws", DevTool, N, N),
    ("azure", DevTool, N, N),
    ("gcp", DevTool, N, N),
    // analytics
    ("excel", DataTool, D, B),
    ("power bi", DataTool, D, N),
    ("tableau", DataTool, D, N),
    ("data analysis", Domain, D, N),
    ("data analyst", Domain, D, N),
    ("business analyst", Domain, D, N),
    ("business analysis", Domain, D, N),
    ("requirements gathering", Domain, N, B),
    ("requirement gathering", Domain, N, B),
    ("stakeholder management", Domain, N, B),
    // office
    ("ms office", BusinessTool, N, B),
    ("microsoft office", BusinessTool, N, B),
    ("word", BusinessTool, N, N),
    ("powerpoint", BusinessTool, N, N),
    // sales and marketing
    ("sales", Domain, D, N),
    ("marketing", Domain, D, N),
    ("crm", BusinessTool, D, N),
    ("customer relationship", Domain, N, B),
    ("business development", Domain, D, N),
    ("b2b", Domain, N, N),
    ("b2c", Domain, N, N),
    // fundamentals
    ("oops", Fundamental, N, B),
    ("object oriented programming", Fundamental, N, B),
    ("data structures", Fundamental, N, B),
    ("algorithms", Fundamental, N, B),
    ("dsa", Fundamental, N, B),
    // soft skills
    ("communication", SoftSkill, N, B),
    ("teamwork", SoftSkill, N, B),
    ("leadership", SoftSkill, N, B),
    ("problem solving", SoftSkill, N, B),
    ("analytical thinking", SoftSkill, N, B),
    ("presentation", SoftSkill, N, B),
];

/// Synonym → canonical name. Surface forms not listed are their own canonical name.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("golang", "go"),
    ("node js", "node.js"),
    ("microsoft office", "ms office"),
    ("react.js", "react"),
    ("requirement gathering", "requirements gathering"),
    ("business analyst", "business analysis"),
    ("data analyst", "data analysis"),
    ("c programming", "c"),
];

pub fn canonical_for(surface_form: &str) -> &str {
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == surface_form)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(surface_form)
}

/// The curated catalog as owned definitions, in authoring order.
pub fn builtin_definitions() -> Vec<SkillDefinition> {
    BUILTIN_SKILLS
        .iter()
        .map(|&(surface, category, defining, background)| SkillDefinition {
            surface_form: surface.to_string(),
            canonical_name: canonical_for(surface).to_string(),
            category,
            defining,
            background,
        })
        .collect()
}
