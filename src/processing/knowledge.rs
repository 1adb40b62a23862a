//! Built-in career guidance snippets and keyword-scored retrieval

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Snippets returned per lookup.
const MAX_SNIPPETS: usize = 3;

const QUESTION_WEIGHT: u32 = 3;
const ROLE_WEIGHT: u32 = 2;
const MISSING_SKILL_WEIGHT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeSnippet {
    pub id: &'static str,
    pub topic: &'static str,
    pub category: &'static str,
    pub keywords: &'static [&'static str],
    pub advice: &'static str,
}

/// A snippet as carried in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceNote {
    pub id: String,
    pub topic: String,
    pub advice: String,
}

impl From<&KnowledgeSnippet> for GuidanceNote {
    fn from(snippet: &KnowledgeSnippet) -> Self {
        Self {
            id: snippet.id.to_string(),
            topic: snippet.topic.to_string(),
            advice: snippet.advice.to_string(),
        }
    }
}

const SNIPPETS: &[KnowledgeSnippet] = &[
    KnowledgeSnippet {
        id: "resume-quantify",
        topic: "Write stronger resume bullets",
        category: "resume",
        keywords: &["resume", "achievements", "experience"],
        advice: "Lead each bullet with an action verb and a measurable result: time saved, \
                 users served or errors removed. Scope and tools matter even for student projects.",
    },
    KnowledgeSnippet {
        id: "java-backend-roadmap",
        topic: "Java backend developer roadmap",
        category: "skills",
        keywords: &["java", "spring", "backend", "rest"],
        advice: "Get comfortable with core Java (collections, exceptions, concurrency), then build \
                 REST APIs in Spring Boot with validation, error handling and a real database behind them.",
    },
    KnowledgeSnippet {
        id: "cloud-gap",
        topic: "Closing cloud and DevOps gaps",
        category: "skills",
        keywords: &["aws", "docker", "kubernetes", "cloud", "devops"],
        advice: "Containerise one of your projects with Docker and deploy it to a free cloud tier. \
                 A working deployment link says more than a list of services.",
    },
    KnowledgeSnippet {
        id: "fullstack-roadmap",
        topic: "Fullstack developer roadmap",
        category: "skills",
        keywords: &["fullstack", "frontend", "backend", "react", "spring"],
        advice: "Pair one frontend framework with one backend stack and ship a small app end to end, \
                 including authentication and persistence.",
    },
    KnowledgeSnippet {
        id: "testing-career-overview",
        topic: "Software testing and QA path",
        category: "skills",
        keywords: &["testing", "qa", "manual testing", "automation"],
        advice: "Learn to write clear test cases first, then automate a few of them with a framework \
                 such as Selenium or JUnit and show the suite in a repository.",
    },
    KnowledgeSnippet {
        id: "data-analyst-roadmap",
        topic: "Data analyst roadmap",
        category: "skills",
        keywords: &["data analyst", "excel", "sql", "power bi", "tableau"],
        advice: "Excel and SQL come first. Then build one dashboard in Power BI or Tableau on a public \
                 dataset and write down the questions it answers.",
    },
    KnowledgeSnippet {
        id: "business-analyst-overview",
        topic: "Business analyst skills and path",
        category: "skills",
        keywords: &["business analyst", "requirements", "stakeholder", "process"],
        advice: "Practise turning a vague request into written requirements and a simple process diagram. \
                 Show how you handled conflicting stakeholder needs.",
    },
    KnowledgeSnippet {
        id: "sales-marketing-entry",
        topic: "Starting in sales and marketing",
        category: "skills",
        keywords: &["sales", "marketing", "b2b", "b2c", "crm"],
        advice: "Quantify anything persuasive you have done: events filled, leads contacted, conversion \
                 numbers. Basic CRM familiarity is an easy win to add.",
    },
    KnowledgeSnippet {
        id: "git-workflow-basics",
        topic: "Git and GitHub workflow",
        category: "skills",
        keywords: &["git", "github", "version control", "branches"],
        advice: "Use feature branches, small commits and pull requests even on solo projects so the \
                 history shows how you work.",
    },
    KnowledgeSnippet {
        id: "debugging-mindset",
        topic: "A systematic debugging mindset",
        category: "skills",
        keywords: &["debugging", "bug fixing", "problem solving"],
        advice: "Reproduce first, then narrow the cause with logs or a debugger before changing code. \
                 Interviewers listen for that order.",
    },
    KnowledgeSnippet {
        id: "code-review-basics",
        topic: "Giving and receiving code review",
        category: "skills",
        keywords: &["code review", "teamwork", "collaboration"],
        advice: "Review for correctness and readability, phrase comments as questions and respond to \
                 feedback with changes rather than defence.",
    },
    KnowledgeSnippet {
        id: "dsa-prep-plan",
        topic: "DSA preparation plan",
        category: "skills",
        keywords: &["dsa", "data structures", "algorithms", "coding interview"],
        advice: "Cover arrays, strings, hashing, trees and graphs in that order, a few problems a day, \
                 and explain each solution out loud.",
    },
    KnowledgeSnippet {
        id: "sql-still-mandatory",
        topic: "SQL remains mandatory for backend roles",
        category: "industry-update",
        keywords: &["sql", "database", "backend"],
        advice: "Expect joins, grouping and indexing questions. Keep a project where you designed the \
                 schema yourself.",
    },
    KnowledgeSnippet {
        id: "devops-lite",
        topic: "DevOps basics expected from developers",
        category: "industry-update",
        keywords: &["devops", "docker", "ci cd"],
        advice: "A Dockerfile and a CI pipeline that runs your tests on every push are now baseline \
                 expectations, not extras.",
    },
    KnowledgeSnippet {
        id: "communication-over-buzzwords",
        topic: "Communication valued over buzzwords",
        category: "industry-update",
        keywords: &["communication", "interview", "resume"],
        advice: "Explain one project clearly from problem to outcome. Plain language beats a long \
                 list of tools.",
    },
    KnowledgeSnippet {
        id: "interview-prep",
        topic: "Interview preparation structure",
        category: "interview",
        keywords: &["interview", "preparation", "behavioral"],
        advice: "Prepare three project stories with the situation, your action and the result, and \
                 rehearse the fundamentals of your main language.",
    },
    KnowledgeSnippet {
        id: "portfolio-over-marks",
        topic: "Portfolio valued over academic marks",
        category: "industry-update",
        keywords: &["portfolio", "projects", "fresher"],
        advice: "Two finished, documented projects with a README and a demo outweigh a long list of \
                 half-built ones.",
    },
    KnowledgeSnippet {
        id: "job-search-strategy",
        topic: "Practical job search strategy",
        category: "job-search",
        keywords: &["job search", "applications", "networking", "referrals"],
        advice: "Tailor fewer applications well, track them in a sheet and ask for referrals from \
                 people who have seen your work.",
    },
];

/// The built-in snippet table.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeBase {
    snippets: &'static [KnowledgeSnippet],
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self { snippets: SNIPPETS }
    }
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snippets(&self) -> &'static [KnowledgeSnippet] {
        self.snippets
    }

    /// Up to three snippets with a positive score, best first. Ties keep
    /// table order.
    pub fn relevant<I>(&self, question: Option<&str>, missing_skills: I, role_focus: Option<&str>) -> Vec<&'static KnowledgeSnippet>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let question = question.unwrap_or_default().to_lowercase();
        let role = role_focus.unwrap_or_default().to_lowercase();
        let missing: BTreeSet<String> = missing_skills
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let mut scored: Vec<(u32, &'static KnowledgeSnippet)> = self
            .snippets
            .iter()
            .map(|snippet| (score(snippet, &question, &role, &missing), snippet))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored.into_iter().take(MAX_SNIPPETS).map(|(_, snippet)| snippet).collect()
    }
}

fn score(snippet: &KnowledgeSnippet, question: &str, role: &str, missing: &BTreeSet<String>) -> u32 {
    snippet
        .keywords
        .iter()
        .map(|keyword| {
            let mut points = 0;
            if question.contains(keyword) {
                points += QUESTION_WEIGHT;
            }
            if role.contains(keyword) {
                points += ROLE_WEIGHT;
            }
            let overlaps = missing
                .iter()
                .filter(|skill| skill.contains(keyword) || keyword.contains(skill.as_str()))
                .count() as u32;
            points + overlaps * MISSING_SKILL_WEIGHT
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(snippets: &[&KnowledgeSnippet]) -> Vec<&'static str> {
        snippets.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_ids_are_unique() {
        let kb = KnowledgeBase::new();
        let unique: BTreeSet<&str> = kb.snippets().iter().map(|s| s.id).collect();
        assert_eq!(unique.len(), kb.snippets().len());
    }

    #[test]
    fn test_nothing_to_go_on_returns_nothing() {
        let kb = KnowledgeBase::new();
        assert!(kb.relevant(None, Vec::<String>::new(), None).is_empty());
        assert!(kb.relevant(Some("   "), ["", "  "], Some("")).is_empty());
    }

    #[test]
    fn test_missing_skills_outweigh_role() {
        let kb = KnowledgeBase::new();
        let found = kb.relevant(None, ["Kubernetes"], Some("backend"));
        // kubernetes: cloud-gap 4; backend role: java-backend-roadmap, fullstack-roadmap, sql-still-mandatory 2 each
        assert_eq!(ids(&found), vec!["cloud-gap", "java-backend-roadmap", "fullstack-roadmap"]);
    }

    #[test]
    fn test_question_keywords_score() {
        let kb = KnowledgeBase::new();
        let found = kb.relevant(Some("How do I prepare for a behavioral interview?"), Vec::<String>::new(), None);
        assert_eq!(found[0].id, "interview-prep");
        assert!(found.len() <= MAX_SNIPPETS);
    }

    #[test]
    fn test_overlap_works_both_ways() {
        let kb = KnowledgeBase::new();
        // matches "manual testing" exactly and contains "testing"
        let found = kb.relevant(None, ["manual testing"], None);
        assert_eq!(found[0].id, "testing-career-overview");
        assert_eq!(score(&found[0], "", "", &["manual testing".to_string()].into()), 8);
    }
}
