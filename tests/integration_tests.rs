//! Integration tests for career-match

use career_match::config::{Config, CustomSkill};
use career_match::input::InputManager;
use career_match::output::{MatchReport, ReportGenerator, ReportMetadata};
use career_match::processing::catalog::SkillCategory;
use career_match::processing::guardrail::Insights;
use career_match::{ExternalSkillProfile, MatchEngine, MatchLevel, SkillMatchError};
use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;

const RESUME_SKILLS: &[&str] = &[
    "aws",
    "docker",
    "git",
    "java",
    "node.js",
    "postgresql",
    "problem solving",
    "react",
    "spring boot",
    "sql",
];

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn engine() -> MatchEngine {
    MatchEngine::from_config(Config::default()).unwrap()
}

async fn load(path: &str) -> String {
    InputManager::new().extract_text(Path::new(path)).await.unwrap()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    assert!(text.contains("Jane Doe"));
    assert!(text.contains("Spring Boot"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let text = load("tests/fixtures/sample_resume.md").await;

    assert!(text.contains("Jane Doe"));
    assert!(text.contains("Software Engineer, Acme Payments"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_types() {
    let dir = TempDir::new().unwrap();
    let docx = dir.path().join("resume.docx");
    let pdf = dir.path().join("resume.pdf");
    tokio::fs::write(&docx, "Java").await.unwrap();
    tokio::fs::write(&pdf, "%PDF-1.4").await.unwrap();

    let mut manager = InputManager::new();
    assert!(matches!(
        manager.extract_text(&docx).await,
        Err(SkillMatchError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        manager.extract_text(&pdf).await,
        Err(SkillMatchError::UnsupportedFormat(_))
    ));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/nonexistent.txt")).await;
    assert!(matches!(result, Err(SkillMatchError::InvalidInput(_))));
}

#[tokio::test]
async fn test_resume_extraction_skips_learning_sections() {
    let text = load("tests/fixtures/sample_resume.txt").await;
    let skills = engine().extract_skills(Some(&text));

    assert_eq!(skills, set(RESUME_SKILLS));
    assert!(!skills.contains("go"));
    assert!(!skills.contains("spring"));
}

#[tokio::test]
async fn test_markdown_and_text_resumes_agree() {
    let engine = engine();
    let txt = load("tests/fixtures/sample_resume.txt").await;
    let md = load("tests/fixtures/sample_resume.md").await;

    assert_eq!(engine.extract_skills(Some(&txt)), engine.extract_skills(Some(&md)));
}

#[tokio::test]
async fn test_end_to_end_with_fixtures() {
    let engine = engine();
    let job = load("tests/fixtures/job_backend.txt").await;
    let resume = load("tests/fixtures/sample_resume.txt").await;

    let result = engine.analyze(Some(&job), Some(&resume), None);

    assert_eq!(
        result.jd_skills,
        set(&["aws", "communication", "docker", "go", "java", "postgresql", "spring boot", "sql"])
    );
    assert_eq!(result.missing_skills, vec!["communication", "go"]);
    assert_eq!(result.matched_skills.len(), 6);
    assert_eq!(result.score, 75);
    assert_eq!(result.match_level, MatchLevel::Strong);
}

#[tokio::test]
async fn test_profile_fixture_is_verified() {
    let engine = engine();
    let job = load("tests/fixtures/job_backend.txt").await;
    let resume = load("tests/fixtures/sample_resume.txt").await;
    let raw = tokio::fs::read_to_string("tests/fixtures/profile_response.txt").await.unwrap();

    let profile = ExternalSkillProfile::from_llm_response(&raw).unwrap();
    assert_eq!(profile.role_focus.as_deref(), Some("backend"));

    let result = engine.analyze(Some(&job), Some(&resume), Some(profile));
    let verified = result.verified_profile.as_ref().unwrap();

    // kafka is not in the résumé; rust is only being learned
    assert_eq!(verified.strong_skills, vec!["java", "spring boot", "sql"]);
    assert_eq!(verified.weak_skills, vec!["kubernetes", "rust"]);
    assert_eq!(result.score, 75);
    assert!(!result.calibrated);
}

#[tokio::test]
async fn test_unrelated_profile_caps_score() {
    let engine = engine();
    let job = load("tests/fixtures/job_backend.txt").await;
    let resume = load("tests/fixtures/sample_resume.txt").await;
    let profile = ExternalSkillProfile::from_llm_response(
        r#"{"jdRequiredSkills": [], "strongSkills": ["java"], "weakSkills": [], "generallyRelated": "false"}"#,
    )
    .unwrap();

    let result = engine.analyze(Some(&job), Some(&resume), Some(profile));
    assert_eq!(result.score, 35);
    assert_eq!(result.match_level, MatchLevel::Weak);
    assert!(result.calibrated);
}

#[tokio::test]
async fn test_insights_fixture_is_sanitized() {
    let engine = engine();
    let job = load("tests/fixtures/job_backend.txt").await;
    let resume = load("tests/fixtures/sample_resume.txt").await;
    let raw = tokio::fs::read_to_string("tests/fixtures/insights_response.txt").await.unwrap();

    let result = engine.analyze(Some(&job), Some(&resume), None);
    let insights = engine.review_insights(Insights::from_llm_response(&raw), &result);

    assert_eq!(insights.strengths.len(), 2);
    assert!(insights.strengths.iter().all(|s| !s.contains("Go ")));
    assert!(insights
        .summary
        .as_deref()
        .unwrap()
        .starts_with("You are a strong overall fit"));
    assert_eq!(insights.recommendations.len(), 1);
}

#[test]
fn test_backend_scenario() {
    let result = engine().analyze(
        Some("Looking for a Java backend developer with Spring Boot and SQL experience"),
        Some("Built REST APIs in Java using Spring Boot. Currently learning Docker."),
        None,
    );

    assert_eq!(result.jd_skills, set(&["java", "spring boot", "sql"]));
    assert_eq!(result.resume_skills, set(&["java", "spring boot"]));
    assert_eq!(result.score, 67);
    assert_eq!(result.match_level, MatchLevel::Medium);
}

#[tokio::test]
async fn test_custom_skills_from_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.catalog.custom_skills = vec![
        CustomSkill {
            surface_form: "kubernetes".to_string(),
            canonical_name: None,
            category: SkillCategory::DevTool,
            defining: false,
            background: false,
        },
        CustomSkill {
            surface_form: "k8s".to_string(),
            canonical_name: Some("kubernetes".to_string()),
            category: SkillCategory::DevTool,
            defining: false,
            background: false,
        },
    ];
    config.save_to(&path).unwrap();

    let engine = MatchEngine::from_config(Config::load_from(&path).unwrap()).unwrap();
    assert_eq!(engine.extract_skills(Some("Ran K8s clusters")), set(&["kubernetes"]));

    // kubernetes only sits under CERTIFICATIONS in the résumé, so it stays missing
    let job = load("tests/fixtures/job_backend.txt").await;
    let resume = load("tests/fixtures/sample_resume.txt").await;
    let result = engine.analyze(Some(&job), Some(&resume), None);
    assert!(result.missing_skills.contains(&"kubernetes".to_string()));
    assert_eq!(result.score, 67);
}

#[test]
fn test_invalid_custom_skill_is_rejected() {
    let mut config = Config::default();
    config.catalog.custom_skills.push(CustomSkill {
        surface_form: "k8s".to_string(),
        canonical_name: Some("kube".to_string()),
        category: SkillCategory::DevTool,
        defining: false,
        background: false,
    });

    match MatchEngine::from_config(config) {
        Err(SkillMatchError::InvalidCatalogEntry { surface_form, .. }) => assert_eq!(surface_form, "k8s"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("custom skill with unknown canonical name was accepted"),
    }
}

#[tokio::test]
async fn test_json_report_end_to_end() {
    let engine = engine();
    let job = load("tests/fixtures/job_backend.txt").await;
    let resume = load("tests/fixtures/sample_resume.txt").await;
    let result = engine.analyze(Some(&job), Some(&resume), None);

    let guidance = engine.guidance(None, &result);
    let report = MatchReport::new(result, None, ReportMetadata::new("sample_resume.txt", "job_backend.txt"))
        .with_guidance(guidance);
    let json = ReportGenerator::with_options(false, false, true)
        .generate_report(&report, career_match::config::OutputFormat::Json)
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["score"], 75);
    assert_eq!(value["summary"]["match_level"], "Strong Match");
    assert_eq!(value["result"]["missing_skills"], serde_json::json!(["communication", "go"]));
    let ids: Vec<&str> = value["guidance"]
        .as_array()
        .unwrap()
        .iter()
        .map(|note| note["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"communication-over-buzzwords"));
    assert!(ids.len() <= 3);
}

#[test]
fn test_question_steers_guidance() {
    let engine = engine();
    let result = engine.analyze(Some("Java developer with Docker"), Some("Built Java services"), None);
    assert_eq!(result.missing_skills, vec!["docker"]);

    let plain = engine.guidance(None, &result);
    assert_eq!(plain[0].id, "cloud-gap");

    let asked = engine.guidance(Some("Where do I start with git and github?"), &result);
    let ids: Vec<&str> = asked.iter().map(|note| note.id.as_str()).collect();
    assert_eq!(ids, vec!["git-workflow-basics", "cloud-gap", "devops-lite"]);
}
