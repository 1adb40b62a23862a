//! career-match: deterministic résumé and job-description skill matching

use career_match::cli::{self, Cli, Commands, ConfigAction};
use career_match::config::{Config, OutputFormat};
use career_match::error::{Result, SkillMatchError};
use career_match::input::InputManager;
use career_match::output::formatter::{save_report_to_file, suggest_filename};
use career_match::output::{ExtractionReport, MatchReport, ReportGenerator, ReportMetadata};
use career_match::processing::catalog::SkillCategory;
use career_match::processing::guardrail::Insights;
use career_match::{ExternalSkillProfile, MatchEngine};
use clap::Parser;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

const INPUT_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            job,
            resume,
            profile,
            insights,
            question,
            output,
            save,
            detailed,
        } => {
            info!("Starting match analysis");

            cli::validate_file_extension(&job, INPUT_EXTENSIONS)
                .map_err(|e| SkillMatchError::InvalidInput(format!("Job description file: {}", e)))?;
            cli::validate_file_extension(&resume, INPUT_EXTENSIONS)
                .map_err(|e| SkillMatchError::InvalidInput(format!("Resume file: {}", e)))?;
            let format = resolve_format(output.as_deref(), &config)?;

            let started = Instant::now();
            let (job_text, resume_text) = InputManager::new().load_pair(&job, &resume).await?;

            let external_profile = match &profile {
                Some(path) => read_profile(path).await?,
                None => None,
            };
            let raw_insights = match &insights {
                Some(path) => read_insights(path).await?,
                None => None,
            };

            let engine = MatchEngine::from_config(config.clone())?;
            let result = engine.analyze(Some(&job_text), Some(&resume_text), external_profile);
            let reviewed = insights.as_ref().map(|_| engine.review_insights(raw_insights, &result));
            let guidance = engine.guidance(question.as_deref(), &result);

            let mut metadata = ReportMetadata::new(&resume.to_string_lossy(), &job.to_string_lossy());
            metadata.profile_file = profile.map(|p| p.to_string_lossy().to_string());
            metadata.processing_time_ms = started.elapsed().as_millis() as u64;
            metadata.catalog_entries = engine.stats().catalog_entries;
            let report = MatchReport::new(result, reviewed, metadata).with_guidance(guidance);

            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::with_options(use_colors, detailed, config.output.pretty_json);
            let rendered = generator.generate_report(&report, format)?;

            // A directory target gets a generated file name
            let save = save.map(|path| {
                if path.is_dir() {
                    path.join(suggest_filename(format, &resume.to_string_lossy(), true))
                } else {
                    path
                }
            });
            emit(&rendered, save.as_deref(), format).await?;
        }

        Commands::Extract { file, output, detailed } => {
            cli::validate_file_extension(&file, INPUT_EXTENSIONS)
                .map_err(|e| SkillMatchError::InvalidInput(format!("Input file: {}", e)))?;
            let format = resolve_format(output.as_deref(), &config)?;

            let text = InputManager::new().extract_text(&file).await?;
            let engine = MatchEngine::from_config(config.clone())?;
            let report = ExtractionReport::new(
                &file.to_string_lossy(),
                engine.extract_skills(Some(&text)),
                engine.explain(Some(&text)),
            );

            let generator = ReportGenerator::with_options(config.output.color_output, detailed, config.output.pretty_json);
            let rendered = generator.generate_extraction(&report, format)?;
            emit(&rendered, None, format).await?;
        }

        Commands::Skills { category } => {
            let engine = MatchEngine::from_config(config)?;
            let categories: Vec<SkillCategory> = match category {
                Some(name) => {
                    let category = SkillCategory::parse(&name).ok_or_else(|| {
                        SkillMatchError::InvalidInput(format!(
                            "Unknown category '{}'. Known: {}",
                            name,
                            SkillCategory::ALL.map(|c| c.as_str()).join(", ")
                        ))
                    })?;
                    vec![category]
                }
                None => SkillCategory::ALL.to_vec(),
            };

            for category in categories {
                println!("{}:", category);
                for def in engine.registry().definitions_in(category) {
                    let mut flags = Vec::new();
                    if def.defining {
                        flags.push("defining");
                    }
                    if def.background {
                        flags.push("background");
                    }
                    let alias = if def.is_synonym() {
                        format!(" -> {}", def.canonical_name)
                    } else {
                        String::new()
                    };
                    if flags.is_empty() {
                        println!("  {}{}", def.surface_form, alias);
                    } else {
                        println!("  {}{} [{}]", def.surface_form, alias, flags.join(", "));
                    }
                }
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config)
                        .map_err(|e| SkillMatchError::Configuration(format!("Failed to serialize config: {}", e)))?;
                    println!("# {}\n{}", path.display(), content);
                }
                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("Configuration reset: {}", path.display());
                }
                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn resolve_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(SkillMatchError::InvalidInput),
        None => Ok(config.output.format),
    }
}

async fn read_profile(path: &Path) -> Result<Option<ExternalSkillProfile>> {
    let raw = tokio::fs::read_to_string(path).await?;
    let profile = ExternalSkillProfile::from_llm_response(&raw);
    if profile.is_none() {
        warn!("No usable profile in {}; scoring without calibration", path.display());
    }
    Ok(profile)
}

async fn read_insights(path: &Path) -> Result<Option<Insights>> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(Insights::from_llm_response(&raw))
}

async fn emit(rendered: &str, save: Option<&Path>, format: OutputFormat) -> Result<()> {
    match save {
        Some(path) => {
            save_report_to_file(rendered, path).await?;
            info!("Report ({:?}) saved to {}", format, path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
