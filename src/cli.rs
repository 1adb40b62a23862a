//! CLI interface for career-match

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "career-match")]
#[command(about = "Deterministic skill extraction and resume/job match scoring")]
#[command(
    long_about = "Extract recognised skills from a job description and a resume, score how well they match, \
                  and optionally calibrate the score with an externally produced skill profile"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Analyze {
        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Path to resume file (TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Raw model response holding an external skill profile (JSON, optionally fenced)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Raw model response holding coaching insights to sanitise
        #[arg(short, long)]
        insights: Option<PathBuf>,

        /// Career question used to pick guidance (e.g. "how do I get into devops?")
        #[arg(short, long)]
        question: Option<String>,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include full skill sets and the verified profile
        #[arg(short, long)]
        detailed: bool,
    },

    /// Print the skills recognised in one file
    Extract {
        /// Path to a TXT or MD file
        file: PathBuf,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,

        /// Show evidence for every catalog entry found
        #[arg(short, long)]
        detailed: bool,
    },

    /// List the skill catalog
    Skills {
        /// Only show one category (e.g. language, data-tool)
        #[arg(long)]
        category: Option<String>,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" | "text" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from([
            "career-match", "analyze", "--job", "job.txt", "--resume", "cv.md", "--output", "json", "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze { job, resume, profile, output, .. } => {
                assert_eq!(job, PathBuf::from("job.txt"));
                assert_eq!(resume, PathBuf::from("cv.md"));
                assert!(profile.is_none());
                assert_eq!(output.as_deref(), Some("json"));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("console"), Ok(OutputFormat::Console));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("a.TXT"), &["txt", "md"]).is_ok());
        assert!(validate_file_extension(Path::new("a.pdf"), &["txt", "md"]).is_err());
        assert!(validate_file_extension(Path::new("noext"), &["txt"]).is_err());
    }
}
