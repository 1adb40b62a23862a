//! Output formatters for console and JSON

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{ExtractionReport, MatchReport};
use crate::processing::context::Evidence;
use crate::processing::scoring::MatchLevel;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting reports
pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
    fn format_extraction(&self, report: &ExtractionReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Picks the formatter for a requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_level_badge(&self, level: MatchLevel) -> String {
        let color = match level {
            MatchLevel::Strong => Color::Green,
            MatchLevel::Medium => Color::Yellow,
            MatchLevel::Weak => Color::Red,
        };
        let badge = level.label().to_uppercase();

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_skill_list(&self, skills: &[String], color: Color) -> String {
        if skills.is_empty() {
            return self.colorize("(none)", Color::BrightBlack);
        }
        skills
            .iter()
            .map(|s| self.colorize(s, color))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();
        let result = &report.result;

        output.push_str(&self.format_header("SKILL MATCH ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!(
            "Resume: {} | Job: {}\n",
            report.metadata.resume_file, report.metadata.job_file
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Score: {}% {}\n",
            report.summary.score,
            self.format_level_badge(report.summary.match_level)
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(&report.summary.verdict, Color::Cyan)));
        output.push_str(&format!(
            "Coverage: {}/{} JD skills ({:.0}%)\n",
            result.matched_skills.len(),
            result.jd_skills.len(),
            report.summary.coverage * 100.0
        ));
        if result.calibrated {
            output.push_str(&format!(
                "{}\n",
                self.colorize("Score lowered by external profile calibration", Color::BrightBlack)
            ));
        }

        output.push_str(&self.format_header("Skills", 2));
        output.push_str(&format!("Matched: {}\n", self.format_skill_list(&result.matched_skills, Color::Green)));
        output.push_str(&format!("Missing: {}\n", self.format_skill_list(&result.missing_skills, Color::Red)));

        if self.detailed {
            let jd: Vec<String> = result.jd_skills.iter().cloned().collect();
            let resume: Vec<String> = result.resume_skills.iter().cloned().collect();
            output.push_str(&format!("Job description: {}\n", self.format_skill_list(&jd, Color::White)));
            output.push_str(&format!("Resume: {}\n", self.format_skill_list(&resume, Color::White)));

            if let Some(profile) = &result.verified_profile {
                output.push_str(&self.format_header("Verified External Profile", 3));
                output.push_str(&format!(
                    "Strong: {}\n",
                    self.format_skill_list(&profile.strong_skills, Color::Green)
                ));
                output.push_str(&format!(
                    "Weak: {}\n",
                    self.format_skill_list(&profile.weak_skills, Color::Yellow)
                ));
                output.push_str(&format!(
                    "Role focus: {} | Generally related: {}\n",
                    profile.role_focus.as_deref().unwrap_or("unknown"),
                    profile.generally_related
                ));
            }
        }

        if let Some(insights) = &report.insights {
            output.push_str(&self.format_header("Insights", 2));
            if let Some(summary) = &insights.summary {
                output.push_str(&format!("{} {}\n", self.colorize("Summary:", Color::Cyan), summary));
            }
            for strength in &insights.strengths {
                output.push_str(&format!("  + {}\n", self.colorize(strength, Color::Green)));
            }
            for area in &insights.areas_for_improvement {
                output.push_str(&format!("  - {}\n", self.colorize(area, Color::Yellow)));
            }
            for (i, rec) in insights.recommendations.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, rec));
            }
        }

        if !report.guidance.is_empty() {
            output.push_str(&self.format_header("Guidance", 2));
            for note in &report.guidance {
                output.push_str(&format!("  * {}\n", self.colorize(&note.topic, Color::Cyan)));
                if self.detailed {
                    output.push_str(&format!("    {}\n", note.advice));
                }
            }
        }

        output.push_str(&format!(
            "\n{} career-match v{} | {} catalog entries\n",
            self.colorize("i", Color::Blue),
            report.metadata.version,
            report.metadata.catalog_entries
        ));

        Ok(output)
    }

    fn format_extraction(&self, report: &ExtractionReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&format!("Skills in {}", report.file), 1));
        let skills: Vec<String> = report.skills.iter().cloned().collect();
        output.push_str(&format!("{}\n", self.format_skill_list(&skills, Color::Green)));

        let weak: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.evidence == Evidence::Weak)
            .collect();
        if !weak.is_empty() {
            output.push_str(&self.format_header("Weak mentions (not counted)", 3));
            for finding in weak {
                let signal = finding
                    .weak_signal
                    .map(|s| format!("{:?}", s))
                    .unwrap_or_default();
                output.push_str(&format!(
                    "  • {} {}\n",
                    self.colorize(&finding.surface_form, Color::Yellow),
                    self.colorize(&format!("({})", signal), Color::BrightBlack)
                ));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Evidence", 3));
            for finding in &report.findings {
                output.push_str(&format!(
                    "  {:<24} {:<8} @{}\n",
                    finding.surface_form,
                    format!("{:?}", finding.evidence),
                    finding.offset
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_extraction(&self, report: &ExtractionReport) -> Result<String> {
        self.to_json(report)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
        }
    }

    pub fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
        }
    }

    pub fn generate_report(&self, report: &MatchReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn generate_extraction(&self, report: &ExtractionReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_extraction(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(file_path, content).await?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_match{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_match{}.json", base_name, timestamp_suffix),
    }
}
