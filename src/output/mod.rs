//! Report structures and formatters

pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::{ExtractionReport, MatchReport, ReportMetadata};
