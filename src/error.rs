//! Error handling for the skill matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillMatchError {
    #[error("Invalid catalog entry '{surface_form}': {reason}")]
    InvalidCatalogEntry { surface_form: String, reason: String },

    #[error("Malformed external skill profile: {0}")]
    MalformedExternalProfile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, SkillMatchError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for SkillMatchError {
    fn from(err: anyhow::Error) -> Self {
        SkillMatchError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_catalog_entry_names_surface_form() {
        let err = SkillMatchError::InvalidCatalogEntry {
            surface_form: "Broken".to_string(),
            reason: "surface forms must be lowercase".to_string(),
        };
        assert!(err.to_string().contains("'Broken'"));
        assert!(err.to_string().contains("lowercase"));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: SkillMatchError = anyhow::anyhow!("bad input").into();
        assert!(matches!(err, SkillMatchError::InvalidInput(_)));
    }
}
