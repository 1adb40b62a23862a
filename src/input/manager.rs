//! Loads job descriptions and résumés from disk as plain text

use crate::error::{Result, SkillMatchError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reads `.txt` and `.md` documents, remembering what it has already read.
#[derive(Default)]
pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    caching_disabled: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.caching_disabled = !enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if let Some(text) = self.cache.get(path) {
            debug!("Cache hit for {}", path.display());
            return Ok(text.clone());
        }

        let file_type = file_type_of(path)?;
        if !file_type.is_supported() {
            let hint = match file_type {
                FileType::Pdf => "PDF input is not supported, convert to .txt or .md first",
                _ => "expected a .txt or .md file",
            };
            return Err(SkillMatchError::UnsupportedFormat(format!("{}: {}", hint, path.display())));
        }
        if !path.is_file() {
            return Err(SkillMatchError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        info!("Loading {:?} document: {}", file_type, path.display());
        let raw = match file_type {
            FileType::Markdown => MarkdownExtractor.extract(path).await?,
            _ => PlainTextExtractor.extract(path).await?,
        };
        let text = raw.replace("\r\n", "\n");

        if !self.caching_disabled {
            self.cache.insert(path.to_path_buf(), text.clone());
        }
        Ok(text)
    }

    /// Read the job description and the résumé of one analysis.
    pub async fn load_pair(&mut self, job: &Path, resume: &Path) -> Result<(String, String)> {
        let job_text = self.extract_text(job).await?;
        let resume_text = self.extract_text(resume).await?;
        Ok((job_text, resume_text))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

fn file_type_of(path: &Path) -> Result<FileType> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(FileType::from_extension)
        .ok_or_else(|| SkillMatchError::InvalidInput(format!("File has no extension: {}", path.display())))
}
