//! Input processing module
//! Handles file detection and text extraction for job descriptions and résumés

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::InputManager;
