//! Pronounceability assessment for English words.
//!
//! This crate scores how hard a word is to pronounce:
//! - Grapheme-to-phoneme transcription with stress detection
//! - Phonetic feature extraction from the IPA transcription
//! - A small logistic classifier and its gradient-descent trainer
//! - A facade assessing single words and whole texts
//!
//! The binaries in this workspace (CLI, HTTP server) are thin wrappers
//! around [`assessor::Assessor`].

/// Phoneme dictionary, transcription and feature extraction.
pub mod phonetics;

/// Model parameters, classifier and trainer.
pub mod model;

/// High-level assessment facade.
pub mod assessor;

/// Paths used to locate the model and lexicon artifacts.
pub mod config;

/// Crate error type.
pub mod error;

/// I/O utilities (file loading, path helpers, atomic writes).
///
/// Not exposed
pub(crate) mod io;

pub use assessor::{Assessment, Assessor, Outcome, TextAssessment, WordAssessment};
pub use config::AssessorConfig;
pub use error::{PronounceError, Result};
pub use model::classifier::Category;
