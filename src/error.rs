use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TripletError {
    #[error("Missing digit file for '{digit}': {}", path.display())]
    MissingSource { digit: char, path: PathBuf },

    #[error("Failed to synthesize digit '{digit}': {reason}")]
    SynthesisFailed { digit: char, reason: String },

    #[error("Failed to decode {}: {reason}", path.display())]
    AudioDecode { path: PathBuf, reason: String },

    #[error("Audio format mismatch: {0}")]
    FormatMismatch(String),

    #[error("Failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Cannot create {target} new triplets: only {available} of {} triplets are still free \
         ({created} created by this run)",
        crate::triplet::Triplet::SPACE
    )]
    UnreachableTarget {
        target: usize,
        available: usize,
        created: usize,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

impl TripletError {
    /// True for errors meaning the digit set could not be completed.
    pub fn is_missing_source(&self) -> bool {
        matches!(
            self,
            TripletError::MissingSource { .. } | TripletError::SynthesisFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TripletError>;
