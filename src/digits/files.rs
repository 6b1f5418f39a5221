use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::audio::{describe_spec, read_wav, AudioClip};
use crate::error::{Result, TripletError};

use super::{DigitClips, DigitSource, DIGITS};

/// Reads `0.wav` .. `9.wav` from a directory. The files are only ever read.
#[derive(Debug, Clone)]
pub struct FileDigitSource {
    dir: PathBuf,
}

impl FileDigitSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn digit_path(&self, digit: char) -> PathBuf {
        self.dir.join(format!("{digit}.wav"))
    }
}

impl DigitSource for FileDigitSource {
    fn load(&self) -> Result<DigitClips> {
        info!("Loading digit clips from {}", self.dir.display());

        // Report the first missing file before decoding anything.
        for digit in DIGITS {
            let path = self.digit_path(digit);
            if !path.is_file() {
                return Err(TripletError::MissingSource { digit, path });
            }
        }

        let mut clips: Vec<AudioClip> = Vec::with_capacity(DIGITS.len());
        for digit in DIGITS {
            let clip = read_wav(&self.digit_path(digit))?;
            debug!(
                "Digit '{}': {:.3}s",
                digit,
                clip.duration().as_secs_f64()
            );
            clips.push(clip);
        }

        let clips: [AudioClip; 10] = clips
            .try_into()
            .map_err(|_| TripletError::Config("expected exactly ten digit clips".to_string()))?;
        let digits = DigitClips::new(clips)?;

        info!("Loaded 10 digit clips ({})", describe_spec(&digits.spec()));
        Ok(digits)
    }

    fn name(&self) -> &'static str {
        "files"
    }
}
