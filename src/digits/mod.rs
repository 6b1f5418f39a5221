pub mod files;
pub mod tts;

pub use files::FileDigitSource;
pub use tts::{TtsDigitSource, TtsEngine};

use crate::audio::{describe_spec, AudioClip};
use crate::config::{Config, SourceKind, TtsEngineKind};
use crate::error::{Result, TripletError};
use hound::WavSpec;

/// Digit characters in clip order.
pub const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// The ten digit clips every triplet is assembled from.
///
/// All clips share one WAV format so they can be spliced without conversion.
#[derive(Debug, Clone)]
pub struct DigitClips {
    clips: [AudioClip; 10],
}

impl DigitClips {
    pub fn new(clips: [AudioClip; 10]) -> Result<Self> {
        let spec = clips[0].spec();
        for (digit, clip) in DIGITS.iter().zip(clips.iter()).skip(1) {
            if clip.spec() != spec {
                return Err(TripletError::FormatMismatch(format!(
                    "digit '{}' is {} but digit '0' is {}",
                    digit,
                    describe_spec(&clip.spec()),
                    describe_spec(&spec)
                )));
            }
        }
        Ok(Self { clips })
    }

    /// Clip for a digit character. Returns `None` outside `'0'..='9'`.
    pub fn get(&self, digit: char) -> Option<&AudioClip> {
        digit
            .to_digit(10)
            .map(|d| &self.clips[d as usize])
    }

    /// Clip for a digit value `0..=9`.
    pub fn clip(&self, digit: u8) -> &AudioClip {
        &self.clips[digit as usize]
    }

    /// The format shared by all ten clips.
    pub fn spec(&self) -> WavSpec {
        self.clips[0].spec()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &AudioClip)> {
        DIGITS.iter().copied().zip(self.clips.iter())
    }
}

/// Supplies the ten digit clips, once, before generation starts.
pub trait DigitSource {
    fn load(&self) -> Result<DigitClips>;
    fn name(&self) -> &'static str;
}

/// Pick the digit source described by the configuration.
pub fn source_from_config(config: &Config) -> Box<dyn DigitSource> {
    match config.source {
        SourceKind::Files => Box::new(FileDigitSource::new(config.digits_dir.clone())),
        SourceKind::Tts => {
            let engine = match config.tts_engine {
                TtsEngineKind::EspeakNg => TtsEngine::EspeakNg,
                TtsEngineKind::Say => TtsEngine::Say,
                TtsEngineKind::Piper => TtsEngine::Piper {
                    model: config.piper_model.clone().unwrap_or_default(),
                },
            };
            let mut source = TtsDigitSource::new(engine);
            if let Some(voice) = &config.tts_voice {
                source = source.with_voice(voice.clone());
            }
            Box::new(source)
        }
    }
}
