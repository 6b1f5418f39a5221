use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::audio::{describe_spec, read_wav, AudioClip};
use crate::error::{Result, TripletError};

use super::{DigitClips, DigitSource, DIGITS};

/// Spoken form of each digit, indexed by value.
pub const DIGIT_WORDS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// External text-to-speech program used to render digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtsEngine {
    EspeakNg,
    /// macOS `say`.
    Say,
    Piper { model: PathBuf },
}

impl TtsEngine {
    pub fn program(&self) -> &'static str {
        match self {
            TtsEngine::EspeakNg => "espeak-ng",
            TtsEngine::Say => "say",
            TtsEngine::Piper { .. } => "piper",
        }
    }

    /// Arguments rendering `text` into the WAV file at `out`.
    ///
    /// Piper takes the text on stdin instead, see [`TtsEngine::reads_stdin`].
    pub fn args(&self, text: &str, out: &Path, voice: Option<&str>) -> Vec<String> {
        let out = out.display().to_string();
        let mut args = Vec::new();
        match self {
            TtsEngine::EspeakNg => {
                args.extend(["-w".to_string(), out]);
                if let Some(v) = voice {
                    args.extend(["-v".to_string(), v.to_string()]);
                }
                args.push(text.to_string());
            }
            TtsEngine::Say => {
                args.extend([
                    "-o".to_string(),
                    out,
                    "--data-format=LEI16@22050".to_string(),
                ]);
                if let Some(v) = voice {
                    args.extend(["-v".to_string(), v.to_string()]);
                }
                args.push(text.to_string());
            }
            TtsEngine::Piper { model } => {
                args.extend([
                    "--model".to_string(),
                    model.display().to_string(),
                    "--output_file".to_string(),
                    out,
                ]);
                if let Some(v) = voice {
                    args.extend(["--speaker".to_string(), v.to_string()]);
                }
            }
        }
        args
    }

    pub fn reads_stdin(&self) -> bool {
        matches!(self, TtsEngine::Piper { .. })
    }
}

/// Renders each digit once with a TTS engine and keeps the result in memory.
///
/// The temporary WAV written by the engine is removed as soon as it is decoded.
#[derive(Debug, Clone)]
pub struct TtsDigitSource {
    engine: TtsEngine,
    voice: Option<String>,
    program: Option<String>,
}

impl TtsDigitSource {
    pub fn new(engine: TtsEngine) -> Self {
        Self {
            engine,
            voice: None,
            program: None,
        }
    }

    pub fn with_voice(mut self, voice: String) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Run a different binary than the engine's default program name.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    fn program(&self) -> &str {
        self.program.as_deref().unwrap_or(self.engine.program())
    }

    /// Synthesize a single digit.
    pub fn synthesize(&self, digit: char) -> Result<AudioClip> {
        let fail = |reason: String| TripletError::SynthesisFailed { digit, reason };

        let word = digit
            .to_digit(10)
            .map(|d| DIGIT_WORDS[d as usize])
            .ok_or_else(|| fail("not a digit".to_string()))?;

        let temp = tempfile::Builder::new()
            .prefix("triplets-digit-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| fail(format!("Failed to create temp file: {e}")))?;

        let args = self.engine.args(word, temp.path(), self.voice.as_deref());
        debug!("Running {} {:?}", self.program(), args);

        let mut command = Command::new(self.program());
        command
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if self.engine.reads_stdin() {
            command.stdin(Stdio::piped());
        } else {
            command.stdin(Stdio::null());
        }

        let mut child = command.spawn().map_err(|e| {
            fail(format!(
                "{} not found. Please install it and ensure it's in your PATH. Error: {e}",
                self.program()
            ))
        })?;

        if self.engine.reads_stdin() {
            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(word.as_bytes())
                    .map_err(|e| fail(format!("Failed to write text to {}: {e}", self.program())))?;
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| fail(format!("Failed to wait for {}: {e}", self.program())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fail(format!(
                "{} exited with {}: {}",
                self.program(),
                output.status,
                stderr.trim()
            )));
        }

        read_wav(temp.path()).map_err(|e| fail(e.to_string()))
    }
}

impl DigitSource for TtsDigitSource {
    fn load(&self) -> Result<DigitClips> {
        info!("Synthesizing digit clips with {}", self.program());

        let mut clips: Vec<AudioClip> = Vec::with_capacity(DIGITS.len());
        for digit in DIGITS {
            let clip = self.synthesize(digit)?;
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

        info!("Synthesized 10 digit clips ({})", describe_spec(&digits.spec()));
        Ok(digits)
    }

    fn name(&self) -> &'static str {
        "tts"
    }
}
