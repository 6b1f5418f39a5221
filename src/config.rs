use crate::error::{Result, TripletError};
use crate::triplet::Triplet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Longest silence accepted between digits.
pub const MAX_GAP_MS: u64 = 60_000;

/// Where the ten digit clips come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Files,
    Tts,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Files => write!(f, "files"),
            SourceKind::Tts => write!(f, "tts"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "files" | "file" => Ok(SourceKind::Files),
            "tts" => Ok(SourceKind::Tts),
            _ => Err(format!("Unknown digit source: {}. Use 'files' or 'tts'", s)),
        }
    }
}

/// Text-to-speech engine used by the `tts` digit source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TtsEngineKind {
    #[default]
    EspeakNg,
    Say,
    Piper,
}

impl std::fmt::Display for TtsEngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TtsEngineKind::EspeakNg => write!(f, "espeak-ng"),
            TtsEngineKind::Say => write!(f, "say"),
            TtsEngineKind::Piper => write!(f, "piper"),
        }
    }
}

impl std::str::FromStr for TtsEngineKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "espeak-ng" | "espeak" => Ok(TtsEngineKind::EspeakNg),
            "say" => Ok(TtsEngineKind::Say),
            "piper" => Ok(TtsEngineKind::Piper),
            _ => Err(format!(
                "Unknown TTS engine: {}. Use 'espeak-ng', 'say', or 'piper'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub digits_dir: PathBuf,
    pub output_dir: PathBuf,
    pub gap_ms: u64,
    pub num_triplets: usize,
    pub source: SourceKind,
    pub tts_engine: TtsEngineKind,
    pub tts_voice: Option<String>,
    pub piper_model: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let output_dir = PathBuf::from("audio").join("triplets");
        Self {
            digits_dir: output_dir.join("digits"),
            output_dir,
            gap_ms: 300,
            num_triplets: 240,
            source: SourceKind::default(),
            tts_engine: TtsEngineKind::default(),
            tts_voice: None,
            piper_model: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                config = toml::from_str::<Config>(&contents).map_err(|e| {
                    TripletError::Config(format!("{}: {e}", config_path.display()))
                })?;
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from `TRIPLETS_*` variables; unparsable values are ignored.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = var("TRIPLETS_DIGITS_DIR") {
            self.digits_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("TRIPLETS_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(gap) = var("TRIPLETS_GAP_MS") {
            if let Ok(g) = gap.parse() {
                self.gap_ms = g;
            }
        }
        if let Some(count) = var("TRIPLETS_NUM_TRIPLETS") {
            if let Ok(n) = count.parse() {
                self.num_triplets = n;
            }
        }
        if let Some(source) = var("TRIPLETS_SOURCE") {
            if let Ok(s) = source.parse() {
                self.source = s;
            }
        }
        if let Some(engine) = var("TRIPLETS_TTS_ENGINE") {
            if let Ok(e) = engine.parse() {
                self.tts_engine = e;
            }
        }
        if let Some(voice) = var("TRIPLETS_TTS_VOICE") {
            self.tts_voice = Some(voice);
        }
        if let Some(model) = var("TRIPLETS_PIPER_MODEL") {
            self.piper_model = Some(PathBuf::from(model));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_triplets > Triplet::SPACE {
            return Err(TripletError::Config(format!(
                "Cannot request {} triplets: only {} distinct triplets exist",
                self.num_triplets,
                Triplet::SPACE
            )));
        }

        if self.gap_ms > MAX_GAP_MS {
            return Err(TripletError::Config(format!(
                "Gap of {} ms is too long (maximum {} ms)",
                self.gap_ms, MAX_GAP_MS
            )));
        }

        if self.source == SourceKind::Tts
            && self.tts_engine == TtsEngineKind::Piper
            && self.piper_model.is_none()
        {
            return Err(TripletError::Config(
                "Piper needs a voice model. Set piper_model or TRIPLETS_PIPER_MODEL".to_string(),
            ));
        }

        Ok(())
    }

    pub fn gap(&self) -> Duration {
        Duration::from_millis(self.gap_ms)
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("triplets").join("config.toml"))
    }
}
