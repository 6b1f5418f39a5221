use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use triplets::config::{Config, SourceKind, TtsEngineKind};
use triplets::digits::source_from_config;
use triplets::generator::{generate, print_summary, GeneratorConfig};
use triplets::interactive::run_interactive_wizard;
use triplets::triplet::RandomSampler;

#[derive(Parser)]
#[command(name = "triplets")]
#[command(version, about = "Generate spoken three-digit clips from ten digit recordings")]
#[command(
    long_about = "Concatenates digit clips (0-9) into <abc>.wav files with silence between digits, \
                  until the requested number of new, unique triplets exists in the output directory."
)]
struct Cli {
    /// Folder containing 0.wav .. 9.wav
    #[arg(long)]
    digits_dir: Option<PathBuf>,

    /// Folder receiving the generated triplets
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of new triplets to create
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Silence between digits in milliseconds
    #[arg(long)]
    gap_ms: Option<u64>,

    /// Digit source: files, tts
    #[arg(short, long)]
    source: Option<String>,

    /// TTS engine: espeak-ng, say, piper
    #[arg(long)]
    tts_engine: Option<String>,

    /// TTS voice name
    #[arg(long)]
    voice: Option<String>,

    /// Piper voice model (.onnx)
    #[arg(long)]
    piper_model: Option<PathBuf>,

    /// Seed for reproducible triplet selection
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Choose settings interactively
    #[arg(short, long)]
    interactive: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(dir) = &self.digits_dir {
            config.digits_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(count) = self.count {
            config.num_triplets = count;
        }
        if let Some(gap) = self.gap_ms {
            config.gap_ms = gap;
        }
        if let Some(source) = &self.source {
            config.source = source
                .parse::<SourceKind>()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        if let Some(engine) = &self.tts_engine {
            config.tts_engine = engine
                .parse::<TtsEngineKind>()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        if let Some(voice) = &self.voice {
            config.tts_voice = Some(voice.clone());
        }
        if let Some(model) = &self.piper_model {
            config.piper_model = Some(model.clone());
        }
        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Load and validate configuration
    let mut config = Config::load().context("Failed to load configuration")?;
    cli.apply(&mut config)?;
    if cli.interactive {
        config = run_interactive_wizard(config)?;
    }
    config.validate().context("Configuration validation failed")?;

    info!("Source:   {}", config.source);
    info!("Output:   {}", config.output_dir.display());
    info!("Count:    {}", config.num_triplets);
    info!("Gap:      {} ms", config.gap_ms);

    let source = source_from_config(&config);
    let digits = source
        .load()
        .with_context(|| format!("Failed to load digit clips ({} source)", source.name()))?;

    let sampler = match cli.seed {
        Some(seed) => RandomSampler::seeded(seed),
        None => RandomSampler::from_entropy(),
    };

    let generator_config = GeneratorConfig {
        show_progress: !cli.no_progress,
        ..GeneratorConfig::from(&config)
    };
    let report = generate(&digits, generator_config, sampler).context("Triplet generation failed")?;

    print_summary(&report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "triplets",
            "-n",
            "12",
            "--gap-ms",
            "150",
            "--source",
            "tts",
            "--output-dir",
            "/tmp/triplets",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config).unwrap();

        assert_eq!(config.num_triplets, 12);
        assert_eq!(config.gap_ms, 150);
        assert_eq!(config.source, SourceKind::Tts);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/triplets"));
        assert_eq!(config.digits_dir, Config::default().digits_dir);
    }

    #[test]
    fn test_cli_rejects_unknown_source() {
        let cli = Cli::parse_from(["triplets", "--source", "microphone"]);
        let mut config = Config::default();
        assert!(cli.apply(&mut config).is_err());
    }
}
