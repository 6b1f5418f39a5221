use crate::config::{Config, SourceKind, TtsEngineKind};
use crate::digits::DIGITS;
use crate::generator::existing_triplets;
use crate::triplet::Triplet;
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};

const ENGINES: &[(&str, &str, TtsEngineKind)] = &[
    ("espeak-ng", "Linux / cross-platform", TtsEngineKind::EspeakNg),
    ("say", "macOS built-in voices", TtsEngineKind::Say),
    ("piper", "Neural voices, needs a .onnx model", TtsEngineKind::Piper),
];

/// Walk the user through a run and return the resulting configuration.
pub fn run_interactive_wizard(mut config: Config) -> anyhow::Result<Config> {
    print_header();

    // Step 1: Digit source
    config.source = select_source(config.source)?;
    match config.source {
        SourceKind::Files => {
            config.digits_dir = select_digits_dir(&config.digits_dir)?;
        }
        SourceKind::Tts => {
            config.tts_engine = select_engine(config.tts_engine)?;
            if config.tts_engine == TtsEngineKind::Piper {
                let model: String = Input::new()
                    .with_prompt("Path to the Piper voice model")
                    .interact_text()?;
                config.piper_model = Some(PathBuf::from(model.trim()));
            }
        }
    }

    // Step 2: Output directory
    let output: String = Input::new()
        .with_prompt("Output directory")
        .default(config.output_dir.display().to_string())
        .interact_text()?;
    config.output_dir = PathBuf::from(output.trim());

    // Step 3: How many
    let existing = existing_triplets(&config.output_dir)
        .map(|found| found.len())
        .unwrap_or(0);
    let free = Triplet::SPACE - existing;
    if existing > 0 {
        println!(
            "{} {} triplets already exist, {} still free",
            style("i").cyan(),
            existing,
            free
        );
    }
    config.num_triplets = Input::new()
        .with_prompt("Number of new triplets")
        .default(config.num_triplets.min(free))
        .validate_with(|n: &usize| -> Result<(), String> {
            if *n <= free {
                Ok(())
            } else {
                Err(format!("At most {free} new triplets fit"))
            }
        })
        .interact_text()?;

    // Step 4: Gap
    config.gap_ms = Input::new()
        .with_prompt("Silence between digits (ms)")
        .default(config.gap_ms)
        .interact_text()?;

    // Step 5: Confirm
    print_summary(&config, existing);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    if Confirm::new()
        .with_prompt("Save these settings as defaults?")
        .default(false)
        .interact()?
    {
        save_config(&config)?;
        println!("{} Settings saved to config\n", style("✓").green());
    }

    println!();
    Ok(config)
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║        triplets - Spoken Digit Clip Builder       ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn save_config(config: &Config) -> anyhow::Result<()> {
    if let Some(config_dir) = dirs::config_dir() {
        let triplets_dir = config_dir.join("triplets");
        fs::create_dir_all(&triplets_dir)?;

        let config_path = triplets_dir.join("config.toml");
        let toml_content = toml::to_string_pretty(config)?;
        fs::write(config_path, toml_content)?;
    }
    Ok(())
}

fn select_source(current: SourceKind) -> anyhow::Result<SourceKind> {
    let options = [
        ("Recorded files", "0.wav .. 9.wav in a folder", SourceKind::Files),
        ("Text-to-speech", "render each digit with a TTS engine", SourceKind::Tts),
    ];

    let items: Vec<String> = options
        .iter()
        .map(|(name, desc, _)| format!("{} - {}", name, desc))
        .collect();
    let default = options
        .iter()
        .position(|(_, _, kind)| *kind == current)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Where do the digit clips come from?")
        .items(&items)
        .default(default)
        .interact()?;

    Ok(options[selection].2)
}

fn select_digits_dir(current: &Path) -> anyhow::Result<PathBuf> {
    let dir: String = Input::new()
        .with_prompt("Folder containing 0.wav .. 9.wav")
        .default(current.display().to_string())
        .interact_text()?;
    let dir = PathBuf::from(dir.trim());

    let missing = missing_digits(&dir);
    if !missing.is_empty() {
        anyhow::bail!(
            "Missing digit files in {}: {}",
            dir.display(),
            missing
                .iter()
                .map(|d| format!("{d}.wav"))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    println!("{} All ten digit files found", style("✓").green());
    Ok(dir)
}

fn missing_digits(dir: &Path) -> Vec<char> {
    DIGITS
        .iter()
        .copied()
        .filter(|d| !dir.join(format!("{d}.wav")).is_file())
        .collect()
}

fn select_engine(current: TtsEngineKind) -> anyhow::Result<TtsEngineKind> {
    let items: Vec<String> = ENGINES
        .iter()
        .map(|(name, desc, _)| format!("{} - {}", name, desc))
        .collect();
    let default = ENGINES
        .iter()
        .position(|(_, _, kind)| *kind == current)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select TTS engine")
        .items(&items)
        .default(default)
        .interact()?;

    Ok(ENGINES[selection].2)
}

fn describe_source(config: &Config) -> String {
    match config.source {
        SourceKind::Files => format!("files in {}", config.digits_dir.display()),
        SourceKind::Tts => format!("{} text-to-speech", config.tts_engine),
    }
}

fn print_summary(config: &Config, existing: usize) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  Digits:    {}", style(describe_source(config)).cyan());
    println!("  Output:    {}", style(config.output_dir.display()).cyan());
    println!(
        "  Triplets:  {} new ({} existing)",
        config.num_triplets, existing
    );
    println!("  Gap:       {} ms", config.gap_ms);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_digits() {
        let dir = tempfile::tempdir().unwrap();
        for d in ['0', '1', '2', '3', '4', '5', '6', '8', '9'] {
            fs::write(dir.path().join(format!("{d}.wav")), b"").unwrap();
        }
        assert_eq!(missing_digits(dir.path()), vec!['7']);
    }

    #[test]
    fn test_describe_source() {
        let mut config = Config::default();
        assert!(describe_source(&config).starts_with("files in "));

        config.source = SourceKind::Tts;
        config.tts_engine = TtsEngineKind::Say;
        assert_eq!(describe_source(&config), "say text-to-speech");
    }
}
