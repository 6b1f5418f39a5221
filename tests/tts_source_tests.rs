//! Tests for the text-to-speech digit source
//!
//! Small shell scripts stand in for the TTS engine so no real engine is needed.

#![cfg(unix)]

use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;
use triplets::digits::{DigitSource, TtsDigitSource, TtsEngine};
use triplets::TripletError;

/// Fake engines, all written before any of them runs.
///
/// Executing a script while another thread still holds it open for writing
/// fails with ETXTBSY, so every script is created up front.
struct FakeEngines {
    _dir: TempDir,
    espeak: PathBuf,
    espeak_log: PathBuf,
    piper: PathBuf,
    piper_log: PathBuf,
    failing: PathBuf,
    garbage: PathBuf,
}

fn engines() -> &'static FakeEngines {
    static ENGINES: OnceLock<FakeEngines> = OnceLock::new();
    ENGINES.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("fixture.wav");
        write_fixture_wav(&fixture);

        let espeak_log = dir.path().join("espeak.log");
        let piper_log = dir.path().join("piper.log");

        // espeak-ng style arguments: -w <out> <text>
        let espeak = write_script(
            dir.path(),
            "espeak",
            &format!(
                "echo \"$2 $3\" >> '{}'\ncp '{}' \"$2\"",
                espeak_log.display(),
                fixture.display()
            ),
        );
        // piper style arguments: --model <m> --output_file <out>, text on stdin
        let piper = write_script(
            dir.path(),
            "piper",
            &format!(
                "cat >> '{log}'\necho >> '{log}'\ncp '{}' \"$4\"",
                fixture.display(),
                log = piper_log.display()
            ),
        );
        let failing = write_script(dir.path(), "failing", "echo 'voice not installed' >&2\nexit 3");
        let garbage = write_script(dir.path(), "garbage", "echo 'not audio' > \"$2\"");

        FakeEngines {
            _dir: dir,
            espeak,
            espeak_log,
            piper,
            piper_log,
            failing,
            garbage,
        }
    })
}

fn write_fixture_wav(path: &Path) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for i in 0..2205i16 {
        writer.write_sample(i % 100).unwrap();
    }
    writer.finalize().unwrap();
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn source(engine: TtsEngine, script: &Path) -> TtsDigitSource {
    TtsDigitSource::new(engine).with_program(script.display().to_string())
}

#[test]
fn test_synthesizes_each_digit_once() {
    let fake = engines();
    let digits = source(TtsEngine::EspeakNg, &fake.espeak).load().unwrap();

    assert_eq!(digits.spec().sample_rate, 22050);
    assert_eq!(digits.get('9').unwrap().frames(), 2205);

    let calls = fs::read_to_string(&fake.espeak_log).unwrap();
    let lines: Vec<&str> = calls.lines().collect();
    assert_eq!(lines.len(), 10);

    let words: Vec<&str> = lines
        .iter()
        .map(|l| l.rsplit(' ').next().unwrap())
        .collect();
    assert_eq!(
        words,
        ["zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine"]
    );

    // Temporary renders are gone once loaded.
    for line in &lines {
        let temp_path = line.split(' ').next().unwrap();
        assert!(!Path::new(temp_path).exists(), "{temp_path} was left behind");
    }
}

#[test]
fn test_engine_failure_reports_stderr() {
    let fake = engines();

    match source(TtsEngine::EspeakNg, &fake.failing).load() {
        Err(TripletError::SynthesisFailed { digit, reason }) => {
            assert_eq!(digit, '0');
            assert!(reason.contains("voice not installed"), "reason: {reason}");
        }
        other => panic!("Expected SynthesisFailed error, got: {other:?}"),
    }
}

#[test]
fn test_engine_writing_garbage_fails() {
    let fake = engines();
    let err = source(TtsEngine::EspeakNg, &fake.garbage).load().unwrap_err();

    assert!(err.is_missing_source());
}

#[test]
fn test_piper_receives_text_on_stdin() {
    let fake = engines();
    let engine = TtsEngine::Piper {
        model: PathBuf::from("voice.onnx"),
    };
    source(engine, &fake.piper).load().unwrap();

    let text = fs::read_to_string(&fake.piper_log).unwrap();
    assert_eq!(text.lines().next(), Some("zero"));
    assert_eq!(text.lines().count(), 10);
}
