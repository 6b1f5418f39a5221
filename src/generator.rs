use crate::audio::{concat, silence, write_wav, AudioClip};
use crate::config::Config;
use crate::digits::DigitClips;
use crate::error::{Result, TripletError};
use crate::triplet::{Triplet, TripletSampler};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory receiving `<triplet>.wav` files.
    pub output_dir: PathBuf,
    /// Silence between consecutive digits.
    pub gap: Duration,
    /// Number of new outputs to create.
    pub target: usize,
    /// Show a progress bar.
    pub show_progress: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for GeneratorConfig {
    fn from(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            gap: config.gap(),
            target: config.num_triplets,
            show_progress: true,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// New outputs written by this run.
    pub created: usize,
    /// Sampled triplets skipped because their output already existed.
    pub skipped_existing: usize,
    /// Triplet outputs present before the run started.
    pub existing_before: usize,
    pub output_dir: PathBuf,
    /// Paths written, in creation order.
    pub written: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Path of the output file for a triplet.
pub fn output_path(output_dir: &Path, triplet: Triplet) -> PathBuf {
    output_dir.join(triplet.file_name())
}

/// `clip[a] ++ gap ++ clip[b] ++ gap ++ clip[c]`.
pub fn assemble_triplet(digits: &DigitClips, triplet: Triplet, gap: Duration) -> Result<AudioClip> {
    let pause = silence(digits.spec(), gap);
    let [a, b, c] = triplet.digits();
    concat(&[
        digits.clip(a),
        &pause,
        digits.clip(b),
        &pause,
        digits.clip(c),
    ])
}

/// True if anything, even a dangling symlink or a directory, sits at `path`.
pub fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Triplets whose output name is taken in `output_dir`.
///
/// Any entry named like an output counts, whatever its kind, matching
/// [`is_occupied`]. A missing directory holds no triplets.
pub fn existing_triplets(output_dir: &Path) -> Result<HashSet<Triplet>> {
    let entries = match fs::read_dir(output_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(e.into()),
    };

    let mut found = HashSet::new();
    for entry in entries {
        let entry = entry?;
        if let Some(triplet) = entry.file_name().to_str().and_then(Triplet::from_file_name) {
            found.insert(triplet);
        }
    }
    Ok(found)
}

/// State of a single run. Lives only as long as the run.
#[derive(Debug)]
pub struct RunContext {
    config: GeneratorConfig,
    handled: HashSet<Triplet>,
    created: usize,
    skipped_existing: usize,
    written: Vec<PathBuf>,
}

impl RunContext {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            handled: HashSet::new(),
            created: 0,
            skipped_existing: 0,
            written: Vec::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Triplets accounted for so far: created or found on disk.
    pub fn handled(&self) -> &HashSet<Triplet> {
        &self.handled
    }

    pub fn created(&self) -> usize {
        self.created
    }

    /// Sample and write triplets until `target` new outputs exist.
    pub fn run<S: TripletSampler>(
        mut self,
        digits: &DigitClips,
        mut sampler: S,
    ) -> Result<GenerationReport> {
        let start_time = Instant::now();
        let target = self.config.target;
        let output_dir = self.config.output_dir.clone();

        let existing_before = existing_triplets(&output_dir)?.len();
        let available = Triplet::SPACE - existing_before;
        if target > available {
            return Err(TripletError::UnreachableTarget {
                target,
                available,
                created: 0,
            });
        }

        info!(
            "Generating {} triplets in {} ({} already present)",
            target,
            output_dir.display(),
            existing_before
        );

        let progress = (self.config.show_progress && target > 0).then(|| {
            let pb = ProgressBar::new(target as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            pb
        });

        while self.created < target {
            // Outputs created by someone else since the scan can still fill the space.
            if self.handled.len() >= Triplet::SPACE {
                return Err(TripletError::UnreachableTarget {
                    target,
                    available: Triplet::SPACE - self.handled.len(),
                    created: self.created,
                });
            }

            let triplet = sampler.next_triplet();
            if self.handled.contains(&triplet) {
                continue;
            }

            let path = output_path(&output_dir, triplet);
            if is_occupied(&path) {
                debug!("Skipping {}: already exists", path.display());
                self.handled.insert(triplet);
                self.skipped_existing += 1;
                continue;
            }

            let audio = assemble_triplet(digits, triplet, self.config.gap)?;
            self.handled.insert(triplet);
            if !write_new_output(&output_dir, &path, &audio)? {
                debug!("Skipping {}: created concurrently", path.display());
                self.skipped_existing += 1;
                continue;
            }

            self.created += 1;
            // A hidden bar (no terminal) swallows println output.
            match progress.as_ref().filter(|pb| !pb.is_hidden()) {
                Some(pb) => pb.println(format!("Generated {}", path.display())),
                None => info!("Generated {}", path.display()),
            }
            if let Some(pb) = &progress {
                pb.set_message(triplet.to_string());
                pb.inc(1);
            }
            self.written.push(path);
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        info!(
            "Done. Created {} new triplets in '{}'.",
            self.created,
            output_dir.display()
        );

        Ok(GenerationReport {
            created: self.created,
            skipped_existing: self.skipped_existing,
            existing_before,
            output_dir,
            written: self.written,
            elapsed: start_time.elapsed(),
        })
    }
}

/// Generate `config.target` new triplet outputs.
pub fn generate<S: TripletSampler>(
    digits: &DigitClips,
    config: GeneratorConfig,
    sampler: S,
) -> Result<GenerationReport> {
    RunContext::new(config).run(digits, sampler)
}

/// Write `audio` to `path` unless a file is already there.
///
/// The clip is encoded into a temp file in `output_dir` and moved into place
/// only when complete. Returns `false` if `path` appeared in the meantime.
fn write_new_output(output_dir: &Path, path: &Path, audio: &AudioClip) -> Result<bool> {
    let write_err = |source: std::io::Error| TripletError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(output_dir).map_err(write_err)?;

    let mut temp = tempfile::Builder::new()
        .prefix(".triplet-")
        .suffix(".wav.tmp")
        .tempfile_in(output_dir)
        .map_err(write_err)?;

    write_wav(audio, BufWriter::new(temp.as_file_mut())).map_err(|e| match e {
        TripletError::Wav(hound::Error::IoError(io)) => write_err(io),
        other => other,
    })?;

    match temp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(write_err(e.error)),
    }
}

/// Print a summary of the run.
pub fn print_summary(report: &GenerationReport) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                   Triplet Generation Complete                 ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output:     {}", report.output_dir.display());
    println!("  Created:    {}", style(report.created).green());
    println!("  Existing:   {} before this run", report.existing_before);
    println!(
        "  Total:      {} of {} triplets",
        report.existing_before + report.created,
        Triplet::SPACE
    );
    println!("  Time:       {:.2}s", report.elapsed.as_secs_f64());
    println!();
    println!(
        "Done. Created {} new triplets in '{}'.",
        report.created,
        report.output_dir.display()
    );
}
