pub mod splice;
pub mod wav;

pub use splice::{concat, silence};
pub use wav::{read_wav, write_wav};

use hound::{SampleFormat, WavSpec};
use std::time::Duration;

/// Interleaved sample data, stored in the widest type of its format.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Int(Vec<i32>),
    Float(Vec<f32>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Int(s) => s.len(),
            Samples::Float(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-valued samples matching the given format.
    fn zeroed(format: SampleFormat, len: usize) -> Self {
        match format {
            SampleFormat::Int => Samples::Int(vec![0; len]),
            SampleFormat::Float => Samples::Float(vec![0.0; len]),
        }
    }
}

/// An immutable in-memory PCM buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    spec: WavSpec,
    samples: Samples,
}

impl AudioClip {
    /// Build a clip from interleaved samples.
    ///
    /// Trailing samples that do not fill a whole frame are dropped.
    pub fn new(spec: WavSpec, samples: Samples) -> Self {
        let channels = spec.channels.max(1) as usize;
        let whole = samples.len() - samples.len() % channels;
        let samples = match samples {
            Samples::Int(mut s) => {
                s.truncate(whole);
                Samples::Int(s)
            }
            Samples::Float(mut s) => {
                s.truncate(whole);
                Samples::Float(s)
            }
        };
        Self { spec, samples }
    }

    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.spec.channels.max(1) as usize
    }

    pub fn duration(&self) -> Duration {
        if self.spec.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.spec.sample_rate as f64)
    }
}

/// Human-readable description of a WAV format, used in logs and errors.
pub fn describe_spec(spec: &WavSpec) -> String {
    let kind = match spec.sample_format {
        SampleFormat::Int => "int",
        SampleFormat::Float => "float",
    };
    format!(
        "{} Hz, {} ch, {}-bit {}",
        spec.sample_rate, spec.channels, spec.bits_per_sample, kind
    )
}
