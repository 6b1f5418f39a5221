use std::io::{Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};
use tracing::debug;

use crate::error::{Result, TripletError};

use super::{describe_spec, AudioClip, Samples};

/// Decode a WAV file into memory.
pub fn read_wav(path: &Path) -> Result<AudioClip> {
    let decode_err = |e: hound::Error| TripletError::AudioDecode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let reader = WavReader::open(path).map_err(decode_err)?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        SampleFormat::Int => Samples::Int(
            reader
                .into_samples::<i32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(decode_err)?,
        ),
        SampleFormat::Float => Samples::Float(
            reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(decode_err)?,
        ),
    };

    let clip = AudioClip::new(spec, samples);
    debug!(
        "Read {} ({}, {:.3}s)",
        path.display(),
        describe_spec(&spec),
        clip.duration().as_secs_f64()
    );
    Ok(clip)
}

/// Encode a clip as WAV into any seekable writer.
pub fn write_wav<W: Write + Seek>(clip: &AudioClip, writer: W) -> Result<()> {
    let mut wav = WavWriter::new(writer, clip.spec())?;

    match clip.samples() {
        Samples::Int(samples) => {
            for &s in samples {
                wav.write_sample(s)?;
            }
        }
        Samples::Float(samples) => {
            for &s in samples {
                wav.write_sample(s)?;
            }
        }
    }

    wav.finalize()?;
    Ok(())
}
