use std::time::Duration;

use hound::WavSpec;

use crate::error::{Result, TripletError};

use super::{describe_spec, AudioClip, Samples};

/// Zero-amplitude clip of the given length in the given format.
pub fn silence(spec: WavSpec, duration: Duration) -> AudioClip {
    let frames = (spec.sample_rate as u128 * duration.as_millis() / 1000) as usize;
    let len = frames * spec.channels as usize;
    AudioClip::new(spec, Samples::zeroed(spec.sample_format, len))
}

/// Join clips end to end. All parts must share one format.
pub fn concat(parts: &[&AudioClip]) -> Result<AudioClip> {
    let Some(first) = parts.first() else {
        return Err(TripletError::FormatMismatch(
            "nothing to concatenate".to_string(),
        ));
    };
    let spec = first.spec();

    if let Some(other) = parts.iter().find(|p| p.spec() != spec) {
        return Err(TripletError::FormatMismatch(format!(
            "cannot join {} with {}",
            describe_spec(&spec),
            describe_spec(&other.spec())
        )));
    }

    let total: usize = parts.iter().map(|p| p.samples().len()).sum();
    let samples = match first.samples() {
        Samples::Int(_) => {
            let mut out = Vec::with_capacity(total);
            for part in parts {
                if let Samples::Int(s) = part.samples() {
                    out.extend_from_slice(s);
                }
            }
            Samples::Int(out)
        }
        Samples::Float(_) => {
            let mut out = Vec::with_capacity(total);
            for part in parts {
                if let Samples::Float(s) = part.samples() {
                    out.extend_from_slice(s);
                }
            }
            Samples::Float(out)
        }
    };

    Ok(AudioClip::new(spec, samples))
}
