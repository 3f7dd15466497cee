//! Placeholder tone synthesis for the degraded-generation path.
//!
//! Not narration and not business logic: a crude sine beep encoded as a
//! complete in-memory WAV so a failed generation still leaves the user with
//! an audible, obviously-synthetic artifact.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

pub const SAMPLE_RATE: u32 = 44_100;

/// Frequency of the placeholder beep.
const FALLBACK_HZ: f32 = 440.0;

const AMPLITUDE: f32 = 0.5;

/// Encode `num_samples` of a mono 16-bit sine at `frequency` into a WAV
/// byte buffer.
pub fn sine_wav(num_samples: u32, frequency: f32) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for n in 0..num_samples {
        let t = n as f32 / SAMPLE_RATE as f32;
        let sample = (2.0 * std::f32::consts::PI * frequency * t).sin();
        writer.write_sample((sample * AMPLITUDE * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

/// The standard placeholder: `duration_secs` of a 440 Hz beep.
pub fn fallback_tone(duration_secs: f32) -> Result<Vec<u8>, hound::Error> {
    sine_wav((duration_secs * SAMPLE_RATE as f32) as u32, FALLBACK_HZ)
}
