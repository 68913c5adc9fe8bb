#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural sound effects for Herbivore.
//!
//! Every effect is mono 16-bit PCM. Samples are truncated towards zero when
//! converted from floating point.

use std::f32::consts::TAU;

use herbivore_core::SoundCue;
use thiserror::Error;

/// Sample rate of every synthesized waveform.
pub const SAMPLE_RATE: u32 = 22_050;

const FULL_SCALE: f32 = 32_767.0;

/// Errors reported when synthesizing a tone.
#[derive(Debug, Error, PartialEq)]
pub enum AudioError {
    /// The frequency is not a positive finite number.
    #[error("frequency must be positive and finite, got {0}")]
    Frequency(f32),
    /// The duration is not a positive finite number.
    #[error("duration must be positive and finite, got {0}")]
    Duration(f32),
    /// The volume lies outside `[0, 1]`.
    #[error("volume must lie within [0, 1], got {0}")]
    Volume(f32),
}

/// Mono 16-bit PCM samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Waveform {
    sample_rate: u32,
    samples: Vec<i16>,
}

impl Waveform {
    /// Samples per second.
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Raw samples.
    #[must_use]
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Playback length in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Encodes the waveform as a RIFF WAVE file.
    #[must_use]
    pub fn to_wav(&self) -> Vec<u8> {
        const CHANNELS: u16 = 1;
        const BITS_PER_SAMPLE: u16 = 16;
        let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
        let byte_rate = self.sample_rate * u32::from(block_align);
        let data_len = u32::try_from(self.samples.len() * 2).unwrap_or(u32::MAX);

        let mut bytes = Vec::with_capacity(44 + self.samples.len() * 2);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36_u32.saturating_add(data_len)).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16_u32.to_le_bytes());
        bytes.extend_from_slice(&1_u16.to_le_bytes());
        bytes.extend_from_slice(&CHANNELS.to_le_bytes());
        bytes.extend_from_slice(&self.sample_rate.to_le_bytes());
        bytes.extend_from_slice(&byte_rate.to_le_bytes());
        bytes.extend_from_slice(&block_align.to_le_bytes());
        bytes.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for sample in &self.samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }
}

fn sample_count(duration: f32) -> usize {
    (SAMPLE_RATE as f32 * duration) as usize
}

fn render(duration: f32, mut amplitude: impl FnMut(usize, f32, f32) -> f32) -> Waveform {
    let count = sample_count(duration);
    let samples = (0..count)
        .map(|index| {
            let time = index as f32 / SAMPLE_RATE as f32;
            let progress = index as f32 / count as f32;
            (amplitude(index, time, progress) * FULL_SCALE) as i16
        })
        .collect();

    Waveform {
        sample_rate: SAMPLE_RATE,
        samples,
    }
}

/// Sine tone with a linear fade-out.
pub fn tone(frequency: f32, duration: f32, volume: f32) -> Result<Waveform, AudioError> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(AudioError::Frequency(frequency));
    }
    if !duration.is_finite() || duration <= 0.0 {
        return Err(AudioError::Duration(duration));
    }
    if !(0.0..=1.0).contains(&volume) {
        return Err(AudioError::Volume(volume));
    }

    Ok(render(duration, |_, time, progress| {
        (TAU * frequency * time).sin() * volume * (1.0 - progress)
    }))
}

/// Two rising notes, 440 Hz then 660 Hz.
#[must_use]
pub fn success() -> Waveform {
    render(0.3, |_, time, progress| {
        let (frequency, peak) = if progress < 0.5 {
            (440.0, 0.25)
        } else {
            (660.0, 0.75)
        };
        let envelope = (1.0 - (progress - peak).abs() * 4.0).clamp(0.0, 1.0);
        (TAU * frequency * time).sin() * 0.4 * envelope
    })
}

/// Descending square-wave buzz from 300 Hz to 150 Hz.
#[must_use]
pub fn fail() -> Waveform {
    render(0.4, |_, time, progress| {
        let frequency = 300.0 - progress * 150.0;
        let square = if (TAU * frequency * time).sin() > 0.0 {
            0.3
        } else {
            -0.3
        };
        square * (1.0 - progress)
    })
}

/// Short percussive ping at 550 Hz.
#[must_use]
pub fn identify_foe() -> Waveform {
    render(0.15, |_, time, progress| {
        (TAU * 550.0 * time).sin() * 0.5 * (-progress * 10.0).exp()
    })
}

/// Waveform for a cue. Music and footstep loops are streamed by the host and have none.
#[must_use]
pub fn synthesize(cue: SoundCue) -> Option<Waveform> {
    match cue {
        SoundCue::Success => Some(success()),
        SoundCue::Fail => Some(fail()),
        SoundCue::IdentifyFoe => Some(identify_foe()),
        SoundCue::TraversalMusic | SoundCue::EncounterMusic | SoundCue::SandWalk => None,
    }
}

/// File stem used when exporting a cue.
#[must_use]
pub fn cue_name(cue: SoundCue) -> &'static str {
    match cue {
        SoundCue::Success => "success",
        SoundCue::Fail => "fail",
        SoundCue::IdentifyFoe => "identify_foe",
        SoundCue::TraversalMusic => "traversal_music",
        SoundCue::EncounterMusic => "encounter_music",
        SoundCue::SandWalk => "sand_walk",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_counts_truncate() {
        assert_eq!(success().samples().len(), 6615);
        assert_eq!(fail().samples().len(), 8820);
        assert_eq!(identify_foe().samples().len(), 3307);
    }

    #[test]
    fn rejects_bad_tone_parameters() {
        assert_eq!(tone(0.0, 1.0, 0.5), Err(AudioError::Frequency(0.0)));
        assert_eq!(tone(440.0, -1.0, 0.5), Err(AudioError::Duration(-1.0)));
        assert_eq!(tone(440.0, 1.0, 1.5), Err(AudioError::Volume(1.5)));
    }
}
