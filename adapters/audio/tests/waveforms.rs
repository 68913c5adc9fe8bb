use herbivore_audio::{cue_name, fail, identify_foe, success, synthesize, tone, SAMPLE_RATE};
use herbivore_core::SoundCue;

#[test]
fn tone_starts_silent_and_fades_out() {
    let waveform = tone(440.0, 0.5, 0.5).expect("valid tone");
    let samples = waveform.samples();

    assert_eq!(samples.len(), 11_025);
    assert_eq!(samples[0], 0);
    let peak = samples.iter().map(|sample| sample.unsigned_abs()).max();
    assert!(peak <= Some(16_384), "peak {peak:?}");

    let head: u32 = samples[..1000].iter().map(|s| u32::from(s.unsigned_abs())).sum();
    let tail: u32 = samples[samples.len() - 1000..]
        .iter()
        .map(|s| u32::from(s.unsigned_abs()))
        .sum();
    assert!(tail < head / 4);
}

#[test]
fn fail_buzz_is_a_fading_square_wave() {
    let waveform = fail();
    let samples = waveform.samples();

    assert_eq!(samples[0].unsigned_abs(), 9830);
    assert!(samples.iter().all(|sample| sample.unsigned_abs() <= 9830));
    assert!(samples[samples.len() - 1].unsigned_abs() < 10);
}

#[test]
fn samples_truncate_towards_zero() {
    let samples = fail().samples().to_vec();

    // 32767 * 0.3 * (1 - 1/8820) = 9828.985
    assert_eq!(samples[1], 9828);
}

#[test]
fn success_notes_peak_at_each_quarter() {
    let samples = success().samples().to_vec();
    let quarter = samples.len() / 4;

    let around = |center: usize| {
        samples[center - 50..center + 50]
            .iter()
            .map(|sample| sample.unsigned_abs())
            .max()
            .unwrap_or(0)
    };
    assert!(around(quarter) > 12_000);
    assert!(around(quarter * 3) > 12_000);
    assert!(around(quarter * 2) < 2_000, "notes are separated by silence");
}

#[test]
fn identify_foe_decays_quickly() {
    let samples = identify_foe().samples().to_vec();
    let late = samples[samples.len() / 2..]
        .iter()
        .map(|sample| sample.unsigned_abs())
        .max()
        .unwrap_or(0);
    assert!(late < 200, "late peak {late}");
}

#[test]
fn wav_header_describes_mono_pcm() {
    let waveform = identify_foe();
    let bytes = waveform.to_wav();

    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
    assert_eq!(&bytes[12..16], b"fmt ");
    assert_eq!(u16::from_le_bytes([bytes[22], bytes[23]]), 1);
    assert_eq!(
        u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
        SAMPLE_RATE
    );
    assert_eq!(&bytes[36..40], b"data");
    let data_len = u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]);
    assert_eq!(data_len as usize, waveform.samples().len() * 2);
    assert_eq!(bytes.len(), 44 + data_len as usize);
    let riff_len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    assert_eq!(riff_len as usize, bytes.len() - 8);
}

#[test]
fn only_effect_cues_are_synthesized() {
    assert!(synthesize(SoundCue::Success).is_some());
    assert!(synthesize(SoundCue::Fail).is_some());
    assert!(synthesize(SoundCue::IdentifyFoe).is_some());
    assert!(synthesize(SoundCue::TraversalMusic).is_none());
    assert!(synthesize(SoundCue::EncounterMusic).is_none());
    assert!(synthesize(SoundCue::SandWalk).is_none());
    assert_eq!(cue_name(SoundCue::IdentifyFoe), "identify_foe");
}
