//! Sound cue handling for the command-line host.
//!
//! Playback itself is external; the deck keeps the synthesized effects ready,
//! tracks which loops should be running and logs every cue.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use herbivore_audio::{cue_name, synthesize, Waveform};
use herbivore_core::{Event, GameState, SoundCue};
use tracing::{debug, info};

use crate::observers::Observer;

const EFFECTS: [SoundCue; 3] = [SoundCue::Success, SoundCue::Fail, SoundCue::IdentifyFoe];

/// Observer turning sound cues into playback requests.
#[derive(Debug)]
pub(crate) struct AudioDeck {
    effects: HashMap<SoundCue, Waveform>,
    music: Option<SoundCue>,
    footsteps: bool,
    played: u32,
}

impl AudioDeck {
    pub(crate) fn new() -> Self {
        let effects = EFFECTS
            .iter()
            .filter_map(|cue| synthesize(*cue).map(|waveform| (*cue, waveform)))
            .collect();
        Self {
            effects,
            music: None,
            footsteps: false,
            played: 0,
        }
    }

    fn play(&mut self, cue: SoundCue) {
        if cue == SoundCue::SandWalk {
            self.walk(true);
            return;
        }

        if let Some(waveform) = self.effects.get(&cue) {
            self.played = self.played.saturating_add(1);
            info!(
                cue = cue_name(cue),
                samples = waveform.samples().len(),
                seconds = waveform.duration_secs(),
                "playing sound"
            );
            return;
        }

        if self.music == Some(cue) {
            return;
        }
        info!(track = cue_name(cue), "switching music");
        self.music = Some(cue);
    }

    fn walk(&mut self, walking: bool) {
        if self.footsteps == walking {
            return;
        }
        self.footsteps = walking;
        let cue = cue_name(SoundCue::SandWalk);
        if walking {
            debug!(cue, "footsteps looping");
        } else {
            debug!(cue, "footsteps stopped");
        }
    }
}

impl Observer for AudioDeck {
    fn notify(&mut self, event: &Event) {
        match event {
            Event::SoundCued { cue } => self.play(*cue),
            Event::PlayerWalkingChanged { walking } => self.walk(*walking),
            Event::GameStateChanged {
                state: GameState::GameOver | GameState::GameWon,
            } => {
                if let Some(track) = self.music.take() {
                    debug!(track = cue_name(track), "music stopped");
                }
            }
            _ => {}
        }
    }
}

/// Writes every synthesized effect as a WAV file into `dir`.
pub(crate) fn export_sounds(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create sound directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(EFFECTS.len());
    for cue in EFFECTS {
        let Some(waveform) = synthesize(cue) else {
            continue;
        };
        let path = dir.join(format!("{}.wav", cue_name(cue)));
        fs::write(&path, waveform.to_wav())
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "exported sound");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_play_and_music_switches_once() {
        let mut deck = AudioDeck::new();

        deck.notify(&Event::SoundCued {
            cue: SoundCue::Success,
        });
        deck.notify(&Event::SoundCued {
            cue: SoundCue::EncounterMusic,
        });
        deck.notify(&Event::SoundCued {
            cue: SoundCue::EncounterMusic,
        });

        assert_eq!(deck.played, 1);
        assert_eq!(deck.music, Some(SoundCue::EncounterMusic));
    }

    #[test]
    fn terminal_states_stop_the_music() {
        let mut deck = AudioDeck::new();
        deck.notify(&Event::SoundCued {
            cue: SoundCue::TraversalMusic,
        });

        deck.notify(&Event::GameStateChanged {
            state: GameState::GameWon,
        });

        assert_eq!(deck.music, None);
    }

    #[test]
    fn footsteps_loop_while_walking() {
        let mut deck = AudioDeck::new();

        deck.notify(&Event::PlayerWalkingChanged { walking: true });
        assert!(deck.footsteps);
        deck.notify(&Event::PlayerWalkingChanged { walking: true });
        deck.notify(&Event::PlayerWalkingChanged { walking: false });

        assert!(!deck.footsteps);
        assert_eq!(deck.played, 0);
        assert_eq!(deck.music, None);
    }

    #[test]
    fn export_writes_one_wav_per_effect() {
        let dir = std::env::temp_dir().join(format!("herbivore-sounds-{}", std::process::id()));

        let written = export_sounds(&dir).expect("export succeeds");

        assert_eq!(written.len(), 3);
        for path in &written {
            let bytes = fs::read(path).expect("file written");
            assert_eq!(&bytes[0..4], b"RIFF");
        }
        assert!(written.contains(&dir.join("identify_foe.wav")));
        fs::remove_dir_all(&dir).expect("cleanup");
    }
}
