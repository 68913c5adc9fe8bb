use herbivore_core::Guess;
use herbivore_rendering_macroquad::PanelInputState;

fn run_restart_sequence(sequence: &[bool]) -> Vec<bool> {
    let mut state = PanelInputState::default();
    let mut restarts = Vec::new();
    for &pressed in sequence {
        restarts.push(state.take_restart());
        if pressed {
            state.register_restart();
        }
    }

    // Flush any trailing latched press so the harness observes the final restart.
    restarts.push(state.take_restart());
    restarts
}

fn run_guess_sequence(sequence: &[Option<Guess>]) -> Vec<Option<Guess>> {
    let mut state = PanelInputState::default();
    let mut guesses = Vec::new();
    for pressed in sequence {
        guesses.push(state.take_guess());
        if let Some(guess) = pressed {
            state.register_guess(*guess);
        }
    }
    guesses.push(state.take_guess());
    guesses
}

#[test]
fn restart_button_sequence_is_deterministic() {
    let button_sequence = [false, true, false, true, true, false];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = run_restart_sequence(&button_sequence);
    let second_run = run_restart_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn guess_buttons_fire_on_the_following_frame() {
    let button_sequence = [None, Some(Guess::Friend), None, Some(Guess::Foe)];
    let expected = vec![None, None, Some(Guess::Friend), None, Some(Guess::Foe)];

    assert_eq!(run_guess_sequence(&button_sequence), expected);
}

#[test]
fn play_latch_clears_after_one_take() {
    let mut state = PanelInputState::default();
    state.register_start();

    assert!(state.take_start());
    assert!(!state.take_start());
}
