use std::time::Duration;

use herbivore_core::{Event, GameState, Guess, PackId};
use herbivore_system_test_mode::{Config, SegmentState, TestMode};

fn requested(pack: u32, friendly: bool, clicks: u32) -> Event {
    Event::TestRequested {
        pack: PackId::new(pack),
        friendly,
        clicks,
    }
}

fn started(friendly: bool, clicks: u32) -> TestMode {
    let mut test_mode = TestMode::new(Config::default()).expect("valid config");
    let mut events = Vec::new();
    test_mode.handle(&[requested(3, friendly, clicks)], &mut events);
    test_mode
}

fn tick(test_mode: &mut TestMode, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    test_mode.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }],
        &mut events,
    );
    events
}

#[test]
fn spending_the_budget_unlocks_guesses() {
    let mut test_mode = started(true, 10);
    let mut events = Vec::new();

    for expected_remaining in (0..10).rev() {
        assert!(test_mode.click(&mut events));
        assert!(matches!(
            events.iter().rev().find(|event| matches!(event, Event::SegmentShattered { .. })),
            Some(Event::SegmentShattered { remaining, .. }) if *remaining == expected_remaining
        ));
    }

    assert_eq!(events.last(), Some(&Event::GuessesUnlocked));
    let view = test_mode.view().expect("session visible");
    assert!(view.guesses_unlocked);
    assert_eq!(view.grid.shattered_count(), 10);
    assert!(view.shows_button(Guess::Friend));
    assert!(view.shows_button(Guess::Foe));

    events.clear();
    assert!(!test_mode.click(&mut events), "budget is spent");
    assert!(events.is_empty());
}

#[test]
fn clicks_never_touch_the_border() {
    let mut test_mode = started(false, 25);
    let mut events = Vec::new();

    for _ in 0..25 {
        let _ = test_mode.click(&mut events);
    }

    let view = test_mode.view().expect("session visible");
    for (index, segment) in view.grid.segments().iter().enumerate() {
        if view.grid.is_edge(index) {
            assert_eq!(segment.state(), SegmentState::Intact, "edge {index}");
        }
    }
}

#[test]
fn budget_never_exceeds_the_clickable_segments() {
    let mut test_mode = TestMode::new(Config {
        columns: 4,
        rows: 4,
        ..Config::default()
    })
    .expect("valid config");
    let mut events = Vec::new();

    test_mode.start(PackId::new(1), true, 10, &mut events);
    assert_eq!(
        events.first(),
        Some(&Event::TestStarted {
            pack: PackId::new(1),
            clicks: 4
        })
    );

    for _ in 0..4 {
        assert!(test_mode.click(&mut events));
    }
    assert_eq!(events.last(), Some(&Event::GuessesUnlocked));
}

#[test]
fn guesses_are_ignored_until_unlocked() {
    let mut test_mode = started(true, 2);
    let mut events = Vec::new();

    test_mode.guess(Guess::Friend, &mut events);

    assert!(events.is_empty());
    assert!(test_mode.view().expect("session").feedback.is_none());
}

#[test]
fn only_the_first_guess_counts() {
    let mut test_mode = started(false, 0);
    let mut events = Vec::new();

    test_mode.guess(Guess::Foe, &mut events);
    test_mode.guess(Guess::Friend, &mut events);

    assert_eq!(
        events,
        vec![Event::GuessSubmitted {
            guess: Guess::Foe,
            correct: true
        }]
    );
    let view = test_mode.view().expect("session visible");
    assert!(view.shows_button(Guess::Foe));
    assert!(!view.shows_button(Guess::Friend));
}

#[test]
fn guess_reveals_the_face_then_completes_after_the_delay() {
    let mut test_mode = started(true, 1);
    let mut events = Vec::new();
    assert!(test_mode.click(&mut events));

    test_mode.guess(Guess::Foe, &mut events);
    let view = test_mode.view().expect("session visible");
    assert_eq!(view.grid.shattered_count(), 64);
    assert!(view.grid.segments().iter().all(|segment| segment.is_visible()));

    let flashed = tick(&mut test_mode, 200);
    assert!(flashed.is_empty());
    let view = test_mode.view().expect("still revealing");
    assert!(view.grid.segments().iter().all(|segment| !segment.is_visible()));

    let early = tick(&mut test_mode, 1000);
    assert!(early.is_empty());
    assert!(test_mode.is_active());

    let done = tick(&mut test_mode, 300);
    assert_eq!(
        done,
        vec![Event::TestCompleted {
            pack: PackId::new(3),
            correct: false
        }]
    );
    assert!(!test_mode.is_active());
}

#[test]
fn ending_cancels_the_pending_reveal() {
    let mut test_mode = started(true, 0);
    let mut events = Vec::new();
    test_mode.guess(Guess::Friend, &mut events);

    test_mode.end();

    assert!(!test_mode.is_active());
    assert!(tick(&mut test_mode, 5000).is_empty());
}

#[test]
fn terminal_states_and_resets_close_the_session() {
    for closing in [
        Event::GameStateChanged {
            state: GameState::GameOver,
        },
        Event::GameStateChanged {
            state: GameState::GameWon,
        },
        Event::GameReset,
    ] {
        let mut test_mode = started(true, 3);
        let mut events = Vec::new();
        test_mode.handle(&[closing], &mut events);
        assert!(!test_mode.is_active());
    }
}

#[test]
fn a_new_request_replaces_the_previous_session() {
    let mut test_mode = started(true, 0);
    let mut events = Vec::new();
    test_mode.guess(Guess::Friend, &mut events);

    test_mode.handle(&[requested(9, false, 5)], &mut events);
    let completed = tick(&mut test_mode, 2000);

    assert!(completed.is_empty(), "old reveal was cancelled");
    let view = test_mode.view().expect("new session");
    assert_eq!(view.pack, PackId::new(9));
    assert_eq!(view.remaining_clicks, 5);
    assert_eq!(view.grid.shattered_count(), 0);
}

#[test]
fn clicks_without_a_session_are_ignored() {
    let mut test_mode = TestMode::new(Config::default()).expect("valid config");
    let mut events = Vec::new();

    assert!(!test_mode.click(&mut events));
    test_mode.guess(Guess::Friend, &mut events);

    assert!(events.is_empty());
}
