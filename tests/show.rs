mod common;

use approx::assert_relative_eq;
use coinworks::{Channel, Effect, FireworksShow, ShowConfig};
use common::{FRAME, RecordingMixer, ScriptedRandom, still_particles, test_config};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::path::PathBuf;
use std::time::Duration;

type TestShow = FireworksShow<RecordingMixer, ScriptedRandom>;

fn show_with(config: ShowConfig, mixer: RecordingMixer) -> TestShow {
    FireworksShow::new(80, 48, config, mixer, ScriptedRandom::constant(0.5))
}

fn show() -> TestShow {
    show_with(test_config(), RecordingMixer::default())
}

fn run_for(show: &mut TestShow, duration: Duration, step: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < duration {
        show.update(step);
        elapsed += step;
    }
}

fn left_click(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn create_firework_adds_one_burst_at_point() {
    let mut show = show();
    show.create_firework(50.0, 50.0);

    assert_eq!(show.particles().len(), 25);
    for particle in show.particles() {
        assert_eq!((particle.x, particle.y), (50.0, 50.0));
        assert_eq!(particle.opacity(), 1.0);
    }
}

#[test]
fn nothing_launches_or_plays_before_start() {
    let mut show = show();
    run_for(&mut show, Duration::from_secs(5), FRAME);

    assert!(!show.is_started());
    assert!(show.rockets().is_empty());
    assert!(show.mixer().played.is_empty());
}

#[test]
fn activation_starts_soundtrack_and_launcher() {
    let mut show = show();
    show.activate();

    assert!(show.is_started());
    assert!(show.start_button().is_none());
    assert_eq!(
        show.mixer().on(Channel::Background),
        vec![PathBuf::from("clip1.ogg")]
    );

    run_for(&mut show, Duration::from_millis(2000), Duration::from_millis(10));
    // Launches at 10ms, 810ms and 1610ms
    assert_eq!(show.rockets().len(), 3);
}

#[test]
fn activation_is_idempotent() {
    let mut show = show();
    show.activate();
    show.activate();

    assert_eq!(show.mixer().played.len(), 1);
}

#[test]
fn auto_launch_starts_from_bottom_edge() {
    let mut show = show();
    show.activate();
    show.update(FRAME);

    let rocket = &show.rockets()[0];
    assert_eq!(rocket.origin(), (40.0, 48.0));
    assert_eq!(rocket.born(), FRAME);
}

#[test]
fn expired_rocket_becomes_exactly_one_burst() {
    let mut config = test_config();
    config.particle = still_particles();
    let mut show = show_with(config, RecordingMixer::default());

    show.launch(20.0);
    run_for(&mut show, Duration::from_secs(1), FRAME);
    show.launch(60.0);
    assert_eq!(show.rockets().len(), 2);
    assert!(show.particles().is_empty());

    // Hand-advance a lone rocket to predict its burst point
    let mut twin = show.rockets()[0].clone();
    let mut exploded = false;
    while !exploded {
        let before = show.clock();
        exploded = twin.update(before + FRAME);
        show.update(FRAME);
    }

    assert_eq!(show.rockets().len(), 1);
    assert_eq!(show.particles().len(), 25);
    for particle in show.particles() {
        assert_eq!(particle.x, twin.x);
        assert_relative_eq!(particle.y, twin.y, epsilon = 1e-4);
        // Updated once in the frame that spawned it
        assert_relative_eq!(particle.opacity(), 1.0 - still_particles().fade_step, epsilon = 1e-6);
    }
}

#[test]
fn bursts_land_inside_a_standard_terminal() {
    let mut config = test_config();
    config.particle = still_particles();
    let mut show = show_with(config, RecordingMixer::default());

    show.launch(40.0);
    while show.particles().is_empty() {
        show.update(FRAME);
        assert!(show.clock() < Duration::from_secs(4), "rocket never burst");
    }

    let height = show.canvas().height() as f32;
    for particle in show.particles() {
        assert!(
            particle.y >= 0.0 && particle.y < height,
            "burst at y = {} on a surface {height} tall",
            particle.y
        );
        assert_relative_eq!(particle.y, height * 0.4, epsilon = 0.05);
    }
}

#[test]
fn rockets_launched_after_resize_climb_the_new_height() {
    let mut config = test_config();
    config.particle = still_particles();
    let mut show = show_with(config, RecordingMixer::default());
    show.resize(80, 120);

    show.launch(40.0);
    while show.particles().is_empty() {
        show.update(FRAME);
    }

    assert_relative_eq!(show.particles()[0].y, 120.0 * 0.4, epsilon = 0.05);
}

#[test]
fn spent_particles_are_removed() {
    let mut config = test_config();
    config.particle.fade_step = 0.25;
    let mut show = show_with(config, RecordingMixer::default());
    show.create_firework(10.0, 10.0);

    for _ in 0..4 {
        show.frame();
        assert_eq!(show.particles().len(), 25);
    }
    assert!(show.particles().iter().all(|p| p.is_spent()));

    show.frame();
    assert!(show.particles().is_empty());
}

#[test]
fn click_launches_rocket_and_plays_cue() {
    let mut show = show();
    show.handle_event(&left_click(7, 3));

    assert_eq!(show.rockets().len(), 1);
    assert_eq!(show.rockets()[0].origin(), (7.0, 48.0));
    assert_eq!(show.mixer().on(Channel::Effect).len(), 1);
    assert!(show.mixer().on(Channel::Background).is_empty());
    assert!(!show.is_started());
}

#[test]
fn rejected_cue_still_launches() {
    let mut show = show_with(test_config(), RecordingMixer::rejecting());
    show.click(30, 2);

    assert_eq!(show.rockets().len(), 1);
    assert!(show.mixer().played.is_empty());
}

#[test]
fn clicking_start_control_activates_without_launching() {
    let mut show = show();
    let (column, row, width) = show.start_button().map(|b| b.bounds(80, 48)).unwrap();
    assert!(width > 0);

    show.handle_event(&left_click((column + 1) as u16, row as u16));

    assert!(show.is_started());
    assert!(show.rockets().is_empty());
    assert!(show.mixer().on(Channel::Effect).is_empty());
}

#[test]
fn enter_key_activates() {
    let mut show = show();
    show.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    assert!(show.is_started());
}

#[test]
fn resize_keeps_entities() {
    let mut show = show();
    show.launch(10.0);
    show.create_firework(5.0, 5.0);

    show.resize(120, 60);

    assert_eq!(show.canvas().width(), 120);
    assert_eq!(show.canvas().height(), 60);
    assert_eq!(show.rockets().len(), 1);
    assert_eq!(show.particles().len(), 25);
}

#[test]
fn blocked_soundtrack_does_not_stop_launcher() {
    let mut show = show_with(test_config(), RecordingMixer::rejecting());
    show.activate();
    run_for(&mut show, Duration::from_secs(6), FRAME);

    assert!(!show.soundtrack().is_waiting());
    assert_eq!(show.soundtrack().index(), 0);
    assert!(!show.rockets().is_empty());
}

#[test]
fn render_overlays_start_control_until_activated() {
    let mut show = show();
    show.update(FRAME);

    let mut out = Vec::new();
    show.render(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("\x1b[H"));
    assert!(text.contains("to start"));

    show.activate();
    let mut out = Vec::new();
    show.render(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("to start"));
    assert_eq!(text.matches('▄').count(), 80 * 24);
}
