//! End-to-end gaze pointer scenarios over a small world-space menu.

use gazecast_core::ObjectId;
use gazecast_pointer::{
    ControlButtons, DeviceButtons, GazeEvent, GazePointerConfig, InteractionSwitches,
    PointerEventKind::{self, *},
};
use gazecast_testkit::{DeliveredEvent, GazeHarness, HeadInput, SceneFixture};
use glam::Vec3;

const MENU: &str = r#"
[[objects]]
id = 1
name = "panel"
handles = ["enter", "exit", "submit"]

[[objects]]
id = 2
name = "play"
parent = 1
handles = ["enter", "exit", "down", "up", "click"]

[[objects]]
id = 3
name = "quit"
parent = 1
handles = ["enter", "exit", "click"]

[[objects]]
id = 4
name = "crate"
handles = ["enter", "exit"]

[[canvases]]
render_mode = "world_space"

[[canvases.graphics]]
object = 2
rect = { position = [0.0, 0.0, -2.0], size = [1.0, 0.5] }

[[canvases.graphics]]
object = 3
rect = { position = [3.0, 0.0, -2.0], size = [1.0, 0.5] }

[[colliders]]
object = 4
bounds = { min = [-1.0, -1.0, -6.0], max = [1.0, 1.0, -4.0] }
"#;

const PLAY: Vec3 = Vec3::new(0.0, 0.0, -2.0);
const QUIT: Vec3 = Vec3::new(3.0, 0.0, -2.0);

fn harness(config: GazePointerConfig) -> GazeHarness {
    let scene = SceneFixture::from_toml_str(MENU).expect("menu scene parses");
    GazeHarness::new(scene, config)
}

fn kinds_for(events: &[DeliveredEvent], object: u32) -> Vec<PointerEventKind> {
    events
        .iter()
        .filter(|e| e.object == ObjectId(object))
        .map(|e| e.kind)
        .collect()
}

fn first(events: &[DeliveredEvent], object: u32, kind: PointerEventKind) -> Option<DeliveredEvent> {
    events
        .iter()
        .copied()
        .find(|e| e.object == ObjectId(object) && e.kind == kind)
}

#[test]
fn steady_gaze_presses_then_clicks() {
    let mut harness = harness(GazePointerConfig::default());
    let look = HeadInput::looking(harness.look_at(PLAY));

    let events = harness.run_for(2.0, look);
    assert_eq!(kinds_for(&events, 2), vec![Enter, Down, Up, Click]);
    assert_eq!(kinds_for(&events, 1), vec![Enter]);

    let down = first(&events, 2, Down).unwrap();
    let click = first(&events, 2, Click).unwrap();
    // Ring fills after 1.5 s at 60 Hz.
    assert_eq!(down.tick.0, 90);
    assert_eq!(click.click_count, 1);
    assert!(click.tick.0 >= down.tick.0 + 11, "click at {:?}", click.tick);
    assert!(harness.pointer.pointer().is_idle());
}

#[test]
fn gaze_leaving_before_release_skips_click() {
    let mut harness = harness(GazePointerConfig::default());
    let at_play = HeadInput::looking(harness.look_at(PLAY));
    let at_quit = HeadInput::looking(harness.look_at(QUIT));

    let mut events = harness.run_for(1.5, at_play);
    events.extend(harness.step(at_play));
    assert_eq!(first(&events, 2, Down).map(|e| e.tick.0), Some(90));

    let events = harness.run_for(0.5, at_quit);
    assert_eq!(kinds_for(&events, 2), vec![Exit, Up]);
    assert_eq!(kinds_for(&events, 3), vec![Enter]);
    assert!(first(&events, 3, Click).is_none());
    // The shared parent stays entered.
    assert!(kinds_for(&events, 1).is_empty());
}

#[test]
fn trigger_button_activates_immediately() {
    let mut config = GazePointerConfig::default();
    config.gaze.time_to_gaze = 10.0;
    let mut harness = harness(config);
    let look = HeadInput::looking(harness.look_at(PLAY));
    let pressed = look.with_buttons(DeviceButtons {
        left: ControlButtons::TRIGGER_BUTTON,
        right: ControlButtons::empty(),
    });

    harness.run_for(0.5, look);
    let events = harness.step(pressed);
    assert_eq!(kinds_for(&events, 2), vec![Down]);

    // Holding the button does not retrigger; the short hold releases on its own.
    let events = harness.run_for(0.5, pressed);
    assert_eq!(kinds_for(&events, 2), vec![Up, Click]);
}

#[test]
fn untracked_button_is_ignored() {
    let mut config = GazePointerConfig::default();
    config.gaze.time_to_gaze = 10.0;
    let mut harness = harness(config);
    let look = HeadInput::looking(harness.look_at(PLAY)).with_buttons(DeviceButtons {
        left: ControlButtons::PRIMARY_2D_AXIS_CLICK,
        right: ControlButtons::empty(),
    });
    let events = harness.run_for(1.0, look);
    assert_eq!(kinds_for(&events, 2), vec![Enter]);
}

#[test]
fn submit_mode_submits_through_the_hierarchy() {
    let mut config = GazePointerConfig::default();
    config.gaze.input_event = GazeEvent::Submit;
    let mut harness = harness(config);
    let look = HeadInput::looking(harness.look_at(PLAY));

    let events = harness.run_for(2.0, look);
    assert_eq!(kinds_for(&events, 1), vec![Enter, Submit]);
    assert_eq!(kinds_for(&events, 2), vec![Enter]);
}

#[test]
fn no_focus_means_no_events() {
    let mut harness = harness(GazePointerConfig::default());
    let look = HeadInput::looking(harness.look_at(PLAY)).with_switches(InteractionSwitches {
        gaze_enabled: true,
        has_focus: false,
    });
    assert!(harness.run_for(2.0, look).is_empty());
    assert!(!harness.pointer.is_interactable());
}

#[test]
fn unfocused_time_does_not_count_as_dwell() {
    let mut harness = harness(GazePointerConfig::default());
    let look = HeadInput::looking(harness.look_at(PLAY));
    let unfocused = look.with_switches(InteractionSwitches {
        gaze_enabled: true,
        has_focus: false,
    });

    harness.run_for(0.5, look);
    assert!(harness.pointer.ring_percent() > 30.0);
    assert!(harness.run_for(3.0, unfocused).is_empty());
    assert_eq!(harness.pointer.ring_percent(), 0.0);

    // Focus is back at 3.5 s; the ring starts over from there.
    let events = harness.step(look);
    assert!(first(&events, 2, Down).is_none());
    let events = harness.run_for(1.4, look);
    assert!(first(&events, 2, Down).is_none());
    let events = harness.run_for(0.2, look);
    assert_eq!(first(&events, 2, Down).map(|e| e.tick.0), Some(300));
}

#[test]
fn always_enable_overrides_switches() {
    let mut config = GazePointerConfig::default();
    config.gaze.always_enable = true;
    let mut harness = harness(config);
    let look = HeadInput::looking(harness.look_at(PLAY)).with_switches(InteractionSwitches {
        gaze_enabled: false,
        has_focus: false,
    });
    let events = harness.run_for(2.0, look);
    assert!(first(&events, 2, Click).is_some());
}

#[test]
fn nearer_graphic_wins_over_collider_behind_it() {
    let mut harness = harness(GazePointerConfig::default());
    let look = HeadInput::looking(harness.look_at(PLAY));
    harness.step(look);
    assert_eq!(harness.pointer.target(), Some(ObjectId(2)));

    harness.scene.canvases_mut()[0].graphics[0].raycast_target = false;
    let events = harness.step(look);
    assert_eq!(harness.pointer.target(), Some(ObjectId(4)));
    assert_eq!(kinds_for(&events, 2), vec![Exit]);
    assert_eq!(kinds_for(&events, 1), vec![Exit]);
    assert_eq!(kinds_for(&events, 4), vec![Enter]);

    let hit = harness.pointer.current_hit().unwrap();
    assert!((hit.distance - 4.0).abs() < 1e-3);
}

#[test]
fn collider_outside_cast_distance_is_ignored() {
    let mut config = GazePointerConfig::default();
    config.raycast.physics_cast_distance = 3.0;
    let mut harness = harness(config);
    harness.scene.canvases_mut()[0].graphics[0].raycast_target = false;
    let look = HeadInput::looking(harness.look_at(PLAY));
    harness.step(look);
    assert_eq!(harness.pointer.target(), None);
}

#[test]
fn disabling_exits_and_reenabling_starts_fresh() {
    let mut harness = harness(GazePointerConfig::default());
    let look = HeadInput::looking(harness.look_at(PLAY));
    harness.run_for(1.0, look);

    let events = harness.disable();
    assert_eq!(kinds_for(&events, 2), vec![Exit]);
    assert_eq!(kinds_for(&events, 1), vec![Exit]);
    assert!(harness.pointer.pointer().is_idle());
    assert_eq!(harness.pointer.ring_percent(), 0.0);

    // Disabled ticks deliver nothing.
    assert!(harness.run_for(0.5, look).is_empty());

    harness.enable();
    let events = harness.step(look);
    assert_eq!(kinds_for(&events, 2), vec![Enter]);
    assert_eq!(kinds_for(&events, 1), vec![Enter]);
}
