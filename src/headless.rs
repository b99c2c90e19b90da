//! Headless replay: a scene, a scripted timeline and a pointer config in,
//! pointer events out.

use crate::scripted_input::ScriptedInputPlayer;
use anyhow::{Context, Result};
use gazecast_pointer::{GazePointerConfig, PointerEventKind};
use gazecast_testkit::{
    DeliveredEvent, EventRecord, GazeHarness, HeadInput, JsonlSink, SceneFixture,
    DEFAULT_TICKS_PER_SECOND,
};
use glam::Vec3;
use std::path::PathBuf;
use tracing::{info, warn};

pub struct ReplayConfig {
    pub scene: PathBuf,
    pub script: PathBuf,
    pub pointer_config: Option<PathBuf>,
    /// JSONL event log; events are only counted when absent.
    pub output: Option<PathBuf>,
    pub ticks_per_second: u32,
    pub max_ticks: Option<u64>,
    pub head_height: f32,
}

impl ReplayConfig {
    pub fn new(scene: PathBuf, script: PathBuf) -> Self {
        Self {
            scene,
            script,
            pointer_config: None,
            output: None,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            max_ticks: None,
            head_height: 0.0,
        }
    }
}

/// Totals of one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub ticks: u64,
    pub events: usize,
    pub clicks: usize,
    pub submits: usize,
}

impl ReplaySummary {
    fn count(&mut self, event: &DeliveredEvent) {
        self.events += 1;
        match event.kind {
            PointerEventKind::Click => self.clicks += 1,
            PointerEventKind::Submit => self.submits += 1,
            _ => {}
        }
    }
}

pub fn run(cfg: &ReplayConfig) -> Result<ReplaySummary> {
    let scene = SceneFixture::load(&cfg.scene)?;
    let player = ScriptedInputPlayer::from_path(&cfg.script)?;
    let pointer_config = match &cfg.pointer_config {
        Some(path) => GazePointerConfig::load_strict(path)
            .with_context(|| format!("failed to load pointer config {}", path.display()))?,
        None => GazePointerConfig::default(),
    };
    let mut sink = cfg.output.as_ref().map(JsonlSink::create).transpose()?;

    let harness = GazeHarness::new(scene, pointer_config)
        .with_tick_rate(cfg.ticks_per_second)
        .with_head(Vec3::new(0.0, cfg.head_height, 0.0));

    let summary = replay(harness, player, cfg.max_ticks, |harness, event| {
        let Some(sink) = sink.as_mut() else {
            return Ok(());
        };
        let name = harness.scene.name_of(event.object);
        sink.write(&EventRecord {
            tick: event.tick,
            time: event.tick.0 as f32 * harness.tick_duration(),
            kind: event.kind.as_str(),
            object: event.object,
            name: &name,
        })
    })?;

    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }
    info!(
        ticks = summary.ticks,
        events = summary.events,
        clicks = summary.clicks,
        "replay finished"
    );
    Ok(summary)
}

/// Drive `harness` with `player` until the script ends or `max_ticks` pass,
/// handing every delivered event to `on_event`.
pub fn replay<F>(
    mut harness: GazeHarness,
    mut player: ScriptedInputPlayer,
    max_ticks: Option<u64>,
    mut on_event: F,
) -> Result<ReplaySummary>
where
    F: FnMut(&GazeHarness, &DeliveredEvent) -> Result<()>,
{
    let dt = harness.tick_duration();
    let mut summary = ReplaySummary::default();

    while max_ticks.map_or(true, |max| summary.ticks < max) {
        let Some(frame) = player.next_frame(dt) else {
            break;
        };

        let mut events = Vec::new();
        if frame.pointer_enabled != harness.pointer.is_enabled() {
            if frame.pointer_enabled {
                harness.enable();
            } else {
                events.extend(harness.disable());
            }
        }

        let input = HeadInput::looking(frame.rotation)
            .with_buttons(frame.buttons)
            .with_switches(frame.switches);
        events.extend(harness.step(input));

        for event in &events {
            summary.count(event);
            on_event(&harness, event)?;
        }
        summary.ticks += 1;
    }

    if !player.is_finished() {
        warn!(ticks = summary.ticks, "replay stopped before the script ended");
    }
    Ok(summary)
}
