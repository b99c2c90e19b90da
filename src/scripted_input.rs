//! Scripted head-pose and button timelines for headless replays.

use anyhow::{bail, Context, Result};
use gazecast_camera::yaw_pitch_rotation;
use gazecast_pointer::{DeviceButtons, InteractionSwitches};
use glam::Quat;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScriptedStep {
    duration: f32,
    /// Degrees around world Y, positive turns left.
    #[serde(default)]
    yaw: f32,
    /// Degrees around the head's X axis, positive looks up.
    #[serde(default)]
    pitch: f32,
    #[serde(default)]
    buttons: DeviceButtons,
    #[serde(default = "default_true")]
    focus: bool,
    #[serde(default = "default_true")]
    gaze_enabled: bool,
    #[serde(default = "default_true")]
    pointer_enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Slack when comparing accumulated time against step boundaries.
const STEP_EPSILON: f64 = 1e-6;

/// Input for one replay tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedFrame {
    pub rotation: Quat,
    pub buttons: DeviceButtons,
    pub switches: InteractionSwitches,
    /// Whether the pointer component is enabled.
    pub pointer_enabled: bool,
}

pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    time_in_step: f64,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scripted input {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("invalid scripted input {}", path.display()))
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            bail!("scripted input file contains no steps");
        }
        if let Some(step) = file
            .steps
            .iter()
            .find(|s| !(s.duration.is_finite() && s.duration > 0.0))
        {
            bail!("step duration must be positive, got {}", step.duration);
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            time_in_step: 0.0,
        })
    }

    /// Length of the whole timeline, in seconds.
    pub fn total_duration(&self) -> f32 {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Frame for the current time, then move `dt` forward. `None` once the
    /// timeline is over.
    pub fn next_frame(&mut self, dt: f32) -> Option<ScriptedFrame> {
        let frame = self.steps.get(self.index)?.to_frame();

        self.time_in_step += f64::from(dt);
        while let Some(step) = self.steps.get(self.index) {
            let duration = f64::from(step.duration);
            if self.time_in_step + STEP_EPSILON < duration {
                break;
            }
            self.time_in_step = (self.time_in_step - duration).max(0.0);
            self.index += 1;
        }
        Some(frame)
    }
}

impl ScriptedStep {
    fn to_frame(&self) -> ScriptedFrame {
        ScriptedFrame {
            rotation: yaw_pitch_rotation(self.yaw.to_radians(), self.pitch.to_radians()),
            buttons: self.buttons,
            switches: InteractionSwitches {
                gaze_enabled: self.gaze_enabled,
                has_focus: self.focus,
            },
            pointer_enabled: self.pointer_enabled,
        }
    }
}
