//! Gaze pointer: turns resolved hits into pointer events.
//!
//! - [`PointerStateMachine`] dispatches Enter/Exit, Hover, Down/Up/Click,
//!   the drag family and Submit through a [`PointerHost`].
//! - [`GazeActivation`] decides when the gaze counts as a press: a filled
//!   [`GazeRing`] or a tracked controller button.
//! - [`GazePointer`] ties a head-locked [`gazecast_camera::Camera`], a
//!   [`gazecast_raycast::HitResolver`] and both of the above into one tick.

pub mod activation;
pub mod ancestors;
pub mod buttons;
pub mod config;
pub mod controller;
pub mod events;
pub mod ring;
pub mod state;
pub mod state_machine;

pub use activation::{ActivationSignals, ActivationSource, GazeActivation, GazeEvent, HOLD_DURATION};
pub use ancestors::AncestorChain;
pub use buttons::{ButtonTracker, ControlButtons, DeviceButtons};
pub use config::{CameraConfig, ConfigError, GazeConfig, GazePointerConfig};
pub use controller::{is_interactable, GazeFrame, GazePointer, InteractionSwitches};
pub use events::{execute, execute_hierarchy, find_handler, PointerEventKind, PointerHost};
pub use ring::{GazeRing, RING_FULL};
pub use state::PointerState;
pub use state_machine::{PointerFrame, PointerStateMachine, CLICK_INTERVAL, TIME_TO_DRAG};
