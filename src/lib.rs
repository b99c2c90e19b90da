//! gazecast - gaze-driven pointer input for head-mounted displays
//!
//! Library side of the `gazecast` binary: scripted input timelines and the
//! headless replay loop. The pointer itself lives in the workspace crates.

pub mod headless;
pub mod scripted_input;
