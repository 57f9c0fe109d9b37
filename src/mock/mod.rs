mod display;
mod script;

pub use display::RecordingDisplay;
pub use script::{ScriptError, ScriptedInput};
