pub mod context;
pub mod debate;
pub mod focus;
pub mod panel;
pub mod reveal;
pub mod sequencer;
pub mod signal;
pub mod timer;
