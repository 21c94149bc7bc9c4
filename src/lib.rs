//! Dialogue Engine — dialogue sequencing and debate mini-games for
//! story-driven games.
//!
//! Sequences branching conversation scripts, reveals speech text
//! progressively, orchestrates camera-focus and panel-emphasis
//! animation, and runs a scored cross-examination mini-game with an
//! adaptively timed answer window. Rendering, audio, and input polling
//! stay in the host game: the engine consumes tick deltas and logical
//! "continue"/selection inputs, and announces state changes over a
//! typed signal bus.

pub mod core;
pub mod schema;
