//! VT/xterm-compatible terminal emulator engine.
//!
//! [`TerminalEngine`] drives a [`vte`] parser over host output bytes and
//! maintains a screen [`grid::Grid`], [`cursor::CursorState`], and
//! [`modes::TerminalModes`]. It has no opinion about how the screen is
//! rendered or how a PTY is spawned: an embedder wires an [`effects::EffectSink`]
//! to learn about bells, title changes, and host-bound responses, then reads
//! the grid directly to paint.

pub mod color;
pub mod cursor;
pub mod effects;
pub mod engine;
pub mod grid;
pub mod modes;
pub mod wide;

pub use color::Color;
pub use cursor::{CellAttrs, CursorShape, CursorState};
pub use effects::EffectSink;
pub use engine::TerminalEngine;
pub use grid::{Cell, CellFlags, Grid, Row};
pub use modes::TerminalModes;
