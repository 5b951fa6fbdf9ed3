//! Presentation bridge
//!
//! The simulation never draws. `scene` turns a `GameState` into a flat list
//! of primitive draw commands, and the wasm-only `canvas` module replays that
//! list against a Canvas2D context. The drawing surface itself is an external
//! capability; everything here is glue.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{DrawCmd, build_scene};
