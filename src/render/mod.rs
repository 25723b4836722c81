//! Canvas2D presentation layer
//!
//! Reads the post-step state each frame and draws it; never mutates the
//! sim. Cosmetic animation phase (coin/power-up rotation, shake jitter)
//! lives here, not in the simulation.

pub mod sky;

#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
pub use canvas::Renderer;
