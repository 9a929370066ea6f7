//! Simulation engine for IRONCLAD.
//!
//! Owns the rapier2d physics world, the tank and obstacle registries,
//! and the per-step collision-resolution pipeline. Completely headless
//! (no render dependency), enabling deterministic testing.

pub mod engine;
pub mod obstacle;
pub mod physics;
pub mod tank;

pub use ironclad_core as core;

pub use engine::Engine;
pub use rapier2d::prelude::ColliderHandle;

#[cfg(test)]
mod tests;
