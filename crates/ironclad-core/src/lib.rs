//! Core types and definitions for the IRONCLAD tank simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! configs, colors, collision categories, events, errors, and the
//! recyclable-handle registry. It has no dependency on the physics
//! backend or any runtime framework.

pub mod categories;
pub mod color;
pub mod config;
pub mod error;
pub mod events;
pub mod registry;

#[cfg(test)]
mod tests;
