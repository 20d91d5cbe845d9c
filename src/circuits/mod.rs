//! Circuit primitives for the driven series loop.

/// Lumped component definitions and traits.
pub mod component;
/// The driven series R-L-C model and its prescribed current waveform.
pub mod model;

pub use component::{Capacitor, Component, Inductor, Resistor};
pub use model::CircuitModel;
