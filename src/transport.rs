//! Conversion of loop current into motion of discrete charge markers.
//!
//! Every marker moves by `separation · |I[i-1]| · dt` per step, in the direction given by
//! the sign of the current, so all markers share one speed and their spacing is preserved
//! modulo the perimeter.

use rayon::prelude::*;

use crate::config::LoopConfig;
use crate::math::{wrap_once, Scalar};
use crate::samples::{SampleError, SampleStore};
use crate::simulation::{SimulationError, TimeSeries};

/// Parameters of the marker transport pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeTransport {
    marker_count: usize,
    separation_distance: Scalar,
    perimeter: Scalar,
}

impl ChargeTransport {
    /// Creates a transport pass for `marker_count` markers spaced `separation_distance` apart.
    pub fn new(
        marker_count: usize,
        separation_distance: Scalar,
        perimeter: Scalar,
    ) -> Result<Self, SimulationError> {
        if perimeter <= 0.0 || !perimeter.is_finite() {
            return Err(SimulationError::InvalidConfig("loop perimeter must be > 0".into()));
        }
        if separation_distance <= 0.0 || !separation_distance.is_finite() {
            return Err(SimulationError::InvalidConfig("separation_distance must be > 0".into()));
        }
        Ok(Self {
            marker_count,
            separation_distance,
            perimeter,
        })
    }

    /// Creates the transport pass described by `config`.
    pub fn from_config(config: &LoopConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Self::new(config.marker_count(), config.separation_distance, config.perimeter())
    }

    /// Number of markers moved by [`advance`](Self::advance).
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.marker_count
    }

    /// Loop perimeter markers wrap at.
    #[must_use]
    pub fn perimeter(&self) -> Scalar {
        self.perimeter
    }

    /// Evenly spaced starting positions `j · separation`, folded into the loop.
    #[must_use]
    pub fn initial_positions(&self) -> Vec<Scalar> {
        (0..self.marker_count)
            .map(|j| wrap_once(j as Scalar * self.separation_distance, self.perimeter))
            .collect()
    }

    /// Position after one step from `previous`, given the currents at steps `i - 1` and `i`.
    ///
    /// An exact zero current at step `i` freezes the marker. A prior position outside
    /// `[0, perimeter]` is left untouched.
    #[must_use]
    pub fn step(
        &self,
        previous: Scalar,
        current_prev: Scalar,
        current: Scalar,
        dt: Scalar,
    ) -> Scalar {
        if current == 0.0 || !(0.0..=self.perimeter).contains(&previous) {
            return previous;
        }
        let displacement = self.separation_distance * current_prev.abs() * dt;
        if current_prev > 0.0 {
            let next = previous + displacement;
            if next >= self.perimeter {
                wrap_once(next, self.perimeter)
            } else {
                next
            }
        } else if current_prev < 0.0 {
            let next = previous - displacement;
            if next < 0.0 {
                wrap_once(next, self.perimeter)
            } else {
                next
            }
        } else {
            previous
        }
    }

    /// Full trajectories for the evenly spaced markers.
    #[must_use]
    pub fn advance(&self, series: &TimeSeries) -> MarkerTrajectories {
        self.advance_from(&self.initial_positions(), series)
    }

    /// Full trajectories for markers starting at `initial`.
    #[must_use]
    pub fn advance_from(&self, initial: &[Scalar], series: &TimeSeries) -> MarkerTrajectories {
        let _span = tracing::info_span!(
            "charge_transport",
            markers = initial.len(),
            steps = series.len()
        )
        .entered();
        let positions = initial
            .par_iter()
            .map(|&start| {
                let mut trajectory = Vec::with_capacity(series.len());
                self.walk(start, series, |_, s| trajectory.push(s));
                trajectory
            })
            .collect();
        MarkerTrajectories {
            positions,
            perimeter: self.perimeter,
        }
    }

    /// Moves the evenly spaced markers and keeps only every `increment`-th step.
    ///
    /// Equivalent to `advance(series).sample(increment)` without holding the dense array.
    pub fn sample(
        &self,
        series: &TimeSeries,
        increment: usize,
    ) -> Result<SampleStore, SampleError> {
        self.sample_from(&self.initial_positions(), series, increment)
    }

    /// Streaming counterpart of [`advance_from`](Self::advance_from).
    pub fn sample_from(
        &self,
        initial: &[Scalar],
        series: &TimeSeries,
        increment: usize,
    ) -> Result<SampleStore, SampleError> {
        if increment == 0 {
            return Err(SampleError::ZeroIncrement);
        }
        let _span = tracing::info_span!(
            "charge_transport_sampled",
            markers = initial.len(),
            increment
        )
        .entered();
        let rows = initial
            .par_iter()
            .map(|&start| {
                let mut row = Vec::with_capacity(series.len().div_ceil(increment));
                self.walk(start, series, |step, s| {
                    if step % increment == 0 {
                        row.push(s);
                    }
                });
                row
            })
            .collect();
        Ok(SampleStore::from_rows(rows, increment))
    }

    fn walk<F>(&self, start: Scalar, series: &TimeSeries, mut visit: F)
    where
        F: FnMut(usize, Scalar),
    {
        if series.is_empty() {
            return;
        }
        let dt = series.time_step();
        let currents = series.currents();
        let mut s = start;
        visit(0, s);
        for step in 1..currents.len() {
            s = self.step(s, currents[step - 1], currents[step], dt);
            visit(step, s);
        }
    }
}

/// Dense per-marker loop positions, one entry per simulation step.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerTrajectories {
    positions: Vec<Vec<Scalar>>,
    perimeter: Scalar,
}

impl MarkerTrajectories {
    /// Number of markers.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of simulation steps per marker.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.positions.first().map_or(0, Vec::len)
    }

    /// Perimeter the positions wrap at.
    #[must_use]
    pub fn perimeter(&self) -> Scalar {
        self.perimeter
    }

    /// Trajectory of marker `marker`.
    #[must_use]
    pub fn marker(&self, marker: usize) -> Option<&[Scalar]> {
        self.positions.get(marker).map(Vec::as_slice)
    }

    /// Position of `marker` at simulation step `step`.
    #[must_use]
    pub fn position(&self, marker: usize, step: usize) -> Option<Scalar> {
        self.positions.get(marker)?.get(step).copied()
    }

    /// All trajectories, indexed by marker.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.positions
    }

    /// Keeps every `increment`-th step of each trajectory.
    pub fn sample(&self, increment: usize) -> Result<SampleStore, SampleError> {
        SampleStore::sample(&self.positions, increment)
    }
}

/// Forward distance from `from` to `to` around a loop of length `perimeter`.
#[must_use]
pub fn cyclic_distance(from: Scalar, to: Scalar, perimeter: Scalar) -> Scalar {
    (to - from).rem_euclid(perimeter)
}
