//! Fixed-step transient integration of the driven loop current.

use std::io;
use std::io::Write;

use crate::circuits::CircuitModel;
use crate::config::LoopConfig;
use crate::math::Scalar;

/// Trait for simulation engines.
pub trait SimulationEngine {
    /// Executes the simulation using the provided configuration.
    fn run(&mut self, config: &LoopConfig) -> Result<(), SimulationError>;
}

/// Errors that can occur while configuring or executing simulations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// Raised when the configuration is internally inconsistent.
    #[error("configuration error: {0}")]
    InvalidConfig(String),
    /// Raised when the integrator produces a non-finite current.
    #[error("integration anomaly at step {step} (t = {time:e} s): current is {current}")]
    IntegrationAnomaly {
        /// Step index of the offending value.
        step: usize,
        /// Simulation time of the offending value.
        time: Scalar,
        /// The non-finite current itself.
        current: Scalar,
    },
}

/// Largest step count whose time and current buffers can still be allocated.
pub const MAX_STEP_COUNT: usize = isize::MAX as usize / std::mem::size_of::<Scalar>();

/// `ceil(duration / dt)`, or `InvalidConfig` when it is not a usable buffer length.
pub fn checked_step_count(dt: Scalar, duration: Scalar) -> Result<usize, SimulationError> {
    if dt <= 0.0 || !dt.is_finite() {
        return Err(SimulationError::InvalidConfig("time_step must be > 0".into()));
    }
    if duration <= 0.0 || !duration.is_finite() {
        return Err(SimulationError::InvalidConfig("duration must be > 0".into()));
    }
    let steps = (duration / dt).ceil();
    if !steps.is_finite() || steps > MAX_STEP_COUNT as Scalar {
        return Err(SimulationError::InvalidConfig(format!(
            "step count {steps:e} exceeds {MAX_STEP_COUNT}"
        )));
    }
    Ok(steps as usize)
}

/// Current samples on a uniform time grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    time_step: Scalar,
    times: Vec<Scalar>,
    currents: Vec<Scalar>,
}

impl TimeSeries {
    /// Assembles a series from raw samples. Both vectors must have the same length.
    pub fn from_samples(
        time_step: Scalar,
        times: Vec<Scalar>,
        currents: Vec<Scalar>,
    ) -> Result<Self, SimulationError> {
        if times.len() != currents.len() {
            return Err(SimulationError::InvalidConfig(format!(
                "time and current sample counts differ ({} vs {})",
                times.len(),
                currents.len()
            )));
        }
        if time_step <= 0.0 || !time_step.is_finite() {
            return Err(SimulationError::InvalidConfig("time_step must be > 0".into()));
        }
        if let Some((step, &current)) = currents.iter().enumerate().find(|(_, i)| !i.is_finite()) {
            return Err(SimulationError::IntegrationAnomaly {
                step,
                time: times[step],
                current,
            });
        }
        Ok(Self {
            time_step,
            times,
            currents,
        })
    }

    /// Uniform step between consecutive samples.
    #[must_use]
    pub fn time_step(&self) -> Scalar {
        self.time_step
    }

    /// Sample times, accumulated step by step from zero.
    #[must_use]
    pub fn times(&self) -> &[Scalar] {
        &self.times
    }

    /// Instantaneous loop current at each sample.
    #[must_use]
    pub fn currents(&self) -> &[Scalar] {
        &self.currents
    }

    /// Total captured samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True if no samples recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterates `(time, current)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (Scalar, Scalar)> + '_ {
        self.times.iter().copied().zip(self.currents.iter().copied())
    }
}

/// One classical fourth-order Runge-Kutta step of `dy/dt = f(t, y)`.
#[must_use]
pub fn rk4_step<F>(f: F, time: Scalar, y: Scalar, dt: Scalar) -> Scalar
where
    F: Fn(Scalar, Scalar) -> Scalar,
{
    let half = dt / 2.0;
    let k1 = f(time, y);
    let k2 = f(time + half, y + half * k1);
    let k3 = f(time + half, y + half * k2);
    let k4 = f(time + dt, y + dt * k3);
    y + dt / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
}

/// Integrates the loop current of `model` over `[0, duration)` with step `dt`.
///
/// Produces `ceil(duration / dt)` samples. Sample times are accumulated (`t[i] = t[i-1] + dt`)
/// rather than recomputed from the index.
pub fn integrate_current(
    model: &CircuitModel,
    dt: Scalar,
    duration: Scalar,
) -> Result<TimeSeries, SimulationError> {
    let steps = checked_step_count(dt, duration)?;
    let _span = tracing::info_span!("current_solver", steps, dt).entered();

    let mut times = Vec::with_capacity(steps);
    let mut currents = Vec::with_capacity(steps);
    times.push(0.0);
    currents.push(model.initial_current());

    let derivative = |t: Scalar, _i: Scalar| model.current_derivative(t);
    for step in 1..steps {
        let t_prev = times[step - 1];
        let i_prev = currents[step - 1];
        let time = t_prev + dt;
        let current = rk4_step(derivative, t_prev, i_prev, dt);
        if !current.is_finite() {
            tracing::error!(step, time, current, "non-finite current");
            return Err(SimulationError::IntegrationAnomaly {
                step,
                time,
                current,
            });
        }
        times.push(time);
        currents.push(current);
    }

    tracing::debug!(samples = times.len(), "current integration finished");
    Ok(TimeSeries {
        time_step: dt,
        times,
        currents,
    })
}

/// RK4 engine for the prescribed loop current.
#[derive(Debug, Clone, Default)]
pub struct CurrentSolver {
    series: TimeSeries,
}

impl CurrentSolver {
    /// Creates an engine with an empty capture buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the captured series (populated after `run`).
    #[must_use]
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Consumes and returns the series.
    #[must_use]
    pub fn into_series(self) -> TimeSeries {
        self.series
    }
}

impl SimulationEngine for CurrentSolver {
    fn run(&mut self, config: &LoopConfig) -> Result<(), SimulationError> {
        let model = CircuitModel::from_config(config)?;
        self.series = integrate_current(&model, config.time_step, config.duration)?;
        Ok(())
    }
}

/// Writes a CSV of the loop current over time.
pub fn write_current_csv<W: Write>(mut w: W, series: &TimeSeries) -> io::Result<()> {
    writeln!(w, "time,current")?;
    for (time, current) in series.iter() {
        writeln!(w, "{:.16e},{:.16e}", time, current)?;
    }
    Ok(())
}
