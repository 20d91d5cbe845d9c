use crate::math::Scalar;
use num_complex::Complex;

/// Trait implemented by all circuit components that can provide a frequency-domain impedance.
pub trait Component {
    /// Returns the component's impedance for an angular frequency `omega` (rad/s).
    fn impedance(&self, omega: Scalar) -> Complex<Scalar>;
}

/// Lumped resistor model.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resistor {
    resistance: Scalar,
}

impl Resistor {
    /// Creates a resistor.
    #[must_use]
    pub fn new(resistance_ohms: Scalar) -> Self {
        Self {
            resistance: resistance_ohms,
        }
    }
}

impl Component for Resistor {
    fn impedance(&self, _omega: Scalar) -> Complex<Scalar> {
        Complex::new(self.resistance, 0.0)
    }
}

/// Lumped capacitor model (ideal).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacitor {
    capacitance: Scalar,
}

impl Capacitor {
    /// Creates a capacitor.
    #[must_use]
    pub fn new(capacitance_f: Scalar) -> Self {
        Self {
            capacitance: capacitance_f,
        }
    }

    /// Capacitive reactance `-1 / (ωC)`; infinite when `ωC` vanishes.
    #[must_use]
    pub fn reactance(&self, omega: Scalar) -> Scalar {
        let product = omega * self.capacitance;
        if product == 0.0 {
            Scalar::NEG_INFINITY
        } else {
            -(1.0 / product)
        }
    }
}

impl Component for Capacitor {
    fn impedance(&self, omega: Scalar) -> Complex<Scalar> {
        Complex::new(0.0, self.reactance(omega))
    }
}

/// Lumped inductor model (ideal).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inductor {
    inductance: Scalar,
}

impl Inductor {
    /// Creates an inductor.
    #[must_use]
    pub fn new(inductance_h: Scalar) -> Self {
        Self {
            inductance: inductance_h,
        }
    }

    /// Inductive reactance `ωL`.
    #[must_use]
    pub fn reactance(&self, omega: Scalar) -> Scalar {
        omega * self.inductance
    }
}

impl Component for Inductor {
    fn impedance(&self, omega: Scalar) -> Complex<Scalar> {
        Complex::new(0.0, self.reactance(omega))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn resistor_impedance_is_real() {
        let r = Resistor::new(100.0);
        let z = r.impedance(1.0);
        assert_relative_eq!(z.re, 100.0);
        assert_relative_eq!(z.im, 0.0);
    }

    #[test]
    fn capacitor_impedance_is_reactive() {
        let c = Capacitor::new(1e-6);
        let omega = 1.0e3;
        let z = c.impedance(omega);
        assert_relative_eq!(z.re, 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(z.im, -1.0e3, max_relative = 1.0e-12);
    }

    #[test]
    fn capacitor_without_capacitance_is_an_open_circuit() {
        assert_eq!(Capacitor::new(0.0).reactance(100.0), Scalar::NEG_INFINITY);
    }

    #[test]
    fn inductor_reactance_grows_with_frequency() {
        let l = Inductor::new(2.0e-2);
        assert!(l.reactance(200.0) > l.reactance(100.0));
        assert_relative_eq!(l.impedance(100.0).im, 2.0, max_relative = 1.0e-12);
    }
}
