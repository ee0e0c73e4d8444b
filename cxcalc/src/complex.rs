//! # Complex numbers
//!
//! [`Complex`] is a plain `Copy` value of two `f64` components. Every
//! operation returns a new value; nothing mutates in place.
//!
//! Division by zero is not an error. It follows IEEE float division, so
//! `1 / 0` yields NaN components, which [`Display`](std::fmt::Display)
//! renders as `NaN + NaNi`.
//!
//! ## Example
//! ```rust
//! # use cxcalc::Complex;
//! let z = Complex::new(3.0, 4.0);
//! assert_eq!(z.abs(), Complex::new(5.0, 0.0));
//! assert_eq!((z * Complex::I).to_string(), "-4 + 3i");
//! assert_eq!(z.conj().to_string(), "3 + -4i");
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A complex number with double-precision components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub real: f64,
    pub imag: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex::new(0.0, 0.0);
    pub const ONE: Complex = Complex::new(1.0, 0.0);
    /// The imaginary unit.
    pub const I: Complex = Complex::new(0.0, 1.0);

    pub const fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }

    pub fn add(self, other: Complex) -> Complex {
        Complex::new(self.real + other.real, self.imag + other.imag)
    }

    pub fn sub(self, other: Complex) -> Complex {
        Complex::new(self.real - other.real, self.imag - other.imag)
    }

    pub fn mul(self, other: Complex) -> Complex {
        Complex::new(
            self.real * other.real - self.imag * other.imag,
            self.real * other.imag + self.imag * other.real,
        )
    }

    /// `self * conj(other) / |other|²`, componentwise.
    ///
    /// A zero denominator is divided through as is, producing NaN or
    /// infinite components.
    pub fn div(self, other: Complex) -> Complex {
        let d = other.real * other.real + other.imag * other.imag;
        let n = self.mul(other.conj());
        Complex::new(n.real / d, n.imag / d)
    }

    pub fn neg(self) -> Complex {
        Complex::new(-self.real, -self.imag)
    }

    pub fn conj(self) -> Complex {
        Complex::new(self.real, -self.imag)
    }

    /// Squared magnitude, as a complex with zero imaginary part.
    pub fn norm(self) -> Complex {
        Complex::new(self.real * self.real + self.imag * self.imag, 0.0)
    }

    /// Magnitude, as a complex with zero imaginary part.
    pub fn abs(self) -> Complex {
        Complex::new(self.real.hypot(self.imag), 0.0)
    }

    /// Principal argument in radians, in `(-π, π]`.
    pub fn arg(self) -> Complex {
        Complex::new(self.imag.atan2(self.real), 0.0)
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::add(self, rhs)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::sub(self, rhs)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::mul(self, rhs)
    }
}

impl Div for Complex {
    type Output = Complex;
    fn div(self, rhs: Complex) -> Complex {
        Complex::div(self, rhs)
    }
}

impl Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex::neg(self)
    }
}

/// Canonical form: `0`, `<imag>i`, `<real>`, or `<real> + <imag>i`.
///
/// The joiner is always ` + `, so a negative imaginary part prints as
/// `1 + -2i`.
impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.real == 0.0, self.imag == 0.0) {
            (true, true) => write!(f, "0"),
            (true, false) => write!(f, "{}i", self.imag),
            (false, true) => write!(f, "{}", self.real),
            (false, false) => write!(f, "{} + {}i", self.real, self.imag),
        }
    }
}
