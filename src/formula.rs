// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Iteration formulas.  Every member of the family we render is a map
//! `z -> f(z, c)` started at `z = 0`; the only thing that changes
//! between the Mandelbrot set, the Burning Ship and the Tricorn is
//! what happens to `z` before it is squared.

use num::Complex;
use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;

/// A single step of an escape-time iteration.  Implementations must
/// be pure: the same `z` and `c` always produce the same result.
pub trait Formula: Sync {
    /// Produce the next iterate from the current one and the point's
    /// constant.
    fn next(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64>;
}

/// The Mandelbrot set: `z² + c`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Standard;

/// The Burning Ship: fold `z` into the first quadrant, then square.
#[derive(Copy, Clone, Debug, Default)]
pub struct BurningShip;

/// The Tricorn (Mandelbar): square the conjugate.
#[derive(Copy, Clone, Debug, Default)]
pub struct Tricorn;

/// `(z - 1)³ + c`, a cubic with its critical point moved off the
/// origin.
#[derive(Copy, Clone, Debug, Default)]
pub struct ShiftedCubic;

impl Formula for Standard {
    #[inline]
    fn next(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        z * z + c
    }
}

impl Formula for BurningShip {
    #[inline]
    fn next(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        let folded = Complex::new(z.re.abs(), z.im.abs());
        folded * folded + c
    }
}

impl Formula for Tricorn {
    #[inline]
    fn next(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        let conj = z.conj();
        conj * conj + c
    }
}

impl Formula for ShiftedCubic {
    #[inline]
    fn next(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        let w = z - Complex::new(1.0, 0.0);
        w * w * w + c
    }
}

/// Names the formula a render uses.  The choice is made once per
/// render; the renderer turns it into one of the unit strategies above
/// so the inner loop is monomorphic.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Variant {
    /// See [`Standard`].
    Standard,
    /// See [`BurningShip`].
    BurningShip,
    /// See [`Tricorn`].
    Tricorn,
    /// See [`ShiftedCubic`].
    ShiftedCubic,
}

impl Variant {
    /// Every variant, in the order the CLI lists them.
    pub const ALL: [Variant; 4] = [
        Variant::Standard,
        Variant::BurningShip,
        Variant::Tricorn,
        Variant::ShiftedCubic,
    ];

    /// The name used on the command line and for output directories.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::BurningShip => "burning-ship",
            Variant::Tricorn => "tricorn",
            Variant::ShiftedCubic => "cubic",
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Standard
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .iter()
            .cloned()
            .find(|v| v.name() == s)
            .ok_or_else(|| {
                RenderError::parameter("formula", format!("unknown formula {:?}", s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    #[test]
    fn standard_squares_and_adds() {
        assert_eq!(Standard.next(c(1.0, 1.0), c(0.5, -0.5)), c(0.5, 1.5));
    }

    #[test]
    fn burning_ship_folds_before_squaring() {
        // (1 + i)² = 2i, whatever the signs going in.
        for z in &[c(1.0, 1.0), c(-1.0, 1.0), c(1.0, -1.0), c(-1.0, -1.0)] {
            assert_eq!(BurningShip.next(*z, c(0.0, 0.0)), c(0.0, 2.0));
        }
    }

    #[test]
    fn tricorn_squares_the_conjugate() {
        // conj(1 + 2i)² = (1 - 2i)² = -3 - 4i
        assert_eq!(Tricorn.next(c(1.0, 2.0), c(0.0, 0.0)), c(-3.0, -4.0));
    }

    #[test]
    fn shifted_cubic_moves_the_origin() {
        assert_eq!(ShiftedCubic.next(c(0.0, 0.0), c(0.25, 0.0)), c(-0.75, 0.0));
        assert_eq!(ShiftedCubic.next(c(1.0, 0.0), c(0.25, 0.5)), c(0.25, 0.5));
    }

    #[test]
    fn variants_parse_by_name() {
        for v in &Variant::ALL {
            assert_eq!(v.name().parse::<Variant>(), Ok(*v));
        }
        assert!("julia".parse::<Variant>().is_err());
    }
}
