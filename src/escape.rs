// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape test.  This is our classic iterator function: take a
//! point, iterate a formula from zero, and report how quickly (if at
//! all) the orbit leaves the disc of the escape radius.

use num::Complex;

use crate::error::RenderError;
use crate::formula::Formula;

/// Iteration bound used when none is given.
pub const DEFAULT_LIMIT: usize = 1500;

/// Escape radius used when none is given.
pub const DEFAULT_RADIUS: f64 = 2.0;

/// What happened to a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// The orbit stayed inside the escape radius for the whole
    /// iteration bound; as close as we come to knowing the point is
    /// in the set.
    Interior,
    /// The orbit left the disc.
    Exterior {
        /// Number of iterations taken, counting the one that escaped.
        iterations: usize,
        /// The first iterate outside the disc.
        last: Complex<f64>,
    },
}

/// The limits of the escape test: how long to iterate and how far out
/// an orbit has to go before we call it escaped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bailout {
    /// The maximum number of iterations per point.
    pub limit: usize,
    /// The escape radius, squared, so the test never takes a root.
    pub radius_sqr: f64,
}

impl Bailout {
    /// Build a bailout from an iteration bound and an escape radius.
    pub fn new(limit: usize, radius: f64) -> Result<Self, RenderError> {
        if limit == 0 {
            return Err(RenderError::parameter("iterations", "must be at least 1"));
        }
        if !(radius * radius).is_finite() || radius <= 0.0 {
            return Err(RenderError::parameter(
                "radius",
                format!("{} is not a positive number with a finite square", radius),
            ));
        }
        Ok(Bailout {
            limit,
            radius_sqr: radius * radius,
        })
    }
}

impl Default for Bailout {
    fn default() -> Self {
        Bailout {
            limit: DEFAULT_LIMIT,
            radius_sqr: DEFAULT_RADIUS * DEFAULT_RADIUS,
        }
    }
}

/// Iterate `formula` for the point `c`, starting from `z = 0`, and
/// report the first iterate whose squared magnitude exceeds the
/// bailout radius squared.  Deterministic for fixed inputs.
#[inline]
pub fn escape<F: Formula + ?Sized>(formula: &F, c: Complex<f64>, bailout: &Bailout) -> Escape {
    let mut z = Complex::new(0.0, 0.0);
    for i in 0..bailout.limit {
        z = formula.next(z, c);
        if z.norm_sqr() > bailout.radius_sqr {
            return Escape::Exterior {
                iterations: i + 1,
                last: z,
            };
        }
    }
    Escape::Interior
}
