// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning escape results into colours.
//!
//! A raw escape count bands badly: every pixel that escaped on the
//! same step gets the same colour.  The smooth index folds in how far
//! past the escape radius the last iterate landed, which gives a
//! continuous value to feed a palette.

use num::Complex;
use std::f64::consts::LN_2;
use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;
use crate::palette::Rgba;

/// The continuous escape index `n - log2(ln 2 / |z|)` for a point that
/// escaped after `iterations` steps with `last` as its first iterate
/// outside the disc.
#[inline]
pub fn smooth_index(iterations: usize, last: Complex<f64>) -> f64 {
    iterations as f64 - (LN_2 / last.norm()).log2()
}

/// A palette-free colouring that runs each channel around a sine
/// wave of its own frequency.
pub fn sinusoidal(nu: f64) -> Rgba {
    let wave = |frequency: f64, phase: f64| ((frequency * nu + phase).sin() + 1.0) * 115.0 + 25.0;
    Rgba::new(
        wave(0.016, 4.0) as u8,
        wave(0.013, 2.0) as u8,
        wave(0.01, 1.0) as u8,
        0xFF,
    )
}

/// How exterior points are coloured.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColoringMode {
    /// Smooth index looked up directly in the cyclic palette.
    Smooth,
    /// Smooth index run through [`sinusoidal`]; the palette is unused.
    Sinusoidal,
    /// Two passes: smooth indices first, then each one is normalized
    /// against the minimum and maximum of the whole image and read off
    /// the palette as a gradient.
    Normalized,
}

impl ColoringMode {
    /// Every mode, in the order the CLI lists them.
    pub const ALL: [ColoringMode; 3] = [
        ColoringMode::Smooth,
        ColoringMode::Sinusoidal,
        ColoringMode::Normalized,
    ];

    /// The name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ColoringMode::Smooth => "smooth",
            ColoringMode::Sinusoidal => "sinusoidal",
            ColoringMode::Normalized => "normalized",
        }
    }
}

impl Default for ColoringMode {
    fn default() -> Self {
        ColoringMode::Smooth
    }
}

impl fmt::Display for ColoringMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColoringMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColoringMode::ALL
            .iter()
            .cloned()
            .find(|m| m.name() == s)
            .ok_or_else(|| RenderError::parameter("coloring", format!("unknown mode {:?}", s)))
    }
}
