// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parameters of a render.  Whoever drives the renderer fills one
//! of these in; nothing in it is checked until `validate` runs.

use num::Complex;

use crate::coloring::ColoringMode;
use crate::error::RenderError;
use crate::escape::{Bailout, DEFAULT_LIMIT, DEFAULT_RADIUS};
use crate::formula::Variant;
use crate::palette::{Palette, Rgba};
use crate::planes::PlaneMapper;

/// Everything a render needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Complex coordinate of the top left pixel.
    pub lefttop: Complex<f64>,
    /// Complex coordinate of the bottom right corner of the image.
    pub rightbottom: Complex<f64>,
    /// Maximum number of iterations per point.
    pub limit: usize,
    /// Escape radius; an orbit escapes once `|z| > radius`.
    pub radius: f64,
    /// Which formula to iterate.
    pub formula: Variant,
    /// How exterior points get their colour.
    pub coloring: ColoringMode,
    /// Stops for the palette based colourings.
    pub palette: Palette,
    /// Colour of points that never escape.
    pub inside: Rgba,
    /// Worker count.  `None` means one per available CPU.
    pub workers: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 1024,
            height: 1024,
            lefttop: Complex::new(-2.0, 1.2377929688),
            rightbottom: Complex::new(0.4755859375, -1.2377929688),
            limit: DEFAULT_LIMIT,
            radius: DEFAULT_RADIUS,
            formula: Variant::default(),
            coloring: ColoringMode::default(),
            palette: Palette::default(),
            inside: Rgba::BLACK,
            workers: None,
        }
    }
}

/// The checked, derived form of a [`RenderConfig`].
#[derive(Debug, Clone)]
pub struct Validated {
    /// Pixel to point mapping.
    pub plane: PlaneMapper,
    /// Iteration bound and escape radius.
    pub bailout: Bailout,
    /// Resolved worker count, at least one.
    pub workers: usize,
}

impl RenderConfig {
    /// The worker count this config asks for, with `None` resolved to
    /// the number of CPUs the host reports.
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Check every parameter and derive the grid geometry.  This is
    /// the only place configuration errors come from; once it passes,
    /// a render can only fail for lack of resources.
    pub fn validate(&self) -> Result<Validated, RenderError> {
        let plane = PlaneMapper::new(self.width, self.height, self.lefttop, self.rightbottom)?;
        let bailout = Bailout::new(self.limit, self.radius)?;
        let workers = self.workers();
        if workers == 0 {
            return Err(RenderError::parameter("threads", "must be at least 1"));
        }
        Ok(Validated {
            plane,
            bailout,
            workers,
        })
    }
}
