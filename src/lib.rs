#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! The Mandelbrot set and its relatives are drawn by taking a point
//! `c` on the complex plane, iterating some `z -> f(z, c)` from zero,
//! and watching whether the orbit runs off to infinity.  Points whose
//! orbits stay bounded are in the set and get a single "inside"
//! colour.  Points whose orbits escape are coloured by how quickly
//! they escaped, smoothed into a continuous index so the image does
//! not band, and read off a cyclic palette.
//!
//! The work is embarrassingly parallel but very unevenly priced, so
//! the image is dealt out to the workers a row at a time, round robin
//! (see [`striped`]).  The result is a plain buffer of packed RGBA
//! words; turning that into a file is left to the caller.
//!
//! ```no_run
//! use escapetime::{RenderConfig, StripedRenderer};
//!
//! let renderer = StripedRenderer::new(RenderConfig::default())?;
//! let pixels = renderer.render()?;
//! assert_eq!(pixels.width(), 1024);
//! # Ok::<(), escapetime::RenderError>(())
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod buffer;
pub mod coloring;
pub mod config;
pub mod error;
pub mod escape;
pub mod formula;
pub mod palette;
pub mod planes;
pub mod striped;

pub use buffer::PixelBuffer;
pub use coloring::ColoringMode;
pub use config::RenderConfig;
pub use error::RenderError;
pub use escape::{escape, Bailout, Escape};
pub use formula::{Formula, Variant};
pub use palette::{Palette, Rgba};
pub use planes::{Pixel, PlaneMapper};
pub use striped::StripedRenderer;
