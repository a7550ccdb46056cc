// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The striped renderer.
//!
//! The cost of a row depends wildly on where it sits: rows that cross
//! the boundary of the set run most of their points to the iteration
//! bound, rows far outside escape in a step or two.  Cutting the image
//! into contiguous blocks leaves most threads idle while one grinds
//! through the boundary.  Instead row `y` goes to worker `y % T`, so
//! every worker gets a thin slice of every region of the image.
//!
//! Each worker owns its rows outright (they are disjoint `&mut`
//! slices of the pixel buffer), so nothing is locked.  Worker 0 runs
//! on the calling thread; the rest are scoped threads that are joined
//! before the buffer is handed back.

use itertools::{Itertools, MinMaxResult};
use log::{debug, info};
use std::f64::NAN;
use std::panic::{self, AssertUnwindSafe};

use crate::buffer::{allocate_grid, PixelBuffer};
use crate::coloring::{sinusoidal, smooth_index, ColoringMode};
use crate::config::{RenderConfig, Validated};
use crate::error::RenderError;
use crate::escape::{escape, Bailout, Escape};
use crate::formula::{BurningShip, Formula, ShiftedCubic, Standard, Tricorn, Variant};
use crate::palette::Rgba;
use crate::planes::{Pixel, PlaneMapper};

/// One worker's share of the rows: each row with its index.
pub type Stripe<T> = Vec<(usize, T)>;

/// Deal `rows` out to `workers` stripes, row `y` going to stripe
/// `y % workers`.  Every row lands in exactly one stripe; stripes may
/// be empty when there are more workers than rows.
pub fn stripe<I: IntoIterator>(rows: I, workers: usize) -> Vec<Stripe<I::Item>> {
    let workers = workers.max(1);
    let mut stripes: Vec<Stripe<I::Item>> = (0..workers).map(|_| Vec::new()).collect();
    for (y, row) in rows.into_iter().enumerate() {
        stripes[y % workers].push((y, row));
    }
    stripes
}

/// Run `job` once per stripe and collect what each returns, in stripe
/// order.  Stripe 0 runs on the calling thread, the others on scoped
/// threads.  Returns only after every thread has been joined.
fn run_stripes<T, R, J>(stripes: Vec<Stripe<T>>, job: J) -> Result<Vec<R>, RenderError>
where
    T: Send,
    R: Send,
    J: Fn(usize, Stripe<T>) -> R + Sync,
{
    let job = &job;
    let count = stripes.len();
    let mut stripes = stripes.into_iter();
    let first = match stripes.next() {
        Some(first) => first,
        None => return Ok(vec![]),
    };

    debug!("running {} stripes", count);
    let joined = crossbeam::scope(|spawner| -> Result<Vec<R>, RenderError> {
        let mut handles = Vec::with_capacity(count - 1);
        for (worker, stripe) in (1..count).zip(stripes) {
            let handle = spawner
                .builder()
                .name(format!("stripe-{}", worker))
                .spawn(move |_| job(worker, stripe))
                .map_err(|e| RenderError::WorkerSpawn {
                    worker,
                    reason: e.to_string(),
                })?;
            handles.push(handle);
        }

        // The scope re-raises a panic of its own closure, so stripe 0
        // has to be caught here rather than by the scope.
        let own = panic::catch_unwind(AssertUnwindSafe(|| job(0, first)));
        let mut results = Vec::with_capacity(count);
        results.push(own.map_err(|_| RenderError::WorkerPanicked)?);
        for handle in handles {
            results.push(handle.join().map_err(|_| RenderError::WorkerPanicked)?);
        }
        Ok(results)
    })
    .map_err(|_| RenderError::WorkerPanicked)
    .and_then(|results| results);
    debug!("all {} stripes joined", count);
    joined
}

fn bounds(extent: MinMaxResult<f64>) -> Option<(f64, f64)> {
    match extent {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(low, high) => Some((low, high)),
    }
}

fn widen(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> Option<(f64, f64)> {
    match (a, b) {
        (Some((al, ah)), Some((bl, bh))) => Some((al.min(bl), ah.max(bh))),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Renders an escape-time fractal into a [`PixelBuffer`] over a fixed
/// number of row-striped workers.  Once built, the renderer does not
/// change; rendering twice gives the same pixels, and so does
/// rendering with a different worker count.
#[derive(Debug)]
pub struct StripedRenderer {
    config: RenderConfig,
    plane: PlaneMapper,
    bailout: Bailout,
    workers: usize,
}

impl StripedRenderer {
    /// Validate `config` and keep it.  Every configuration error is
    /// reported here, before any memory is allocated or any thread
    /// started.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let Validated {
            plane,
            bailout,
            workers,
        } = config.validate()?;
        Ok(StripedRenderer {
            config,
            plane,
            bailout,
            workers,
        })
    }

    /// The configuration this renderer was built from.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The pixel to point mapping.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// Number of workers a render is split over.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Render the whole image.  The buffer comes back only once every
    /// worker has finished; on any failure there is no buffer at all.
    pub fn render(&self) -> Result<PixelBuffer, RenderError> {
        match self.config.formula {
            Variant::Standard => self.render_with(&Standard),
            Variant::BurningShip => self.render_with(&BurningShip),
            Variant::Tricorn => self.render_with(&Tricorn),
            Variant::ShiftedCubic => self.render_with(&ShiftedCubic),
        }
    }

    fn render_with<F: Formula>(&self, formula: &F) -> Result<PixelBuffer, RenderError> {
        let mut buffer = PixelBuffer::allocate(self.plane.width(), self.plane.height())?;
        match self.config.coloring {
            ColoringMode::Smooth => {
                let palette = &self.config.palette;
                let limit = self.bailout.limit;
                self.single_pass(formula, &mut buffer, &|nu: f64| palette.interpolate(nu, limit))?
            }
            ColoringMode::Sinusoidal => self.single_pass(formula, &mut buffer, &sinusoidal)?,
            ColoringMode::Normalized => self.two_pass(formula, &mut buffer)?,
        }
        info!(
            "rendered {}x{} {} / {} over {} workers",
            self.plane.width(),
            self.plane.height(),
            self.config.formula,
            self.config.coloring,
            self.workers
        );
        Ok(buffer)
    }

    #[inline]
    fn escape_at<F: Formula>(&self, formula: &F, x: usize, y: usize) -> Escape {
        escape(formula, self.plane.pixel_to_point(&Pixel(x, y)), &self.bailout)
    }

    /// Colour every pixel straight from its smooth index.
    fn single_pass<F, S>(&self, formula: &F, buffer: &mut PixelBuffer, shade: &S) -> Result<(), RenderError>
    where
        F: Formula,
        S: Fn(f64) -> Rgba + Sync,
    {
        let inside = self.config.inside.pack();
        let stripes = stripe(buffer.rows_mut(), self.workers);
        debug!("partitioned {} rows into {} stripes", self.plane.height(), stripes.len());

        run_stripes(stripes, |_, rows| {
            for (y, row) in rows {
                for (x, slot) in row.iter_mut().enumerate() {
                    *slot = match self.escape_at(formula, x, y) {
                        Escape::Interior => inside,
                        Escape::Exterior { iterations, last } => shade(smooth_index(iterations, last)).pack(),
                    };
                }
            }
        })?;
        Ok(())
    }

    /// First pass: every worker fills in the smooth index of its rows
    /// and reports the smallest and largest it saw.  Second pass, after
    /// all of them have joined: colour each pixel by where its index
    /// falls between the global extremes.
    fn two_pass<F: Formula>(&self, formula: &F, buffer: &mut PixelBuffer) -> Result<(), RenderError> {
        let width = self.plane.width();
        // NaN marks a point that never escaped.
        let mut indices = allocate_grid(width, self.plane.height(), NAN)?;

        let stripes = stripe(indices.chunks_mut(width), self.workers);
        let extents = run_stripes(stripes, |_, rows| {
            let mut extent = None;
            for (y, row) in rows {
                for (x, slot) in row.iter_mut().enumerate() {
                    *slot = match self.escape_at(formula, x, y) {
                        Escape::Interior => NAN,
                        Escape::Exterior { iterations, last } => smooth_index(iterations, last),
                    };
                }
                let seen = row.iter().cloned().filter(|nu| !nu.is_nan()).minmax();
                extent = widen(extent, bounds(seen));
            }
            extent
        })?;

        let (low, high) = extents.into_iter().fold(None, widen).unwrap_or((0.0, 0.0));
        let span = high - low;
        debug!("smooth index spans {} to {}", low, high);

        let inside = self.config.inside.pack();
        let palette = &self.config.palette;
        let stripes = stripe(buffer.rows_mut().zip(indices.chunks(width)), self.workers);
        run_stripes(stripes, |_, rows| {
            for (_, (row, nus)) in rows {
                for (slot, nu) in row.iter_mut().zip(nus) {
                    *slot = if nu.is_nan() {
                        inside
                    } else if span > 0.0 {
                        palette.gradient((nu - low) / span).pack()
                    } else {
                        palette.gradient(0.0).pack()
                    };
                }
            }
        })?;
        Ok(())
    }
}
