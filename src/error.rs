// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can stop a render.  Configuration problems are
//! caught before a single worker starts; the rest are resource
//! failures that abort the render without handing back a buffer.

/// The error type for every fallible operation in the crate.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum RenderError {
    /// The two corners do not describe a usable rectangle.
    #[fail(display = "invalid viewport: {}", _0)]
    Viewport(String),

    /// A scalar render parameter is out of range.
    #[fail(display = "invalid {}: {}", parameter, reason)]
    Parameter {
        /// Name of the offending parameter, as the CLI spells it.
        parameter: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Interpolation needs something to interpolate between.
    #[fail(display = "palette needs at least 2 stops, got {}", _0)]
    Palette(usize),

    /// A palette stop could not be read.
    #[fail(display = "could not parse colour {:?}", _0)]
    Colour(String),

    /// The pixel or index grid could not be allocated.
    #[fail(display = "could not allocate a {}x{} buffer", width, height)]
    Allocation {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The operating system refused to start a worker thread.
    #[fail(display = "failed to start worker {}: {}", worker, reason)]
    WorkerSpawn {
        /// Stripe number of the worker that could not be started.
        worker: usize,
        /// The underlying I/O error, rendered.
        reason: String,
    },

    /// A worker died before finishing its stripe.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

impl RenderError {
    pub(crate) fn parameter<S: Into<String>>(parameter: &'static str, reason: S) -> Self {
        RenderError::Parameter {
            parameter,
            reason: reason.into(),
        }
    }
}
