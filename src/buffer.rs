// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The output raster: one packed `u32` colour per pixel, row-major.
//! See [`crate::palette::Rgba::pack`] for the bit layout.

use std::slice::ChunksMut;

use crate::error::RenderError;
use crate::palette::Rgba;

/// A dense, row-major grid of packed colours.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

/// Allocate `width * height` cells set to `fill`, or say why not.
pub(crate) fn allocate_grid<T: Clone>(
    width: usize,
    height: usize,
    fill: T,
) -> Result<Vec<T>, RenderError> {
    let failed = || RenderError::Allocation { width, height };
    let len = width.checked_mul(height).ok_or_else(failed)?;
    let mut cells = Vec::new();
    cells.try_reserve_exact(len).map_err(|_| failed())?;
    cells.resize(len, fill);
    Ok(cells)
}

impl PixelBuffer {
    /// Allocate a buffer for a `width` by `height` image.  Every pixel
    /// starts out as zero (fully transparent black).
    pub fn allocate(width: usize, height: usize) -> Result<Self, RenderError> {
        Ok(PixelBuffer {
            width,
            height,
            pixels: allocate_grid(width, height, 0)?,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Split the buffer into its rows.  Each row is a separate mutable
    /// borrow, so rows can be handed to different workers.
    pub fn rows_mut(&mut self) -> ChunksMut<u32> {
        self.pixels.chunks_mut(self.width.max(1))
    }

    /// The colour at `(x, y)`, if that pixel exists.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Rgba::unpack(self.pixels[y * self.width + x]))
    }

    /// The packed pixels, row-major.
    pub fn as_slice(&self) -> &[u32] {
        &self.pixels
    }

    /// The pixels as bytes in R, G, B, A order, ready for an 8-bit RGBA
    /// encoder.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            bytes.extend_from_slice(&p.to_le_bytes());
        }
        bytes
    }

    /// Give up the buffer and keep the packed pixels.
    pub fn into_raw(self) -> Vec<u32> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_zeroes_every_pixel() {
        let buffer = PixelBuffer::allocate(7, 3).unwrap();
        assert_eq!(buffer.as_slice().len(), 21);
        assert!(buffer.as_slice().iter().all(|p| *p == 0));
    }

    #[test]
    fn allocate_refuses_overflowing_sizes() {
        assert_eq!(
            PixelBuffer::allocate(usize::max_value(), 2),
            Err(RenderError::Allocation {
                width: usize::max_value(),
                height: 2
            })
        );
    }

    #[test]
    fn rows_are_row_major() {
        let mut buffer = PixelBuffer::allocate(3, 2).unwrap();
        for (y, row) in buffer.rows_mut().enumerate() {
            for (x, p) in row.iter_mut().enumerate() {
                *p = Rgba::new(x as u8, y as u8, 0, 255).pack();
            }
        }
        assert_eq!(buffer.get(2, 1), Some(Rgba::new(2, 1, 0, 255)));
        assert_eq!(buffer.get(3, 0), None);
        assert_eq!(buffer.get(0, 2), None);
        assert_eq!(buffer.as_slice()[4], Rgba::new(1, 1, 0, 255).pack());
    }

    #[test]
    fn bytes_come_out_rgba() {
        let mut buffer = PixelBuffer::allocate(2, 1).unwrap();
        {
            let mut rows = buffer.rows_mut();
            if let Some(row) = rows.next() {
                row[0] = Rgba::new(1, 2, 3, 4).pack();
                row[1] = Rgba::new(5, 6, 7, 8).pack();
            }
        }
        assert_eq!(buffer.to_rgba_bytes(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(buffer.into_raw().len(), 2);
    }
}
