// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colours and palettes.
//!
//! A colour is four 8-bit channels.  In the pixel buffer it is stored
//! packed into a `u32` as `red | green << 8 | blue << 16 | alpha << 24`,
//! which puts the bytes in R, G, B, A order when the word is written
//! out little-endian.  That order is fixed, whatever the host.
//!
//! A palette is a cyclic list of colour stops.  There are two ways to
//! look a colour up, and they are kept apart on purpose: `interpolate`
//! takes a smooth escape index and wraps around the stops, `gradient`
//! takes a normalized position in `[0, 1]` and walks the stops once.

use num::clamp;
use std::str::FromStr;

use crate::error::RenderError;

/// A colour with red, green, blue and alpha channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha channel; 255 is opaque.
    pub alpha: u8,
}

impl Rgba {
    /// Opaque black, the default colour of the set itself.
    pub const BLACK: Rgba = Rgba::new(0x00, 0x00, 0x00, 0xFF);

    /// Build a colour from its four channels.
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Rgba {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Pack the channels into a word: red in the low byte, alpha in the
    /// high byte.
    #[inline]
    pub fn pack(self) -> u32 {
        u32::from(self.red)
            | u32::from(self.green) << 8
            | u32::from(self.blue) << 16
            | u32::from(self.alpha) << 24
    }

    /// Inverse of [`Rgba::pack`].
    #[inline]
    pub fn unpack(packed: u32) -> Self {
        Rgba::new(
            (packed & 0xFF) as u8,
            (packed >> 8 & 0xFF) as u8,
            (packed >> 16 & 0xFF) as u8,
            (packed >> 24) as u8,
        )
    }

    /// Blend channel by channel towards `other`.  `frac` of zero gives
    /// back `self` untouched.
    #[inline]
    fn lerp(self, other: Rgba, frac: f64) -> Rgba {
        let mix = |first: u8, second: u8| -> u8 {
            let first = f64::from(first);
            let value = first + frac * (f64::from(second) - first);
            clamp(value, 0.0, 255.0) as u8
        };
        Rgba::new(
            mix(self.red, other.red),
            mix(self.green, other.green),
            mix(self.blue, other.blue),
            mix(self.alpha, other.alpha),
        )
    }
}

/// Hex notation: `RRGGBB` or `RRGGBBAA`, with an optional leading `#`.
impl FromStr for Rgba {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || RenderError::Colour(s.to_string());
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(bad());
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| bad());
        let alpha = if hex.len() == 8 { channel(6)? } else { 0xFF };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

/// An ordered, cyclic sequence of at least two colour stops.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    stops: Vec<Rgba>,
}

impl Palette {
    /// Wrap a list of stops.  Fewer than two stops cannot be
    /// interpolated and are refused.
    pub fn new(stops: Vec<Rgba>) -> Result<Self, RenderError> {
        if stops.len() < 2 {
            return Err(RenderError::Palette(stops.len()));
        }
        Ok(Palette { stops })
    }

    /// The stops, in order.
    pub fn stops(&self) -> &[Rgba] {
        &self.stops
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false; a palette has at least two stops.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Colour for a smooth escape index `nu` produced under an
    /// iteration bound of `limit`.
    ///
    /// The bound is spread evenly over the stops, so stop `k` is
    /// `floor(nu * len / limit)`; the fractional part of `nu` blends
    /// stop `k` into stop `k + 1`.  Both wrap around the palette.
    /// Negative or non-finite indices are read as zero.
    pub fn interpolate(&self, nu: f64, limit: usize) -> Rgba {
        let nu = if nu.is_finite() && nu > 0.0 { nu } else { 0.0 };
        let len = self.stops.len();
        let scaled = (nu * len as f64 / limit.max(1) as f64).floor();
        // Past u64::MAX the cast saturates, which is still a valid stop
        // after the modulo.
        let k = (scaled as u64 % len as u64) as usize;
        let frac = nu.fract();
        self.stops[k].lerp(self.stops[(k + 1) % len], frac)
    }

    /// Colour at position `t` along the palette read once, first stop
    /// to last, without wrapping.  `t` is clamped to `[0, 1]`.
    pub fn gradient(&self, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { clamp(t, 0.0, 1.0) };
        let last = self.stops.len() - 1;
        let position = t * last as f64;
        let k = (position.floor() as usize).min(last);
        if k == last {
            return self.stops[last];
        }
        self.stops[k].lerp(self.stops[k + 1], position - k as f64)
    }
}

// A deep-blue to gold to white cycle, as 0xRRGGBB.
const DEFAULT_STOPS: [u32; 8] = [
    0x00_07_64, 0x20_6B_CB, 0xED_FF_FF, 0xFF_AA_00, 0x00_02_00, 0x0C_2C_52, 0x6E_3A_8E, 0xC8_64_32,
];

impl Default for Palette {
    fn default() -> Self {
        let stops = DEFAULT_STOPS
            .iter()
            .map(|rgb| Rgba::new((rgb >> 16) as u8, (rgb >> 8 & 0xFF) as u8, (rgb & 0xFF) as u8, 0xFF))
            .collect();
        Palette { stops }
    }
}

/// Comma separated list of hex colours, e.g. `000764,206bcb,edffff`.
impl FromStr for Palette {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stops = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Rgba::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Palette::new(stops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw() -> Palette {
        Palette::new(vec![Rgba::new(0, 0, 0, 255), Rgba::new(200, 100, 50, 0)]).unwrap()
    }

    #[test]
    fn packing_puts_red_in_the_low_byte() {
        let c = Rgba::new(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.pack(), 0x4433_2211);
        assert_eq!(c.pack().to_le_bytes(), [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(Rgba::unpack(0x4433_2211), c);
        assert_eq!(Rgba::BLACK.pack(), 0xFF00_0000);
    }

    #[test]
    fn palettes_need_two_stops() {
        assert_eq!(Palette::new(vec![]), Err(RenderError::Palette(0)));
        assert_eq!(Palette::new(vec![Rgba::BLACK]), Err(RenderError::Palette(1)));
        let pair = Palette::new(vec![Rgba::BLACK, Rgba::BLACK]).unwrap();
        assert_eq!(pair.len(), 2);
        assert!(!pair.is_empty());
    }

    #[test]
    fn interpolate_is_exact_on_stops() {
        let palette = Palette::default();
        let limit = 800;
        let per_stop = limit / palette.len();
        for (k, stop) in palette.stops().iter().enumerate() {
            let nu = (k * per_stop) as f64;
            assert_eq!(palette.interpolate(nu, limit), *stop);
        }
    }

    #[test]
    fn interpolate_blends_by_the_fraction() {
        let palette = bw();
        // limit == len, so k == floor(nu).
        assert_eq!(palette.interpolate(0.5, 2), Rgba::new(100, 50, 25, 127));
        assert_eq!(palette.interpolate(0.25, 2), Rgba::new(50, 25, 12, 191));
    }

    #[test]
    fn interpolate_wraps_past_the_last_stop() {
        let palette = bw();
        // k = 1, so the blend runs from the last stop back to the first.
        assert_eq!(palette.interpolate(1.5, 2), Rgba::new(100, 50, 25, 127));
        assert_eq!(palette.interpolate(2.0, 2), palette.stops()[0]);
        assert_eq!(palette.interpolate(1e300, 2), palette.interpolate(1e300, 2));
    }

    #[test]
    fn interpolate_clamps_garbage_to_zero() {
        let palette = bw();
        let first = palette.stops()[0];
        assert_eq!(palette.interpolate(-3.5, 100), first);
        assert_eq!(palette.interpolate(std::f64::NAN, 100), first);
        assert_eq!(palette.interpolate(std::f64::INFINITY, 100), first);
    }

    #[test]
    fn gradient_spans_first_to_last() {
        let palette = bw();
        assert_eq!(palette.gradient(0.0), palette.stops()[0]);
        assert_eq!(palette.gradient(1.0), palette.stops()[1]);
        assert_eq!(palette.gradient(0.5), Rgba::new(100, 50, 25, 127));
        assert_eq!(palette.gradient(7.0), palette.stops()[1]);
        assert_eq!(palette.gradient(-1.0), palette.stops()[0]);
    }

    #[test]
    fn colours_parse_from_hex() {
        assert_eq!("#ff8000".parse::<Rgba>(), Ok(Rgba::new(255, 128, 0, 255)));
        assert_eq!("ff800040".parse::<Rgba>(), Ok(Rgba::new(255, 128, 0, 64)));
        assert!("ff80".parse::<Rgba>().is_err());
        assert!("gg8000".parse::<Rgba>().is_err());
    }

    #[test]
    fn palettes_parse_from_lists() {
        let palette: Palette = "000000,ffffff".parse().unwrap();
        assert_eq!(palette.stops(), &[Rgba::new(0, 0, 0, 255), Rgba::new(255, 255, 255, 255)]);
        assert_eq!("000000".parse::<Palette>(), Err(RenderError::Palette(1)));
    }
}
