// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Blending primitives.  None of these clamp unless they say so; the
//! pixel buffer clamps when a value is finally written.

use crate::color::Rgb;

/// Linear interpolation from `background` to `foreground` by `alpha`.
#[inline]
pub fn blend(background: f64, foreground: f64, alpha: f64) -> f64 {
    background * (1.0 - alpha) + foreground * alpha
}

/// `blend`, one channel at a time.
pub fn blend_rgb(background: Rgb, foreground: Rgb, alpha: f64) -> Rgb {
    Rgb(
        blend(background.0, foreground.0, alpha),
        blend(background.1, foreground.1, alpha),
        blend(background.2, foreground.2, alpha),
    )
}

/// Add a per-channel offset, saturating at 255.
pub fn brighten(color: Rgb, red: f64, green: f64, blue: f64) -> Rgb {
    Rgb(
        (color.0 + red).min(255.0),
        (color.1 + green).min(255.0),
        (color.2 + blue).min(255.0),
    )
}

/// A running weighted sum of noise samples, divided by a fixed
/// normalizer when read back.
#[derive(Copy, Clone, Debug)]
pub struct Layered {
    sum: f64,
    normalizer: f64,
}

impl Layered {
    /// An empty accumulator that will divide by `normalizer`.
    pub fn new(normalizer: f64) -> Self {
        Layered {
            sum: 0.0,
            normalizer,
        }
    }

    /// Add a raw sample in [-1, 1], rescaled to [0, 1], at `weight`.
    pub fn add_unit(&mut self, sample: f64, weight: f64) {
        self.sum += (sample + 1.0) / 2.0 * weight;
    }

    /// The accumulated sum over the normalizer.
    pub fn intensity(&self) -> f64 {
        self.sum / self.normalizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_alpha_keeps_background() {
        assert_eq!(blend(12.0, 200.0, 0.0), 12.0);
    }

    #[test]
    fn full_alpha_takes_foreground() {
        assert_eq!(blend(12.0, 200.0, 1.0), 200.0);
    }

    #[test]
    fn blending_a_color_with_itself_is_identity() {
        for &alpha in &[0.0, 0.25, 0.5, 0.7, 1.0] {
            assert_eq!(blend(64.0, 64.0, alpha), 64.0);
        }
    }

    #[test]
    fn blend_does_not_clamp() {
        assert_eq!(blend(0.0, 300.0, 1.0), 300.0);
    }

    #[test]
    fn blend_rgb_works_per_channel() {
        let out = blend_rgb(Rgb(0.0, 100.0, 200.0), Rgb(100.0, 100.0, 0.0), 0.5);
        assert_eq!(out, Rgb(50.0, 100.0, 100.0));
    }

    #[test]
    fn brighten_saturates() {
        assert_eq!(brighten(Rgb(10.0, 230.0, 200.0), 40.0, 40.0, 60.0), Rgb(50.0, 255.0, 255.0));
    }

    #[test]
    fn layered_rescales_then_divides() {
        let mut layers = Layered::new(2.0);
        layers.add_unit(1.0, 1.0);
        layers.add_unit(-1.0, 1.0);
        layers.add_unit(0.0, 2.0);
        assert_eq!(layers.intensity(), 1.0);
    }
}
