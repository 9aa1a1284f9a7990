// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Color conversion.  The renderer thinks in hue, saturation and
//! lightness, because walking the hue wheel by the escape velocity
//! is what gives the fractal its banding; the pixel buffer thinks in
//! red, green and blue.

/// A red/green/blue triple, each channel a real number nominally in
/// [0, 255].  Channels are kept as floats until they are written to
/// the pixel buffer so that blending never compounds rounding error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgb(pub f64, pub f64, pub f64);

impl Rgb {
    /// Pure white.
    pub const WHITE: Rgb = Rgb(255.0, 255.0, 255.0);

    /// Pure black.
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);

    /// Multiply every channel by the same factor.
    pub fn scale(self, factor: f64) -> Rgb {
        Rgb(self.0 * factor, self.1 * factor, self.2 * factor)
    }

    /// Euclidean distance between two colors in RGB space.
    pub fn distance(self, other: Rgb) -> f64 {
        let (dr, dg, db) = (self.0 - other.0, self.1 - other.1, self.2 - other.2);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Convert a hue in degrees and a saturation and lightness in percent
/// into an RGB triple, each channel rounded to the nearest integer.
/// Nothing here is validated: values outside the documented ranges
/// run through the same formula.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = hue / 360.0;
    let s = saturation / 100.0;
    let l = lightness / 100.0;

    if s == 0.0 {
        let gray = (l * 255.0).round();
        return Rgb(gray, gray, gray);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb(
        (hue_to_channel(p, q, h + 1.0 / 3.0) * 255.0).round(),
        (hue_to_channel(p, q, h) * 255.0).round(),
        (hue_to_channel(p, q, h - 1.0 / 3.0) * 255.0).round(),
    )
}
