// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel buffer and the colored-area mask that the render passes
//! write into.  Both are row-major, one entry per pixel.

use crate::color::Rgb;

/// Channels per pixel: red, green, blue, alpha.
pub const CHANNELS: usize = 4;

/// Round and clamp a real channel value into a byte.  NaN becomes 0.
#[inline]
pub fn to_channel(value: f64) -> u8 {
    num::clamp(value.round(), 0.0, 255.0) as u8
}

/// A width x height grid of RGBA bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        PixelBuffer {
            width,
            height,
            data: vec![0; width * height * CHANNELS],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y * self.width + x) * CHANNELS
    }

    /// The color at (x, y), alpha dropped.
    pub fn rgb(&self, x: usize, y: usize) -> Rgb {
        let o = self.offset(x, y);
        Rgb(
            f64::from(self.data[o]),
            f64::from(self.data[o + 1]),
            f64::from(self.data[o + 2]),
        )
    }

    /// The four channels at (x, y).
    pub fn rgba(&self, x: usize, y: usize) -> [u8; 4] {
        let o = self.offset(x, y);
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }

    /// Write a color at (x, y), rounding and clamping each channel.
    /// Alpha is left alone.
    pub fn set_rgb(&mut self, x: usize, y: usize, color: Rgb) {
        let o = self.offset(x, y);
        self.data[o] = to_channel(color.0);
        self.data[o + 1] = to_channel(color.1);
        self.data[o + 2] = to_channel(color.2);
    }

    /// Paint every pixel with `color` at full opacity.
    pub fn fill(&mut self, color: Rgb) {
        let rgba = [to_channel(color.0), to_channel(color.1), to_channel(color.2), 255];
        for pixel in self.data.chunks_mut(CHANNELS) {
            pixel.copy_from_slice(&rgba);
        }
    }
}

/// One flag per pixel: true where the fractal pass laid down color.
#[derive(Clone, Debug, PartialEq)]
pub struct ColoredAreaMask {
    width: usize,
    cells: Vec<bool>,
}

impl ColoredAreaMask {
    /// An all-false mask.
    pub fn new(width: usize, height: usize) -> Self {
        ColoredAreaMask {
            width,
            cells: vec![false; width * height],
        }
    }

    /// Is (x, y) colored?
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x]
    }

    /// Mark (x, y).
    pub fn set(&mut self, x: usize, y: usize, colored: bool) {
        self.cells[y * self.width + x] = colored;
    }

    /// How many pixels are colored.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_and_clamp() {
        assert_eq!(to_channel(12.4), 12);
        assert_eq!(to_channel(12.5), 13);
        assert_eq!(to_channel(-3.0), 0);
        assert_eq!(to_channel(300.0), 255);
        assert_eq!(to_channel(std::f64::NAN), 0);
    }

    #[test]
    fn fill_is_opaque() {
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.fill(Rgb(5.0, 5.0, 12.0));
        assert_eq!(buffer.rgba(2, 1), [5, 5, 12, 255]);
        assert_eq!(buffer.as_bytes().len(), 3 * 2 * CHANNELS);
    }

    #[test]
    fn set_rgb_keeps_alpha() {
        let mut buffer = PixelBuffer::new(2, 2);
        buffer.fill(Rgb::BLACK);
        buffer.set_rgb(1, 0, Rgb(10.2, 300.0, -1.0));
        assert_eq!(buffer.rgba(1, 0), [10, 255, 0, 255]);
        assert_eq!(buffer.rgb(0, 0), Rgb::BLACK);
    }

    #[test]
    fn mask_counts_marks() {
        let mut mask = ColoredAreaMask::new(4, 4);
        mask.set(1, 2, true);
        mask.set(3, 3, true);
        assert!(mask.get(1, 2));
        assert!(!mask.get(2, 1));
        assert_eq!(mask.count(), 2);
    }
}
