// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render configuration.  Built once per render by whatever
//! collects the user's choices, validated there, and read-only after
//! that; the render passes never re-check it.

use num::Complex;

use crate::errors::ConfigError;
use crate::escape::FractalKind;
use crate::planes::PlaneMapper;

/// The edge length of the square canvas.
pub const CANVAS_SIZE: usize = 800;

/// Everything a render needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Iteration cap, 1 to 10000.
    pub max_iterations: u32,
    /// Pixels per unit of the complex plane.
    pub zoom: f64,
    /// The complex point at the center of the image.
    pub offset: Complex<f64>,
    /// Hue of the fastest-escaping points, in degrees.
    pub base_hue: f64,
    /// Saturation in percent.
    pub saturation: f64,
    /// Lightness in percent.
    pub lightness: f64,
    /// Mandelbrot or Julia.
    pub kind: FractalKind,
    /// Lower edge of the cloud band, as a fraction of the cap.
    pub min_noise: f64,
    /// Upper edge of the cloud band, as a fraction of the cap.
    pub max_noise: f64,
    /// Opacity of the fog overlay, 0.1 to 0.8.
    pub fog_density: f64,
    /// Base frequency of the fog, 0.001 to 0.05.
    pub fog_size: f64,
    /// Octaves of fog, 1 to 8.
    pub fog_layers: u32,
    /// Sharpness of the star glow falloff; higher is tighter.
    pub star_clarity: f64,
    /// Keep fog off pixels the fractal pass did not color.
    pub clear_black_fog: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: CANVAS_SIZE,
            height: CANVAS_SIZE,
            max_iterations: 100,
            zoom: 300.0,
            offset: Complex::new(-0.75, 0.0),
            base_hue: 200.0,
            saturation: 70.0,
            lightness: 30.0,
            kind: FractalKind::Mandelbrot,
            min_noise: 0.2,
            max_noise: 0.6,
            fog_density: 0.4,
            fog_size: 0.01,
            fog_layers: 5,
            star_clarity: 1.0,
            clear_black_fog: false,
        }
    }
}

fn in_range(name: &'static str, value: f64, low: f64, high: f64) -> Result<(), ConfigError> {
    // written so that NaN is rejected too
    if value >= low && value <= high {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            low,
            high,
            value,
        })
    }
}

fn count_in_range(name: &'static str, value: u32, low: u32, high: u32) -> Result<(), ConfigError> {
    if value >= low && value <= high {
        Ok(())
    } else {
        Err(ConfigError::CountOutOfRange {
            name,
            low,
            high,
            value,
        })
    }
}

impl RenderConfig {
    /// Check every field against its permitted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyCanvas(self.width, self.height));
        }
        if !(self.zoom > 0.0) || !self.zoom.is_finite() {
            return Err(ConfigError::NonPositiveZoom(self.zoom));
        }
        count_in_range("iteration count", self.max_iterations, 1, 10_000)?;
        in_range("hue", self.base_hue, 0.0, 360.0)?;
        in_range("saturation", self.saturation, 0.0, 100.0)?;
        in_range("lightness", self.lightness, 0.0, 100.0)?;
        in_range("minimum noise", self.min_noise, 0.0, 1.0)?;
        in_range("maximum noise", self.max_noise, 0.0, 1.0)?;
        if self.min_noise >= self.max_noise {
            return Err(ConfigError::InvertedNoiseBand(self.min_noise, self.max_noise));
        }
        in_range("fog density", self.fog_density, 0.1, 0.8)?;
        in_range("fog size", self.fog_size, 0.001, 0.05)?;
        count_in_range("fog layer count", self.fog_layers, 1, 8)?;
        in_range("star clarity", self.star_clarity, 0.1, 10.0)?;
        Ok(())
    }

    /// The pixel-to-plane mapping this configuration describes.
    pub fn plane(&self) -> PlaneMapper {
        PlaneMapper::new(self.width, self.height, self.zoom, self.offset)
    }
}
