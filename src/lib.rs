#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fogbrot renderer
//!
//! Renders an escape-time fractal, either the Mandelbrot set or a
//! Julia set, and dresses it up as a piece of night sky.  Each point
//! of the complex plane is iterated until its orbit escapes; how
//! quickly it escapes picks its hue, saturation and lightness.  Points
//! that never escape are left dark, and a scattering of them become
//! stars.  Over all of it go layers of coherent noise: a faint wash
//! behind everything, a cloud band through part of the fractal's
//! halo, and fog that drifts across the whole image without ever
//! touching a star.
//!
//! The whole render is a fixed sequence of passes over one pixel
//! buffer; see the `render` module for the order and what each pass
//! needs from the ones before it.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate rand;

pub mod canvas;
pub mod color;
pub mod composite;
pub mod config;
pub mod errors;
pub mod escape;
pub mod noise;
pub mod output;
pub mod planes;
pub mod render;
pub mod stars;

pub use canvas::{ColoredAreaMask, PixelBuffer};
pub use config::{RenderConfig, CANVAS_SIZE};
pub use errors::{ConfigError, OutputError, RenderError};
pub use escape::FractalKind;
pub use noise::{NoiseField, Perlin};
pub use render::{FractalRenderer, Rendering};
pub use stars::StarRecord;
