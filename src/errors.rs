// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error types for the fallible edges of the renderer.  The pixel
//! passes themselves cannot fail.

use failure::Fail;

/// A render configuration value outside its permitted range.
#[derive(Debug, Fail, PartialEq)]
pub enum ConfigError {
    /// A real-valued field outside its range.
    #[fail(display = "{} must be between {} and {}, got {}", name, low, high, value)]
    OutOfRange {
        /// The field's name.
        name: &'static str,
        /// Lowest permitted value.
        low: f64,
        /// Highest permitted value.
        high: f64,
        /// The value supplied.
        value: f64,
    },

    /// A count outside its range.
    #[fail(display = "{} must be between {} and {}, got {}", name, low, high, value)]
    CountOutOfRange {
        /// The field's name.
        name: &'static str,
        /// Lowest permitted value.
        low: u32,
        /// Highest permitted value.
        high: u32,
        /// The value supplied.
        value: u32,
    },

    /// Zoom must be strictly positive.
    #[fail(display = "zoom must be greater than zero, got {}", _0)]
    NonPositiveZoom(f64),

    /// The cloud band is empty or inverted.
    #[fail(display = "minimum noise {} must be below maximum noise {}", _0, _1)]
    InvertedNoiseBand(f64, f64),

    /// The canvas has no area.
    #[fail(display = "image must have a non-zero size, got {}x{}", _0, _1)]
    EmptyCanvas(usize, usize),
}

/// A failure while running the render passes.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// One of the iteration workers panicked.
    #[fail(display = "an iteration worker thread panicked")]
    WorkerPanicked,
}

/// A failure while handing the finished buffer to its sink.
#[derive(Debug, Fail)]
pub enum OutputError {
    /// The encoder rejected the buffer or could not write it.
    #[fail(display = "could not write {}: {}", path, message)]
    Encode {
        /// Where the image was going.
        path: String,
        /// What the encoder said.
        message: String,
    },
}
