// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time iteration.  A point is iterated until its orbit leaves
//! the circle of radius 2 or the iteration cap is reached; the count
//! at exit is the point's "velocity."  A point that reaches the cap is
//! treated as inside the set.
//!
//! Points with NaN coordinates (which is what a zero zoom produces)
//! are classified as escaped, never as inside.  A Julia orbit starts at
//! the NaN point itself and fails the `< 4` comparison at once, so it
//! reports zero iterations; a Mandelbrot orbit starts at z = 0, passes
//! the first test, and reports one.

use num::Complex;

/// Strength of the sinusoidal nudge applied to every Mandelbrot step.
pub const PERTURBATION: f64 = 0.005;

const BAILOUT: f64 = 4.0;

/// Which recurrence to run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FractalKind {
    /// z <- z² + point, starting from zero, with a perturbation term.
    Mandelbrot,
    /// z <- z² + c, starting from the point.
    Julia(Complex<f64>),
}

impl FractalKind {
    /// Iterate `point` under this recurrence, up to `cap` steps.
    pub fn iterations(&self, point: Complex<f64>, cap: u32) -> u32 {
        match *self {
            FractalKind::Mandelbrot => mandelbrot(point, cap),
            FractalKind::Julia(c) => julia(point, c, cap),
        }
    }

    /// True if `point` never escapes within `cap` steps.
    pub fn is_inside(&self, point: Complex<f64>, cap: u32) -> bool {
        self.iterations(point, cap) == cap
    }
}

/// The Mandelbrot recurrence, with a small sinusoidal nudge after
/// every step.  The nudge bends the boundary into something less
/// regular than the textbook set; the second line reads the real part
/// that the first line has just moved.
pub fn mandelbrot(point: Complex<f64>, cap: u32) -> u32 {
    let (mut zx, mut zy) = (0.0_f64, 0.0_f64);
    let mut i = 0;
    while zx * zx + zy * zy < BAILOUT && i < cap {
        let next = zx * zx - zy * zy + point.re;
        zy = 2.0 * zx * zy + point.im;
        zx = next;
        zx += PERTURBATION * (3.0 * zy).sin();
        zy += PERTURBATION * (2.0 * zx).sin();
        i += 1;
    }
    i
}

/// The Julia recurrence for the constant `c`, starting at `point`.
pub fn julia(point: Complex<f64>, c: Complex<f64>, cap: u32) -> u32 {
    let mut z = point;
    let mut i = 0;
    while z.norm_sqr() < BAILOUT && i < cap {
        z = z * z + c;
        i += 1;
    }
    i
}
