// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Stars live in the black heart of the set.  Random pixels are
//! sampled until enough of them turn out to be inside; each one that
//! is gets a small white disk, most get a glow, and every one of them
//! leaves behind a disk that later passes must not touch.

use rand::Rng;

use crate::canvas::PixelBuffer;
use crate::color::Rgb;
use crate::composite::blend_rgb;
use crate::config::RenderConfig;
use crate::planes::Pixel;

/// How many stars a render tries to place.
pub const STAR_TARGET: usize = 300;

/// How many random pixels are tried before giving up.
pub const STAR_ATTEMPTS: usize = 3000;

const SIZE_RANGE: (f64, f64) = (0.6, 1.6);
const BRIGHT_PROBABILITY: f64 = 0.4;
const GLOW_PROBABILITY: f64 = 0.7;
const BRIGHT_GLOW: f64 = 4.0;
const DIM_GLOW: f64 = 2.5;
const BRIGHT_CORE_ALPHA: f64 = 1.0;
const DIM_CORE_ALPHA: f64 = 0.85;

/// A placed star and the radius around it that later passes leave alone.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StarRecord {
    /// Column of the star's center.
    pub x: usize,
    /// Row of the star's center.
    pub y: usize,
    /// Exclusion radius in pixels.
    pub radius: f64,
}

impl StarRecord {
    /// Is (x, y) inside this star's exclusion disk?
    pub fn covers(&self, x: usize, y: usize) -> bool {
        distance(self.x, self.y, x, y) <= self.radius
    }
}

fn distance(ax: usize, ay: usize, bx: usize, by: usize) -> f64 {
    let dx = ax as f64 - bx as f64;
    let dy = ay as f64 - by as f64;
    (dx * dx + dy * dy).sqrt()
}

/// The look of a single star, rolled once per accepted position.
#[derive(Copy, Clone, Debug, PartialEq)]
struct StarStyle {
    size: f64,
    brighter: bool,
    glow: bool,
}

impl StarStyle {
    fn roll<R: Rng>(rng: &mut R) -> Self {
        StarStyle {
            size: rng.gen_range(SIZE_RANGE.0..SIZE_RANGE.1),
            brighter: rng.gen_bool(BRIGHT_PROBABILITY),
            glow: rng.gen_bool(GLOW_PROBABILITY),
        }
    }

    fn glow_multiplier(&self) -> f64 {
        if self.brighter {
            BRIGHT_GLOW
        } else {
            DIM_GLOW
        }
    }

    fn core_alpha(&self) -> f64 {
        if self.brighter {
            BRIGHT_CORE_ALPHA
        } else {
            DIM_CORE_ALPHA
        }
    }

    fn exclusion_radius(&self) -> f64 {
        if self.glow {
            self.size * self.glow_multiplier() * 1.2
        } else {
            self.size * 2.0
        }
    }
}

/// Visit every pixel within `radius` of (cx, cy) that lies on the
/// buffer, passing it and its distance from the center.
fn for_each_in_disk<F>(buffer: &mut PixelBuffer, cx: usize, cy: usize, radius: f64, mut f: F)
where
    F: FnMut(&mut PixelBuffer, usize, usize, f64),
{
    let reach = radius.ceil() as usize;
    let (x0, x1) = (cx.saturating_sub(reach), (cx + reach).min(buffer.width() - 1));
    let (y0, y1) = (cy.saturating_sub(reach), (cy + reach).min(buffer.height() - 1));
    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = distance(cx, cy, x, y);
            if d <= radius {
                f(buffer, x, y, d);
            }
        }
    }
}

/// Composite a white radial gradient, opaque at the center and
/// transparent at `radius`.  `clarity` shapes the falloff.
fn draw_glow(buffer: &mut PixelBuffer, cx: usize, cy: usize, radius: f64, clarity: f64) {
    for_each_in_disk(buffer, cx, cy, radius, |buffer, x, y, d| {
        let alpha = (1.0 - d / radius).max(0.0).powf(clarity);
        let color = blend_rgb(buffer.rgb(x, y), Rgb::WHITE, alpha);
        buffer.set_rgb(x, y, color);
    });
}

/// Draw the star's core: a white disk of radius `size`, which always
/// covers at least the center pixel.
fn draw_core(buffer: &mut PixelBuffer, cx: usize, cy: usize, size: f64, alpha: f64) {
    for_each_in_disk(buffer, cx, cy, size.max(0.0), |buffer, x, y, _| {
        let color = blend_rgb(buffer.rgb(x, y), Rgb::WHITE, alpha);
        buffer.set_rgb(x, y, color);
    });
}

/// Probe random pixels for points inside the set and draw a star on
/// each one found, up to `STAR_TARGET` stars in `STAR_ATTEMPTS` tries.
/// Each try uses the same recurrence and cap as the coloring pass.
pub fn place_stars<R: Rng>(
    buffer: &mut PixelBuffer,
    config: &RenderConfig,
    rng: &mut R,
) -> Vec<StarRecord> {
    let plane = config.plane();
    let mut stars = Vec::with_capacity(STAR_TARGET);
    if plane.is_empty() {
        return stars;
    }

    let mut attempts = 0;
    while attempts < STAR_ATTEMPTS && stars.len() < STAR_TARGET {
        attempts += 1;
        let x = rng.gen_range(0..config.width);
        let y = rng.gen_range(0..config.height);
        let point = plane.pixel_to_point(&Pixel(x, y));
        if !config.kind.is_inside(point, config.max_iterations) {
            continue;
        }

        let style = StarStyle::roll(rng);
        if style.glow {
            let glow_radius = style.size * style.glow_multiplier();
            draw_glow(buffer, x, y, glow_radius, config.star_clarity);
        }
        draw_core(buffer, x, y, style.size, style.core_alpha());

        stars.push(StarRecord {
            x,
            y,
            radius: style.exclusion_radius(),
        });
    }

    debug!("placed {} stars in {} attempts", stars.len(), attempts);
    stars
}
