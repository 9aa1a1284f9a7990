// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Coherent noise.  Every atmospheric layer of the image (the
//! background wash, the tint that modulates the fractal's lightness,
//! the fog, the final haze) reads from the same field at different
//! frequencies and amplitudes, so they stay visually related to each
//! other.  One field is constructed per render and shared by every
//! pass.

use rand::prelude::*;
use rand::rngs::StdRng;

/// Anything that can be sampled at an arbitrary real coordinate and
/// returns a continuous value in [-1, 1].
pub trait NoiseField {
    /// Sample the field at (x, y).
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F> NoiseField for F
where
    F: Fn(f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

const GRADIENTS: [(f64, f64); 8] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// Two-dimensional gradient noise over a shuffled permutation table.
/// The field is zero at every integer lattice point and smooth
/// everywhere else.
#[derive(Clone)]
pub struct Perlin {
    permutation: [u8; 512],
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

impl Perlin {
    /// A field whose permutation table is shuffled by a generator
    /// seeded with `seed`.  Equal seeds produce equal fields.
    pub fn new(seed: u64) -> Self {
        Perlin::from_rng(&mut StdRng::seed_from_u64(seed))
    }

    /// A field shuffled from entropy.
    pub fn random() -> Self {
        Perlin::from_rng(&mut thread_rng())
    }

    /// A field shuffled by the caller's generator.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(rng);
        let mut permutation = [0u8; 512];
        for (i, slot) in permutation.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Perlin { permutation }
    }

    #[inline]
    fn hash(&self, x: usize, y: usize) -> usize {
        self.permutation[self.permutation[x] as usize + y] as usize
    }

    #[inline]
    fn gradient(&self, hash: usize, x: f64, y: f64) -> f64 {
        let (gx, gy) = GRADIENTS[hash & 7];
        gx * x + gy * y
    }
}

impl NoiseField for Perlin {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let (fx, fy) = (x.floor(), y.floor());
        // rem_euclid keeps negative lattice coordinates inside the table
        let xi = (fx.rem_euclid(256.0)) as usize & 255;
        let yi = (fy.rem_euclid(256.0)) as usize & 255;
        let (xf, yf) = (x - fx, y - fy);
        let (u, v) = (fade(xf), fade(yf));

        let aa = self.hash(xi, yi);
        let ab = self.hash(xi, yi + 1);
        let ba = self.hash(xi + 1, yi);
        let bb = self.hash(xi + 1, yi + 1);

        let lower = lerp(
            self.gradient(aa, xf, yf),
            self.gradient(ba, xf - 1.0, yf),
            u,
        );
        let upper = lerp(
            self.gradient(ab, xf, yf - 1.0),
            self.gradient(bb, xf - 1.0, yf - 1.0),
            u,
        );
        num::clamp(lerp(lower, upper, v), -1.0, 1.0)
    }
}

/// A stack of noise layers, each at double the frequency and half the
/// amplitude of the one before it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Octaves {
    /// Frequency of the first layer, in cycles per pixel.
    pub frequency: f64,
    /// Amplitude of the first layer.
    pub amplitude: f64,
    /// Number of layers.
    pub layers: u32,
}

impl Octaves {
    /// The raw weighted sum of every layer at (x, y).
    pub fn sum<N: NoiseField + ?Sized>(&self, field: &N, x: f64, y: f64) -> f64 {
        (0..self.layers).fold(0.0, |sum, layer| {
            let scale = f64::from(1u32 << layer);
            let frequency = self.frequency * scale;
            sum + field.sample(x * frequency, y * frequency) * (self.amplitude / scale)
        })
    }

    /// The largest magnitude `sum` can reach.
    pub fn total_amplitude(&self) -> f64 {
        (0..self.layers).map(|layer| self.amplitude / f64::from(1u32 << layer)).sum()
    }

    /// The weighted sum rescaled into [0, 1].
    pub fn normalized<N: NoiseField + ?Sized>(&self, field: &N, x: f64, y: f64) -> f64 {
        let total = self.total_amplitude();
        if total == 0.0 {
            return 0.5;
        }
        (self.sum(field, x, y) / total + 1.0) / 2.0
    }
}
