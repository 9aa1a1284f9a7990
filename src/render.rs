// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render pipeline.  Six passes run over the whole canvas, each to
//! completion before the next starts:
//!
//! 1. fill with a near-black background,
//! 2. wash the background with slow, faint noise,
//! 3. color the fractal (this produces the colored-area mask),
//! 4. place stars in the set's interior (this produces the star list),
//! 5. lay fog over everything the mask and star list allow,
//! 6. finish with a single-octave haze under the same rule.
//!
//! The products of passes 3 and 4 are return values, and passes 5 and 6
//! take them as arguments, so the ordering is carried by the types
//! rather than by shared state.  Only the iteration counts behind pass 3
//! may be computed on several threads; every pixel is still written in
//! scanline order, so thread count never changes the output.

use itertools::iproduct;
use num::Complex;
use rand::Rng;

use crate::canvas::{ColoredAreaMask, PixelBuffer};
use crate::color::{hsl_to_rgb, Rgb};
use crate::composite::{blend_rgb, brighten, Layered};
use crate::config::RenderConfig;
use crate::errors::RenderError;
use crate::escape::FractalKind;
use crate::noise::{NoiseField, Octaves, Perlin};
use crate::planes::{Pixel, PlaneMapper};
use crate::stars::{place_stars, StarRecord};

/// The color everything starts from.
pub const BACKGROUND: Rgb = Rgb(5.0, 5.0, 12.0);

const WASH: Octaves = Octaves {
    frequency: 0.002,
    amplitude: 0.4,
    layers: 5,
};
const WASH_LEVEL: f64 = 24.0;

const TINT_FREQUENCY: f64 = 0.01;
const TINT_LAYERS: u32 = 3;
// Literal value; the layer weights themselves only sum to about 0.917.
const TINT_NORMALIZER: f64 = 1.875;

const FADE_THRESHOLD: f64 = 0.01;
const COLOR_ALPHA: f64 = 0.7;
const HUE_SWEEP: f64 = 180.0;
const SATURATION_FLOOR: f64 = 20.0;
const SATURATION_SWEEP: f64 = 25.0;
const LIGHTNESS_SWEEP: f64 = 35.0;
const LIGHTNESS_FOG: f64 = 10.0;

const CLOUD: Rgb = Rgb(235.0, 240.0, 255.0);
const CLOUD_ALPHA: f64 = 0.35;

const FOG_TINT: (f64, f64, f64) = (40.0, 40.0, 60.0);

const HAZE_FREQUENCY: f64 = 0.005;
const HAZE_LEVEL: f64 = 12.0;

const PROGRESS_ROWS: usize = 80;

/// Pass 1: paint every pixel with `BACKGROUND`.
pub fn fill_background(buffer: &mut PixelBuffer) {
    buffer.fill(BACKGROUND);
}

/// Pass 2: add a faint, slow noise wash to every channel of every pixel.
pub fn wash_background<N: NoiseField + ?Sized>(buffer: &mut PixelBuffer, noise: &N) {
    for (y, x) in iproduct!(0..buffer.height(), 0..buffer.width()) {
        let level = (WASH.sum(noise, x as f64, y as f64) + 1.0) / 2.0 * WASH_LEVEL;
        let washed = brighten(buffer.rgb(x, y), level, level, level);
        buffer.set_rgb(x, y, washed);
    }
}

fn count_rows(
    counts: &mut [u32],
    first_row: usize,
    plane: &PlaneMapper,
    kind: FractalKind,
    cap: u32,
) {
    let width = plane.integral_plane.0;
    for (i, count) in counts.iter_mut().enumerate() {
        let pixel = Pixel(i % width, first_row + i / width);
        *count = kind.iterations(plane.pixel_to_point(&pixel), cap);
    }
}

/// The escape-time count of every pixel, row-major.  With more than
/// one thread the rows are split into contiguous bands, one per worker;
/// the counts are the same either way.
pub fn iteration_plane(config: &RenderConfig, threads: usize) -> Result<Vec<u32>, RenderError> {
    let plane = config.plane();
    let mut counts = vec![0u32; plane.len()];
    if plane.is_empty() {
        return Ok(counts);
    }

    let (kind, cap, width) = (config.kind, config.max_iterations, config.width);
    if threads <= 1 {
        count_rows(&mut counts, 0, &plane, kind, cap);
        return Ok(counts);
    }

    let rows_per_band = (config.height + threads - 1) / threads;
    {
        let plane = &plane;
        crossbeam::scope(|spawner| {
            for (band, chunk) in counts.chunks_mut(rows_per_band * width).enumerate() {
                spawner.spawn(move |_| {
                    count_rows(chunk, band * rows_per_band, plane, kind, cap);
                });
            }
        })
        .map_err(|_| RenderError::WorkerPanicked)?;
    }
    Ok(counts)
}

/// The lightness modulation used while coloring: three layers, each
/// sample lifted into [0, 1] and weighted by 0.5/(layer+1).
fn tint_modulation<N: NoiseField + ?Sized>(noise: &N, x: usize, y: usize) -> f64 {
    let mut layers = Layered::new(TINT_NORMALIZER);
    for layer in 0..TINT_LAYERS {
        let frequency = TINT_FREQUENCY * f64::from(1u32 << layer);
        let sample = noise.sample(x as f64 * frequency, y as f64 * frequency);
        layers.add_unit(sample, 0.5 / f64::from(layer + 1));
    }
    layers.intensity()
}

/// The color a pixel escaping at `mask` (iterations over cap) is given.
/// Saturation and lightness may run past 100; the buffer clamps the
/// resulting channels when they are written.
fn fractal_color(config: &RenderConfig, mask: f64, fog: f64) -> Rgb {
    let hue = (config.base_hue + HUE_SWEEP * mask).rem_euclid(360.0);
    let saturation = (config.saturation + SATURATION_SWEEP * mask).max(SATURATION_FLOOR);
    let lightness = config.lightness + LIGHTNESS_SWEEP * mask + LIGHTNESS_FOG * fog;
    hsl_to_rgb(hue, saturation, lightness)
}

/// Pass 3: color every pixel that escapes, blending by how quickly it
/// escaped, and lay a pale cloud band over the pixels whose escape
/// fraction falls strictly inside the configured noise band.
/// `iterations` comes from `iteration_plane`.  Returns the mask of
/// pixels that took color.
pub fn color_fractal<N: NoiseField + ?Sized>(
    buffer: &mut PixelBuffer,
    config: &RenderConfig,
    noise: &N,
    iterations: &[u32],
) -> ColoredAreaMask {
    let (width, height) = (buffer.width(), buffer.height());
    let cap = config.max_iterations;
    let mut colored = ColoredAreaMask::new(width, height);

    for y in 0..height {
        if y % PROGRESS_ROWS == 0 {
            debug!("coloring: {}%", y * 100 / height);
        }
        for x in 0..width {
            let count = iterations[y * width + x];
            let mask = f64::from(count) / f64::from(cap);
            let fade = 1.0 - mask.powf(1.5);
            colored.set(x, y, count < cap && fade > FADE_THRESHOLD);
            if fade <= FADE_THRESHOLD {
                continue;
            }

            let fog = tint_modulation(noise, x, y);
            let color = fractal_color(config, mask, fog);
            let mut out = blend_rgb(buffer.rgb(x, y), color, COLOR_ALPHA * fade);
            if config.min_noise < mask && mask < config.max_noise {
                let cloud = CLOUD.scale(0.85 + 0.15 * fog);
                out = blend_rgb(out, cloud, (1.0 - mask) * CLOUD_ALPHA);
            }
            buffer.set_rgb(x, y, out);
        }
    }
    colored
}

/// The rule fog passes use to decide which pixels they may touch: never
/// inside a star's radius, and, when asked, never on a pixel the
/// fractal left uncolored.
pub struct Exclusion<'a> {
    mask: &'a ColoredAreaMask,
    clear_black: bool,
    width: usize,
    near_star: Vec<bool>,
}

impl<'a> Exclusion<'a> {
    /// Rasterize the star disks once so the per-pixel test is a lookup.
    pub fn new(
        mask: &'a ColoredAreaMask,
        stars: &[StarRecord],
        clear_black: bool,
        width: usize,
        height: usize,
    ) -> Self {
        let mut near_star = vec![false; width * height];
        for star in stars {
            let reach = star.radius.max(0.0).ceil() as usize;
            let (x0, y0) = (star.x.saturating_sub(reach), star.y.saturating_sub(reach));
            let (x1, y1) = ((star.x + reach + 1).min(width), (star.y + reach + 1).min(height));
            for (y, x) in iproduct!(y0..y1, x0..x1) {
                if star.covers(x, y) {
                    near_star[y * width + x] = true;
                }
            }
        }
        Exclusion {
            mask,
            clear_black,
            width,
            near_star,
        }
    }

    /// May fog touch (x, y)?
    pub fn excludes(&self, x: usize, y: usize) -> bool {
        self.near_star[y * self.width + x] || (self.clear_black && !self.mask.get(x, y))
    }
}

/// Pass 5: brighten every permitted pixel towards a bluish tint of
/// itself, by an amount the layered fog noise decides.
pub fn overlay_fog<N: NoiseField + ?Sized>(
    buffer: &mut PixelBuffer,
    config: &RenderConfig,
    noise: &N,
    exclusion: &Exclusion,
) {
    let octaves = Octaves {
        frequency: config.fog_size,
        amplitude: 1.0,
        layers: config.fog_layers,
    };
    for (y, x) in iproduct!(0..buffer.height(), 0..buffer.width()) {
        if exclusion.excludes(x, y) {
            continue;
        }
        let intensity = octaves.normalized(noise, x as f64, y as f64);
        let base = buffer.rgb(x, y);
        let tint = brighten(base, FOG_TINT.0, FOG_TINT.1, FOG_TINT.2);
        buffer.set_rgb(x, y, blend_rgb(base, tint, intensity * config.fog_density));
    }
}

/// Pass 6: a single octave of faint haze added to every permitted pixel.
pub fn soft_fog<N: NoiseField + ?Sized>(buffer: &mut PixelBuffer, noise: &N, exclusion: &Exclusion) {
    for (y, x) in iproduct!(0..buffer.height(), 0..buffer.width()) {
        if exclusion.excludes(x, y) {
            continue;
        }
        let sample = noise.sample(x as f64 * HAZE_FREQUENCY, y as f64 * HAZE_FREQUENCY);
        let level = (sample + 1.0) / 2.0 * HAZE_LEVEL;
        let hazed = brighten(buffer.rgb(x, y), level, level, level);
        buffer.set_rgb(x, y, hazed);
    }
}

/// Everything a finished render produced.
#[derive(Debug)]
pub struct Rendering {
    /// The finished image.
    pub buffer: PixelBuffer,
    /// Which pixels the fractal pass colored.
    pub mask: ColoredAreaMask,
    /// Where the stars went.
    pub stars: Vec<StarRecord>,
}

/// Runs the whole pipeline for one configuration and one noise field.
pub struct FractalRenderer<N: NoiseField> {
    config: RenderConfig,
    noise: N,
    threads: usize,
}

impl FractalRenderer<Perlin> {
    /// A renderer over gradient noise seeded with `seed`.
    pub fn seeded(config: RenderConfig, seed: u64) -> Self {
        FractalRenderer::new(config, Perlin::new(seed))
    }
}

impl<N: NoiseField> FractalRenderer<N> {
    /// A single-threaded renderer.  `config` is trusted as given.
    pub fn new(config: RenderConfig, noise: N) -> Self {
        FractalRenderer {
            config,
            noise,
            threads: 1,
        }
    }

    /// Count iterations on `threads` workers.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Render with stars placed by the thread-local generator.
    pub fn render(&self) -> Result<Rendering, RenderError> {
        self.render_with_rng(&mut rand::thread_rng())
    }

    /// Render with stars placed by `rng`.
    pub fn render_with_rng<R: Rng>(&self, rng: &mut R) -> Result<Rendering, RenderError> {
        let config = &self.config;
        let mut buffer = PixelBuffer::new(config.width, config.height);

        info!("background");
        fill_background(&mut buffer);
        wash_background(&mut buffer, &self.noise);

        info!(
            "coloring {}x{} at {} iterations on {} thread(s)",
            config.width, config.height, config.max_iterations, self.threads
        );
        let iterations = iteration_plane(config, self.threads)?;
        let mask = color_fractal(&mut buffer, config, &self.noise, &iterations);

        info!("stars");
        let stars = place_stars(&mut buffer, config, rng);

        info!("fog");
        let exclusion = Exclusion::new(
            &mask,
            &stars,
            config.clear_black_fog,
            config.width,
            config.height,
        );
        overlay_fog(&mut buffer, config, &self.noise, &exclusion);
        soft_fog(&mut buffer, &self.noise, &exclusion);

        info!("colored {} pixels, placed {} stars", mask.count(), stars.len());
        Ok(Rendering {
            buffer,
            mask,
            stars,
        })
    }
}

/// The complex point under pixel (x, y) for `config`.
pub fn point_at(config: &RenderConfig, x: usize, y: usize) -> Complex<f64> {
    config.plane().pixel_to_point(&Pixel(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 96,
            height: 80,
            zoom: 36.0,
            max_iterations: 50,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn background_is_near_black_and_opaque() {
        let mut buffer = PixelBuffer::new(4, 4);
        fill_background(&mut buffer);
        assert_eq!(buffer.rgba(3, 3), [5, 5, 12, 255]);
    }

    #[test]
    fn wash_is_bounded_by_its_level() {
        let mut buffer = PixelBuffer::new(64, 64);
        fill_background(&mut buffer);
        wash_background(&mut buffer, &Perlin::new(9));
        for (y, x) in iproduct!(0..64, 0..64) {
            let c = buffer.rgb(x, y);
            assert!(c.0 >= 5.0 && c.0 <= 5.0 + WASH_LEVEL);
            assert!(c.2 >= 12.0 && c.2 <= 12.0 + WASH_LEVEL);
        }
    }

    #[test]
    fn flat_wash_adds_half_the_level() {
        let mut buffer = PixelBuffer::new(2, 2);
        fill_background(&mut buffer);
        wash_background(&mut buffer, &|_x: f64, _y: f64| 0.0);
        assert_eq!(buffer.rgb(1, 1), Rgb(17.0, 17.0, 24.0));
    }

    #[test]
    fn tint_modulation_keeps_its_literal_normalizer() {
        let top = tint_modulation(&|_x: f64, _y: f64| 1.0, 3, 4);
        let expected = (0.5 + 0.25 + 0.5 / 3.0) / 1.875;
        assert!((top - expected).abs() < 1e-12);
    }

    #[test]
    fn hue_walks_half_the_wheel() {
        let config = RenderConfig::default();
        let fast = fractal_color(&config, 0.0, 0.0);
        assert_eq!(fast, hsl_to_rgb(200.0, 70.0, 30.0));
        let slow = fractal_color(&config, 1.0, 0.0);
        assert_eq!(slow, hsl_to_rgb(20.0, 95.0, 65.0));
    }

    #[test]
    fn saturation_never_drops_below_its_floor() {
        let config = RenderConfig {
            saturation: 0.0,
            ..RenderConfig::default()
        };
        assert_eq!(fractal_color(&config, 0.0, 0.0), hsl_to_rgb(200.0, 20.0, 30.0));
    }

    #[test]
    fn saturation_and_lightness_run_past_one_hundred() {
        let config = RenderConfig {
            base_hue: 236.0,
            saturation: 90.0,
            lightness: 32.0,
            ..RenderConfig::default()
        };
        // 90 + 25 * 0.8 = 110 and 32 + 35 * 0.8 = 60
        let color = fractal_color(&config, 0.8, 0.0);
        assert_eq!(color, hsl_to_rgb(20.0, 110.0, 60.0));
        assert_eq!(color, Rgb(265.0, 116.0, 41.0));
        assert_ne!(color, hsl_to_rgb(20.0, 100.0, 60.0));

        let mut buffer = PixelBuffer::new(1, 1);
        fill_background(&mut buffer);
        buffer.set_rgb(0, 0, color);
        assert_eq!(buffer.rgba(0, 0), [255, 116, 41, 255]);
    }

    #[test]
    fn cloud_band_covers_only_the_open_interval() {
        let config = RenderConfig {
            width: 3,
            height: 1,
            max_iterations: 10,
            min_noise: 0.2,
            max_noise: 0.6,
            ..RenderConfig::default()
        };
        let mut buffer = PixelBuffer::new(3, 1);
        fill_background(&mut buffer);
        let flat = |_x: f64, _y: f64| 0.0;

        // escape fractions 0.4 (inside), 0.2 (on the lower edge), 0.8 (above)
        let mask = color_fractal(&mut buffer, &config, &flat, &[4, 2, 8]);
        assert_eq!(mask.count(), 3);

        // 0.4: hsl(272, 80, 46.4) over the background at 0.7 * fade gives
        // [68, 15, 117]; the cloud then lifts it at 0.6 * 0.35.
        assert_eq!(buffer.rgba(0, 0), [97, 56, 140, 255]);
        assert_eq!(buffer.rgba(1, 0), [18, 24, 117, 255]);
        assert_eq!(buffer.rgba(2, 0), [53, 17, 32, 255]);

        let fog = tint_modulation(&flat, 0, 0);
        let fade = 1.0 - 0.4f64.powf(1.5);
        let bare = blend_rgb(BACKGROUND, fractal_color(&config, 0.4, fog), COLOR_ALPHA * fade);
        let clouded = blend_rgb(bare, CLOUD.scale(0.85 + 0.15 * fog), 0.6 * CLOUD_ALPHA);
        let stored = buffer.rgb(0, 0);
        assert!(stored.distance(clouded) < 1.0);
        assert!(stored.distance(bare) > 10.0);
    }

    #[test]
    fn threaded_counts_match_sequential_counts() {
        let config = small_config();
        let single = iteration_plane(&config, 1).unwrap();
        for &threads in &[2, 3, 7, 200] {
            assert_eq!(iteration_plane(&config, threads).unwrap(), single);
        }
    }

    #[test]
    fn interior_pixels_are_left_uncolored() {
        let config = small_config();
        let noise = Perlin::new(4);
        let mut buffer = PixelBuffer::new(config.width, config.height);
        fill_background(&mut buffer);
        let before = buffer.clone();
        let iterations = iteration_plane(&config, 1).unwrap();
        let mask = color_fractal(&mut buffer, &config, &noise, &iterations);
        let (cx, cy) = (config.width / 2, config.height / 2);
        assert_eq!(iterations[cy * config.width + cx], config.max_iterations);
        assert!(!mask.get(cx, cy));
        assert_eq!(buffer.rgb(cx, cy), before.rgb(cx, cy));
        assert!(mask.count() > 0);
    }

    #[test]
    fn mask_matches_the_fade_rule() {
        let config = small_config();
        let iterations = iteration_plane(&config, 1).unwrap();
        let mut buffer = PixelBuffer::new(config.width, config.height);
        let mask = color_fractal(&mut buffer, &config, &Perlin::new(2), &iterations);
        for (y, x) in iproduct!(0..config.height, 0..config.width) {
            let count = iterations[y * config.width + x];
            let m = f64::from(count) / f64::from(config.max_iterations);
            let expected = count < config.max_iterations && 1.0 - m.powf(1.5) > 0.01;
            assert_eq!(mask.get(x, y), expected);
        }
    }

    #[test]
    fn clear_black_keeps_fog_off_uncolored_pixels() {
        let config = RenderConfig {
            clear_black_fog: true,
            ..small_config()
        };
        let noise = Perlin::new(6);
        let mut buffer = PixelBuffer::new(config.width, config.height);
        fill_background(&mut buffer);
        let iterations = iteration_plane(&config, 1).unwrap();
        let mask = color_fractal(&mut buffer, &config, &noise, &iterations);
        let before = buffer.clone();
        let exclusion = Exclusion::new(&mask, &[], true, config.width, config.height);
        overlay_fog(&mut buffer, &config, &noise, &exclusion);
        soft_fog(&mut buffer, &noise, &exclusion);
        for (y, x) in iproduct!(0..config.height, 0..config.width) {
            if !mask.get(x, y) {
                assert_eq!(buffer.rgb(x, y), before.rgb(x, y));
            }
        }
    }

    #[test]
    fn fog_only_brightens() {
        let config = small_config();
        let noise = Perlin::new(8);
        let mask = ColoredAreaMask::new(config.width, config.height);
        let exclusion = Exclusion::new(&mask, &[], false, config.width, config.height);
        let mut buffer = PixelBuffer::new(config.width, config.height);
        fill_background(&mut buffer);
        overlay_fog(&mut buffer, &config, &noise, &exclusion);
        soft_fog(&mut buffer, &noise, &exclusion);
        for (y, x) in iproduct!(0..config.height, 0..config.width) {
            let c = buffer.rgb(x, y);
            assert!(c.0 >= BACKGROUND.0 && c.1 >= BACKGROUND.1 && c.2 >= BACKGROUND.2);
        }
    }

    #[test]
    fn exclusion_covers_star_disks() {
        let mask = ColoredAreaMask::new(20, 20);
        let stars = [StarRecord {
            x: 1,
            y: 1,
            radius: 2.5,
        }];
        let exclusion = Exclusion::new(&mask, &stars, false, 20, 20);
        assert!(exclusion.excludes(0, 0));
        assert!(exclusion.excludes(3, 1));
        assert!(!exclusion.excludes(4, 1));
        assert!(!exclusion.excludes(3, 3));
    }

    #[test]
    fn seeded_renders_repeat() {
        let renderer = FractalRenderer::seeded(small_config(), 12);
        let a = renderer.render_with_rng(&mut StdRng::seed_from_u64(1)).unwrap();
        let b = renderer
            .with_threads(3)
            .render_with_rng(&mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(a.buffer, b.buffer);
        assert_eq!(a.stars, b.stars);
    }

    #[test]
    fn point_at_follows_the_plane() {
        let config = RenderConfig::default();
        assert_eq!(point_at(&config, 400, 400), Complex::new(-0.75, 0.0));
    }
}
