extern crate fogbrot;
extern crate itertools;
extern crate num;
extern crate rand;

use fogbrot::canvas::PixelBuffer;
use fogbrot::color::{hsl_to_rgb, Rgb};
use fogbrot::composite::Layered;
use fogbrot::render::{
    color_fractal, fill_background, iteration_plane, overlay_fog, point_at, soft_fog,
    wash_background, Exclusion,
};
use fogbrot::stars::place_stars;
use fogbrot::{FractalKind, FractalRenderer, NoiseField, Perlin, RenderConfig};
use itertools::iproduct;
use num::Complex;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn reference_config() -> RenderConfig {
    RenderConfig {
        width: 800,
        height: 800,
        max_iterations: 100,
        zoom: 300.0,
        offset: Complex::new(-0.75, 0.0),
        base_hue: 200.0,
        saturation: 70.0,
        lightness: 30.0,
        kind: FractalKind::Mandelbrot,
        fog_density: 0.4,
        fog_size: 0.01,
        fog_layers: 5,
        ..RenderConfig::default()
    }
}

/// The coloring pass' lightness modulation at one pixel.
fn tint_fog<N: NoiseField>(noise: &N, x: f64, y: f64) -> f64 {
    let mut layers = Layered::new(1.875);
    for layer in 0..3u32 {
        let frequency = 0.01 * f64::from(1u32 << layer);
        layers.add_unit(noise.sample(x * frequency, y * frequency), 0.5 / f64::from(layer + 1));
    }
    layers.intensity()
}

#[test]
fn reference_render_colors_the_halo_and_spares_the_heart() {
    let config = reference_config();
    assert_eq!(point_at(&config, 400, 400), Complex::new(-0.75, 0.0));
    assert_eq!(point_at(&config, 400, 370), Complex::new(-0.75, -0.1));

    let renderer = FractalRenderer::seeded(config.clone(), 2718);
    let rendering = renderer
        .render_with_rng(&mut StdRng::seed_from_u64(31))
        .unwrap();

    // (-0.75, 0) never escapes, so it stays uncolored.
    assert!(!rendering.mask.get(400, 400));

    // (-0.75, -0.1) escapes at iteration 32 and takes the tint.
    assert!(rendering.mask.get(400, 370));
    let mask = 32.0 / 100.0;
    let fog = tint_fog(&Perlin::new(2718), 400.0, 370.0);
    let hue = 200.0 + 180.0 * mask;
    let tint = hsl_to_rgb(hue, 70.0 + 25.0 * mask, 30.0 + 35.0 * mask + 10.0 * fog);
    let pixel = rendering.buffer.rgb(400, 370);
    assert!(
        pixel.distance(tint) < pixel.distance(Rgb::BLACK),
        "{:?} is nearer black than {:?}",
        pixel,
        tint
    );
    assert_eq!(rendering.buffer.rgba(400, 370)[3], 255);
}

#[test]
fn fog_never_touches_a_star() {
    let config = RenderConfig {
        width: 200,
        height: 200,
        zoom: 75.0,
        max_iterations: 80,
        fog_density: 0.8,
        ..RenderConfig::default()
    };
    let noise = Perlin::new(77);
    let mut buffer = PixelBuffer::new(config.width, config.height);
    fill_background(&mut buffer);
    wash_background(&mut buffer, &noise);
    let iterations = iteration_plane(&config, 2).unwrap();
    let mask = color_fractal(&mut buffer, &config, &noise, &iterations);
    let stars = place_stars(&mut buffer, &config, &mut StdRng::seed_from_u64(8));
    assert!(!stars.is_empty());

    let before: PixelBuffer = buffer.clone();
    let exclusion = Exclusion::new(&mask, &stars, false, config.width, config.height);
    overlay_fog(&mut buffer, &config, &noise, &exclusion);
    soft_fog(&mut buffer, &noise, &exclusion);

    for (y, x) in iproduct!(0..config.height, 0..config.width) {
        if stars.iter().any(|star| star.covers(x, y)) {
            assert_eq!(buffer.rgb(x, y), before.rgb(x, y), "fogged star pixel {},{}", x, y);
        }
    }
}

#[test]
fn julia_renders_use_the_julia_recurrence_for_stars() {
    let c = Complex::new(-0.4, 0.6);
    let config = RenderConfig {
        width: 160,
        height: 160,
        zoom: 50.0,
        offset: Complex::new(0.0, 0.0),
        max_iterations: 120,
        kind: FractalKind::Julia(c),
        ..RenderConfig::default()
    };
    let rendering = FractalRenderer::seeded(config.clone(), 5)
        .render_with_rng(&mut StdRng::seed_from_u64(5))
        .unwrap();
    for star in &rendering.stars {
        let point = point_at(&config, star.x, star.y);
        assert_eq!(fogbrot::escape::julia(point, c, 120), 120);
        assert!(!rendering.mask.get(star.x, star.y));
    }
}

#[test]
fn zero_zoom_renders_without_faulting() {
    let config = RenderConfig {
        width: 32,
        height: 32,
        zoom: 0.0,
        ..RenderConfig::default()
    };
    let rendering = FractalRenderer::seeded(config, 1)
        .render_with_rng(&mut StdRng::seed_from_u64(1))
        .unwrap();
    assert!(rendering.stars.is_empty());
    assert_eq!(rendering.buffer.as_bytes().len(), 32 * 32 * 4);
}
