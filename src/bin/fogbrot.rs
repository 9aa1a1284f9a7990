extern crate clap;
extern crate env_logger;
extern crate fogbrot;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use fogbrot::{FractalKind, FractalRenderer, Perlin, RenderConfig, CANVAS_SIZE};
use num::Complex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const ITERATIONS: &str = "iterations";
const ZOOM: &str = "zoom";
const OFFSET: &str = "offset";
const HUE: &str = "hue";
const SATURATION: &str = "saturation";
const LIGHTNESS: &str = "lightness";
const JULIA: &str = "julia";
const NOISE_BAND: &str = "noise-band";
const FOG_DENSITY: &str = "fog-density";
const FOG_SIZE: &str = "fog-size";
const FOG_LAYERS: &str = "fog-layers";
const STAR_CLARITY: &str = "star-clarity";
const CLEAR_BLACK: &str = "clear-black";
const SEED: &str = "seed";
const THREADS: &str = "threads";

fn real_arg(
    name: &'static str,
    short: &'static str,
    default: &'static str,
    low: f64,
    high: f64,
) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .required(false)
        .long(name)
        .short(short)
        .takes_value(true)
        .default_value(default)
        .allow_hyphen_values(true)
        .validator(move |s| {
            validate_range(
                &s,
                low,
                high,
                &format!("Could not parse {}", name),
                &format!("{} must be between {} and {}", name, low, high),
            )
        })
}

fn args() -> ArgMatches<'static> {
    let max_threads = num_cpus::get();

    App::new("fogbrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Fractal renderer with fog and stars")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the extension picks the format"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        10_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 10000",
                    )
                })
                .help("Iteration cap per point"),
        )
        .arg(
            real_arg(ZOOM, "z", "300", std::f64::MIN_POSITIVE, std::f64::MAX)
                .help("Pixels per unit of the complex plane"),
        )
        .arg(
            Arg::with_name(OFFSET)
                .required(false)
                .long(OFFSET)
                .short("c")
                .takes_value(true)
                .default_value("-0.75,0")
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center offset"))
                .help("Complex point at the center of the image"),
        )
        .arg(real_arg(HUE, "u", "200", 0.0, 359.999).help("Base hue in degrees"))
        .arg(real_arg(SATURATION, "a", "70", 0.0, 100.0).help("Saturation in percent"))
        .arg(real_arg(LIGHTNESS, "l", "30", 0.0, 100.0).help("Lightness in percent"))
        .arg(
            Arg::with_name(JULIA)
                .required(false)
                .long(JULIA)
                .short("j")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse Julia constant"))
                .help("Render the Julia set for this constant instead of the Mandelbrot set"),
        )
        .arg(
            Arg::with_name(NOISE_BAND)
                .required(false)
                .long(NOISE_BAND)
                .short("n")
                .takes_value(true)
                .default_value("0.2,0.6")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse noise band"))
                .help("Escape fractions between which the cloud band is drawn"),
        )
        .arg(real_arg(FOG_DENSITY, "d", "0.4", 0.1, 0.8).help("Fog opacity"))
        .arg(real_arg(FOG_SIZE, "f", "0.01", 0.001, 0.05).help("Fog base frequency"))
        .arg(
            Arg::with_name(FOG_LAYERS)
                .required(false)
                .long(FOG_LAYERS)
                .short("y")
                .takes_value(true)
                .default_value("5")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        8,
                        "Could not parse fog layer count",
                        "Fog layer count must be between 1 and 8",
                    )
                })
                .help("Octaves of fog"),
        )
        .arg(real_arg(STAR_CLARITY, "k", "1", 0.1, 10.0).help("Sharpness of the star glow"))
        .arg(
            Arg::with_name(CLEAR_BLACK)
                .required(false)
                .long(CLEAR_BLACK)
                .short("b")
                .help("Keep fog off the uncolored background"),
        )
        .arg(
            Arg::with_name(SEED)
                .required(false)
                .long(SEED)
                .short("s")
                .takes_value(true)
                .validator(|s| {
                    u64::from_str(&s)
                        .map(|_| ())
                        .map_err(|_| "Could not parse seed".to_string())
                })
                .help("Seed for the noise and the star layout"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads counting iterations"),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> T {
    // every argument read here has a default and a validator
    match matches.value_of(name).map(T::from_str) {
        Some(Ok(v)) => v,
        _ => fail(&format!("Could not read {}", name)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn config_from(matches: &ArgMatches) -> RenderConfig {
    let offset = matches
        .value_of(OFFSET)
        .and_then(parse_complex)
        .unwrap_or_else(|| fail("Error parsing center offset"));
    let kind = match matches.value_of(JULIA) {
        None => FractalKind::Mandelbrot,
        Some(c) => FractalKind::Julia(
            parse_complex(c).unwrap_or_else(|| fail("Error parsing Julia constant")),
        ),
    };
    let (min_noise, max_noise) = matches
        .value_of(NOISE_BAND)
        .and_then(|s| parse_pair::<f64>(s, ','))
        .unwrap_or_else(|| fail("Error parsing noise band"));

    RenderConfig {
        width: CANVAS_SIZE,
        height: CANVAS_SIZE,
        max_iterations: value(matches, ITERATIONS),
        zoom: value(matches, ZOOM),
        offset,
        base_hue: value(matches, HUE),
        saturation: value(matches, SATURATION),
        lightness: value(matches, LIGHTNESS),
        kind,
        min_noise,
        max_noise,
        fog_density: value(matches, FOG_DENSITY),
        fog_size: value(matches, FOG_SIZE),
        fog_layers: value(matches, FOG_LAYERS),
        star_clarity: value(matches, STAR_CLARITY),
        clear_black_fog: matches.is_present(CLEAR_BLACK),
    }
}

fn main() {
    env_logger::init();
    let matches = args();
    let config = config_from(&matches);
    if let Err(e) = config.validate() {
        fail(&format!("Invalid configuration: {}", e));
    }

    let threads: usize = value(&matches, THREADS);
    let rendering = match matches.value_of(SEED) {
        Some(seed) => {
            let seed = u64::from_str(seed).unwrap_or_else(|_| fail("Could not parse seed"));
            let mut rng = StdRng::seed_from_u64(seed);
            FractalRenderer::seeded(config, seed)
                .with_threads(threads)
                .render_with_rng(&mut rng)
        }
        None => FractalRenderer::new(config, Perlin::random())
            .with_threads(threads)
            .render(),
    };

    match rendering {
        Err(e) => fail(&format!("Render failure: {}", e)),
        Ok(rendering) => {
            let output = matches.value_of(OUTPUT).unwrap_or_else(|| fail("No output file"));
            if let Err(e) = fogbrot::output::write_image(output, &rendering.buffer) {
                fail(&format!("Output failure: {}", e));
            }
            info!("wrote {}", output);
        }
    }
}
