// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate escapetime;
extern crate failure;
extern crate image;
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use escapetime::{ColoringMode, Palette, PlaneMapper, RenderConfig, StripedRenderer, Variant};
use image::png::PNGEncoder;
use image::ColorType;
use log::info;
use num::Complex;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

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

fn validate_range<T: FromStr + Ord>(
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

fn validate_parse<T>(s: &str) -> Result<(), String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(s).map(|_| ()).map_err(|e| e.to_string())
}

const RENDER: &str = "render";
const LOCATE: &str = "locate";
const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTTOP: &str = "lefttop";
const RIGHTBOTTOM: &str = "rightbottom";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const RADIUS: &str = "radius";
const FORMULA: &str = "formula";
const COLORING: &str = "coloring";
const PALETTE: &str = "palette";
const PIXELS: [&str; 4] = ["x1", "y1", "x2", "y2"];

/// The arguments that describe the viewport, shared by both modes.
fn viewport_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name(SIZE)
            .long(SIZE)
            .short("s")
            .takes_value(true)
            .default_value("1024x1024")
            .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
            .help("Size of output image"),
        Arg::with_name(LEFTTOP)
            .long(LEFTTOP)
            .short("l")
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value("-2.0,1.2377929688")
            .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left top corner"))
            .help("Left top corner of the viewport, as RE,IM"),
        Arg::with_name(RIGHTBOTTOM)
            .long(RIGHTBOTTOM)
            .short("r")
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value("0.4755859375,-1.2377929688")
            .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right bottom corner"))
            .help("Right bottom corner of the viewport, as RE,IM"),
    ]
}

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get().max(1) * 4;

    let render = SubCommand::with_name(RENDER)
        .about("Render an image")
        .args(&viewport_args())
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file; named after the render parameters if absent"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver; defaults to one per CPU"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1500")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(RADIUS)
                .long(RADIUS)
                .short("R")
                .takes_value(true)
                .default_value("2")
                .validator(|s| validate_parse::<f64>(&s))
                .help("Escape radius"),
        )
        .arg(
            Arg::with_name(FORMULA)
                .long(FORMULA)
                .short("f")
                .takes_value(true)
                .default_value("standard")
                .possible_values(&["standard", "burning-ship", "tricorn", "cubic"])
                .help("Iteration formula"),
        )
        .arg(
            Arg::with_name(COLORING)
                .long(COLORING)
                .short("c")
                .takes_value(true)
                .default_value("smooth")
                .possible_values(&["smooth", "sinusoidal", "normalized"])
                .help("Colouring of points outside the set"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .validator(|s| validate_parse::<Palette>(&s))
                .help("Comma separated hex colour stops, e.g. 000764,206bcb,edffff,ffaa00"),
        );

    let locate = SubCommand::with_name(LOCATE)
        .about("Print the complex coordinates of two pixels")
        .args(&viewport_args())
        .args(
            &PIXELS
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    Arg::with_name(*name)
                        .required(true)
                        .index(i as u64 + 1)
                        .validator(|s| validate_parse::<f64>(&s))
                })
                .collect::<Vec<_>>(),
        );

    App::new("escapetime")
        .version("0.1.0")
        .about("Escape-time fractal renderer")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(render)
        .subcommand(locate)
        .get_matches()
}

fn viewport(matches: &ArgMatches) -> Result<((usize, usize), Complex<f64>, Complex<f64>), failure::Error> {
    let size = parse_pair(matches.value_of(SIZE).unwrap_or_default(), 'x')
        .ok_or_else(|| failure::err_msg("Error parsing image dimensions"))?;
    let lefttop = parse_complex(matches.value_of(LEFTTOP).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing left top point"))?;
    let rightbottom = parse_complex(matches.value_of(RIGHTBOTTOM).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing right bottom point"))?;
    Ok((size, lefttop, rightbottom))
}

fn config(matches: &ArgMatches) -> Result<RenderConfig, failure::Error> {
    let ((width, height), lefttop, rightbottom) = viewport(matches)?;
    let mut config = RenderConfig {
        width,
        height,
        lefttop,
        rightbottom,
        limit: usize::from_str(matches.value_of(ITERATIONS).unwrap_or_default())?,
        radius: f64::from_str(matches.value_of(RADIUS).unwrap_or_default())?,
        formula: Variant::from_str(matches.value_of(FORMULA).unwrap_or_default())?,
        coloring: ColoringMode::from_str(matches.value_of(COLORING).unwrap_or_default())?,
        ..RenderConfig::default()
    };
    if let Some(threads) = matches.value_of(THREADS) {
        config.workers = Some(usize::from_str(threads)?);
    }
    if let Some(palette) = matches.value_of(PALETTE) {
        config.palette = Palette::from_str(palette)?;
    }
    Ok(config)
}

/// `<formula>/(lt) - (rb) (N itr) (Wpx x Hpx).png`, so renders of
/// different regions never overwrite each other.
fn default_output(config: &RenderConfig) -> PathBuf {
    Path::new(config.formula.name()).join(format!(
        "({:.10}, {:+.10})-({:.10}, {:+.10}) ({} itr) ({}px x {}px).png",
        config.lefttop.re,
        config.lefttop.im,
        config.rightbottom.re,
        config.rightbottom.im,
        config.limit,
        config.width,
        config.height
    ))
}

fn write_image(path: &Path, pixels: &[u8], bounds: (usize, usize)) -> Result<(), failure::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output = BufWriter::new(File::create(path)?);
    let encoder = PNGEncoder::new(output);
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::RGBA(8))?;
    Ok(())
}

fn render(matches: &ArgMatches) -> Result<(), failure::Error> {
    let config = config(matches)?;
    let output = match matches.value_of(OUTPUT) {
        Some(output) => PathBuf::from(output),
        None => default_output(&config),
    };
    let renderer = StripedRenderer::new(config)?;

    let start = Instant::now();
    let buffer = renderer.render()?;
    info!(
        "Time taken on fractal: {:.3}s over {} threads",
        start.elapsed().as_secs_f64(),
        renderer.workers()
    );

    let start = Instant::now();
    write_image(&output, &buffer.to_rgba_bytes(), (buffer.width(), buffer.height()))?;
    info!("Time taken on image write: {:.3}s", start.elapsed().as_secs_f64());
    println!("{}", output.display());
    Ok(())
}

fn locate(matches: &ArgMatches) -> Result<(), failure::Error> {
    let ((width, height), lefttop, rightbottom) = viewport(matches)?;
    let plane = PlaneMapper::new(width, height, lefttop, rightbottom)?;
    let mut coords = [0.0; 4];
    for (coord, name) in coords.iter_mut().zip(PIXELS.iter()) {
        *coord = f64::from_str(matches.value_of(name).unwrap_or_default())?;
    }
    let first = plane.coordinate_at(coords[0], coords[1]);
    let second = plane.coordinate_at(coords[2], coords[3]);
    println!(
        "Pixels ({:.2}, {:.2}), and ({:.2}, {:.2}) are at ({:.10}, {:+.10}) and ({:.10}, {:+.10})",
        coords[0], coords[1], coords[2], coords[3], first.re, first.im, second.re, second.im
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();

    let result = match matches.subcommand() {
        (RENDER, Some(sub)) => render(sub),
        (LOCATE, Some(sub)) => locate(sub),
        _ => Err(failure::err_msg("no mode given")),
    };

    if let Err(e) = result {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
