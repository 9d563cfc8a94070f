// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use clap::{App, Arg, ArgMatches};
use tracing_subscriber::EnvFilter;

use protogenoi::config::PRESETS;
use protogenoi::{random_hash, render_batch, Config};

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

const OUTPUT: &str = "output";
const HASH: &str = "hash";
const COUNT: &str = "count";
const PRESET: &str = "preset";
const CONFIG: &str = "config";
const SIZE: &str = "size";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const VERBOSE: &str = "verbose";
const PRINT_CONFIG: &str = "print-config";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("protogenoi")
        .version("0.1.0")
        .about("Sinusoidal attractor density renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required_unless(PRINT_CONFIG)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Directory the images and feature files are written to"),
        )
        .arg(
            Arg::with_name(HASH)
                .long(HASH)
                .short("H")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("Token hash to render; may be repeated"),
        )
        .arg(
            Arg::with_name(COUNT)
                .long(COUNT)
                .short("n")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse hash count",
                        "Hash count must be between 1 and 100000",
                    )
                })
                .help("Number of fresh random hashes to render"),
        )
        .arg(
            Arg::with_name(PRESET)
                .long(PRESET)
                .short("p")
                .takes_value(true)
                .possible_values(&PRESETS)
                .conflicts_with(CONFIG)
                .help("Built-in configuration [default: release]"),
        )
        .arg(
            Arg::with_name(CONFIG)
                .long(CONFIG)
                .short("c")
                .takes_value(true)
                .help("JSON configuration file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image, e.g. 640x640"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        u32::max_value() as usize,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 4294967295",
                    )
                })
                .help("Length of the orbit"),
        )
        .arg(
            Arg::with_name(THREADS)
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
                .help("Number of images rendered at once"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .multiple(true)
                .help("Log more; repeat for more detail"),
        )
        .arg(
            Arg::with_name(PRINT_CONFIG)
                .long(PRINT_CONFIG)
                .help("Print the resolved configuration as JSON and exit"),
        )
        .get_matches()
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn configure(matches: &ArgMatches) -> Result<Config, failure::Error> {
    let mut config = match matches.value_of(CONFIG) {
        Some(path) => Config::from_file(path)?,
        None => {
            let name = matches.value_of(PRESET).unwrap_or("release");
            Config::preset(name)
                .ok_or_else(|| failure::format_err!("unknown preset '{}'", name))?
        }
    };
    if let Some(size) = matches.value_of(SIZE) {
        let (width, height) =
            parse_pair(size, 'x').ok_or_else(|| failure::format_err!("bad size '{}'", size))?;
        config.width = width;
        config.height = height;
    }
    if let Some(iterations) = matches.value_of(ITERATIONS) {
        config.iterations = usize::from_str(iterations)?;
    }
    config.validate()?;
    Ok(config)
}

fn hashes(matches: &ArgMatches) -> Vec<String> {
    let mut hashes: Vec<String> = matches
        .values_of(HASH)
        .map(|values| values.map(String::from).collect())
        .unwrap_or_default();
    let count = matches
        .value_of(COUNT)
        .and_then(|c| usize::from_str(c).ok())
        .unwrap_or(if hashes.is_empty() { 1 } else { 0 });
    let mut rng = rand::thread_rng();
    hashes.extend((0..count).map(|_| random_hash(&mut rng)));
    hashes
}

fn execute(matches: &ArgMatches) -> Result<(), failure::Error> {
    let config = configure(matches)?;
    if matches.is_present(PRINT_CONFIG) {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let output = Path::new(matches.value_of(OUTPUT).unwrap_or("."));
    fs::create_dir_all(output)?;
    let threads = usize::from_str(matches.value_of(THREADS).unwrap_or("1"))?;

    let hashes = hashes(matches);
    for (hash, features) in render_batch(&config, &hashes, threads, output)? {
        println!(
            "{}\t{}\t{}\t{}",
            hash, features.render, features.colour, features.renormalise_delta
        );
    }
    Ok(())
}

fn main() {
    let matches = args();
    init_logging(matches.occurrences_of(VERBOSE));

    if let Err(e) = execute(&matches) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
