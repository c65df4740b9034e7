#![deny(clippy::all)]
#![forbid(unsafe_code)]

// FIXME: When derive_builder supports Rust 2018 syntax switch to a local import
#[macro_use]
extern crate derive_builder;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;
use structopt::StructOpt;

mod apt;
mod error;
mod geo;
mod graph;
mod render;
mod scan;

use apt::extract::extract;
use apt::{AptDatabase, LayoutVariant};
use graph::{GenParams, GenParamsBuilder, GraphBuilder};

#[derive(StructOpt)]
#[structopt(
    name = "groundnet_tool",
    about = "Generates ground networks for default-layout airports"
)]
struct Args {
    /// "all" processes every qualifying airport missing a network,
    /// "airport" a single one
    #[structopt(name = "mode")]
    mode: String,
    /// ICAO code, required in airport mode
    #[structopt(name = "icao")]
    icao: Option<String>,
    /// Read an 850 taxiway-layout database instead of an 810 one
    #[structopt(long = "v850")]
    v850: bool,
    /// Airport database, defaults to apt.dat (810) or apt850.dat (850)
    #[structopt(long = "apt", parse(from_os_str))]
    apt: Option<PathBuf>,
    /// Scenery Airports directory, scanned for airports without a network
    #[structopt(long = "scenery", parse(from_os_str))]
    scenery: Option<PathBuf>,
    /// Output directory, defaults to output (810) or output850 (850)
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: Option<PathBuf>,
    /// Write files directly into the output directory instead of an
    /// Airports tree
    #[structopt(long = "flat")]
    flat: bool,
    /// Meters between centers of adjacent parking stands
    #[structopt(long = "park-spacing", default_value = "60")]
    park_spacing: f64,
    /// Meters between the parallel taxiway and the stand centers
    #[structopt(long = "park-distance", default_value = "50")]
    park_distance: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::from_args();

    let variant = if args.v850 {
        LayoutVariant::V850
    } else {
        LayoutVariant::V810
    };
    let params = GenParamsBuilder::default()
        .park_spacing(args.park_spacing)
        .park_distance(args.park_distance)
        .build()?;
    let database = args
        .apt
        .clone()
        .unwrap_or_else(|| PathBuf::from(variant.database_file()));
    let db = AptDatabase::from_file(&database)?;
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(variant.output_dir()));
    let tree = !args.flat;

    match args.mode.as_str() {
        "airport" => {
            let icao = args.icao.ok_or("usage: groundnet_tool airport <ICAO>")?;
            let header = db.find_airport(&icao)?;
            let path = generate(&db, &icao, header, variant, &params, &output_dir, tree)?;
            info!("{}: wrote {}", icao, path.display());
        }
        "all" => {
            let candidates = db.classify_default(variant);
            let known = candidates.len();
            let cache = PathBuf::from(variant.cache_file());
            let missing = if cache.exists() {
                scan::read_cache(&cache)?
            } else {
                let scenery = args
                    .scenery
                    .as_ref()
                    .ok_or("no airport list cache yet, pass --scenery for the first scan")?;
                let missing = scan::missing_networks(scenery)?;
                scan::write_cache(&cache, &missing)?;
                missing
            };
            let missing: HashSet<String> = missing.into_iter().collect();
            let done: HashSet<String> =
                scan::done_airports(&output_dir, tree).into_iter().collect();
            let jobs: Vec<(String, usize)> = candidates
                .into_iter()
                .filter(|(icao, _)| missing.contains(icao) && !done.contains(icao))
                .collect();
            info!(
                "airports with missing network: {}, with known format: {}, to be processed: {}",
                missing.len(),
                known,
                jobs.len()
            );

            let written: usize = jobs
                .par_iter()
                .map(|(icao, header)| {
                    match generate(&db, icao, *header, variant, &params, &output_dir, tree) {
                        Ok(path) => {
                            info!("{}: wrote {}", icao, path.display());
                            1
                        }
                        Err(err) => {
                            warn!("{}: skipped: {}", icao, err);
                            0
                        }
                    }
                })
                .sum();
            info!("{} of {} networks written", written, jobs.len());
        }
        _ => return Err("usage: groundnet_tool all | airport <ICAO> [--v850]".into()),
    }

    Ok(())
}

/// One airport, start to finish: window, extraction, graph, document, file.
fn generate(
    db: &AptDatabase,
    icao: &str,
    header: usize,
    variant: LayoutVariant,
    params: &GenParams,
    output_dir: &Path,
    tree: bool,
) -> error::Result<PathBuf> {
    let window = db.window(header);
    let extraction = extract(window, icao, variant)?;
    let graph = GraphBuilder::new(params).build(icao, extraction)?;
    let document = render::render(&graph);
    scan::save_network(output_dir, &graph.icao, &document, tree)
}
