// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Running the pipeline: draw, simulate, finalise, render, describe.
//!
//! A single run is strictly sequential and owns its grid from start to
//! finish.  Because nothing is shared between runs, a batch of hashes
//! can be spread over a pool of threads with no coordination beyond
//! handing out the next hash.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crossbeam::thread::ScopedJoinHandle;
use tracing::{debug, info, info_span};

use crate::attractor::{Grid, SineMap};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::features::Features;
use crate::field::Field;
use crate::params::{sample_run, Selection};
use crate::random::{FxRand, RandomSource};
use crate::render::{render, Raster};

/// The product of one run.
#[derive(Clone, Debug)]
pub struct Artwork {
    /// What the random source decided.
    pub selection: Selection,
    /// The finalised grid.
    pub field: Field,
    /// The finished image.
    pub raster: Raster,
    /// The published features.
    pub features: Features,
}

/// Run the whole pipeline once, drawing from `rng`.
pub fn run<S: RandomSource>(config: &Config, rng: &mut S) -> Result<Artwork> {
    config.validate()?;
    let selection = sample_run(config, rng)?;
    let p = selection.params;
    info!(
        a = p.a,
        b = p.b,
        c = p.c,
        d = p.d,
        pair = %selection.pair.name,
        mode = %selection.mode,
        rescale = selection.rescale,
        "parameters drawn"
    );

    let started = Instant::now();
    let grid = Grid::simulate(
        &SineMap::new(&p),
        config.width,
        config.height,
        config.iterations,
    )?;
    debug!(elapsed = ?started.elapsed(), iterations = config.iterations, "orbit accumulated");

    let field = grid.finalise(selection.rescale);

    let started = Instant::now();
    let raster = render(&field, &selection.pair, selection.mode, config.style);
    debug!(elapsed = ?started.elapsed(), "raster painted");

    let features = Features::of(&selection);
    Ok(Artwork {
        selection,
        field,
        raster,
        features,
    })
}

/// Run the pipeline for a token hash.
pub fn run_hash(config: &Config, hash: &str) -> Result<Artwork> {
    let _span = info_span!("run", hash = hash).entered();
    let mut rng = FxRand::from_hash(hash)?;
    run(config, &mut rng)
}

/// Write `<hash>.png` and `<hash>.json` into `dir`.
pub fn save(artwork: &Artwork, dir: &Path, hash: &str) -> std::result::Result<PathBuf, failure::Error> {
    let image = dir.join(format!("{}.png", hash));
    artwork.raster.save(&image)?;
    let mut json = File::create(dir.join(format!("{}.json", hash)))?;
    json.write_all(artwork.features.to_json()?.as_bytes())?;
    json.write_all(b"\n")?;
    Ok(image)
}

fn render_one(
    config: &Config,
    dir: &Path,
    hash: &str,
) -> std::result::Result<Features, failure::Error> {
    let artwork = run_hash(config, hash)?;
    let path = save(&artwork, dir, hash)?;
    info!(hash = %hash, path = %path.display(), "saved");
    Ok(artwork.features)
}

type Queue<'a> = Arc<Mutex<std::iter::Enumerate<std::slice::Iter<'a, String>>>>;
type Done = Vec<(usize, String, Features)>;

/// Render every hash into `dir`, spreading the runs over `threads`
/// workers.  Results come back in the order the hashes were given.
/// The first failure stops every worker from taking another hash.
pub fn render_batch(
    config: &Config,
    hashes: &[String],
    threads: usize,
    dir: &Path,
) -> std::result::Result<Vec<(String, Features)>, failure::Error> {
    config.validate()?;
    // Check every hash before any work is done.
    for hash in hashes {
        FxRand::from_hash(hash)?;
    }
    let threads = threads.max(1).min(hashes.len().max(1));
    let queue: Queue = Arc::new(Mutex::new(hashes.iter().enumerate()));
    let failed = Arc::new(AtomicBool::new(false));

    let mut finished: Done = vec![];
    crossbeam::scope(|spawner| -> std::result::Result<(), failure::Error> {
        let handles: Vec<ScopedJoinHandle<std::result::Result<Done, failure::Error>>> = (0
            ..threads)
            .map(|_| {
                let queue = queue.clone();
                let failed = failed.clone();
                spawner.spawn(move |_| -> std::result::Result<Done, failure::Error> {
                    let mut done: Done = vec![];
                    while !failed.load(Ordering::SeqCst) {
                        let next = { queue.lock().map_err(|_| Error::WorkerPanic)?.next() };
                        match next {
                            Some((index, hash)) => match render_one(config, dir, hash) {
                                Ok(features) => done.push((index, hash.clone(), features)),
                                Err(e) => {
                                    failed.store(true, Ordering::SeqCst);
                                    return Err(e);
                                }
                            },
                            None => {
                                break;
                            }
                        }
                    }
                    Ok(done)
                })
            })
            .collect();

        for handle in handles {
            let done = handle.join().map_err(|_| Error::WorkerPanic)??;
            finished.extend(done);
        }
        Ok(())
    })
    .map_err(|_| Error::WorkerPanic)??;

    finished.sort_by_key(|&(index, _, _)| index);
    Ok(finished
        .into_iter()
        .map(|(_, hash, features)| (hash, features))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderMode;

    const HASH: &str = "ooNx1eTQZ6xC9pRfsgPUbt8aWFn9fZhtYNtgbYnGoVbHw38R3kD";

    fn small(mut config: Config) -> Config {
        config.width = 48;
        config.height = 48;
        config.iterations = 20_000;
        config
    }

    #[test]
    fn same_hash_same_image() {
        let config = small(Config::release());
        let a = run_hash(&config, HASH).unwrap();
        let b = run_hash(&config, HASH).unwrap();
        assert_eq!(a.raster.as_bytes(), b.raster.as_bytes());
        assert_eq!(a.features, b.features);
        assert_eq!(a.field.grid().checksum(), b.field.grid().checksum());
    }

    #[test]
    fn different_hashes_differ() {
        let config = small(Config::release());
        let a = run_hash(&config, HASH).unwrap();
        let b = run_hash(&config, "oo123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQ").unwrap();
        assert_ne!(a.selection.params, b.selection.params);
    }

    #[test]
    fn the_whole_budget_is_accounted_for() {
        let config = small(Config::explore());
        let art = run_hash(&config, HASH).unwrap();
        assert_eq!(art.field.grid().total(), 20_000);
        assert_eq!(art.raster.width(), 48);
        assert_eq!(art.raster.height(), 48);
    }

    #[test]
    fn features_describe_the_selection() {
        let config = small(Config::release());
        let art = run_hash(&config, HASH).unwrap();
        assert_eq!(art.features.render, RenderMode::Bilinear);
        assert_eq!(art.features.colour, art.selection.pair.name);
        assert_eq!(art.features.renormalise_delta, art.selection.rescale);
        assert_eq!(art.field.rescaled(), art.selection.rescale);
    }

    #[test]
    fn sketch_ignores_the_hash() {
        let config = small(Config::sketch());
        let a = run_hash(&config, HASH).unwrap();
        let b = run_hash(&config, "oo123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQ").unwrap();
        assert_eq!(a.raster, b.raster);
        assert_eq!(a.features.render, RenderMode::Corners);
    }

    #[test]
    fn invalid_configs_never_start() {
        let mut config = small(Config::release());
        config.catalog.clear();
        assert_eq!(run_hash(&config, HASH).unwrap_err(), Error::EmptyCatalog);
    }

    #[test]
    fn batches_write_images_and_features_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = small(Config::release());
        let hashes = vec![
            HASH.to_string(),
            "oo123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQ".to_string(),
            "ooQ9mbhL2aXnKVqWk4ZrPBRsEJc7tUe8fYDx5gGpv3TSHuw6yNC".to_string(),
        ];
        let results = render_batch(&config, &hashes, 2, dir.path()).unwrap();
        assert_eq!(results.len(), 3);
        for ((hash, features), expected) in results.iter().zip(&hashes) {
            assert_eq!(hash, expected);
            assert!(dir.path().join(format!("{}.png", hash)).exists());
            let text = std::fs::read_to_string(dir.path().join(format!("{}.json", hash))).unwrap();
            let back: Features = serde_json::from_str(&text).unwrap();
            assert_eq!(&back, features);
            assert_eq!(back, run_hash(&config, hash).unwrap().features);
        }
    }

    #[test]
    fn one_failed_save_stops_the_batch() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let dir = tempfile::tempdir().unwrap();
        let config = small(Config::release());
        let mut rng = StdRng::seed_from_u64(5);
        let hashes: Vec<String> = (0..16).map(|_| crate::random::random_hash(&mut rng)).collect();
        // A directory where the first image should go makes that save fail.
        std::fs::create_dir(dir.path().join(format!("{}.png", hashes[0]))).unwrap();

        assert!(render_batch(&config, &hashes, 2, dir.path()).is_err());
        let written = hashes[1..]
            .iter()
            .filter(|h| dir.path().join(format!("{}.png", h)).is_file())
            .count();
        assert!(written < hashes.len() - 1);
    }

    #[test]
    fn a_bad_hash_fails_the_batch_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let config = small(Config::release());
        let hashes = vec![HASH.to_string(), "oo0000".to_string()];
        assert!(render_batch(&config, &hashes, 2, dir.path()).is_err());
        assert!(!dir.path().join(format!("{}.png", HASH)).exists());
    }
}
