#[macro_use]
extern crate log;

use api::*;
use clap::Parser;
use core::app::*;
use core::error::*;
use core::film::*;
use core::parallel::*;
use core::pbrt::*;
use integrators::*;
use std::time::Duration;

#[cfg(all(feature = "dhat-rs", feature = "jemalloc"))]
compile_error!("feature 'dhat-rs' and feature 'jemalloc' cannot be enabled at the same time");

#[cfg(feature = "dhat-rs")]
use dhat::{Dhat, DhatAlloc};

#[cfg(feature = "dhat-rs")]
#[global_allocator]
static ALLOCATOR: DhatAlloc = DhatAlloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOCATOR: Jemalloc = Jemalloc;

/// Samples per pixel used when no budget is given.
const DEFAULT_SPP: u64 = 16;

fn main() {
    #[cfg(feature = "dhat-rs")]
    let _dhat = Dhat::start_heap_profiling();

    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    if let Err(e) = render(&options) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn render(options: &Options) -> Result<()> {
    let config = options.render_config();
    let renderer = BDPTRenderer::new(config)?;

    let film = BitmapFilm::new(options.width, options.height)?;
    let aspect = options.width as Float / options.height as Float;
    let scene = canned_scene(&options.scene, aspect)?;

    let strategy_films = match &options.strategy_films {
        Some(_) => Some(StrategyFilms::new(
            options.width,
            options.height,
            config.max_path_length,
        )?),
        None => None,
    };

    // Pick the scheduler from the sample budget.
    let stats = if let Some(seconds) = options.seconds {
        let duration = Duration::try_from_secs_f32(seconds).map_err(|_| RenderError::InvalidBudget)?;
        let scheduler = TimeScheduler::new(duration)?;
        renderer.render(&scene, &film, &scheduler, strategy_films.as_ref())?
    } else if let Some(samples) = options.samples {
        let scheduler = SampleScheduler::new(samples)?;
        renderer.render(&scene, &film, &scheduler, strategy_films.as_ref())?
    } else {
        let spp = options.spp.unwrap_or(DEFAULT_SPP);
        let scheduler = SppScheduler::new(options.width, options.height, spp)?;
        renderer.render(&scene, &film, &scheduler, strategy_films.as_ref())?
    };

    film.save(&options.image_file)?;
    if !options.quiet {
        println!(
            "Wrote {} ({} samples, {:.2}s, seed {})",
            options.image_file,
            stats.processed,
            stats.elapsed.as_secs_f32(),
            stats.seed
        );
    }

    if let (Some(prefix), Some(films)) = (&options.strategy_films, &strategy_films) {
        films.save(prefix)?;
        info!("Wrote strategy images to {prefix}_k*_s*.png");
    }
    Ok(())
}
