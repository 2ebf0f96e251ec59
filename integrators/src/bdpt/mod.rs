//! Bi-directional Path Tracer

use core::app::create_progress_bar;
use core::config::*;
use core::error::*;
use core::film::*;
use core::interaction::*;
use core::parallel::*;
use core::pbrt::*;
use core::rng::RNG;
use core::scene::*;
use itertools::iproduct;
use std::time::{Duration, Instant};

mod connect;
mod fullpath;
mod mis;
mod path;

pub use connect::*;
pub use fullpath::*;
pub use mis::mis_weight;
pub use path::*;

/// Counters collected while rendering.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Seed the workers were derived from.
    pub seed: u64,

    /// Number of processed work units.
    pub processed: u64,

    /// Total number of sampled eye subpath vertices.
    pub eye_vertices: u64,

    /// Total number of sampled light subpath vertices.
    pub light_vertices: u64,

    /// Number of strategies evaluated.
    pub connections: u64,

    /// Number of strategies that produced a contribution.
    pub splats: u64,

    /// Wall clock time spent rendering.
    pub elapsed: Duration,
}

impl RenderStats {
    /// Adds the counters of a worker.
    ///
    /// * `other` - Counters of a worker.
    fn accumulate(&mut self, other: &RenderStats) {
        self.eye_vertices += other.eye_vertices;
        self.light_vertices += other.light_vertices;
        self.connections += other.connections;
        self.splats += other.splats;
    }
}

/// Images recording the unweighted contribution of every strategy (s, t),
/// grouped by path length k = s + t.
pub struct StrategyFilms {
    /// Maximum path length in vertices.
    max_path_length: usize,

    /// One film per strategy.
    films: Vec<BitmapFilm>,
}

impl StrategyFilms {
    /// Create a new `StrategyFilms`.
    ///
    /// * `width`           - Image width.
    /// * `height`          - Image height.
    /// * `max_path_length` - Maximum path length in vertices.
    pub fn new(width: usize, height: usize, max_path_length: usize) -> Result<Self> {
        if max_path_length < 2 {
            return Err(RenderError::InvalidPathLength {
                min: 2,
                max: max_path_length,
            });
        }
        let count = buffer_index(0, max_path_length + 1);
        let films = (0..count)
            .map(|_| BitmapFilm::new(width, height))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { max_path_length, films })
    }

    /// Returns the film of strategy (s, k - s).
    ///
    /// * `k` - Path length in vertices.
    /// * `s` - Number of light subpath vertices.
    pub fn get(&self, k: usize, s: usize) -> Option<&BitmapFilm> {
        if k < 2 || k > self.max_path_length || s > k {
            return None;
        }
        self.films.get(buffer_index(s, k - s))
    }

    /// Writes every film to `<prefix>_k<k>_s<s>.png`.
    ///
    /// * `prefix` - File name prefix.
    pub fn save(&self, prefix: &str) -> Result<()> {
        for k in 2..=self.max_path_length {
            for s in 0..=k {
                if let Some(film) = self.get(k, s) {
                    film.save(&format!("{prefix}_k{k}_s{s}.png"))?;
                }
            }
        }
        Ok(())
    }

    fn clear(&self) {
        self.films.iter().for_each(|f| f.clear());
    }

    fn rescale(&self, s: Float) {
        self.films.iter().for_each(|f| f.rescale(s));
    }
}

/// Returns the index of strategy (s, t) when strategies are ordered by path
/// length first. Requires s + t >= 2.
///
/// * `s` - Number of light subpath vertices.
/// * `t` - Number of eye subpath vertices.
fn buffer_index(s: usize, t: usize) -> usize {
    let above = s + t - 2;
    s + above * (5 + above) / 2
}

/// Returns true if the technique uses strategy (s, t).
///
/// * `technique` - The technique.
/// * `scene`     - The scene.
/// * `eye`       - Eye subpath.
/// * `s`         - Number of light subpath vertices.
/// * `t`         - Number of eye subpath vertices.
fn uses_strategy(technique: Technique, scene: &Scene, eye: &Subpath, s: usize, t: usize) -> bool {
    let is_specular = |i: usize| {
        eye.vertex_at(i, TransDir::EL)
            .map_or(false, |v| scene.is_specular_component(v.sp()))
    };

    match technique {
        Technique::Bdpt | Technique::BdptNaive => true,
        Technique::PtNaive => s == 0,
        // Next event estimation from every non-specular vertex; a light is
        // only hit directly from the camera or through a specular bounce.
        Technique::PtNee => match s {
            0 => t == 2 || (t > 2 && is_specular(t - 2)),
            1 => t >= 2 && !is_specular(t - 1),
            _ => false,
        },
        Technique::LtNee => t == 1,
    }
}

/// Private state of a render worker.
struct Worker {
    /// Random number generator.
    rng: RNG,

    /// Reused eye subpath storage.
    eye: Subpath,

    /// Reused light subpath storage.
    light: Subpath,

    /// Private image accumulator.
    tile: FilmTile,

    /// Counters.
    stats: RenderStats,
}

impl Worker {
    /// Create a new `Worker`.
    ///
    /// * `seed`   - Render seed.
    /// * `id`     - Worker id.
    /// * `width`  - Image width.
    /// * `height` - Image height.
    fn new(seed: u64, id: usize, width: usize, height: usize) -> Self {
        Self {
            rng: RNG::new(seed.wrapping_add(id as u64)),
            eye: Subpath::new(TransDir::EL),
            light: Subpath::new(TransDir::LE),
            tile: FilmTile::new(width, height),
            stats: RenderStats::default(),
        }
    }
}

/// Implements bi-directional path tracing with the balance heuristic.
pub struct BDPTRenderer {
    /// Render parameters.
    config: RenderConfig,
}

impl BDPTRenderer {
    /// Create a new `BDPTRenderer`.
    ///
    /// * `config` - Render parameters.
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the render parameters.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders the scene into the film. The film is cleared first and scaled
    /// by the number of pixels over the number of processed units at the end.
    ///
    /// * `scene`          - The scene.
    /// * `film`           - The image accumulator.
    /// * `scheduler`      - Distributes work units to worker threads.
    /// * `strategy_films` - Optional per strategy images.
    pub fn render<S: Scheduler>(
        &self,
        scene: &Scene,
        film: &dyn Film,
        scheduler: &S,
        strategy_films: Option<&StrategyFilms>,
    ) -> Result<RenderStats> {
        scene.require_renderable()?;

        let seed = self.config.resolve_seed();
        let (width, height) = film.size();
        info!(
            "Rendering {}x{} with {:?}, path length {}..={}, seed {}, {} threads",
            width,
            height,
            self.config.technique,
            self.config.min_path_length,
            self.config.max_path_length,
            seed,
            self.config.threads
        );

        film.clear();
        if let Some(films) = strategy_films {
            films.clear();
        }

        let progress = create_progress_bar(scheduler.len(), self.config.quiet);
        progress.set_message("Rendering scene");

        let start = Instant::now();
        let (processed, workers) = scheduler.run_workers(
            self.config.threads,
            &progress,
            |id| Worker::new(seed, id, width, height),
            |worker, _unit| self.process_sample(scene, worker, strategy_films),
        )?;
        progress.finish_with_message("Render complete");

        // Merge in worker id order so the result does not depend on timing.
        let mut stats = RenderStats {
            seed,
            processed,
            ..RenderStats::default()
        };
        for (id, worker) in workers.iter().enumerate() {
            debug!("Worker {id}: {:?}", worker.stats);
            film.merge_tile(&worker.tile);
            stats.accumulate(&worker.stats);
        }

        if processed > 0 {
            let scale = (width * height) as Float / processed as Float;
            film.rescale(scale);
            if let Some(films) = strategy_films {
                films.rescale(scale);
            }
        } else {
            warn!("No work units were processed");
        }

        stats.elapsed = start.elapsed();
        info!(
            "Processed {} samples in {:.2}s ({} splats of {} strategies)",
            stats.processed,
            stats.elapsed.as_secs_f32(),
            stats.splats,
            stats.connections
        );
        Ok(stats)
    }

    /// Samples one eye and one light subpath and deposits the weighted
    /// contribution of every strategy within the path length bounds.
    ///
    /// * `scene`          - The scene.
    /// * `worker`         - Worker state.
    /// * `strategy_films` - Optional per strategy images.
    fn process_sample(&self, scene: &Scene, worker: &mut Worker, strategy_films: Option<&StrategyFilms>) {
        let Worker {
            rng,
            eye,
            light,
            tile,
            stats,
        } = worker;
        let (min_len, max_len) = (self.config.min_path_length, self.config.max_path_length);
        let technique = self.config.technique;

        eye.sample(rng, scene, max_len);
        light.sample(rng, scene, max_len);
        stats.eye_vertices += eye.len() as u64;
        stats.light_vertices += light.len() as u64;

        for (s, t) in iproduct!(0..=light.len(), 0..=eye.len()) {
            let k = s + t;
            if k < min_len || k > max_len || !uses_strategy(technique, scene, eye, s, t) {
                continue;
            }

            stats.connections += 1;
            let Some(splat) = connect(scene, eye, light, s, t) else {
                continue;
            };

            if let Some(films) = strategy_films.and_then(|f| f.get(k, s)) {
                films.splat(&splat.rp, &splat.c);
            }

            let w = match technique {
                Technique::Bdpt => mis_weight(scene, eye, light, s, t),
                Technique::BdptNaive => {
                    FullPath::from_subpaths(eye, light, s, t).map_or(0.0, |p| p.mis_weight(scene, s))
                }
                Technique::PtNaive | Technique::PtNee | Technique::LtNee => 1.0,
            };

            tile.add_splat(&splat.rp, &(splat.c * w));
            stats.splats += 1;
        }
    }
}

/// Renders the scene into the film with the given configuration and returns
/// the render counters.
///
/// * `scene`     - The scene.
/// * `film`      - The image accumulator.
/// * `scheduler` - Distributes work units to worker threads.
/// * `config`    - Render parameters.
pub fn render<S: Scheduler>(scene: &Scene, film: &dyn Film, scheduler: &S, config: &RenderConfig) -> Result<RenderStats> {
    BDPTRenderer::new(*config)?.render(scene, film, scheduler, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_index_orders_strategies_by_length() {
        assert_eq!(buffer_index(0, 2), 0);
        assert_eq!(buffer_index(1, 1), 1);
        assert_eq!(buffer_index(2, 0), 2);
        assert_eq!(buffer_index(0, 3), 3);
        assert_eq!(buffer_index(3, 0), 6);
        assert_eq!(buffer_index(0, 4), 7);
    }

    #[test]
    fn strategy_films_cover_every_length() {
        let films = StrategyFilms::new(4, 4, 4).unwrap();
        assert_eq!(films.films.len(), 3 + 4 + 5);
        assert!(films.get(2, 0).is_some());
        assert!(films.get(4, 4).is_some());
        assert!(films.get(5, 0).is_none());
        assert!(films.get(1, 0).is_none());
        assert!(films.get(3, 4).is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = RenderConfig {
            min_path_length: 4,
            max_path_length: 3,
            ..RenderConfig::default()
        };
        assert!(BDPTRenderer::new(config).is_err());
    }

    #[test]
    fn buffer_index_is_dense() {
        for k in 2..12 {
            // Strategies of length k occupy the k + 1 slots before length k + 1.
            let first = buffer_index(0, k);
            for s in 0..=k {
                assert_eq!(buffer_index(s, k - s), first + s);
            }
            assert_eq!(buffer_index(0, k + 1), first + k + 1);
        }
    }
}
