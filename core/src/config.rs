//! Render configuration

use crate::error::*;
use clap::ValueEnum;

/// Default minimum path length in vertices.
pub const DEFAULT_MIN_PATH_LENGTH: usize = 2;

/// Default maximum path length in vertices.
pub const DEFAULT_MAX_PATH_LENGTH: usize = 8;

/// Selects which sampling strategies contribute to the image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Technique {
    /// All strategies weighted with the balance heuristic.
    #[default]
    Bdpt,

    /// Pure path tracing; only strategies that hit a light.
    PtNaive,

    /// Path tracing with next event estimation.
    PtNee,

    /// Light tracing with connection to the camera.
    LtNee,

    /// All strategies weighted by explicit evaluation on the full path.
    BdptNaive,
}

/// Parameters of a single render.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Minimum number of path vertices.
    pub min_path_length: usize,

    /// Maximum number of path vertices.
    pub max_path_length: usize,

    /// Fixed random seed. A seed is drawn from the clock when `None`.
    pub seed: Option<u64>,

    /// Number of worker threads.
    pub threads: usize,

    /// Strategies that contribute.
    pub technique: Technique,

    /// Hide the progress bar.
    pub quiet: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_path_length: DEFAULT_MIN_PATH_LENGTH,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            seed: None,
            threads: num_cpus::get(),
            technique: Technique::default(),
            quiet: false,
        }
    }
}

impl RenderConfig {
    /// Checks the path length bounds.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = (self.min_path_length, self.max_path_length);
        if min < 2 || max < min {
            return Err(RenderError::InvalidPathLength { min, max });
        }
        Ok(())
    }

    /// Returns the seed to use, drawing one from the clock if none is fixed.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |d| d.as_nanos() as u64)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RenderConfig::default();
        assert_eq!(config.min_path_length, 2);
        assert_eq!(config.max_path_length, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn max_below_min_is_rejected() {
        let config = RenderConfig {
            min_path_length: 5,
            max_path_length: 4,
            ..RenderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RenderError::InvalidPathLength { min: 5, max: 4 })
        ));
    }

    #[test]
    fn min_below_two_is_rejected() {
        let config = RenderConfig {
            min_path_length: 1,
            ..RenderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn fixed_seed_is_kept() {
        let config = RenderConfig {
            seed: Some(42),
            ..RenderConfig::default()
        };
        assert_eq!(config.resolve_seed(), 42);
    }
}
