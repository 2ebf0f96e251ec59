//! Application related stuff

use crate::config::*;
use crate::pbrt::Float;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Options {
    /// Number of threads to use for rendering.
    #[clap(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 0,
        help = "Use specified number of threads for rendering (0 = all logical CPUs)."
    )]
    n_threads: usize,

    /// Suppress all text output other than error messages.
    #[clap(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Path to the image file.
    #[clap(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        default_value = "render.png",
        help = "Write the final image to the given filename."
    )]
    pub image_file: String,

    /// Image width.
    #[clap(long, value_name = "NUM", default_value_t = 256, help = "Image width in pixels.")]
    pub width: usize,

    /// Image height.
    #[clap(long, value_name = "NUM", default_value_t = 256, help = "Image height in pixels.")]
    pub height: usize,

    /// Samples per pixel.
    #[clap(
        long,
        value_name = "NUM",
        conflicts_with_all = ["samples", "seconds"],
        help = "Render with a fixed number of samples per pixel."
    )]
    pub spp: Option<u64>,

    /// Total number of samples.
    #[clap(
        long,
        value_name = "NUM",
        conflicts_with = "seconds",
        help = "Render a fixed total number of samples spread over the image."
    )]
    pub samples: Option<u64>,

    /// Time budget.
    #[clap(long, value_name = "SECS", help = "Render for the given number of seconds.")]
    pub seconds: Option<Float>,

    /// Minimum path length in vertices.
    #[clap(
        long = "min-length",
        value_name = "NUM",
        default_value_t = DEFAULT_MIN_PATH_LENGTH,
        help = "Minimum number of path vertices, including both endpoints."
    )]
    pub min_path_length: usize,

    /// Maximum path length in vertices.
    #[clap(
        long = "max-length",
        value_name = "NUM",
        default_value_t = DEFAULT_MAX_PATH_LENGTH,
        help = "Maximum number of path vertices, including both endpoints."
    )]
    pub max_path_length: usize,

    /// Fixed random seed.
    #[clap(long, value_name = "NUM", help = "Use a fixed random seed.")]
    pub seed: Option<u64>,

    /// Sampling technique.
    #[clap(long, value_enum, default_value_t = Technique::Bdpt, help = "Sampling technique.")]
    pub technique: Technique,

    /// Scene preset.
    #[clap(
        long,
        value_name = "NAME",
        default_value = "cornell",
        help = "Built-in scene to render."
    )]
    pub scene: String,

    /// Per strategy image prefix.
    #[clap(
        long = "strategy-films",
        value_name = "PREFIX",
        help = "Write the unweighted contribution of each strategy to PREFIX_k<k>_s<s>.png."
    )]
    pub strategy_films: Option<String>,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => max_threads,
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }

    /// Returns the render configuration described by the options.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            min_path_length: self.min_path_length,
            max_path_length: self.max_path_length,
            seed: self.seed,
            threads: self.threads(),
            technique: self.technique,
            quiet: self.quiet,
        }
    }
}

/// Create a progress bar. The bar is hidden in quiet mode and becomes a
/// spinner when the total is unknown.
///
/// * `len`   - Total number of ticks.
/// * `quiet` - Hide the bar.
pub fn create_progress_bar(len: Option<u64>, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    match len {
        Some(len) => {
            let progress = ProgressBar::new(len);
            let style = ProgressStyle::with_template(
                "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent}% [{pos}/{len}] ({eta}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar());
            progress.set_style(style);
            progress
        }
        None => {
            let progress = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("[{elapsed_precise}] {spinner} {pos} samples {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            progress.set_style(style);
            progress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let options = Options::parse_from(["bdpt-render"]);
        assert_eq!(options.width, 256);
        assert_eq!(options.height, 256);
        assert_eq!(options.technique, Technique::Bdpt);
        assert!(options.threads() >= 1);
        assert!(options.render_config().validate().is_ok());
    }

    #[test]
    fn parse_technique_and_lengths() {
        let options = Options::parse_from([
            "bdpt-render",
            "--technique",
            "pt-nee",
            "--min-length",
            "3",
            "--max-length",
            "5",
            "--spp",
            "4",
        ]);
        let config = options.render_config();
        assert_eq!(config.technique, Technique::PtNee);
        assert_eq!(config.min_path_length, 3);
        assert_eq!(config.max_path_length, 5);
        assert_eq!(options.spp, Some(4));
    }

    #[test]
    fn conflicting_budgets_are_rejected() {
        let result = Options::try_parse_from(["bdpt-render", "--spp", "4", "--seconds", "1"]);
        assert!(result.is_err());
    }
}
