//! Application related stuff

use crate::pbrt::Float;
use clap::Parser;
use std::sync::OnceLock;

/// The global application options.
static OPTIONS: OnceLock<Options> = OnceLock::new();

/// Install the process wide options. Returns the options back if they were
/// already set.
///
/// * `options` - The options.
pub fn init_options(options: Options) -> Result<(), Options> {
    OPTIONS.set(options)
}

/// Returns the process wide options, or defaults when none were installed.
pub fn options() -> &'static Options {
    OPTIONS.get_or_init(Options::default)
}

/// Light transport algorithm to render with.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegratorName {
    /// Uniform path tracing with next-event estimation.
    Path,

    /// Metropolis light transport in primary sample space.
    Mlt,
}

impl IntegratorName {
    /// Returns the integrator name used in parameter sets.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Mlt => "mlt",
        }
    }
}

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Options {
    /// Number of threads to use for rendering.
    #[clap(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 1,
        help = "Use specified number of threads for rendering."
    )]
    n_threads: usize,

    /// Automatically reduce a number of quality settings to render more quickly.
    #[clap(
        long = "quick",
        help = "Automatically reduce a number of quality settings to render more quickly."
    )]
    pub quick_render: bool,

    /// Suppress all text output other than error messages.
    #[clap(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Path to the image file.
    #[clap(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        default_value = "mlt.exr",
        help = "Write the final image to the given filename (.exr, .png or .tga)."
    )]
    pub image_file: String,

    /// Integrator.
    #[clap(long, value_enum, default_value_t = IntegratorName::Mlt, help = "Light transport algorithm.")]
    pub integrator: IntegratorName,

    /// Image width.
    #[clap(long, value_name = "NUM", default_value_t = 320, help = "Image width in pixels.")]
    pub xresolution: i32,

    /// Image height.
    #[clap(long, value_name = "NUM", default_value_t = 240, help = "Image height in pixels.")]
    pub yresolution: i32,

    /// Maximum path depth.
    #[clap(long, value_name = "NUM", default_value_t = 5, allow_negative_numbers = true, help = "Maximum number of bounces.")]
    pub maxdepth: i32,

    /// Samples per pixel for path tracing.
    #[clap(long, value_name = "NUM", default_value_t = 16, allow_negative_numbers = true, help = "Samples per pixel (path).")]
    pub pixelsamples: i32,

    /// Number of bootstrap samples.
    #[clap(long, value_name = "NUM", default_value_t = 100000, allow_negative_numbers = true, help = "Bootstrap samples (mlt).")]
    pub bootstrapsamples: i32,

    /// Number of Markov chains.
    #[clap(long, value_name = "NUM", default_value_t = 1000, allow_negative_numbers = true, help = "Markov chains (mlt).")]
    pub chains: i32,

    /// Mutations per pixel.
    #[clap(long, value_name = "NUM", default_value_t = 100, allow_negative_numbers = true, help = "Mutations per pixel (mlt).")]
    pub mutationsperpixel: i32,

    /// Large step probability.
    #[clap(long, value_name = "FLOAT", default_value_t = 0.3, allow_negative_numbers = true, help = "Large step probability (mlt).")]
    pub largestepprobability: Float,

    /// Small step standard deviation.
    #[clap(long, value_name = "FLOAT", default_value_t = 0.01, allow_negative_numbers = true, help = "Small step standard deviation (mlt).")]
    pub sigma: Float,

    /// The crop window x0, x1, y0, y1.
    #[clap(
        long = "cropwindow",
        short = 'c',
        value_name = "FLOAT",
        num_args = 4,
        help = "Specify an image crop window (x0 x1 y0 y1)."
    )]
    pub crop_window: Vec<Float>,

    /// Tile size.
    #[clap(
        long = "tilesize",
        short = 'p',
        value_name = "NUM",
        default_value_t = 16,
        help = "Size in pixels of square tiles rendered per thread."
    )]
    pub tile_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self::parse_from(["mlt-render"])
    }
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => {
                warn!("Invalid nthreads 0; using 1");
                1
            }
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let o = Options::default();
        assert_eq!(o.threads(), 1);
        assert_eq!(o.maxdepth, 5);
        assert_eq!(o.chains, 1000);
        assert_eq!(o.bootstrapsamples, 100000);
        assert_eq!(o.mutationsperpixel, 100);
        assert_eq!(o.integrator, IntegratorName::Mlt);
        assert!(!o.quick_render);
    }

    #[test]
    fn negative_values_parse_for_validation() {
        let o = Options::parse_from(["mlt-render", "--maxdepth", "-1", "--integrator", "path", "-t", "0"]);
        assert_eq!(o.maxdepth, -1);
        assert_eq!(o.integrator, IntegratorName::Path);
        assert_eq!(o.threads(), 1);
    }
}
