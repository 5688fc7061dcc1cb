//! Specifies the CLI and handles arg parsing

use clap::{Parser, ValueEnum};
use duotone::Config;
use std::{
	fmt::{Debug, Display},
	num::ParseFloatError,
	ops::RangeBounds,
	path::PathBuf,
	str::FromStr,
};

/// Supported output formats for the final colors
#[derive(Copy, Clone, ValueEnum)]
pub enum FormatOutput {
	/// sRGB hexcode
	Hex,
	/// sRGB (r,g,b) triple
	Rgb,
	/// Whitespace with true color background
	Swatch,
}

/// Ways to colorize the output text
#[derive(Copy, Clone, ValueEnum)]
pub enum ColorizeOutput {
	/// Foreground
	Fg,
	/// Background
	Bg,
}

/// Print the dominant and complementary theme colors of images.
///
/// Pixels are clustered in HSV with a color difference that weighs hue by saturation and value.
/// Clusters close to black, white, or a larger cluster are dropped, and the rest are ranked by size.
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser)]
#[command(version)]
pub struct Options {
	/// The paths to the input images
	///
	/// Each image is processed independently, and results are printed in the given order.
	#[arg(required = true)]
	pub images: Vec<PathBuf>,

	/// The format to print the colors in
	#[arg(short, long, default_value = "hex")]
	pub output: FormatOutput,

	/// Color the foreground or background for each printed color
	#[arg(short, long)]
	pub colorize: Option<ColorizeOutput>,

	/// Print every surviving cluster with its pixel count instead of the two theme colors
	#[arg(short, long)]
	pub all: bool,

	/// Also print the centroid colors at the start of each clustering round
	#[arg(long)]
	pub history: bool,

	/// The number of clusters to seed
	///
	/// Fewer clusters may be found if the image has fewer distinct colors.
	#[arg(short, default_value_t = 5)]
	pub k: u8,

	/// Clustering stops once no centroid moves more than this
	#[arg(short = 'e', long, default_value_t = 0.005, value_parser = parse_valid_threshold)]
	pub cluster_threshold: f32,

	/// The maximum number of clustering rounds
	#[arg(short = 'i', long, default_value_t = 50)]
	pub max_iter: u32,

	/// Images with both sides larger than this are downscaled to a square with this side length
	#[arg(short = 'm', long, default_value_t = 180)]
	pub maxedge: u32,

	/// Clusters closer than this to pure black or pure white are dropped
	#[arg(long, default_value_t = 0.0105, value_parser = parse_valid_threshold)]
	pub bw_threshold: f32,

	/// Clusters closer than this to a larger cluster are dropped
	#[arg(long, default_value_t = 0.05, value_parser = parse_valid_threshold)]
	pub similarity_threshold: f32,

	/// The seed value used for the random number generator
	#[arg(long, default_value_t = 0)]
	pub seed: u64,

	/// The number of images to process in parallel
	///
	/// A value of 0 uses one thread per logical core.
	#[cfg(feature = "threads")]
	#[arg(short = 't', long, default_value_t = 0)]
	pub threads: u8,

	/// Print additional information, such as the number of clustering rounds
	#[arg(long)]
	pub verbose: bool,
}

impl Options {
	/// The palette parameters given by these options
	pub fn config(&self) -> Config {
		Config::default()
			.with_k(self.k)
			.with_cluster_threshold(self.cluster_threshold)
			.with_max_cluster_iterations(self.max_iter)
			.with_maxedge(self.maxedge)
			.with_bw_threshold(self.bw_threshold)
			.with_similarity_threshold(self.similarity_threshold)
			.with_history(self.history)
	}
}

/// Parse a float value and ensure it in the provided, valid range
fn parse_float_in_range<T>(s: &str, range: impl RangeBounds<T> + Debug) -> Result<T, String>
where
	T: FromStr<Err = ParseFloatError> + Display + PartialOrd,
{
	let value: T = s.parse().map_err(|e| format!("{e}"))?;
	if range.contains(&value) {
		Ok(value)
	} else {
		Err(format!("{value} is not in {range:?}"))
	}
}

/// Parse a threshold and ensure it is >= `0.0`
fn parse_valid_threshold(s: &str) -> Result<f32, String> {
	parse_float_in_range(s, 0.0..)
}
