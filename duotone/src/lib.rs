//! Find a dominant and a complementary theme color for an image.
//!
//! The pixels of an image are clustered with a k-means variant:
//! the starting centroids are chosen by farthest-point sampling,
//! and pixels are compared in HSV using a color difference that weighs hue by saturation and value.
//! Clusters that are nearly black or white, or that nearly duplicate a larger cluster, are then dropped,
//! and the rest are ranked by size.
//!
//! # Examples
//!
//! ## Read an image file and get its theme colors.
//!
//! ```no_run
//! let image = image::open("some image").unwrap();
//! let result = duotone::from_image(&image, &duotone::Config::default(), 0).unwrap();
//!
//! if let Some(theme) = result.theme() {
//!     println!("{} {}", theme.dominant.hex(), theme.complementary.hex());
//! }
//! ```
//!
//! ## Provide your own random number generator and pixels.
//!
//! ```
//! use palette::Srgb;
//! use rand::SeedableRng;
//!
//! let pixels = [Srgb::new(255, 0, 0), Srgb::new(0, 0, 255), Srgb::new(0, 0, 255)];
//! let source = duotone::SrgbPixels::new(&pixels, 3, 1).unwrap();
//! let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(42);
//!
//! let config = duotone::Config::default().with_k(2);
//! let result = duotone::run(&source, &config, &mut rng).unwrap();
//!
//! assert_eq!(result.dominant().unwrap().to_srgb8(), Srgb::new(0, 0, 255));
//! assert_eq!(result.complementary().unwrap().to_srgb8(), Srgb::new(255, 0, 0));
//! ```
//!
//! # Arguments
//!
//! See [`Config`] for the tunable parameters and their defaults.
//!
//! ## K
//!
//! This is the (maximum) number of clusters to seed.
//!
//! Fewer clusters are found if the image has fewer distinct colors.
//! After filtering, anywhere from none to `k` clusters remain.
//! A value of `0` gives an empty result.
//!
//! ## Thresholds
//!
//! All thresholds are in units of the color difference, see [`distance`].
//! For reference, fully saturated red and blue are `3.0` apart,
//! and fully saturated opposite hues are `4.0` apart.
//!
//! ## Seed
//!
//! Only the first starting centroid is random. Running twice with the same seed gives identical results.
//!
//! # Empty results
//!
//! If every cluster is filtered out (e.g., for an all-black image),
//! [`ClusteringResult::dominant`], [`ClusteringResult::complementary`], and [`ClusteringResult::theme`]
//! return `None`. Choosing a fallback color is left to the caller.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::cargo)]
#![warn(clippy::use_debug, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![warn(clippy::unwrap_used, clippy::unwrap_in_result)]
#![warn(clippy::unneeded_field_pattern, clippy::rest_pat_in_fully_bound_structs)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::str_to_string, clippy::string_to_string, clippy::string_slice)]
#![warn(missing_docs, clippy::missing_docs_in_private_items, rustdoc::all)]
#![warn(clippy::float_cmp_const, clippy::lossy_float_literal)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unreadable_literal)]

use image::DynamicImage;
use palette::Srgb;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

mod cluster;
mod color;
mod config;
mod error;
mod filter;
mod init;
mod result;
mod source;

pub use cluster::Cluster;
pub use color::{distance, Color, Hsv};
pub use config::Config;
pub use error::{Error, Result};
pub use result::{ClusteringResult, Theme};
pub use source::{thumbnail, validate, ColorModel, PixelFormat, PixelSource, SrgbPixels};

/// Cluster the pixels of `source` and rank the resulting palette.
///
/// `source` should already be downscaled according to `config.maxedge` (see [`thumbnail`]).
/// `rng` is only used to pick the first starting centroid.
///
/// # Errors
/// Returns [`Error::InvalidImageFormat`] if `source` is not 8-bit RGB.
pub fn run<S, R>(source: &S, config: &Config, rng: &mut R) -> Result<ClusteringResult>
where
	S: PixelSource + ?Sized,
	R: Rng + ?Sized,
{
	validate(source)?;

	let pixels = source::hsv_pixels(source);
	if config.k == 0 || pixels.is_empty() {
		return Ok(ClusteringResult::empty());
	}

	let centroids = init::farthest_point(config.k, rng, &pixels);
	debug!(pixels = pixels.len(), seeds = centroids.len(), "chose starting centroids");

	let run = cluster::run(&pixels, centroids, config);

	Ok(ClusteringResult {
		clusters: filter::apply(run.clusters, config),
		history: run.history,
		iterations: run.iterations,
		movement: run.movement,
	})
}

/// Downscale `image` according to `config.maxedge` and then [`run`] with a generator seeded by `seed`.
///
/// # Errors
/// Returns [`Error::InvalidImageFormat`] if `image` is not 8-bit RGB(A).
pub fn from_image(image: &DynamicImage, config: &Config, seed: u64) -> Result<ClusteringResult> {
	validate(image)?;
	let image = thumbnail(image, config.maxedge);
	run(&*image, config, &mut Xoshiro256PlusPlus::seed_from_u64(seed))
}

/// [`run`] on a row-major slice of pixels with a generator seeded by `seed`.
///
/// # Errors
/// Returns [`Error::DimensionMismatch`] if `pixels.len() != width * height`.
pub fn from_srgb(pixels: &[Srgb<u8>], width: u32, height: u32, config: &Config, seed: u64) -> Result<ClusteringResult> {
	let source = SrgbPixels::new(pixels, width, height)?;
	run(&source, config, &mut Xoshiro256PlusPlus::seed_from_u64(seed))
}
