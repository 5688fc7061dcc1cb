//! Errors returned by the palette entry points

use crate::source::ColorModel;
use thiserror::Error;

/// Errors that can occur when reading pixels for clustering
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// The pixel source is not 8-bit RGB
	#[error("invalid image format: expected 8-bit RGB, got {bits_per_channel}-bit {color_model}")]
	InvalidImageFormat {
		/// Bits per color channel reported by the source
		bits_per_channel: u8,
		/// Color model reported by the source
		color_model: ColorModel,
	},

	/// A pixel buffer does not hold `width * height` pixels
	#[error("pixel buffer has {actual} pixels, but the dimensions require {expected}")]
	DimensionMismatch {
		/// `width * height`
		expected: usize,
		/// Length of the provided buffer
		actual: usize,
	},
}

/// Result type for the palette entry points
pub type Result<T> = std::result::Result<T, Error>;
