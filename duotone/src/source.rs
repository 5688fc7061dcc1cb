//! Read-only pixel access for the clustering engine

use crate::{Color, Error, Hsv, Result};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageBuffer, Rgb, Rgba};
use palette::Srgb;
use std::{
	borrow::Cow,
	collections::HashMap,
	fmt::{self, Display},
	ops::Deref,
};

/// The color model of a pixel source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
	/// Red, green, blue (possibly with alpha)
	Rgb,
	/// Luminance only (possibly with alpha)
	Gray,
	/// Palette indices
	Indexed,
}

impl Display for ColorModel {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			ColorModel::Rgb => write!(f, "RGB"),
			ColorModel::Gray => write!(f, "grayscale"),
			ColorModel::Indexed => write!(f, "indexed"),
		}
	}
}

/// The storage format reported by a pixel source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
	/// Number of bits in each color channel
	pub bits_per_channel: u8,
	/// How the channels are interpreted
	pub color_model: ColorModel,
}

impl PixelFormat {
	/// 8-bit RGB, the only format accepted by the engine
	pub const RGB8: Self = Self { bits_per_channel: 8, color_model: ColorModel::Rgb };
}

/// A read-only view of an image's pixels.
///
/// The image should already be downscaled (see [`thumbnail`]),
/// since every pixel is visited on every clustering round.
pub trait PixelSource {
	/// Width in pixels
	fn width(&self) -> u32;

	/// Height in pixels
	fn height(&self) -> u32;

	/// The color of the pixel at `(x, y)`, for `x < width` and `y < height`
	fn pixel_at(&self, x: u32, y: u32) -> Srgb<u8>;

	/// The storage format of this source
	fn format(&self) -> PixelFormat {
		PixelFormat::RGB8
	}
}

impl<C: Deref<Target = [u8]>> PixelSource for ImageBuffer<Rgb<u8>, C> {
	fn width(&self) -> u32 {
		ImageBuffer::width(self)
	}

	fn height(&self) -> u32 {
		ImageBuffer::height(self)
	}

	fn pixel_at(&self, x: u32, y: u32) -> Srgb<u8> {
		let [r, g, b] = self.get_pixel(x, y).0;
		Srgb::new(r, g, b)
	}
}

impl<C: Deref<Target = [u8]>> PixelSource for ImageBuffer<Rgba<u8>, C> {
	fn width(&self) -> u32 {
		ImageBuffer::width(self)
	}

	fn height(&self) -> u32 {
		ImageBuffer::height(self)
	}

	fn pixel_at(&self, x: u32, y: u32) -> Srgb<u8> {
		let [r, g, b, _] = self.get_pixel(x, y).0;
		Srgb::new(r, g, b)
	}
}

impl PixelSource for DynamicImage {
	fn width(&self) -> u32 {
		GenericImageView::width(self)
	}

	fn height(&self) -> u32 {
		GenericImageView::height(self)
	}

	fn pixel_at(&self, x: u32, y: u32) -> Srgb<u8> {
		let [r, g, b, _] = self.get_pixel(x, y).0;
		Srgb::new(r, g, b)
	}

	fn format(&self) -> PixelFormat {
		let color = self.color();
		PixelFormat {
			bits_per_channel: color.bytes_per_pixel() / color.channel_count() * 8,
			color_model: if color.has_color() { ColorModel::Rgb } else { ColorModel::Gray },
		}
	}
}

/// A [`PixelSource`] over a row-major slice of [`Srgb`] colors
#[derive(Debug, Clone, Copy)]
pub struct SrgbPixels<'a> {
	/// Pixels, row by row
	pixels: &'a [Srgb<u8>],
	/// Width in pixels
	width: u32,
	/// Height in pixels
	height: u32,
}

impl<'a> SrgbPixels<'a> {
	/// Wrap a row-major pixel slice, checking that it holds exactly `width * height` pixels
	///
	/// # Errors
	/// Returns [`Error::DimensionMismatch`] if the slice length does not match the dimensions.
	pub fn new(pixels: &'a [Srgb<u8>], width: u32, height: u32) -> Result<Self> {
		let expected = width as usize * height as usize;
		if pixels.len() == expected {
			Ok(Self { pixels, width, height })
		} else {
			Err(Error::DimensionMismatch { expected, actual: pixels.len() })
		}
	}
}

impl PixelSource for SrgbPixels<'_> {
	fn width(&self) -> u32 {
		self.width
	}

	fn height(&self) -> u32 {
		self.height
	}

	fn pixel_at(&self, x: u32, y: u32) -> Srgb<u8> {
		self.pixels[y as usize * self.width as usize + x as usize]
	}
}

/// Check that `source` holds 8-bit RGB pixels
///
/// # Errors
/// Returns [`Error::InvalidImageFormat`] for any other format.
pub fn validate<S: PixelSource + ?Sized>(source: &S) -> Result<()> {
	let format = source.format();
	if format == PixelFormat::RGB8 {
		Ok(())
	} else {
		Err(Error::InvalidImageFormat {
			bits_per_channel: format.bits_per_channel,
			color_model: format.color_model,
		})
	}
}

/// Downscale `image` to `maxedge × maxedge` with bilinear filtering if both of its sides exceed `maxedge`.
///
/// Otherwise, the image is returned as is.
#[must_use]
pub fn thumbnail(image: &DynamicImage, maxedge: u32) -> Cow<'_, DynamicImage> {
	let (width, height) = image.dimensions();
	if width > maxedge && height > maxedge {
		Cow::Owned(image.resize_exact(maxedge, maxedge, FilterType::Triangle))
	} else {
		Cow::Borrowed(image)
	}
}

/// Convert every pixel of `source` to [`Hsv`], rows top to bottom and left to right within a row
pub(crate) fn hsv_pixels<S: PixelSource + ?Sized>(source: &S) -> Vec<Hsv> {
	let (width, height) = (source.width(), source.height());

	// Album art tends to have many repeated colors, so memoize the conversions.
	// Packed Srgb -> Hsv
	let mut memo: HashMap<u32, Hsv> = HashMap::new();

	let mut pixels = Vec::with_capacity(width as usize * height as usize);
	for y in 0..height {
		for x in 0..width {
			let srgb = source.pixel_at(x, y);
			let key = srgb.into_u32::<palette::rgb::channels::Rgba>();
			let hsv = *memo.entry(key).or_insert_with(|| Color::from_srgb8(srgb).hsv());
			pixels.push(hsv);
		}
	}

	pixels
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{GrayImage, RgbImage};
	use rand::SeedableRng;

	#[test]
	fn rgb_images_are_valid() {
		let image = RgbImage::new(2, 2);
		assert_eq!(validate(&image), Ok(()));
		assert_eq!(validate(&DynamicImage::ImageRgb8(image)), Ok(()));
		assert_eq!(validate(&DynamicImage::new_rgba8(2, 2)), Ok(()));
	}

	#[test]
	fn other_formats_are_rejected() {
		let gray = DynamicImage::ImageLuma8(GrayImage::new(2, 2));
		assert_eq!(
			validate(&gray),
			Err(Error::InvalidImageFormat { bits_per_channel: 8, color_model: ColorModel::Gray })
		);

		assert_eq!(
			validate(&DynamicImage::new_rgb16(2, 2)),
			Err(Error::InvalidImageFormat { bits_per_channel: 16, color_model: ColorModel::Rgb })
		);
	}

	/// A palette-based image, as a decoder might expose it
	struct Indexed {
		/// Palette colors
		palette: Vec<Srgb<u8>>,
		/// Palette index of each pixel, row by row
		indices: Vec<u8>,
		/// Width in pixels
		width: u32,
	}

	impl PixelSource for Indexed {
		fn width(&self) -> u32 {
			self.width
		}

		#[allow(clippy::cast_possible_truncation)]
		fn height(&self) -> u32 {
			(self.indices.len() / self.width as usize) as u32
		}

		fn pixel_at(&self, x: u32, y: u32) -> Srgb<u8> {
			self.palette[usize::from(self.indices[(y * self.width + x) as usize])]
		}

		fn format(&self) -> PixelFormat {
			PixelFormat { bits_per_channel: 8, color_model: ColorModel::Indexed }
		}
	}

	#[test]
	fn indexed_sources_are_rejected() {
		let source = Indexed {
			palette: vec![Srgb::new(255, 0, 0), Srgb::new(0, 0, 255)],
			indices: vec![0, 1, 1, 0],
			width: 2,
		};

		assert_eq!(source.pixel_at(1, 0), Srgb::new(0, 0, 255));
		assert_eq!(
			validate(&source),
			Err(Error::InvalidImageFormat { bits_per_channel: 8, color_model: ColorModel::Indexed })
		);

		let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(0);
		let err = crate::run(&source, &crate::Config::default(), &mut rng).err();
		assert_eq!(
			err.map(|e| e.to_string()).as_deref(),
			Some("invalid image format: expected 8-bit RGB, got 8-bit indexed")
		);
	}

	#[test]
	fn srgb_pixels_checks_length() {
		let pixels = vec![Srgb::new(0, 0, 0); 6];
		assert!(SrgbPixels::new(&pixels, 3, 2).is_ok());
		assert_eq!(
			SrgbPixels::new(&pixels, 4, 2).err(),
			Some(Error::DimensionMismatch { expected: 8, actual: 6 })
		);
	}

	#[test]
	fn srgb_pixels_are_row_major() {
		let pixels = (0..6).map(|i| Srgb::new(i, 0, 0)).collect::<Vec<_>>();
		let source = SrgbPixels::new(&pixels, 3, 2).expect("matching dimensions");
		assert_eq!(source.pixel_at(2, 0), Srgb::new(2, 0, 0));
		assert_eq!(source.pixel_at(0, 1), Srgb::new(3, 0, 0));
	}

	#[test]
	fn hsv_pixels_follow_scan_order() {
		let image = RgbImage::from_fn(2, 2, |x, y| if (x, y) == (1, 0) { Rgb([255, 0, 0]) } else { Rgb([0, 0, 0]) });
		let pixels = hsv_pixels(&image);
		assert_eq!(pixels.len(), 4);
		assert_eq!(pixels[1], Color::from_srgb8(Srgb::new(255, 0, 0)).hsv());
		assert_eq!(pixels[2], Hsv::BLACK);
	}

	#[test]
	fn thumbnail_only_when_both_sides_exceed() {
		let wide = DynamicImage::new_rgb8(400, 100);
		assert!(matches!(thumbnail(&wide, 180), Cow::Borrowed(_)));

		let large = DynamicImage::new_rgb8(400, 300);
		let thumb = thumbnail(&large, 180);
		assert_eq!(thumb.dimensions(), (180, 180));
	}
}
