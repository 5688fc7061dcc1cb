//! Color representations and the color difference used for clustering

use palette::{FromColor, RgbHue, Srgb};
use std::f32::consts::TAU;

/// The amount that [`Color::altered`] moves saturation and value away from the midpoint
const ALTER_STEP: f32 = 0.05;

/// A hue, saturation, value triple.
///
/// Unlike most HSV representations, the hue is stored in radians in the range `[0, 2π)`.
/// Saturation and value are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
	/// Hue in radians
	h: f32,
	/// Saturation
	s: f32,
	/// Value
	v: f32,
}

impl Hsv {
	/// Pure white: no saturation, full value
	pub const WHITE: Self = Self { h: 0.0, s: 0.0, v: 1.0 };

	/// Pure black: no value
	pub const BLACK: Self = Self { h: 0.0, s: 0.0, v: 0.0 };

	/// Create a new [`Hsv`], wrapping the hue into `[0, 2π)` and clamping saturation and value to `[0, 1]`.
	#[must_use]
	pub fn new(h: f32, s: f32, v: f32) -> Self {
		let h = h.rem_euclid(TAU);
		// rem_euclid can round up to exactly TAU for tiny negative inputs
		let h = if h >= TAU { 0.0 } else { h };
		Self { h, s: s.clamp(0.0, 1.0), v: v.clamp(0.0, 1.0) }
	}

	/// Hue in radians, in `[0, 2π)`
	#[must_use]
	pub const fn hue(self) -> f32 {
		self.h
	}

	/// Saturation, in `[0, 1]`
	#[must_use]
	pub const fn saturation(self) -> f32 {
		self.s
	}

	/// Value, in `[0, 1]`
	#[must_use]
	pub const fn value(self) -> f32 {
		self.v
	}

	/// The color difference between `self` and `other`. See [`distance`].
	#[must_use]
	pub fn distance(self, other: Self) -> f32 {
		distance(self, other)
	}
}

/// Squared color difference between two HSV colors.
///
/// Each color is projected onto a cone: the hue angle is scaled by saturation times value,
/// so dark or unsaturated colors contribute little hue difference. The value difference is added as is.
///
/// ```text
/// d = (sin(h1)·s1·v1 - sin(h2)·s2·v2)² + (cos(h1)·s1·v1 - cos(h2)·s2·v2)² + (v1 - v2)²
/// ```
///
/// The result is symmetric, non-negative, and zero for identical inputs.
#[must_use]
pub fn distance(x: Hsv, y: Hsv) -> f32 {
	let (x_sin, x_cos) = x.h.sin_cos();
	let (y_sin, y_cos) = y.h.sin_cos();
	let x_chroma = x.s * x.v;
	let y_chroma = y.s * y.v;

	let dx = x_sin * x_chroma - y_sin * y_chroma;
	let dy = x_cos * x_chroma - y_cos * y_chroma;
	let dv = x.v - y.v;
	dx * dx + dy * dy + dv * dv
}

/// An immutable color: a normalized sRGB triple together with its [`Hsv`] form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
	/// Normalized sRGB, each channel in `[0, 1]`
	rgb: Srgb<f32>,
	/// The HSV form of `rgb`
	hsv: Hsv,
}

impl Color {
	/// Create a [`Color`] from an 8-bit sRGB color
	#[must_use]
	pub fn from_srgb8(srgb: Srgb<u8>) -> Self {
		Self::from_srgb(srgb.into_format())
	}

	/// Create a [`Color`] from a normalized sRGB color, clamping each channel to `[0, 1]`
	#[must_use]
	pub fn from_srgb(rgb: Srgb<f32>) -> Self {
		let rgb = Srgb::new(rgb.red.clamp(0.0, 1.0), rgb.green.clamp(0.0, 1.0), rgb.blue.clamp(0.0, 1.0));
		let hsv: palette::Hsv = palette::Hsv::from_color(rgb);
		Self {
			rgb,
			hsv: Hsv::new(hsv.hue.into_positive_radians(), hsv.saturation, hsv.value),
		}
	}

	/// Create a [`Color`] from an [`Hsv`] color
	#[must_use]
	pub fn from_hsv(hsv: Hsv) -> Self {
		let converted: palette::Hsv = palette::Hsv::new(RgbHue::from_radians(hsv.h), hsv.s, hsv.v);
		let rgb = Srgb::from_color(converted);
		Self { rgb, hsv }
	}

	/// The normalized sRGB form of this color
	#[must_use]
	pub const fn rgb(self) -> Srgb<f32> {
		self.rgb
	}

	/// The HSV form of this color
	#[must_use]
	pub const fn hsv(self) -> Hsv {
		self.hsv
	}

	/// The 8-bit sRGB form of this color
	#[must_use]
	pub fn to_srgb8(self) -> Srgb<u8> {
		self.rgb.into_format()
	}

	/// The lowercase `#rrggbb` hex code of this color
	#[must_use]
	pub fn hex(self) -> String {
		format!("#{:x}", self.to_srgb8())
	}

	/// Increase the HSV value by `amount`, capped at `1.0`
	#[must_use]
	pub fn lighten(self, amount: f32) -> Self {
		let Hsv { h, s, v } = self.hsv;
		Self::from_hsv(Hsv::new(h, s, f32::min(v + amount, 1.0)))
	}

	/// Push saturation and value away from the midpoint.
	///
	/// Each of saturation and value increases by `0.05` if it is `<= 0.5` and decreases by `0.05` otherwise.
	#[must_use]
	pub fn altered(self) -> Self {
		/// Nudge a single component away from `0.5`
		fn nudge(x: f32) -> f32 {
			if x <= 0.5 {
				x + ALTER_STEP
			} else {
				x - ALTER_STEP
			}
		}

		let Hsv { h, s, v } = self.hsv;
		Self::from_hsv(Hsv::new(h, nudge(s), nudge(v)))
	}
}
