//! Farthest-point selection of the starting centroids

use crate::{distance, Hsv};
use rand::Rng;

/// Choose up to `k` starting centroids from `pixels`.
///
/// The first centroid is a uniformly random pixel.
/// Each next centroid is the pixel whose distance to its closest centroid is largest.
/// Ties go to the pixel that comes first in `pixels`.
///
/// Fewer than `k` centroids are returned if every pixel already matches a centroid exactly,
/// and none are returned if `k == 0` or `pixels` is empty.
pub(crate) fn farthest_point<R: Rng + ?Sized>(k: u8, rng: &mut R, pixels: &[Hsv]) -> Vec<Hsv> {
	let k = usize::from(k);
	let mut centroids = Vec::with_capacity(k);
	if k == 0 || pixels.is_empty() {
		return centroids;
	}

	centroids.push(pixels[rng.gen_range(0..pixels.len())]);

	// Distance from each pixel to its closest centroid so far
	let mut min_dists = vec![f32::INFINITY; pixels.len()];

	for i in 1..k {
		match update_farthest(pixels, &mut min_dists, centroids[i - 1]) {
			Some(farthest) => centroids.push(pixels[farthest]),
			None => break, // all pixels exactly match a centroid
		}
	}

	centroids
}

/// Account for a new `centroid` in `min_dists` and return the index of the pixel now farthest from any centroid.
///
/// Returns `None` if every pixel is at distance zero.
fn update_farthest(pixels: &[Hsv], min_dists: &mut [f32], centroid: Hsv) -> Option<usize> {
	let mut farthest = None;
	let mut max_dist = 0.0;
	for (i, (min_dist, &color)) in min_dists.iter_mut().zip(pixels).enumerate() {
		*min_dist = f32::min(*min_dist, distance(color, centroid));
		if *min_dist > max_dist {
			max_dist = *min_dist;
			farthest = Some(i);
		}
	}
	farthest
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Color;
	use palette::Srgb;
	use rand::SeedableRng;
	use rand_xoshiro::Xoshiro256PlusPlus;
	use std::f32::consts::PI;

	fn hsv(r: u8, g: u8, b: u8) -> Hsv {
		Color::from_srgb8(Srgb::new(r, g, b)).hsv()
	}

	fn test_pixels() -> Vec<Hsv> {
		vec![
			hsv(255, 0, 0),
			hsv(250, 10, 10),
			hsv(0, 0, 255),
			hsv(10, 10, 240),
			hsv(0, 200, 0),
			hsv(128, 128, 128),
		]
	}

	fn num_centroids(k: u8, n: usize) {
		let centroids = farthest_point(k, &mut Xoshiro256PlusPlus::seed_from_u64(0), &test_pixels()[..n]);
		assert_eq!(centroids.len(), usize::min(usize::from(k), n));
	}

	#[test]
	fn k_greater_than_n() {
		num_centroids(6, 2);
	}

	#[test]
	fn k_equals_n() {
		num_centroids(4, 4);
	}

	#[test]
	fn k_less_than_n() {
		num_centroids(2, 6);
	}

	#[test]
	fn k_zero_or_no_pixels() {
		let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
		assert!(farthest_point(0, &mut rng, &test_pixels()).is_empty());
		assert!(farthest_point(5, &mut rng, &[]).is_empty());
	}

	#[test]
	fn duplicate_colors_give_fewer_centroids() {
		let pixels = vec![hsv(10, 20, 30); 9];
		let centroids = farthest_point(5, &mut Xoshiro256PlusPlus::seed_from_u64(7), &pixels);
		assert_eq!(centroids, vec![hsv(10, 20, 30)]);
	}

	#[test]
	fn picks_the_farthest_pixel() {
		let pixels = test_pixels();
		for seed in 0..16 {
			let centroids = farthest_point(2, &mut Xoshiro256PlusPlus::seed_from_u64(seed), &pixels);
			let first = centroids[0];
			let expected = pixels
				.iter()
				.map(|&color| distance(color, first))
				.fold(0.0, f32::max);
			assert!((distance(centroids[1], first) - expected).abs() <= f32::EPSILON);
		}
	}

	#[test]
	fn ties_go_to_the_first_pixel_in_scan_order() {
		let red = Hsv::new(0.0, 1.0, 1.0);
		let cyan = Hsv::new(PI, 1.0, 1.0);
		let pale_cyan = Hsv::new(PI, 0.9, 1.0);
		let pixels = [red, pale_cyan, cyan, pale_cyan, cyan];
		let mut min_dists = vec![f32::INFINITY; pixels.len()];

		assert_eq!(update_farthest(&pixels, &mut min_dists, red), Some(2));
		assert_eq!(update_farthest(&pixels, &mut min_dists, cyan), Some(1));
	}

	#[test]
	fn no_farthest_pixel_when_all_match() {
		let pixels = [Hsv::BLACK, Hsv::BLACK];
		let mut min_dists = vec![f32::INFINITY; pixels.len()];
		assert_eq!(update_farthest(&pixels, &mut min_dists, Hsv::BLACK), None);
	}

	#[test]
	fn same_seed_same_centroids() {
		let pixels = test_pixels();
		let x = farthest_point(4, &mut Xoshiro256PlusPlus::seed_from_u64(42), &pixels);
		let y = farthest_point(4, &mut Xoshiro256PlusPlus::seed_from_u64(42), &pixels);
		assert_eq!(x, y);
	}
}
