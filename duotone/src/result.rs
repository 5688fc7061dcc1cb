//! The ranked palette and the theme colors derived from it

use crate::{Cluster, Color};

/// Dominant colors below this HSV value are lightened
const ALMOST_BLACK: f32 = 0.2;

/// The HSV value added to an almost black dominant color
const LIGHTEN_AMOUNT: f32 = 0.1;

/// The two theme colors of an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
	/// See [`ClusteringResult::dominant`]
	pub dominant: Color,
	/// See [`ClusteringResult::complementary`]
	pub complementary: Color,
}

/// Result from clustering an image
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringResult {
	/// Surviving clusters by descending count
	pub(crate) clusters: Vec<Cluster>,
	/// Centroid colors at the start of each round, if requested
	pub(crate) history: Vec<Vec<Color>>,
	/// Number of elapsed rounds
	pub(crate) iterations: u32,
	/// Largest centroid movement in the last round
	pub(crate) movement: f32,
}

impl ClusteringResult {
	/// Create an empty result, representing an image with no pixels or `k = 0`
	pub(crate) const fn empty() -> Self {
		Self {
			clusters: Vec::new(),
			history: Vec::new(),
			iterations: 0,
			movement: 0.0,
		}
	}

	/// The surviving clusters, ordered by descending pixel count.
	///
	/// Clusters with the same count are in seeding order.
	#[must_use]
	pub fn clusters(&self) -> &[Cluster] {
		&self.clusters
	}

	/// Whether every cluster was filtered out
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.clusters.is_empty()
	}

	/// The centroid colors at the start of each round.
	///
	/// Empty unless [`Config::record_history`](crate::Config::record_history) was set.
	/// These include clusters that were later filtered out.
	#[must_use]
	pub fn history(&self) -> &[Vec<Color>] {
		&self.history
	}

	/// Number of clustering rounds that ran
	#[must_use]
	pub const fn iterations(&self) -> u32 {
		self.iterations
	}

	/// Largest centroid movement in the last round, or `0.0` if no rounds ran
	#[must_use]
	pub const fn movement(&self) -> f32 {
		self.movement
	}

	/// The color of the largest cluster.
	///
	/// If its HSV value is below `0.2`, the color is returned lightened by `0.1`.
	/// Returns `None` if there are no clusters.
	#[must_use]
	pub fn dominant(&self) -> Option<Color> {
		let color = self.clusters.first()?.color();
		if color.hsv().value() < ALMOST_BLACK {
			Some(color.lighten(LIGHTEN_AMOUNT))
		} else {
			Some(color)
		}
	}

	/// A second color to pair with [`dominant`](Self::dominant).
	///
	/// - With one cluster, the cluster's color with saturation and value pushed away from the midpoint.
	/// - With two clusters, the color of the second cluster.
	/// - Otherwise, the color of the second smallest cluster.
	///
	/// Returns `None` if there are no clusters.
	#[must_use]
	pub fn complementary(&self) -> Option<Color> {
		match self.clusters.as_slice() {
			[] => None,
			[only] => Some(only.color().altered()),
			[_, second] => Some(second.color()),
			[.., second_last, _] => Some(second_last.color()),
		}
	}

	/// Both theme colors, or `None` if there are no clusters
	#[must_use]
	pub fn theme(&self) -> Option<Theme> {
		Some(Theme {
			dominant: self.dominant()?,
			complementary: self.complementary()?,
		})
	}
}
